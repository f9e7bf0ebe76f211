//! Poseidon parameters over the BN254 scalar field.
//!
//! Width 3 (rate 2, capacity 1) so that a Merkle node absorbs exactly one
//! left/right pair per permutation.

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ff::MontFp;

/// Full rounds, split evenly before and after the partial rounds.
pub const FULL_ROUNDS: usize = 8;

/// Partial rounds (S-box on the first state element only).
pub const PARTIAL_ROUNDS: usize = 57;

/// S-box exponent, x^5 is a permutation of BN254's scalar field.
pub const ALPHA: u64 = 5;

/// Sponge rate in field elements.
pub const RATE: usize = 2;

/// Sponge capacity in field elements.
pub const CAPACITY: usize = 1;

/// Seed for the round constant stream ("MEMBRSHP" as ASCII).
const ROUND_CONSTANT_SEED: u64 = 0x4d454d4252534850;

/// Build the Poseidon configuration shared by native and in-circuit hashing.
///
/// Both sides must use the exact same parameters or witnesses computed by the
/// accumulator will not satisfy the membership circuit.
pub fn poseidon_config() -> PoseidonConfig<Fr> {
    let mds = vec![
        vec![
            MontFp!("7511745149465107256748700652201246547602992235352608707588321460060273774987"),
            MontFp!("10370080108974718697676803824769673834027675643658433702224577712625900127200"),
            MontFp!("19705173408229649878903981084052839426532978878058043055305024233888854471533"),
        ],
        vec![
            MontFp!("18732019378264290557468133440468564866454307626475683536618613112504878618481"),
            MontFp!("20870176810702568768751421378473869562658540583882454726129544628203806653987"),
            MontFp!("7266061498423634438932006217945904744987532209093972706694887950396501989428"),
        ],
        vec![
            MontFp!("9131299761947733513298312097611845208338517739621853568979632113419485819303"),
            MontFp!("10595341252162738537912664445405114076324478519622938027420701542910180337937"),
            MontFp!("11597556804922396090267472882856054602429588299176362916247939723151043581408"),
        ],
    ];

    PoseidonConfig {
        full_rounds: FULL_ROUNDS,
        partial_rounds: PARTIAL_ROUNDS,
        alpha: ALPHA,
        ark: round_constants(RATE + CAPACITY),
        mds,
        rate: RATE,
        capacity: CAPACITY,
    }
}

/// Deterministic round constants, one row of `width` elements per round.
///
/// Development parameters: the stream is a quadratic recurrence from a fixed
/// seed, not the Grain LFSR of the reference parameter generator.
fn round_constants(width: usize) -> Vec<Vec<Fr>> {
    let mut state = Fr::from(ROUND_CONSTANT_SEED);

    (0..FULL_ROUNDS + PARTIAL_ROUNDS)
        .map(|_| {
            (0..width)
                .map(|_| {
                    state = state * state + Fr::from(7u64);
                    state
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_shape() {
        let config = poseidon_config();
        assert_eq!(config.full_rounds, FULL_ROUNDS);
        assert_eq!(config.partial_rounds, PARTIAL_ROUNDS);
        assert_eq!(config.rate, RATE);
        assert_eq!(config.capacity, CAPACITY);
        assert_eq!(config.mds.len(), RATE + CAPACITY);
        assert_eq!(config.ark.len(), FULL_ROUNDS + PARTIAL_ROUNDS);
        assert!(config.ark.iter().all(|row| row.len() == RATE + CAPACITY));
    }

    #[test]
    fn test_config_is_reproducible() {
        assert_eq!(poseidon_config().ark, poseidon_config().ark);
    }
}
