//! Run-time configuration for the harness binaries.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use membership_circuits::DEFAULT_DEPTH;

/// Prove survey membership end to end: build the tree, insert the
/// participant's leaf, prove and verify.
#[derive(Parser, Debug, Clone)]
#[command(name = "membership-harness")]
#[command(about = "Survey membership proof harness", long_about = None)]
#[command(version)]
pub struct HarnessConfig {
    /// Merkle tree depth (capacity 2^depth)
    #[arg(long, env = "MEMBERSHIP_DEPTH", default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,

    /// Directory holding proving/verifying keys
    #[arg(long, env = "MEMBERSHIP_KEYS_DIR", default_value = "keys")]
    pub keys_dir: PathBuf,

    /// Participant secret (decimal or 0x hex)
    #[arg(long, default_value = "1")]
    pub secret: String,

    /// Raw participant id; the uuid is its hash
    #[arg(long, default_value = "0xdddddd")]
    pub uuid_seed: String,

    /// Survey identifier bound into the nullifier
    #[arg(long, default_value = "1")]
    pub survey_id: String,

    /// Also write the prover inputs as JSON to this path
    #[arg(long)]
    pub inputs_out: Option<PathBuf>,
}

/// Install the global tracing subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_harness_scenario() {
        let config = HarnessConfig::parse_from(["membership-harness"]);
        assert_eq!(config.depth, DEFAULT_DEPTH);
        assert_eq!(config.secret, "1");
        assert_eq!(config.uuid_seed, "0xdddddd");
        assert_eq!(config.survey_id, "1");
        assert!(config.inputs_out.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = HarnessConfig::parse_from([
            "membership-harness",
            "--depth",
            "4",
            "--keys-dir",
            "/tmp/k",
            "--survey-id",
            "7",
        ]);
        assert_eq!(config.depth, 4);
        assert_eq!(config.keys_dir, PathBuf::from("/tmp/k"));
        assert_eq!(config.survey_id, "7");
    }
}
