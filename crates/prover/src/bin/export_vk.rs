//! Export the membership verifying key.
//!
//! Loads keys for the configured depth (running setup if missing) and prints
//! the compressed verifying key as hex, followed by a JSON record.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use membership_prover::{init_tracing, load_or_setup, setup::key_file_stem, HarnessConfig};

fn main() -> ExitCode {
    init_tracing("info");
    let config = HarnessConfig::parse();

    let keys = match load_or_setup(&config.keys_dir, config.depth) {
        Ok(keys) => keys,
        Err(e) => {
            error!("Failed to load or generate keys: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let vk = match keys.serialize_vk() {
        Ok(vk) => vk,
        Err(e) => {
            error!("Failed to serialize verifying key: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Membership VK, depth {} ({} bytes):", config.depth, vk.len());
    println!("0x{}\n", hex::encode(&vk));

    let json = serde_json::json!({
        "name": key_file_stem(config.depth),
        "depth": config.depth,
        "public_inputs": ["merkle_root", "survey_id", "nulifier"],
        "vk": format!("0x{}", hex::encode(&vk)),
    });
    println!("{}", json);

    ExitCode::SUCCESS
}
