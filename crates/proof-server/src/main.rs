//! HTTP API server for the survey membership accumulator.
//!
//! Holds one accumulator and the Groth16 keys for its depth. Leaves are
//! appended through the API; paths and membership proofs are served against
//! the current root.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

mod handlers;
mod routes;

use membership_circuits::{membership_tree, MembershipTree, DEFAULT_DEPTH};
use membership_prover::{init_tracing, load_or_setup, Groth16Backend};

/// Server settings; every flag falls back to an environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "membership-server")]
#[command(about = "Survey membership accumulator HTTP API", long_about = None)]
#[command(version)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[arg(long, env = "MEMBERSHIP_ADDR", default_value = "0.0.0.0:3001")]
    pub addr: SocketAddr,

    /// Directory holding proving/verifying keys
    #[arg(long, env = "MEMBERSHIP_KEYS_DIR", default_value = "keys")]
    pub keys_dir: PathBuf,

    /// Merkle tree depth (capacity 2^depth)
    #[arg(long, env = "MEMBERSHIP_DEPTH", default_value_t = DEFAULT_DEPTH)]
    pub depth: usize,
}

/// Application state shared across handlers
pub struct AppState {
    pub backend: Arc<Groth16Backend>,
    pub tree: MembershipTree,
}

pub type SharedState = Arc<RwLock<AppState>>;

impl AppState {
    pub fn new(backend: Groth16Backend, tree: MembershipTree) -> Self {
        Self {
            backend: Arc::new(backend),
            tree,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

/// Full application router with CORS and request tracing.
pub fn app(state: SharedState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    init_tracing("info,tower_http=debug");
    let config = ServerConfig::parse();
    info!(?config, "starting membership server");

    let tree = match membership_tree(config.depth) {
        Ok(tree) => tree,
        Err(e) => {
            error!("Invalid tree configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let keys = match load_or_setup(&config.keys_dir, config.depth) {
        Ok(keys) => keys,
        Err(e) => {
            error!("Failed to load or generate circuit keys: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(Groth16Backend::new(keys, config.depth), tree).shared();

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.addr, "Failed to bind: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(addr = %config.addr, depth = config.depth, "listening");

    if let Err(e) = axum::serve(listener, app(state)).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::parse_from(["membership-server"]);
        assert_eq!(config.addr, "0.0.0.0:3001".parse::<SocketAddr>().unwrap());
        assert_eq!(config.keys_dir, PathBuf::from("keys"));
        assert_eq!(config.depth, DEFAULT_DEPTH);
    }

    #[test]
    fn test_config_flags() {
        let config = ServerConfig::parse_from([
            "membership-server",
            "--addr",
            "127.0.0.1:8080",
            "--depth",
            "6",
        ]);
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.depth, 6);
    }
}
