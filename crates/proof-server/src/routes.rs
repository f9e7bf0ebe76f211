//! API route definitions for the membership accumulator.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::SharedState;

/// Create API routes
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Accumulator
        .route("/api/tree", get(handlers::tree_info))
        .route("/api/leaves", post(handlers::insert_leaf))
        .route("/api/leaves/:leaf/index", get(handlers::leaf_index))
        .route("/api/proof/:index", get(handlers::merkle_path))
        // Proof generation
        .route("/api/prove/membership", post(handlers::prove_membership))
}
