//! HTTP request handlers for the membership accumulator.
//!
//! Field elements travel as decimal strings (hex with a `0x` prefix is also
//! accepted on input), the same encoding the prover inputs use.

use ark_bn254::Fr;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use membership_circuits::{
    leaf_commitment, AccumulatorState, FieldDigest, MembershipTree, MerkleError, MerkleProof,
};
use membership_prover::{
    parse_field, FieldParseError, MembershipWitness, ProveError, ProverInputs, ProvingBackend,
};

use crate::SharedState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid {name}: {source}")]
    InvalidField {
        name: &'static str,
        source: FieldParseError,
    },
    #[error("request needs either `leaf` or both `secret` and `uuid`")]
    MissingLeaf,
    #[error("leaf {0} is not in the tree")]
    LeafNotFound(String),
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    #[error(transparent)]
    Prove(#[from] ProveError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidField { .. } | ApiError::MissingLeaf => StatusCode::BAD_REQUEST,
            ApiError::LeafNotFound(_) | ApiError::Prove(ProveError::LeafNotFound) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Merkle(MerkleError::CapacityExceeded { .. }) => StatusCode::CONFLICT,
            ApiError::Merkle(_)
            | ApiError::Prove(ProveError::InvalidField(_))
            | ApiError::Prove(ProveError::IndexOutOfRange { .. })
            | ApiError::Prove(ProveError::Unsatisfied) => StatusCode::BAD_REQUEST,
            ApiError::Prove(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

fn field(name: &'static str, value: &str) -> Result<Fr, ApiError> {
    parse_field(value).map_err(|source| ApiError::InvalidField { name, source })
}

// ============ Tree ============

#[derive(Serialize)]
pub struct TreeResponse {
    pub root: String,
    pub len: u64,
    pub capacity: u64,
    pub depth: usize,
    pub state: &'static str,
}

impl From<&MembershipTree> for TreeResponse {
    fn from(tree: &MembershipTree) -> Self {
        Self {
            root: tree.root().to_field_string(),
            len: tree.len(),
            capacity: tree.capacity(),
            depth: tree.depth(),
            state: match tree.state() {
                AccumulatorState::Open => "open",
                AccumulatorState::Full => "full",
            },
        }
    }
}

pub async fn tree_info(State(state): State<SharedState>) -> Json<TreeResponse> {
    let state = state.read().await;
    Json(TreeResponse::from(&state.tree))
}

// ============ Leaves ============

/// A raw leaf, or the participant values it is derived from.
#[derive(Debug, Deserialize)]
pub struct InsertLeafRequest {
    pub leaf: Option<String>,
    pub secret: Option<String>,
    pub uuid: Option<String>,
}

impl InsertLeafRequest {
    fn leaf(&self) -> Result<Fr, ApiError> {
        match (&self.leaf, &self.secret, &self.uuid) {
            (Some(leaf), _, _) => field("leaf", leaf),
            (None, Some(secret), Some(uuid)) => Ok(leaf_commitment(
                field("secret", secret)?,
                field("uuid", uuid)?,
            )),
            _ => Err(ApiError::MissingLeaf),
        }
    }
}

#[derive(Serialize)]
pub struct InsertLeafResponse {
    pub index: u64,
    pub leaf: String,
    pub root: String,
}

pub async fn insert_leaf(
    State(state): State<SharedState>,
    Json(req): Json<InsertLeafRequest>,
) -> Result<(StatusCode, Json<InsertLeafResponse>), ApiError> {
    let leaf = req.leaf()?;

    let mut state = state.write().await;
    let index = state.tree.insert(leaf)?;
    let root = state.tree.root().to_field_string();
    info!(index, %root, "leaf inserted");

    Ok((
        StatusCode::CREATED,
        Json(InsertLeafResponse {
            index,
            leaf: leaf.to_field_string(),
            root,
        }),
    ))
}

#[derive(Serialize)]
pub struct LeafIndexResponse {
    pub index: u64,
}

pub async fn leaf_index(
    State(state): State<SharedState>,
    Path(leaf): Path<String>,
) -> Result<Json<LeafIndexResponse>, ApiError> {
    let value = field("leaf", &leaf)?;

    let state = state.read().await;
    let index = state
        .tree
        .index_of(&value)
        .ok_or(ApiError::LeafNotFound(leaf))?;
    Ok(Json(LeafIndexResponse { index }))
}

// ============ Paths ============

#[derive(Serialize)]
pub struct PathResponse {
    pub leaf_index: u64,
    pub siblings: Vec<String>,
    pub path_indices: Vec<bool>,
    pub root: String,
}

impl From<&MerkleProof<Fr>> for PathResponse {
    fn from(proof: &MerkleProof<Fr>) -> Self {
        Self {
            leaf_index: proof.leaf_index(),
            siblings: proof.siblings().iter().map(|s| s.to_field_string()).collect(),
            path_indices: proof.path_indices(),
            root: proof.root().to_field_string(),
        }
    }
}

pub async fn merkle_path(
    State(state): State<SharedState>,
    Path(index): Path<u64>,
) -> Result<Json<PathResponse>, ApiError> {
    let state = state.read().await;
    let proof = state.tree.get_proof(index)?;
    Ok(Json(PathResponse::from(&proof)))
}

// ============ Membership proof ============

#[derive(Debug, Deserialize)]
pub struct ProveMembershipRequest {
    pub secret: String,
    pub uuid: String,
    pub survey_id: String,
}

#[derive(Serialize)]
pub struct ProofResponse {
    pub proof: String,
    pub public_inputs: Vec<String>,
    pub prover_inputs: ProverInputs,
}

pub async fn prove_membership(
    State(state): State<SharedState>,
    Json(req): Json<ProveMembershipRequest>,
) -> Result<Json<ProofResponse>, ApiError> {
    let secret = field("secret", &req.secret)?;
    let uuid = field("uuid", &req.uuid)?;
    let survey_id = field("survey_id", &req.survey_id)?;

    let state = state.read().await;
    let witness = MembershipWitness::from_tree(&state.tree, secret, uuid, survey_id)?;
    let prover_inputs = witness.to_prover_inputs();

    // Proves on the request task while holding the read lock
    let result = state.backend.prove(&prover_inputs)?;
    let proof_bytes = result.serialize_proof()?;
    info!(index = witness.merkle_index(), "membership proof served");

    Ok(Json(ProofResponse {
        proof: format!("0x{}", hex::encode(proof_bytes)),
        public_inputs: result
            .public_inputs
            .iter()
            .map(|x| x.to_field_string())
            .collect(),
        prover_inputs,
    }))
}
