//! HTTP handlers for the ledger API.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};

use crate::core::{Block, CommitRequest};
use crate::error::LedgerError;
use crate::interpreter::{Diagnostic, PendingRecord, Session};
use crate::server::AppState;
use crate::wallet::Wallet;

/// `{error: <message>}` with a status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        ApiError {
            status: StatusCode::NOT_FOUND,
            message: "Not Found".to_string(),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let status = match err {
            LedgerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {err}");
        }
        ApiError {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct ContractInput {
    #[serde(default)]
    pub dsl: Option<String>,
}

#[derive(Serialize)]
pub struct CommitResponse {
    pub message: &'static str,
    pub block: Block,
    pub wallet: Wallet,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transactions: Vec<String>,
}

#[derive(Serialize)]
pub struct ParsedView {
    pub record: PendingRecord,
    pub actions: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ContractResponse {
    Committed(CommitResponse),
    Parsed { parsed: ParsedView },
}

/// POST /contract: run a script through a fresh session
pub async fn run_contract(
    State(state): State<AppState>,
    payload: Result<Json<ContractInput>, JsonRejection>,
) -> Result<Json<ContractResponse>, ApiError> {
    let Json(input) = payload?;
    let dsl = match input.dsl {
        Some(dsl) if !dsl.trim().is_empty() => dsl,
        _ => return Err(ApiError::bad_request("Missing DSL input")),
    };

    let session = Session::new(state.ledger.clone());
    let outcome = session.run(&dsl)?;

    match outcome.last_committed().cloned() {
        Some(block) => {
            let transactions = outcome
                .committed()
                .iter()
                .map(|b| b.get_transaction_id().to_string())
                .collect();
            Ok(Json(ContractResponse::Committed(CommitResponse {
                message: "Success",
                block,
                wallet: state.ledger.wallet()?,
                transactions,
            })))
        }
        None => Ok(Json(ContractResponse::Parsed {
            parsed: ParsedView {
                diagnostics: outcome.diagnostics().into_iter().cloned().collect(),
                actions: outcome.actions,
                record: outcome.record,
            },
        })),
    }
}

/// POST /commit: append records directly, bypassing the interpreter
pub async fn commit(
    State(state): State<AppState>,
    payload: Result<Json<CommitRequest>, JsonRejection>,
) -> Result<Json<CommitResponse>, ApiError> {
    let Json(request) = payload?;
    let (block, wallet) = state.ledger.commit(request)?;
    Ok(Json(CommitResponse {
        message: "Success",
        block,
        wallet,
        transactions: Vec::new(),
    }))
}

/// GET /blockchain
pub async fn list_blocks(State(state): State<AppState>) -> Result<Json<Vec<Block>>, ApiError> {
    Ok(Json(state.ledger.blocks()?))
}

/// GET /wallet
pub async fn wallet(State(state): State<AppState>) -> Result<Json<Wallet>, ApiError> {
    Ok(Json(state.ledger.wallet()?))
}

#[derive(Serialize)]
pub struct ViolationView {
    pub index: u64,
    pub reason: String,
}

#[derive(Serialize)]
pub struct ValidateResp {
    pub valid: bool,
    pub length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ViolationView>,
}

/// GET /validate
pub async fn validate_chain(State(state): State<AppState>) -> Result<Json<ValidateResp>, ApiError> {
    let length = state.ledger.len()?;
    let error = match state.ledger.verify() {
        Ok(()) => None,
        Err(LedgerError::ChainIntegrityViolation { index, reason }) => {
            Some(ViolationView { index, reason })
        }
        Err(other) => return Err(other.into()),
    };
    Ok(Json(ValidateResp {
        valid: error.is_none(),
        length,
        error,
    }))
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub length: usize,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<Health>, ApiError> {
    Ok(Json(Health {
        status: "ok",
        length: state.ledger.len()?,
    }))
}

/// GET /
pub async fn index() -> &'static str {
    "Bharat Chain backend ready\nEndpoints: POST /contract, POST /commit, GET /blockchain, GET /wallet, GET /validate, GET /health\n"
}

pub async fn not_found() -> ApiError {
    ApiError::not_found()
}
