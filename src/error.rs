// src/error.rs

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failure of a single resilient fetch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("credential rejected by the API, please supply a valid credential")]
    InvalidCredential,

    #[error("API rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<DateTime<Utc>> },

    #[error("API did not respond within {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("unexpected API status {status}")]
    Unexpected { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode API response: {0}")]
    Decode(String),
}

fn retry_hint(retry_after: &Option<DateTime<Utc>>) -> String {
    match retry_after {
        Some(at) => format!(", retry after {}", at.format("%H:%M:%S UTC")),
        None => ", supply a credential or retry later".to_string(),
    }
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidCredential => "invalid_credential",
            FetchError::RateLimited { .. } => "rate_limited",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Unexpected { .. } => "unexpected",
            FetchError::Network(_) => "network",
            FetchError::Decode(_) => "decode",
        }
    }
}

/// Failure of a whole audit run.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub type FetchResult<T> = Result<T, FetchError>;
