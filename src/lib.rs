// src/lib.rs

pub mod audit;
pub mod cache;
pub mod checks;
pub mod config;
pub mod error;
pub mod fetch;
pub mod providers;
pub mod scoring;
pub mod types;

// Re-export commonly used types
pub use types::*;
pub use audit::{run_audit, AuditReport};
pub use cache::SimpleCache;
pub use config::AuditConfig;
pub use error::{AuditError, FetchError};
pub use fetch::{CredentialRotator, Session};
pub use providers::{HttpTransport, ReqwestTransport};
pub use scoring::{evaluate, AuditResult, CategoryScore};
