// src/audit/mod.rs

pub mod explain;
pub mod render;
pub mod run;
pub mod types;

pub use render::render_text;
pub use run::run_audit;
pub use types::{AccountStats, AuditReport, ExplainSection, RepoSummary};
