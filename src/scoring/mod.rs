// src/scoring/mod.rs

pub mod aggregator;

pub use aggregator::{evaluate, top_actions, AuditResult, CategoryScore, RED_FLAG_PENALTY};
