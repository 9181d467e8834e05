// src/checks/mod.rs
//
// Rule checks. Every function here is pure: it reads already-fetched
// entities and appends records to a `Findings`. Missing input data produces
// a failed record with the usual weight, never a skipped one.

pub mod activity;
pub mod community;
pub mod profile;
pub mod repository;
pub mod security;

// Re-export check functions
pub use activity::audit_activity;
pub use community::audit_community;
pub use profile::audit_profile;
pub use repository::audit_repository;
pub use security::audit_security;

use crate::types::{Category, CheckRecord, Impact};

impl CheckRecord {
    /// A check that counts toward the category ceiling.
    pub fn core(
        category: Category,
        label: impl Into<String>,
        passed: bool,
        weight: u32,
        tip: &str,
    ) -> Self {
        Self {
            category,
            label: label.into(),
            passed,
            weight,
            tip: tip.to_string(),
            impact: Impact::Medium,
            is_bonus: false,
        }
    }

    /// A check that can only add to the achieved score.
    pub fn bonus(
        category: Category,
        label: impl Into<String>,
        passed: bool,
        weight: u32,
        tip: &str,
    ) -> Self {
        Self {
            is_bonus: true,
            ..Self::core(category, label, passed, weight, tip)
        }
    }

    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }
}

/// Checks and red flags accumulated over one run, in discovery order.
#[derive(Clone, Debug, Default)]
pub struct Findings {
    pub checks: Vec<CheckRecord>,
    pub red_flags: Vec<String>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, check: CheckRecord) {
        self.checks.push(check);
    }

    pub fn red_flag(&mut self, message: impl Into<String>) {
        self.red_flags.push(message.into());
    }

    pub fn find(&self, label: &str) -> Option<&CheckRecord> {
        self.checks.iter().find(|c| c.label == label)
    }
}

/// True when an optional text field carries something other than whitespace.
pub(crate) fn present(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_constructor() {
        let check =
            CheckRecord::bonus(Category::Security, "x", true, 5, "tip").with_impact(Impact::Low);
        assert!(check.is_bonus);
        assert_eq!(check.impact, Impact::Low);
        assert_eq!(check.weight, 5);
    }

    #[test]
    fn test_present() {
        assert!(present(&Some("a".to_string())));
        assert!(!present(&Some("  ".to_string())));
        assert!(!present(&None));
    }
}
