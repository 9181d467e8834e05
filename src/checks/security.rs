use super::Findings;
use crate::types::*;
use regex::Regex;
use std::sync::OnceLock;

const C: Category = Category::Security;

/// Share of verified commits above which signing counts as practiced.
pub const SIGNED_RATIO: f64 = 0.5;

fn suspicious_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)secret|key|token|pwd|credential")
            .expect("suspicious name pattern is valid")
    })
}

/// Fraction of verified commits, `None` when the list is unavailable or empty.
pub fn signed_ratio(commits: Option<&[Commit]>) -> Option<f64> {
    let commits = commits.filter(|c| !c.is_empty())?;
    let signed = commits.iter().filter(|c| c.is_verified()).count();
    Some(signed as f64 / commits.len() as f64)
}

pub fn audit_security(facts: &RepoFacts, findings: &mut Findings) {
    let repo = &facts.repo;
    let label = |name: &str| format!("[{}] {}", repo.name, name);

    findings.push(
        CheckRecord::bonus(
            C,
            label("SECURITY.md"),
            facts.has_file("SECURITY.MD"),
            20,
            "Publish a security policy.",
        )
        .with_impact(Impact::High),
    );

    let signed = signed_ratio(facts.commits.as_deref())
        .map(|ratio| ratio > SIGNED_RATIO)
        .unwrap_or(false);
    findings.push(CheckRecord::bonus(
        C,
        label("Signed commits"),
        signed,
        20,
        "Sign your commits so they show as Verified.",
    ));

    findings.push(
        CheckRecord::bonus(
            C,
            label("Main branch"),
            repo.default_branch.as_deref() == Some("main"),
            5,
            "Use 'main' as the default branch.",
        )
        .with_impact(Impact::Low),
    );

    if suspicious_name_pattern().is_match(&repo.name) {
        findings.red_flag(format!("Repository \"{}\" has a suspicious name.", repo.name));
    }
}
