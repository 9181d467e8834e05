use super::{present, Findings};
use crate::types::*;
use regex::Regex;
use std::sync::OnceLock;

const C: Category = Category::Repository;

/// Decoded README size in bytes above which the README counts as rich.
pub const RICH_README_BYTES: usize = 800;
/// Stars above which a missing README is a red flag.
pub const README_STAR_THRESHOLD: u64 = 5;

fn badge_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"!\[.*\]\(.*badge.*\)").expect("badge pattern is valid"))
}

fn test_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)TEST|SPEC").expect("test file pattern is valid"))
}

pub fn audit_repository(facts: &RepoFacts, findings: &mut Findings) {
    let repo = &facts.repo;
    let label = |name: &str| format!("[{}] {}", repo.name, name);

    findings.push(CheckRecord::core(
        C,
        label("Description"),
        present(&repo.description),
        10,
        "Add a short, objective description.",
    ));
    findings.push(CheckRecord::bonus(
        C,
        label("Homepage"),
        present(&repo.homepage),
        5,
        "Link to a demo or documentation.",
    ));
    findings.push(
        CheckRecord::bonus(
            C,
            label("Topics"),
            !repo.topics.is_empty(),
            10,
            "Use topics to categorize the project.",
        )
        .with_impact(Impact::Low),
    );

    let has_readme = facts.has_file("README.MD");
    findings.push(CheckRecord::core(
        C,
        label("README"),
        has_readme,
        20,
        "Mandatory for any serious project.",
    ));

    // README body is only trusted when the listing also shows the file.
    let body = match (&facts.readme, has_readme) {
        (Some(readme), true) => readme.decoded_bytes(),
        _ => Vec::new(),
    };
    let content = String::from_utf8_lossy(&body);
    findings.push(CheckRecord::core(
        C,
        label("Rich README"),
        body.len() > RICH_README_BYTES,
        10,
        "README is too short.",
    ));
    findings.push(
        CheckRecord::bonus(
            C,
            label("Badges"),
            badge_pattern().is_match(&content),
            5,
            "Use badges for credibility.",
        )
        .with_impact(Impact::Low),
    );

    if !has_readme && repo.stargazers_count > README_STAR_THRESHOLD {
        findings.red_flag(format!("Repository \"{}\" has stars but no README.", repo.name));
    }

    findings.push(CheckRecord::core(
        C,
        label(".gitignore"),
        facts.has_file(".GITIGNORE"),
        10,
        "Avoid committing system files.",
    ));

    let has_workflows = facts
        .workflows
        .as_ref()
        .map(|w| w.total_count > 0)
        .unwrap_or(false);
    findings.push(
        CheckRecord::bonus(
            C,
            label("CI/CD"),
            has_workflows,
            25,
            "Automate tests and deployment.",
        )
        .with_impact(Impact::High),
    );

    let has_tests = facts
        .file_names()
        .iter()
        .any(|f| test_file_pattern().is_match(f));
    findings.push(
        CheckRecord::bonus(
            C,
            label("Tests"),
            has_tests || has_workflows,
            15,
            "Untested code is technical debt.",
        )
        .with_impact(Impact::High),
    );
}
