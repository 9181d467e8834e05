use super::Findings;
use crate::types::*;

const C: Category = Category::Community;

pub fn audit_community(facts: &RepoFacts, findings: &mut Findings) {
    let repo = &facts.repo;
    let label = |name: &str| format!("[{}] {}", repo.name, name);
    let has_github_dir = facts.has_file(".GITHUB");

    findings.push(
        CheckRecord::core(
            C,
            label("License"),
            repo.license.is_some(),
            20,
            "Without a license nobody can legally use the code.",
        )
        .with_impact(Impact::High),
    );

    findings.push(CheckRecord::bonus(
        C,
        label("CONTRIBUTING"),
        facts.has_file("CONTRIBUTING.MD"),
        15,
        "A guide for contributors.",
    ));
    findings.push(
        CheckRecord::bonus(
            C,
            label("Code of Conduct"),
            facts.has_file("CODE_OF_CONDUCT.MD"),
            10,
            "Community standards.",
        )
        .with_impact(Impact::Low),
    );
    findings.push(
        CheckRecord::bonus(
            C,
            label("Issue templates"),
            facts.has_file("ISSUE_TEMPLATE") || has_github_dir,
            10,
            "Standardize bug reports.",
        )
        .with_impact(Impact::Low),
    );
    findings.push(
        CheckRecord::bonus(
            C,
            label("PR template"),
            facts.has_file("PULL_REQUEST_TEMPLATE.MD") || has_github_dir,
            10,
            "Raise the quality of pull requests.",
        )
        .with_impact(Impact::Low),
    );
    findings.push(
        CheckRecord::bonus(
            C,
            label("Discussions"),
            repo.has_discussions.unwrap_or(false),
            5,
            "A forum for the community.",
        )
        .with_impact(Impact::Low),
    );
}
