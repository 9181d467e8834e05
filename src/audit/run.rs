use super::explain::generate_explanation;
use super::types::*;
use crate::checks::*;
use crate::config::AuditConfig;
use crate::error::{AuditError, FetchError};
use crate::fetch::Session;
use crate::scoring::{evaluate, top_actions};
use crate::types::*;
use chrono::Utc;
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

pub const TOP_ACTIONS: usize = 6;
pub const COMMITS_PER_REPO: usize = 10;
pub const EVENTS_PER_PAGE: usize = 100;

/// Run one audit: pull the account's data through `session`, evaluate the
/// rubric and assemble the report. The session is reset first, so no cached
/// response or rotated credential carries over from a previous run.
pub async fn run_audit(
    username: &str,
    session: &Session,
    config: &AuditConfig,
) -> Result<AuditReport, AuditError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AuditError::EmptyUsername);
    }

    session.reset().await;
    info!(username, credentials = session.rotator().len(), "starting audit");

    let profile: Profile = session
        .fetch_as(&format!("/users/{}", username))
        .await?
        .ok_or_else(|| AuditError::UserNotFound(username.to_string()))?;
    let login = profile.login.clone();

    info!(%login, "scanning repositories");
    let repos: Vec<Repository> = session
        .fetch_paginated_as(
            &format!("/users/{}/repos?sort=updated&type=owner", login),
            config.max_repos.clamp(1, 100),
            config.max_repos,
        )
        .await?;

    let has_profile_readme = repos.iter().any(|r| r.name.eq_ignore_ascii_case(&login));
    let sources: Vec<Repository> = repos.into_iter().filter(|r| !r.fork).collect();

    let mut findings = Findings::new();
    audit_profile(&profile, has_profile_readme, &mut findings);

    let mut candidates: Vec<&Repository> = sources.iter().collect();
    candidates.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    candidates.truncate(config.effective_scan_limit());

    info!(%login, repos = candidates.len(), "deep scan");
    let deep: Vec<RepoFacts> = join_all(
        candidates
            .iter()
            .map(|repo| gather_repo_facts(session, &login, repo)),
    )
    .await
    .into_iter()
    .collect::<Result<_, FetchError>>()?;

    for facts in &deep {
        audit_repository(facts, &mut findings);
        audit_community(facts, &mut findings);
        audit_security(facts, &mut findings);
    }

    info!(%login, "analysing activity");
    let events: Vec<Event> = session
        .fetch_pages_parallel(
            &format!("/users/{}/events", login),
            EVENTS_PER_PAGE,
            config.event_pages as usize,
        )
        .await;

    let now = Utc::now();
    audit_activity(&events, &profile, now, &mut findings);

    let result = evaluate(findings.checks, findings.red_flags, &config.weights);
    info!(%login, global = result.global, red_flags = result.red_flags.len(), "audit complete");

    Ok(AuditReport {
        schema_version: "1.0.0".to_string(),
        login,
        generated_at: now,
        grade: result.grade(),
        top_actions: top_actions(&result, TOP_ACTIONS),
        stats: AccountStats::compute(&profile, sources.len(), now),
        explain: generate_explanation(&result),
        repositories: deep.iter().map(|f| RepoSummary::from(&f.repo)).collect(),
        events_analyzed: events.len(),
        result,
    })
}

/// Per-repository fan-out. The root listing is required; README, commits and
/// workflows degrade to `None` when their fetch fails.
async fn gather_repo_facts(
    session: &Session,
    owner: &str,
    repo: &Repository,
) -> Result<RepoFacts, FetchError> {
    let base = format!("/repos/{}/{}", owner, repo.name);
    let contents_url = format!("{}/contents", base);
    let readme_url = format!("{}/readme", base);
    let commits_url = format!("{}/commits?per_page={}", base, COMMITS_PER_REPO);
    let workflows_url = format!("{}/actions/workflows", base);

    let (contents, readme, commits, workflows) = tokio::join!(
        session.fetch(&contents_url),
        optional::<Readme>(session, &readme_url),
        optional::<Vec<Commit>>(session, &commits_url),
        optional::<WorkflowCount>(session, &workflows_url),
    );

    let files = match contents? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| serde_json::from_value::<ContentEntry>(v).ok())
            .collect(),
        _ => Vec::new(),
    };

    Ok(RepoFacts {
        repo: repo.clone(),
        files,
        readme,
        commits,
        workflows,
    })
}

async fn optional<T: DeserializeOwned>(session: &Session, endpoint: &str) -> Option<T> {
    match session.fetch_as::<T>(endpoint).await {
        Ok(value) => value,
        Err(e) => {
            warn!(
                endpoint,
                kind = e.kind(),
                error = %e,
                "optional fetch failed, continuing without it"
            );
            None
        }
    }
}
