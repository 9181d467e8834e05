use crate::scoring::AuditResult;
use crate::types::*;
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct AuditReport {
    pub schema_version: String,
    pub login: String,
    pub generated_at: DateTime<Utc>,
    pub grade: Grade,
    pub result: AuditResult,
    pub top_actions: Vec<CheckRecord>,
    pub stats: AccountStats,
    pub explain: ExplainSection,
    pub repositories: Vec<RepoSummary>,
    pub events_analyzed: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExplainSection {
    pub summary: String,
    pub tip: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RepoSummary {
    pub name: String,
    pub html_url: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
}

impl From<&Repository> for RepoSummary {
    fn from(repo: &Repository) -> Self {
        Self {
            name: repo.name.clone(),
            html_url: repo.html_url.clone(),
            language: repo.language.clone(),
            description: repo.description.clone(),
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeBand {
    Low,
    Healthy,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorityBand {
    New,
    Active,
    Solid,
    Pioneer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InfluenceTier {
    TopVoice,
    RisingStar,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AccountStats {
    pub created_year: Option<i32>,
    /// Calendar years since creation, at least 1.
    pub years_active: i32,
    pub public_repos: usize,
    pub repos_per_year: f64,
    pub volume: VolumeBand,
    pub seniority: SeniorityBand,
    pub influence: Option<InfluenceTier>,
}

impl AccountStats {
    pub fn compute(profile: &Profile, public_repos: usize, now: DateTime<Utc>) -> Self {
        let created_year = profile.created_at.map(|c| c.year());
        let elapsed = created_year.map(|y| now.year() - y).unwrap_or(0);
        let years_active = elapsed.max(1);
        let repos_per_year = public_repos as f64 / years_active as f64;

        let volume = if repos_per_year < 2.0 {
            VolumeBand::Low
        } else if repos_per_year > 8.0 {
            VolumeBand::High
        } else {
            VolumeBand::Healthy
        };

        let seniority = if elapsed < 1 {
            SeniorityBand::New
        } else if elapsed <= 3 {
            SeniorityBand::Active
        } else if elapsed <= 7 {
            SeniorityBand::Solid
        } else {
            SeniorityBand::Pioneer
        };

        let influence = if profile.followers > crate::checks::profile::TOP_VOICE_FOLLOWERS {
            Some(InfluenceTier::TopVoice)
        } else if profile.followers > crate::checks::profile::RISING_STAR_FOLLOWERS {
            Some(InfluenceTier::RisingStar)
        } else {
            None
        };

        Self {
            created_year,
            years_active,
            public_repos,
            repos_per_year,
            volume,
            seniority,
            influence,
        }
    }
}
