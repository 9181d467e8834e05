// src/types.rs

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// External API entities
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub hireable: Option<bool>,
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub followers: u64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub html_url: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub license: Option<License>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    pub has_discussions: Option<bool>,
    pub default_branch: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct License {
    pub key: Option<String>,
    pub name: Option<String>,
}

/// One entry of a repository's root directory listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Readme {
    #[serde(default)]
    pub content: String,
    pub encoding: Option<String>,
}

impl Readme {
    /// Raw README bytes. The API wraps base64 at 60 columns, so whitespace is
    /// stripped first. Malformed content decodes to nothing.
    pub fn decoded_bytes(&self) -> Vec<u8> {
        let compact: String = self.content.split_whitespace().collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Commit {
    pub sha: Option<String>,
    pub commit: CommitDetail,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitDetail {
    pub message: Option<String>,
    pub verification: Option<Verification>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Verification {
    #[serde(default)]
    pub verified: bool,
    pub reason: Option<String>,
}

impl Commit {
    pub fn is_verified(&self) -> bool {
        self.commit
            .verification
            .as_ref()
            .map(|v| v.verified)
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowCount {
    #[serde(default)]
    pub total_count: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub repo: EventRepo,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRepo {
    pub name: String,
}

/// Everything fetched for one analysed repository. Optional members are
/// `None` when the corresponding fetch failed or returned not-found.
#[derive(Clone, Debug)]
pub struct RepoFacts {
    pub repo: Repository,
    pub files: Vec<ContentEntry>,
    pub readme: Option<Readme>,
    pub commits: Option<Vec<Commit>>,
    pub workflows: Option<WorkflowCount>,
}

impl RepoFacts {
    /// Upper-cased root file names, the form every file check compares against.
    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.to_uppercase()).collect()
    }

    pub fn has_file(&self, upper_name: &str) -> bool {
        self.files.iter().any(|f| f.name.eq_ignore_ascii_case(upper_name))
    }
}

// ---------------------------------------------------------------------------
// Rubric types
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Profile,
    Repository,
    Community,
    Security,
    Activity,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Profile => "profile",
            Category::Repository => "repository",
            Category::Community => "community",
            Category::Security => "security",
            Category::Activity => "activity",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Profile => "Profile & Brand",
            Category::Repository => "Engineering",
            Category::Community => "Governance",
            Category::Security => "Security",
            Category::Activity => "Activity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    pub category: Category,
    pub label: String,
    pub passed: bool,
    pub weight: u32,
    pub tip: String,
    pub impact: Impact,
    pub is_bonus: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            Grade::A
        } else if score >= 80 {
            Grade::B
        } else if score >= 60 {
            Grade::C
        } else if score >= 40 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
