// src/config.rs
//
// Run configuration. Sources, lowest to highest priority:
// defaults, TOML file, environment (AUDITOR_TOKENS, AUDITOR_API_BASE), CLI flags.

use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Ordered credential list; may be empty for anonymous access.
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default = "default_weights")]
    pub weights: BTreeMap<Category, u32>,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_repos")]
    pub max_repos: usize,
    #[serde(default = "default_deep_scan_limit")]
    pub deep_scan_limit: usize,
    /// Deep scan limit used when no credential is configured.
    #[serde(default = "default_anonymous_scan_limit")]
    pub anonymous_scan_limit: usize,
    #[serde(default = "default_event_pages")]
    pub event_pages: u32,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_cache_capacity() -> usize {
    500
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_repos() -> usize {
    50
}

fn default_deep_scan_limit() -> usize {
    10
}

fn default_anonymous_scan_limit() -> usize {
    3
}

fn default_event_pages() -> u32 {
    3
}

pub fn default_weights() -> BTreeMap<Category, u32> {
    BTreeMap::from([
        (Category::Profile, 150),
        (Category::Repository, 300),
        (Category::Community, 200),
        (Category::Security, 150),
        (Category::Activity, 200),
    ])
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            tokens: Vec::new(),
            weights: default_weights(),
            cache_capacity: default_cache_capacity(),
            cache_ttl_secs: default_cache_ttl_secs(),
            timeout_secs: default_timeout_secs(),
            max_repos: default_max_repos(),
            deep_scan_limit: default_deep_scan_limit(),
            anonymous_scan_limit: default_anonymous_scan_limit(),
            event_pages: default_event_pages(),
        }
    }
}

impl AuditConfig {
    /// Load from an optional TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var("AUDITOR_TOKENS") {
            let tokens = parse_token_list(&raw);
            if !tokens.is_empty() {
                self.tokens = tokens;
            }
        }
        if let Ok(base) = std::env::var("AUDITOR_API_BASE") {
            if !base.trim().is_empty() {
                self.api_base = base.trim().trim_end_matches('/').to_string();
            }
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// How many repositories get the per-repo deep scan.
    pub fn effective_scan_limit(&self) -> usize {
        if self.tokens.is_empty() {
            self.anonymous_scan_limit
        } else {
            self.deep_scan_limit
        }
    }
}

/// Split a comma separated credential list, dropping blanks.
pub fn parse_token_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
