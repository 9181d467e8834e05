use account_auditor::audit::{render_text, run_audit};
use account_auditor::config::AuditConfig;
use account_auditor::fetch::Session;
use account_auditor::providers::ReqwestTransport;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Score a public code-hosting account against a fixed quality rubric.
#[derive(Parser, Debug)]
#[command(name = "account-auditor", version)]
struct Cli {
    /// Account login to audit
    username: String,

    /// Access token; repeat for rotation order
    #[arg(long = "token", env = "AUDITOR_TOKEN", value_delimiter = ',')]
    tokens: Vec<String>,

    /// TOML configuration file
    #[arg(long, env = "AUDITOR_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    max_repos: Option<usize>,

    /// Repositories that get the deep per-repo scan
    #[arg(long)]
    deep_scan: Option<usize>,

    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let mut config = AuditConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let tokens: Vec<String> = cli
        .tokens
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if !tokens.is_empty() {
        config.tokens = tokens;
    }
    if let Some(max_repos) = cli.max_repos {
        config.max_repos = max_repos;
    }
    if let Some(deep_scan) = cli.deep_scan {
        config.deep_scan_limit = deep_scan;
        config.anonymous_scan_limit = deep_scan;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }

    let session = Session::new(&config, Arc::new(ReqwestTransport::new()));
    let report = run_audit(&cli.username, &session, &config).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}
