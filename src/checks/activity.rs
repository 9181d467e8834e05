use super::Findings;
use crate::types::*;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

const C: Category = Category::Activity;

pub const RECENT_DAYS: i64 = 14;
pub const VOLUME_EVENTS: usize = 50;
pub const DIVERSE_REPOS: usize = 2;

/// Whole days since the newest event, `None` without events.
pub fn days_since_last(events: &[Event], now: DateTime<Utc>) -> Option<i64> {
    events
        .iter()
        .map(|e| e.created_at)
        .max()
        .map(|last| (now - last).num_days())
}

/// Owner part of an `owner/name` repository path.
fn repo_owner(full_name: &str) -> &str {
    full_name.split('/').next().unwrap_or(full_name)
}

pub fn audit_activity(
    events: &[Event],
    profile: &Profile,
    now: DateTime<Utc>,
    findings: &mut Findings,
) {
    let recent = days_since_last(events, now)
        .map(|days| days < RECENT_DAYS)
        .unwrap_or(false);
    findings.push(CheckRecord::core(
        C,
        "Recent activity",
        recent,
        30,
        "Stay consistent. An idle account looks abandoned.",
    ));

    findings.push(CheckRecord::core(
        C,
        "Contribution volume",
        events.len() > VOLUME_EVENTS,
        20,
        "Show a steady volume of active work.",
    ));

    let repos_touched: HashSet<&str> = events.iter().map(|e| e.repo.name.as_str()).collect();
    findings.push(CheckRecord::core(
        C,
        "Project diversity",
        repos_touched.len() > DIVERSE_REPOS,
        15,
        "Do not work in a single repository only.",
    ));

    let external = events
        .iter()
        .any(|e| !repo_owner(&e.repo.name).eq_ignore_ascii_case(&profile.login));
    findings.push(
        CheckRecord::bonus(
            C,
            "External collaboration",
            external,
            25,
            "Contribute to projects you do not own.",
        )
        .with_impact(Impact::High),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    fn event(repo: &str, days_ago: i64) -> Event {
        Event {
            kind: Some("PushEvent".to_string()),
            repo: EventRepo {
                name: repo.to_string(),
            },
            created_at: now() - Duration::days(days_ago),
        }
    }

    fn profile() -> Profile {
        Profile {
            login: "octo".to_string(),
            ..Profile::default()
        }
    }

    #[test]
    fn test_no_events_fails_everything_but_emits_all() {
        let mut findings = Findings::new();
        audit_activity(&[], &profile(), now(), &mut findings);

        assert_eq!(findings.checks.len(), 4);
        assert!(findings.checks.iter().all(|c| !c.passed));
    }

    #[test]
    fn test_active_contributor() {
        let mut events: Vec<Event> = (0..60).map(|i| event("octo/engine", i % 10)).collect();
        events.push(event("octo/site", 3));
        events.push(event("rust-lang/rust", 20));

        let mut findings = Findings::new();
        audit_activity(&events, &profile(), now(), &mut findings);

        assert!(findings.checks.iter().all(|c| c.passed));
    }

    #[test]
    fn test_prefix_owner_is_not_self() {
        // "octocat" starts with "octo" but is another account
        let events = vec![event("octocat/hello", 1)];

        let mut findings = Findings::new();
        audit_activity(&events, &profile(), now(), &mut findings);

        assert!(findings.find("External collaboration").unwrap().passed);
    }

    #[test]
    fn test_stale_activity() {
        let events = vec![event("octo/engine", 30)];
        assert_eq!(days_since_last(&events, now()), Some(30));

        let mut findings = Findings::new();
        audit_activity(&events, &profile(), now(), &mut findings);

        assert!(!findings.find("Recent activity").unwrap().passed);
        assert!(!findings.find("External collaboration").unwrap().passed);
    }
}
