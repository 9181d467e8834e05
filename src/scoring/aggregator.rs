use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points deducted from the global score per red flag.
pub const RED_FLAG_PENALTY: i64 = 5;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Weight of every passed check, bonus included.
    pub total: u32,
    /// Weight of non-bonus checks only.
    pub max: u32,
    /// `round(min(100, total / max * 100))`, 0 when `max` is 0.
    pub percentage: u32,
}

impl CategoryScore {
    /// Capped but unrounded percentage; the global mean is taken over these.
    fn capped_ratio(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            (self.total as f64 / self.max as f64 * 100.0).min(100.0)
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditResult {
    pub categories: BTreeMap<Category, u32>,
    pub breakdown: BTreeMap<Category, CategoryScore>,
    pub global: u32,
    pub checks: Vec<CheckRecord>,
    pub red_flags: Vec<String>,
}

impl AuditResult {
    pub fn grade(&self) -> Grade {
        Grade::from_score(self.global)
    }

    pub fn category(&self, category: Category) -> u32 {
        self.categories.get(&category).copied().unwrap_or(0)
    }
}

/// Score a run's checks.
///
/// Every category named in `weights` is reported, even without checks (0%).
/// Categories that appear only in `checks` are reported but carry no weight
/// in the global mean.
pub fn evaluate(
    checks: Vec<CheckRecord>,
    red_flags: Vec<String>,
    weights: &BTreeMap<Category, u32>,
) -> AuditResult {
    let mut breakdown: BTreeMap<Category, CategoryScore> =
        weights.keys().map(|c| (*c, CategoryScore::default())).collect();

    for check in &checks {
        let score = breakdown.entry(check.category).or_default();
        if !check.is_bonus {
            score.max += check.weight;
        }
        if check.passed {
            score.total += check.weight;
        }
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (category, score) in breakdown.iter_mut() {
        let ratio = score.capped_ratio();
        score.percentage = ratio.round() as u32;

        if let Some(weight) = weights.get(category) {
            weighted_sum += ratio * *weight as f64;
            total_weight += *weight as f64;
        }
    }

    let mean = if total_weight > 0.0 {
        (weighted_sum / total_weight).round() as i64
    } else {
        0
    };
    let global = (mean - RED_FLAG_PENALTY * red_flags.len() as i64).max(0) as u32;

    let categories = breakdown.iter().map(|(c, s)| (*c, s.percentage)).collect();

    AuditResult {
        categories,
        breakdown,
        global,
        checks,
        red_flags,
    }
}

/// Failed non-bonus checks, heaviest first, at most `limit`.
pub fn top_actions(result: &AuditResult, limit: usize) -> Vec<CheckRecord> {
    let mut failures: Vec<CheckRecord> = result
        .checks
        .iter()
        .filter(|c| !c.passed && !c.is_bonus)
        .cloned()
        .collect();
    // stable: equal weights keep discovery order
    failures.sort_by(|a, b| b.weight.cmp(&a.weight));
    failures.truncate(limit);
    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_check(category: Category, weight: u32, passed: bool, is_bonus: bool) -> CheckRecord {
        CheckRecord {
            category,
            label: format!("{}-{}", category, weight),
            passed,
            weight,
            tip: String::new(),
            impact: Impact::Medium,
            is_bonus,
        }
    }

    fn weights(pairs: &[(Category, u32)]) -> BTreeMap<Category, u32> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_bonus_pushes_past_ceiling_then_caps() {
        let checks = vec![
            make_check(Category::Profile, 20, true, false),
            make_check(Category::Profile, 40, true, true),
        ];

        let result = evaluate(checks, vec![], &weights(&[(Category::Profile, 100)]));

        let profile = &result.breakdown[&Category::Profile];
        assert_eq!(profile.total, 60);
        assert_eq!(profile.max, 20);
        assert_eq!(profile.percentage, 100);
        assert_eq!(result.global, 100);
        assert_eq!(result.grade(), Grade::A);
    }

    #[test]
    fn test_bonus_only_category_scores_zero() {
        let checks = vec![make_check(Category::Security, 10, true, true)];

        let result = evaluate(checks, vec![], &weights(&[(Category::Security, 100)]));

        assert_eq!(result.breakdown[&Category::Security].max, 0);
        assert_eq!(result.category(Category::Security), 0);
        assert_eq!(result.global, 0);
    }

    #[test]
    fn test_weighted_mean_across_categories() {
        let checks = vec![
            make_check(Category::Profile, 10, true, false),
            make_check(Category::Profile, 10, false, false),
            make_check(Category::Activity, 30, true, false),
        ];

        let result = evaluate(
            checks,
            vec![],
            &weights(&[(Category::Profile, 300), (Category::Activity, 100)]),
        );

        assert_eq!(result.category(Category::Profile), 50);
        assert_eq!(result.category(Category::Activity), 100);
        // (50 * 300 + 100 * 100) / 400 = 62.5 -> 63
        assert_eq!(result.global, 63);
        assert_eq!(result.grade(), Grade::C);
    }

    #[test]
    fn test_weighted_category_without_checks_counts_as_zero() {
        let checks = vec![make_check(Category::Profile, 10, true, false)];

        let result = evaluate(
            checks,
            vec![],
            &weights(&[(Category::Profile, 100), (Category::Repository, 100)]),
        );

        assert_eq!(result.category(Category::Repository), 0);
        assert_eq!(result.global, 50);
    }

    #[test]
    fn test_unweighted_category_is_reported_but_excluded() {
        let checks = vec![
            make_check(Category::Profile, 10, true, false),
            make_check(Category::Community, 10, false, false),
        ];

        let result = evaluate(checks, vec![], &weights(&[(Category::Profile, 100)]));

        assert_eq!(result.category(Category::Community), 0);
        assert!(result.categories.contains_key(&Category::Community));
        assert_eq!(result.global, 100);
    }

    #[test]
    fn test_red_flags_subtract_five_each_floored_at_zero() {
        let checks = vec![make_check(Category::Profile, 10, true, false)];
        let w = weights(&[(Category::Profile, 100)]);

        let mut previous = u32::MAX;
        for flags in 0..25 {
            let red_flags = (0..flags).map(|i| format!("flag {}", i)).collect();
            let result = evaluate(checks.clone(), red_flags, &w);

            let expected = 100i64 - 5 * flags as i64;
            assert_eq!(result.global as i64, expected.max(0));
            assert!(result.global <= previous);
            previous = result.global;
        }
    }

    #[test]
    fn test_empty_weights_never_divides_by_zero() {
        let checks = vec![make_check(Category::Profile, 10, true, false)];
        let result = evaluate(checks, vec![], &BTreeMap::new());
        assert_eq!(result.global, 0);
        assert_eq!(result.category(Category::Profile), 100);
    }

    #[test]
    fn test_percentages_stay_in_range() {
        let checks = vec![
            make_check(Category::Repository, 5, true, false),
            make_check(Category::Repository, 500, true, true),
            make_check(Category::Community, 5, false, false),
        ];
        let result = evaluate(
            checks,
            vec![],
            &weights(&[(Category::Repository, 1), (Category::Community, 1)]),
        );
        assert!(result.categories.values().all(|p| *p <= 100));
    }

    #[test]
    fn test_top_actions_heaviest_failures_first() {
        let checks = vec![
            make_check(Category::Profile, 10, false, false),
            make_check(Category::Profile, 30, false, false),
            make_check(Category::Profile, 50, false, true),
            make_check(Category::Activity, 30, false, false),
            make_check(Category::Activity, 20, true, false),
        ];
        let result = evaluate(checks, vec![], &weights(&[(Category::Profile, 1)]));

        let actions = top_actions(&result, 2);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].label, "profile-30");
        assert_eq!(actions[1].label, "activity-30");
    }
}
