use super::types::AuditReport;
use std::fmt::Write;

/// Plain-text rendering of a report for terminal output.
pub fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();
    let result = &report.result;

    let _ = writeln!(
        out,
        "Audit for {}  {}/100  grade {}",
        report.login, result.global, report.grade
    );
    let _ = writeln!(out);

    for (category, pct) in &result.categories {
        let _ = writeln!(out, "  {:<16} {:>3}%", category.display_name(), pct);
    }

    if !result.red_flags.is_empty() {
        let _ = writeln!(out, "\nRed flags:");
        for flag in &result.red_flags {
            let _ = writeln!(out, "  ! {}", flag);
        }
    }

    let _ = writeln!(out, "\nTop actions:");
    if report.top_actions.is_empty() {
        let _ = writeln!(out, "  nothing to fix");
    }
    for (i, action) in report.top_actions.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} [{}] - {}",
            i + 1,
            action.label,
            action.category,
            action.tip
        );
    }

    let _ = writeln!(out, "\n{}", report.explain.summary);
    if let Some(tip) = &report.explain.tip {
        let _ = writeln!(out, "Tip: {}", tip);
    }

    out
}
