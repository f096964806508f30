//! Executive narrative prompt and the deterministic fallback.

use std::fmt::Write;

use crate::models::{Issue, IssueCounts, Severity, UrlResult};

/// Count-only summary used whenever the text generator is unavailable.
pub fn fallback_summary(results: &[UrlResult], issues: &[Issue]) -> String {
    let total = results.len();
    let successful = results.iter().filter(|r| r.is_success()).count();
    let counts = IssueCounts::tally(issues);
    format!(
        "Audited {total} URL(s): {successful} analyzed successfully, {} failed. \
         Found {} issue(s) in total, including {} critical issue(s) and {} warning(s).",
        total - successful,
        counts.total,
        counts.critical,
        counts.warning
    )
}

pub(super) fn build_prompt(results: &[UrlResult], issues: &[Issue], language: &str) -> String {
    let counts = IssueCounts::tally(issues);
    let successful = results.iter().filter(|r| r.is_success()).count();

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Write a concise executive summary (one short paragraph) of an SEO audit for a non-technical \
         site owner, in the language with code \"{language}\". Return only the summary text."
    );
    let _ = writeln!(
        prompt,
        "\nURLs audited: {} ({successful} successful)\nIssues: {} total, {} critical, {} warnings, {} informational",
        results.len(),
        counts.total,
        counts.critical,
        counts.warning,
        counts.info
    );

    let _ = writeln!(prompt, "\nPer-URL results:");
    for result in results {
        let scores = result
            .performance
            .and_then(|p| p.performance)
            .map(|p| format!(", performance score {p}"))
            .unwrap_or_default();
        let _ = writeln!(
            prompt,
            "- {} ({:?}): {} issues{scores}",
            result.url,
            result.status,
            result.issues.len()
        );
    }

    let _ = writeln!(prompt, "\nMost important issues:");
    let mut seen = std::collections::HashSet::new();
    for issue in issues
        .iter()
        .filter(|i| i.severity != Severity::Info)
        .filter(|i| seen.insert(i.title.as_str()))
        .take(10)
    {
        let _ = writeln!(prompt, "- [{}] {}", issue.severity, issue.title);
    }
    prompt
}
