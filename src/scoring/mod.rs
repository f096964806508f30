//! Score aggregation.
//!
//! Pure functions turning the flattened issue list and the per-URL tool scores
//! into the job's category scores, overall score and top issues.

use std::collections::HashSet;

use crate::config::TOP_ISSUES_LIMIT;
use crate::models::{CategoryScores, Issue, PerformanceScores, ScoreBucket, UrlResult};

/// Issue-derived bucket scores: 100 minus the summed severity penalties,
/// floored at 0.
fn bucket_scores(issues: &[Issue]) -> [u32; 4] {
    let mut deductions = [0u32; 4];
    for issue in issues {
        let slot = bucket_index(issue.category.bucket());
        deductions[slot] = deductions[slot].saturating_add(issue.severity.penalty());
    }
    deductions.map(|d| 100u32.saturating_sub(d))
}

fn bucket_index(bucket: ScoreBucket) -> usize {
    match bucket {
        ScoreBucket::Technical => 0,
        ScoreBucket::Content => 1,
        ScoreBucket::Performance => 2,
        ScoreBucket::Accessibility => 3,
    }
}

/// Mean of one metric over the URLs that reported it.
fn average(results: &[UrlResult], metric: fn(&PerformanceScores) -> Option<u8>) -> Option<f64> {
    let values: Vec<f64> = results
        .iter()
        .filter_map(|r| r.performance.as_ref())
        .filter_map(metric)
        .map(f64::from)
        .collect();
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

fn blend(bucket: u32, average: Option<f64>) -> u8 {
    let blended = match average {
        Some(avg) => ((f64::from(bucket) + avg) / 2.0).round(),
        None => f64::from(bucket),
    };
    blended.clamp(0.0, 100.0) as u8
}

/// Computes the four category scores.
///
/// Order-independent in `issues`. Tool averages for performance, accessibility
/// and seo (into technical) are blended 50/50 only when at least one URL
/// reported that metric.
pub fn score(issues: &[Issue], results: &[UrlResult]) -> CategoryScores {
    let buckets = bucket_scores(issues);

    CategoryScores {
        technical: blend(buckets[0], average(results, |s| s.seo)),
        content: blend(buckets[1], None),
        performance: blend(buckets[2], average(results, |s| s.performance)),
        accessibility: blend(buckets[3], average(results, |s| s.accessibility)),
    }
}

/// Rounded unweighted mean of the four category scores.
pub fn overall_score(scores: &CategoryScores) -> u8 {
    let sum = u32::from(scores.technical)
        + u32::from(scores.content)
        + u32::from(scores.performance)
        + u32::from(scores.accessibility);
    (f64::from(sum) / 4.0).round() as u8
}

/// Unique issues by title (first occurrence wins), stably sorted critical
/// first and capped at `TOP_ISSUES_LIMIT`.
pub fn top_issues(issues: &[Issue]) -> Vec<Issue> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Issue> = issues
        .iter()
        .filter(|issue| seen.insert(issue.title.as_str()))
        .cloned()
        .collect();
    unique.sort_by_key(|issue| issue.severity.rank());
    unique.truncate(TOP_ISSUES_LIMIT);
    unique
}
