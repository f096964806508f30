//! Post-loop aggregation: translation, scoring, narrative and report.

use chrono::Utc;
use log::{info, warn};

use super::progress::{ProgressTracker, STEP_REPORT, STEP_SUMMARY, STEP_TRANSLATING};
use super::AuditOrchestrator;
use crate::config::DEFAULT_LANGUAGE;
use crate::error_handling::AuditError;
use crate::models::{AuditJob, Issue, IssueCounts, JobStatus, JobUpdate, Summary, ToolOutcome, UrlResult};
use crate::report::ReportInput;
use crate::scoring::{overall_score, score, top_issues};

/// Copies translated issues back into the per-URL results, position for
/// position in flatten order.
fn write_back(results: &mut [UrlResult], translated: Vec<Issue>) {
    let mut translated = translated.into_iter();
    for issue in results.iter_mut().flat_map(|r| r.issues.iter_mut()) {
        match translated.next() {
            Some(t) => *issue = t,
            None => break,
        }
    }
}

impl AuditOrchestrator {
    pub(super) async fn finalize(
        &self,
        job: &AuditJob,
        mut results: Vec<UrlResult>,
        tracker: &mut ProgressTracker,
    ) -> Result<(), AuditError> {
        let store = self.store.as_ref();
        let mut issues: Vec<Issue> = results.iter().flat_map(|r| r.issues.clone()).collect();

        if !issues.is_empty() && !job.language.eq_ignore_ascii_case(DEFAULT_LANGUAGE) {
            tracker.step(store, STEP_TRANSLATING, None).await?;
            match self.reviewer.translate_issues(&mut issues, &job.language).await {
                ToolOutcome::Ready(changed) if changed > 0 => write_back(&mut results, issues.clone()),
                ToolOutcome::Ready(_) => {}
                ToolOutcome::Unavailable(reason) => {
                    warn!("Issues for job {} stay untranslated: {reason}", job.id)
                }
            }
        }

        let category_scores = score(&issues, &results);
        tracker.step(store, STEP_SUMMARY, None).await?;
        let executive_summary = self
            .reviewer
            .summarize(&results, &issues, &job.language)
            .await;
        let summary = Summary {
            overall_score: overall_score(&category_scores),
            category_scores,
            top_issues: top_issues(&issues),
            executive_summary,
            issue_counts: IssueCounts::tally(&issues),
        };
        info!(
            "Job {}: overall score {}, {} issue(s)",
            job.id, summary.overall_score, summary.issue_counts.total
        );

        tracker.step(store, STEP_REPORT, None).await?;
        let report_path = self.render_report(job, &results, &summary).await;

        store
            .update(
                &job.id,
                JobUpdate {
                    status: Some(JobStatus::Completed),
                    progress: Some(tracker.finish()),
                    results: Some(results),
                    summary: Some(summary),
                    report_path,
                    completed_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    /// Renders the report under its deadline. Failures are logged only.
    async fn render_report(
        &self,
        job: &AuditJob,
        results: &[UrlResult],
        summary: &Summary,
    ) -> Option<String> {
        let input = ReportInput {
            job_id: &job.id,
            urls: &job.urls,
            results,
            summary,
        };
        match tokio::time::timeout(self.render_timeout, self.renderer.render(&input)).await {
            Ok(Ok(path)) => Some(path),
            Ok(Err(e)) => {
                warn!("Report rendering for job {} failed: {e:#}", job.id);
                None
            }
            Err(_) => {
                warn!(
                    "Report rendering for job {} timed out after {}s",
                    job.id,
                    self.render_timeout.as_secs()
                );
                None
            }
        }
    }
}
