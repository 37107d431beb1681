//! Public entry for the pull-request review pipeline.
//!
//! Single high-level function to run the whole job for one pull request.
//!
//! 1) **Step 1 — raw diff**
//!    - Open the CI checkout, fetch the base branch
//!    - Render the unified diff between base and `HEAD`
//!
//! 2) **Step 2 — review scope**
//!    - Segment the diff into per-file records
//!    - Drop records matching the exclusion set (defaults + job extras)
//!
//! 3) **Step 3 — generate & deliver**
//!    - Per surviving record: read the full file when available, build the
//!      prompt, call the completion backend, then post the review comment
//!      and/or write the generated test file
//!    - A fixed delay separates per-file API calls to stay under rate limits
//!    - Per-record failures are logged and skipped; one bad file never stops
//!      the rest of the batch
//!
//! The pipeline uses `tracing` for step logging and avoids `async-trait`
//! and heap trait objects; clients are plain structs.

pub mod config;
pub mod errors;
pub mod github;
pub mod output;
pub mod prompt;

use std::fs;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use diff_scope::{FileChange, PatternSet, scope_changes, segment_diff};
use git_diff_source::{DiffSource, DiffSourceError};
use text_gen_service::{TextGenClient, TextGenConfig};

pub use config::{ReviewJobConfig, ReviewTask};
pub use errors::{Error, ReviewResult};

use github::GitHubClient;

/// Counters describing what one job actually did.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewSummary {
    /// Records produced by segmentation.
    pub files_total: usize,
    /// Records dropped by the exclusion filter.
    pub files_excluded: usize,
    /// Review comments successfully posted.
    pub comments_posted: usize,
    /// Generated test files successfully written.
    pub tests_written: usize,
    /// Records skipped because a collaborator call failed.
    pub files_skipped: usize,
}

/// Runs the whole review job for one pull request.
///
/// Setup failures (configuration, repository access, client construction)
/// are fail-fast; per-file collaborator failures are fail-soft and only
/// reflected in the summary.
pub async fn run_review(cfg: ReviewJobConfig) -> ReviewResult<ReviewSummary> {
    // ---------------------------
    // Step 1: raw diff
    // ---------------------------
    let t0 = Instant::now();
    debug!("step1: open checkout and render diff");
    let source = DiffSource::open(&cfg.repo_path)?;

    if let Err(err) = source.fetch_base(&cfg.base_remote, &cfg.base_branch) {
        warn!(error = %err, "base fetch failed; falling back to local refs");
    }

    let tracking_rev = format!("{}/{}", cfg.base_remote, cfg.base_branch);
    let raw_diff = match source.diff_against(&tracking_rev) {
        Ok(text) => text,
        Err(DiffSourceError::UnknownRevision(_)) => {
            debug!(
                "step1: no tracking ref {}, using local branch {}",
                tracking_rev, cfg.base_branch
            );
            source.diff_against(&cfg.base_branch)?
        }
        Err(err) => return Err(err.into()),
    };
    debug!(
        "step1: diff rendered ({} bytes) in {} ms",
        raw_diff.len(),
        t0.elapsed().as_millis()
    );

    // ---------------------------
    // Step 2: review scope
    // ---------------------------
    let changes = segment_diff(&raw_diff);
    let files_total = changes.len();

    let patterns = PatternSet::with_extra(&cfg.extra_exclusions);
    let scoped = scope_changes(changes, &patterns);
    let files_excluded = files_total - scoped.len();
    info!(
        files = files_total,
        excluded = files_excluded,
        patterns = patterns.len(),
        "step2: review scope computed"
    );

    let mut summary = ReviewSummary {
        files_total,
        files_excluded,
        ..Default::default()
    };

    if scoped.is_empty() {
        info!("nothing to review after filtering");
        return Ok(summary);
    }

    // ---------------------------
    // Step 3: generate & deliver
    // ---------------------------
    let llm = TextGenClient::new(TextGenConfig::from_env()?)?;
    let gh = GitHubClient::new(&cfg.github_api, &cfg.repository, &cfg.github_token)?;

    let pr = gh.fetch_pr(cfg.pr_number).await?;
    info!(
        title = %pr.title,
        head = %pr.head_sha,
        base = %pr.base_branch,
        "step3: reviewing pull request"
    );

    for (idx, change) in scoped.iter().enumerate() {
        if idx > 0 {
            tokio::time::sleep(Duration::from_millis(cfg.request_delay_ms)).await;
        }

        let t_file = Instant::now();
        let mut file_failed = false;

        // The head checkout may no longer hold the file (deletions).
        let file_content = fs::read_to_string(cfg.repo_path.join(&change.file_name)).ok();

        for task in &cfg.tasks {
            let outcome = match task {
                ReviewTask::Review => {
                    review_file(&gh, &llm, &cfg, change, file_content.as_deref()).await
                }
                ReviewTask::TestGen => {
                    generate_tests(&llm, &cfg, change, file_content.as_deref()).await
                }
            };

            match outcome {
                Ok(TaskOutcome::CommentPosted) => summary.comments_posted += 1,
                Ok(TaskOutcome::TestWritten) => summary.tests_written += 1,
                Err(err) => {
                    warn!(
                        file = %change.file_name,
                        error = %err,
                        "per-file task failed; continuing with remaining files"
                    );
                    file_failed = true;
                }
            }
        }

        if file_failed {
            summary.files_skipped += 1;
        }

        debug!(
            "step3: file {}/{} ({}) done in {} ms",
            idx + 1,
            scoped.len(),
            change.file_name,
            t_file.elapsed().as_millis()
        );
    }

    info!(
        comments = summary.comments_posted,
        tests = summary.tests_written,
        skipped = summary.files_skipped,
        "step3: done in {} ms",
        t0.elapsed().as_millis()
    );

    Ok(summary)
}

enum TaskOutcome {
    CommentPosted,
    TestWritten,
}

/// Reviews one file: prompt → completion → PR-level review comment.
async fn review_file(
    gh: &GitHubClient,
    llm: &TextGenClient,
    cfg: &ReviewJobConfig,
    change: &FileChange,
    file_content: Option<&str>,
) -> ReviewResult<TaskOutcome> {
    let prompt = prompt::build_review_prompt(&change.file_name, &change.diff_text, file_content);
    let reply = llm.complete(&prompt, Some(prompt::REVIEW_SYSTEM)).await?;

    let body = format!("### `{}`\n\n{}", change.file_name, reply.trim());
    gh.post_review(cfg.pr_number, &body).await?;

    Ok(TaskOutcome::CommentPosted)
}

/// Generates tests for one file: prompt → completion → file in the workspace.
async fn generate_tests(
    llm: &TextGenClient,
    cfg: &ReviewJobConfig,
    change: &FileChange,
    file_content: Option<&str>,
) -> ReviewResult<TaskOutcome> {
    let prompt = prompt::build_test_prompt(&change.file_name, &change.diff_text, file_content);
    let reply = llm.complete(&prompt, Some(prompt::TEST_SYSTEM)).await?;

    output::write_test_file(&cfg.test_output_dir, &change.file_name, &reply)?;

    Ok(TaskOutcome::TestWritten)
}
