//! Job configuration read from CI environment variables.
//!
//! # Environment variables
//!
//! Required:
//! - `GITHUB_TOKEN`      — API token used for PR metadata and comments
//! - `GITHUB_REPOSITORY` — repository id in `owner/repo` form
//! - `PR_NUMBER`         — pull request number (u64)
//!
//! Optional:
//! - `GITHUB_API_URL`    — API base, default `https://api.github.com`
//! - `BASE_REMOTE`       — remote holding the base branch, default `origin`
//! - `BASE_BRANCH`       — reference branch to diff against, default `main`
//! - `REPO_PATH`         — path to the checkout, default `.`
//! - `REVIEW_TASKS`      — comma list of `review`/`tests`, default `review`
//! - `EXCLUDE_PATTERNS`  — comma list of extra exclusion patterns
//! - `TEST_OUTPUT_DIR`   — where generated tests land, default `generated_tests`
//! - `REQUEST_DELAY_MS`  — delay between per-file API calls, default 1500

use std::path::PathBuf;

use crate::errors::ConfigError;

/// What the job should produce for each surviving file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewTask {
    /// Post a review comment on the pull request.
    Review,
    /// Generate a test file and write it into the workspace.
    TestGen,
}

/// Everything one review job needs, resolved up front.
#[derive(Debug, Clone)]
pub struct ReviewJobConfig {
    /// Repository id in `owner/repo` form.
    pub repository: String,

    /// Pull request number.
    pub pr_number: u64,

    /// GitHub API token.
    pub github_token: String,

    /// GitHub API base URL.
    pub github_api: String,

    /// Remote holding the base branch.
    pub base_remote: String,

    /// Reference branch the diff is computed against.
    pub base_branch: String,

    /// Path to the CI checkout.
    pub repo_path: PathBuf,

    /// Tasks to run per surviving file, in order.
    pub tasks: Vec<ReviewTask>,

    /// Extra exclusion patterns, already split and trimmed.
    pub extra_exclusions: Vec<String>,

    /// Output directory for generated test files.
    pub test_output_dir: PathBuf,

    /// Fixed delay between per-file API calls, in milliseconds.
    pub request_delay_ms: u64,
}

impl ReviewJobConfig {
    /// Builds the job config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let github_token = must_env("GITHUB_TOKEN")?;
        let repository = must_env("GITHUB_REPOSITORY")?;
        if repository.split('/').filter(|p| !p.is_empty()).count() != 2 {
            return Err(ConfigError::InvalidRepository(repository));
        }

        let pr_number = must_env("PR_NUMBER")?
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "PR_NUMBER",
                reason: "expected u64",
            })?;

        let tasks = match env_opt("REVIEW_TASKS") {
            Some(raw) => parse_tasks(&raw)?,
            None => vec![ReviewTask::Review],
        };

        let extra_exclusions = env_opt("EXCLUDE_PATTERNS")
            .map(|raw| split_patterns(&raw))
            .unwrap_or_default();

        let request_delay_ms = match env_opt("REQUEST_DELAY_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: "REQUEST_DELAY_MS",
                    reason: "expected u64",
                })?,
            None => 1500,
        };

        Ok(Self {
            repository,
            pr_number,
            github_token,
            github_api: env_opt("GITHUB_API_URL")
                .unwrap_or_else(|| "https://api.github.com".to_string()),
            base_remote: env_opt("BASE_REMOTE").unwrap_or_else(|| "origin".to_string()),
            base_branch: env_opt("BASE_BRANCH").unwrap_or_else(|| "main".to_string()),
            repo_path: PathBuf::from(env_opt("REPO_PATH").unwrap_or_else(|| ".".to_string())),
            tasks,
            extra_exclusions,
            test_output_dir: PathBuf::from(
                env_opt("TEST_OUTPUT_DIR").unwrap_or_else(|| "generated_tests".to_string()),
            ),
            request_delay_ms,
        })
    }
}

/// Splits a comma-separated pattern list into trimmed, non-empty entries.
///
/// The exclusion filter downstream expects pre-split strings; this is the
/// only place the comma syntax is interpreted.
pub fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses the comma-separated task list.
fn parse_tasks(raw: &str) -> Result<Vec<ReviewTask>, ConfigError> {
    let mut tasks = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match entry.to_ascii_lowercase().as_str() {
            "review" => tasks.push(ReviewTask::Review),
            "tests" => tasks.push(ReviewTask::TestGen),
            other => return Err(ConfigError::UnknownTask(other.to_string())),
        }
    }
    if tasks.is_empty() {
        tasks.push(ReviewTask::Review);
    }
    Ok(tasks)
}

fn must_env(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn env_opt(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_are_split_trimmed_and_emptied() {
        assert_eq!(
            split_patterns(" legacy/ , *.gen.ts ,,  LICENSE "),
            vec!["legacy/", "*.gen.ts", "LICENSE"]
        );
        assert!(split_patterns("").is_empty());
        assert!(split_patterns(" , ,").is_empty());
    }

    #[test]
    fn task_list_parses_known_names() {
        assert_eq!(
            parse_tasks("review, tests").unwrap(),
            vec![ReviewTask::Review, ReviewTask::TestGen]
        );
        assert_eq!(parse_tasks("TESTS").unwrap(), vec![ReviewTask::TestGen]);
    }

    #[test]
    fn empty_task_list_falls_back_to_review() {
        assert_eq!(parse_tasks(" , ").unwrap(), vec![ReviewTask::Review]);
    }

    #[test]
    fn unknown_task_is_rejected() {
        assert!(matches!(
            parse_tasks("review, deploy"),
            Err(ConfigError::UnknownTask(t)) if t == "deploy"
        ));
    }
}
