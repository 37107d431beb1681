//! GitHub provider (REST v3) for PR metadata and review comments.
//!
//! Endpoints used:
//!   * GET  /repos/{owner}/{repo}/pulls/{number}
//!   * POST /repos/{owner}/{repo}/pulls/{number}/reviews

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Error, ReviewResult};

/// GitHub HTTP client wrapper bound to one repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String,
    token: String,
    owner: String,
    repo: String,
}

/// Normalized pull request metadata the pipeline cares about.
#[derive(Debug, Clone)]
pub struct PrInfo {
    pub title: String,
    pub state: String,
    pub author_login: String,
    pub web_url: String,
    pub head_sha: String,
    pub base_branch: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GitHubClient {
    /// Constructs a client for `repository` (`owner/repo`).
    ///
    /// The HTTP client carries a stable user agent so GitHub can identify
    /// the integration.
    pub fn new(base_api: &str, repository: &str, token: &str) -> ReviewResult<Self> {
        let (owner, repo) = split_owner_repo(repository)?;
        debug!(owner, repo, base_api, "creating GitHub client");

        let http = Client::builder().user_agent("pr-review-bot/0.1").build()?;

        Ok(Self {
            http,
            base_api: base_api.trim_end_matches('/').to_string(),
            token: format!("Bearer {token}"),
            owner,
            repo,
        })
    }

    /// Fetches pull request metadata including the head sha and base branch.
    pub async fn fetch_pr(&self, number: u64) -> ReviewResult<PrInfo> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api, self.owner, self.repo, number
        );
        debug!("GitHub fetch_pr: {}", url);

        let resp: GitHubPr = self
            .http
            .get(url)
            .header("Authorization", &self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(PrInfo {
            title: resp.title,
            state: resp.state,
            author_login: resp.user.login,
            web_url: resp.html_url,
            head_sha: resp.head.sha,
            base_branch: resp.base.r#ref,
            created_at: resp.created_at,
            updated_at: resp.updated_at,
        })
    }

    /// Posts one PR-level review with a plain comment body.
    ///
    /// Uses the reviews API with `event=COMMENT`, so the review neither
    /// approves nor requests changes.
    pub async fn post_review(&self, number: u64, body: &str) -> ReviewResult<()> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/reviews",
            self.base_api, self.owner, self.repo, number
        );
        debug!("GitHub post_review: url={}, body_len={}", url, body.len());

        let payload = GitHubReviewCreate {
            body,
            event: "COMMENT",
        };

        self.http
            .post(&url)
            .header("Authorization", &self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

/// Splits "owner/repo" into components or returns a validation error.
fn split_owner_repo(repository: &str) -> ReviewResult<(String, String)> {
    let mut parts = repository.split('/');
    let owner = parts.next().unwrap_or("").trim();
    let repo = parts.next().unwrap_or("").trim();

    if owner.is_empty() || repo.is_empty() || parts.next().is_some() {
        return Err(Error::Validation(format!(
            "invalid repository id '{}', expected 'owner/repo'",
            repository
        )));
    }

    Ok((owner.to_string(), repo.to_string()))
}

/// GitHub PR response (subset).
#[derive(Debug, Deserialize)]
struct GitHubPr {
    title: String,
    state: String,
    html_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    user: GitHubUser,
    base: GitHubRef,
    head: GitHubRef,
}

#[derive(Debug, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubRef {
    #[serde(rename = "ref")]
    r#ref: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct GitHubReviewCreate<'a> {
    body: &'a str,
    event: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_repo_splits_cleanly() {
        let (owner, repo) = split_owner_repo("octo/widgets").unwrap();
        assert_eq!(owner, "octo");
        assert_eq!(repo, "widgets");
    }

    #[test]
    fn malformed_repository_ids_are_rejected() {
        assert!(split_owner_repo("just-a-name").is_err());
        assert!(split_owner_repo("a/b/c").is_err());
        assert!(split_owner_repo("/repo").is_err());
        assert!(split_owner_repo("owner/").is_err());
    }

    #[test]
    fn pr_response_subset_deserializes() {
        let raw = r#"{
            "title": "Add parser",
            "state": "open",
            "html_url": "https://github.com/octo/widgets/pull/7",
            "created_at": "2025-06-01T10:00:00Z",
            "updated_at": "2025-06-02T11:30:00Z",
            "user": {"login": "dev"},
            "base": {"ref": "main", "sha": "aaa111"},
            "head": {"ref": "feature", "sha": "bbb222"}
        }"#;
        let pr: GitHubPr = serde_json::from_str(raw).unwrap();
        assert_eq!(pr.title, "Add parser");
        assert_eq!(pr.head.sha, "bbb222");
        assert_eq!(pr.base.r#ref, "main");
    }
}
