//! Local git collaborator for the review pipeline.
//!
//! Keeps the reference branch fresh and renders the raw unified diff text
//! between a base revision and `HEAD`. The rest of the system only consumes
//! the resulting string; everything here is a thin wrapper over libgit2.

mod errors;

pub use errors::{DiffSourceError, DiffSourceResult};

use std::path::Path;

use git2::{DiffFormat, DiffOptions, Repository};
use tracing::{debug, info};

/// Handle to the CI checkout of the repository under review.
pub struct DiffSource {
    repo: Repository,
}

impl DiffSource {
    /// Opens the repository at `path` (the CI workspace checkout).
    pub fn open(path: &Path) -> DiffSourceResult<Self> {
        debug!(path = %path.display(), "opening repository");
        let repo = Repository::open(path)?;
        Ok(Self { repo })
    }

    /// Fetches `branch` from `remote` so the base revision is up to date.
    ///
    /// Uses the remote's configured refspecs, so the remote-tracking ref
    /// (`<remote>/<branch>`) is updated as a normal `git fetch` would.
    pub fn fetch_base(&self, remote: &str, branch: &str) -> DiffSourceResult<()> {
        info!(remote, branch, "fetching base branch");
        let mut remote = self.repo.find_remote(remote)?;
        remote.fetch(&[branch], None, None)?;
        Ok(())
    }

    /// Renders the unified diff between `base_rev` and `HEAD` as patch text.
    ///
    /// `base_rev` is any revision the repository can resolve (a branch name,
    /// a remote-tracking ref, a commit id). Each file section of the output
    /// starts with a `diff --git a/<path> b/<path>` header, exactly what the
    /// segmenter downstream expects.
    pub fn diff_against(&self, base_rev: &str) -> DiffSourceResult<String> {
        let base = self
            .repo
            .revparse_single(base_rev)
            .map_err(|_| DiffSourceError::UnknownRevision(base_rev.to_string()))?;
        let base_tree = base.peel_to_tree()?;
        let head_tree = self.repo.head()?.peel_to_tree()?;

        let mut opts = DiffOptions::new();
        let diff =
            self.repo
                .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), Some(&mut opts))?;

        // Patch printing emits headers and hunks through the callback; the
        // origin marker has to be re-attached for content lines.
        let mut out: Vec<u8> = Vec::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            match line.origin() {
                '+' | '-' | ' ' => out.push(line.origin() as u8),
                _ => {}
            }
            out.extend_from_slice(line.content());
            true
        })?;

        let text = String::from_utf8(out).map_err(|_| DiffSourceError::NonUtf8Diff)?;
        debug!(base = base_rev, bytes = text.len(), "diff rendered");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{IndexAddOption, Signature};
    use std::fs;

    fn commit_all(repo: &Repository, message: &str) -> git2::Oid {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("tester", "tester@example.com").unwrap();
        let parent = repo.head().ok().map(|h| h.peel_to_commit().unwrap());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn diff_between_commits_carries_git_headers() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        fs::write(dir.path().join("app.js"), "const a = 1;\n").unwrap();
        let base = commit_all(&repo, "base");

        fs::write(dir.path().join("app.js"), "const a = 2;\n").unwrap();
        fs::write(dir.path().join("extra.js"), "const b = 1;\n").unwrap();
        commit_all(&repo, "change");

        let source = DiffSource::open(dir.path()).unwrap();
        let text = source.diff_against(&base.to_string()).unwrap();

        assert!(text.contains("diff --git a/app.js b/app.js"));
        assert!(text.contains("diff --git a/extra.js b/extra.js"));
        assert!(text.contains("-const a = 1;"));
        assert!(text.contains("+const a = 2;"));
    }

    #[test]
    fn identical_trees_produce_an_empty_diff() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        fs::write(dir.path().join("same.txt"), "unchanged\n").unwrap();
        let only = commit_all(&repo, "only");

        let source = DiffSource::open(dir.path()).unwrap();
        let text = source.diff_against(&only.to_string()).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn unknown_revision_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();

        let source = DiffSource::open(dir.path()).unwrap();
        let err = source.diff_against("no-such-rev").unwrap_err();
        assert!(matches!(err, DiffSourceError::UnknownRevision(_)));
    }
}
