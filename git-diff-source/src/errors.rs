//! Error types for local repository access.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type DiffSourceResult<T> = Result<T, DiffSourceError>;

/// Root error type for the git-diff-source crate.
#[derive(Debug, Error)]
pub enum DiffSourceError {
    /// Underlying libgit2 failure (open, fetch, tree lookup, diff).
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// The requested base revision does not exist in the repository.
    #[error("unknown base revision: {0}")]
    UnknownRevision(String),

    /// Rendered diff output contained invalid UTF-8.
    #[error("diff output is not valid utf-8")]
    NonUtf8Diff,
}
