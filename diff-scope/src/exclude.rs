//! File-name exclusion rules applied before any per-file processing.

use regex::Regex;

/// Built-in exclusions shipped with every job.
///
/// Downstream behavior depends on these exact names; treat the list as a
/// fixed contract. Caller-supplied patterns are appended after it.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    // package manager lockfiles
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "composer.lock",
    "Gemfile.lock",
    "poetry.lock",
    // build, output and dependency directories
    "node_modules/",
    "dist/",
    "build/",
    "out/",
    "target/",
    "vendor/",
    "coverage/",
    ".next/",
    "__pycache__/",
    // environment files
    ".env",
    ".env.*",
    // minified and bundled artifacts
    "*.min.js",
    "*.min.css",
    "*.bundle.js",
    "*.map",
    // documentation and license boilerplate
    "LICENSE",
    "LICENSE.md",
    "CHANGELOG.md",
    "NOTICE",
    // IDE and OS metadata
    ".idea/",
    ".vscode/",
    ".DS_Store",
    "Thumbs.db",
    // logs and temp/cache files
    "*.log",
    "*.tmp",
    "*.cache",
    "*.swp",
];

/// One exclusion rule, classified once when the pattern set is built.
#[derive(Debug, Clone)]
pub enum ExclusionPattern {
    /// Contains `*`: compiled to a regex where `*` matches any run of
    /// characters, including the empty one. Matching is a substring search
    /// over the whole file name, not an anchored match.
    Wildcard(Regex),
    /// Ends with `/`: a directory prefix. Matches when the file name starts
    /// with the pattern or contains `/<pattern>` at any depth.
    DirPrefix(String),
    /// Anything else: the bare file name. Matches the whole name or a
    /// `/<pattern>` path suffix, regardless of directory depth.
    Exact(String),
}

impl ExclusionPattern {
    /// Classifies one raw pattern string.
    ///
    /// No input is ever rejected: strings that fit none of the special
    /// shapes degrade to exact patterns that simply never match.
    pub fn classify(raw: &str) -> Self {
        if raw.contains('*') {
            Self::Wildcard(compile_wildcard(raw))
        } else if raw.ends_with('/') {
            Self::DirPrefix(raw.to_string())
        } else {
            Self::Exact(raw.to_string())
        }
    }

    /// True when this pattern matches the given file name.
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            // Substring search on purpose: `*.log` also hits `foo.logger.js`.
            // Downstream callers rely on the loose match to catch unexpected
            // file name variants; do not anchor it.
            Self::Wildcard(re) => re.is_match(file_name),
            Self::DirPrefix(dir) => {
                file_name.starts_with(dir.as_str()) || file_name.contains(&format!("/{dir}"))
            }
            Self::Exact(name) => {
                file_name == name || file_name.ends_with(&format!("/{name}"))
            }
        }
    }
}

/// Turns a wildcard pattern into a regex, escaping every metacharacter
/// except `*` (which becomes `.*`). The output is always a valid pattern,
/// so malformed input cannot fail compilation.
fn compile_wildcard(raw: &str) -> Regex {
    let mut expr = String::with_capacity(raw.len() * 2);
    for ch in raw.chars() {
        if ch == '*' {
            expr.push_str(".*");
        } else {
            expr.push_str(&regex::escape(&ch.to_string()));
        }
    }
    Regex::new(&expr).unwrap()
}

/// The active, ordered rule set for one job: defaults first, then extras.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<ExclusionPattern>,
}

impl PatternSet {
    /// The built-in defaults with no caller additions.
    pub fn defaults() -> Self {
        Self::with_extra::<&str>(&[])
    }

    /// Builds the set from [`DEFAULT_EXCLUSIONS`] followed by `extra`.
    ///
    /// `extra` entries are expected pre-split, trimmed and non-empty; each
    /// is classified once here rather than on every file-name check.
    pub fn with_extra<S: AsRef<str>>(extra: &[S]) -> Self {
        let patterns = DEFAULT_EXCLUSIONS
            .iter()
            .copied()
            .chain(extra.iter().map(|s| s.as_ref()))
            .map(ExclusionPattern::classify)
            .collect();
        Self { patterns }
    }

    /// True when `file_name` should be dropped.
    ///
    /// Patterns are evaluated in order with a short-circuit on the first
    /// match; any match excludes and no later pattern can undo it. Total
    /// over all string inputs and side-effect free.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(file_name))
    }

    /// Number of active patterns (defaults plus extras).
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when the set holds no patterns at all.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
