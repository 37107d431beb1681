//! Review scope computation for raw git diffs.
//!
//! Two pieces, the second consuming the first:
//!   * [`segment`] — splits one raw `git diff` text blob into per-file
//!     [`FileChange`] records.
//!   * [`exclude`] — decides, per file name, whether a record is dropped
//!     before any network processing (built-in defaults plus caller extras).
//!
//! Both are synchronous, total functions over in-memory strings: no I/O,
//! no shared state, safe to call from concurrent jobs.

pub mod exclude;
pub mod segment;

pub use exclude::{DEFAULT_EXCLUSIONS, ExclusionPattern, PatternSet};
pub use segment::{FileChange, segment_diff};

/// Applies the exclusion filter to segmented records, preserving order.
///
/// Each record is judged independently; a match on any pattern drops it.
pub fn scope_changes(changes: Vec<FileChange>, patterns: &PatternSet) -> Vec<FileChange> {
    changes
        .into_iter()
        .filter(|c| !patterns.is_excluded(&c.file_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_drops_lockfile_and_keeps_the_rest() {
        let diff = "\
diff --git a/README.md b/README.md
index 1111111..2222222 100644
--- a/README.md
+++ b/README.md
@@ -1 +1,2 @@
 # title
+more docs
diff --git a/src/index.js b/src/index.js
index 3333333..4444444 100644
--- a/src/index.js
+++ b/src/index.js
@@ -1 +1 @@
-const a = 1;
+const a = 2;
diff --git a/package-lock.json b/package-lock.json
index 5555555..6666666 100644
--- a/package-lock.json
+++ b/package-lock.json
@@ -1 +1 @@
-{}
+{\"lockfileVersion\": 3}
";
        let changes = segment_diff(diff);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].file_name, "README.md");
        assert_eq!(changes[1].file_name, "src/index.js");
        assert_eq!(changes[2].file_name, "package-lock.json");

        let scoped = scope_changes(changes, &PatternSet::defaults());
        let names: Vec<&str> = scoped.iter().map(|c| c.file_name.as_str()).collect();
        // README.md is not in the default set, so it survives.
        assert_eq!(names, vec!["README.md", "src/index.js"]);
    }
}
