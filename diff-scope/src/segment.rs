//! Splitting raw `git diff` output into per-file change records.

use regex::Regex;

/// One file touched in a diff.
///
/// `file_name` is the path from the `a/` side of the header, in order of
/// first appearance. `diff_text` is the exact substring of the raw diff from
/// this file's header line up to (but not including) the next file's header,
/// or the end of input for the last file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub file_name: String,
    pub diff_text: String,
}

/// Splits a raw diff into ordered [`FileChange`] records.
///
/// A file section begins with a line of the shape
/// `diff --git a/<path> b/<path>`. The `b/` path is assumed identical to the
/// `a/` path; renames where the two differ are not resolved. Headers are
/// located in a single left-to-right pass over non-overlapping matches — the
/// scan position only ever advances, so header-like text inside hunk bodies
/// (which git prefixes with `+`, `-` or a space) cannot split a section or
/// shift the boundary of the real next one.
///
/// Input without any recognizable header yields an empty vector. The spans
/// are taken verbatim: no line-ending normalization, no path unescaping, and
/// a mode-change-only section still produces a record with whatever body git
/// emitted for it.
pub fn segment_diff(diff: &str) -> Vec<FileChange> {
    // `(?m)^` anchors to line starts only. `captures_iter` walks the input
    // once with a monotonically advancing cursor; it is never restarted from
    // offset zero between files.
    let header_re = Regex::new(r"(?m)^diff --git a/(.*?) b/").unwrap();

    let mut sections: Vec<(usize, String)> = Vec::new();
    for caps in header_re.captures_iter(diff) {
        let header = caps.get(0).unwrap();
        let file_name = caps.get(1).unwrap().as_str().to_string();
        sections.push((header.start(), file_name));
    }

    let mut changes = Vec::with_capacity(sections.len());
    for (i, (start, file_name)) in sections.iter().enumerate() {
        let end = sections
            .get(i + 1)
            .map(|(next_start, _)| *next_start)
            .unwrap_or(diff.len());
        changes.push(FileChange {
            file_name: file_name.clone(),
            diff_text: diff[*start..end].to_string(),
        });
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_FILES: &str = "\
diff --git a/src/app.js b/src/app.js
index 1234567..89abcde 100644
--- a/src/app.js
+++ b/src/app.js
@@ -1,2 +1,2 @@
-const a = 1;
+const a = 2;
 console.log(a);
diff --git a/lib/util.js b/lib/util.js
index 2345678..9abcdef 100644
--- a/lib/util.js
+++ b/lib/util.js
@@ -1 +1,2 @@
 export {};
+export const x = 1;
";

    #[test]
    fn returns_one_record_per_header_in_order() {
        let changes = segment_diff(TWO_FILES);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].file_name, "src/app.js");
        assert_eq!(changes[1].file_name, "lib/util.js");
    }

    #[test]
    fn spans_reconstruct_the_input_tail_exactly() {
        let changes = segment_diff(TWO_FILES);
        let rebuilt: String = changes.iter().map(|c| c.diff_text.as_str()).collect();
        let first = TWO_FILES.find("diff --git").unwrap();
        assert_eq!(rebuilt, &TWO_FILES[first..]);
    }

    #[test]
    fn each_span_starts_at_its_own_header() {
        let changes = segment_diff(TWO_FILES);
        assert!(changes[0].diff_text.starts_with("diff --git a/src/app.js"));
        assert!(changes[0].diff_text.ends_with("console.log(a);\n"));
        assert!(changes[1].diff_text.starts_with("diff --git a/lib/util.js"));
    }

    #[test]
    fn header_text_inside_a_hunk_body_is_not_a_boundary() {
        // The first section's body carries a header-shaped line as added
        // content. git prefixes body lines with '+', '-' or ' ', so it does
        // not sit at a line start and must not become a third record.
        let diff = "\
diff --git a/scripts/gen.sh b/scripts/gen.sh
index 1111111..2222222 100644
--- a/scripts/gen.sh
+++ b/scripts/gen.sh
@@ -1 +1,2 @@
 echo start
+diff --git a/x b/x
diff --git a/scripts/run.sh b/scripts/run.sh
index 3333333..4444444 100644
--- a/scripts/run.sh
+++ b/scripts/run.sh
@@ -1 +1 @@
-echo old
+echo new
";
        let changes = segment_diff(diff);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].file_name, "scripts/gen.sh");
        assert_eq!(changes[1].file_name, "scripts/run.sh");
        // The embedded line stays inside the first record's span.
        assert!(changes[0].diff_text.contains("+diff --git a/x b/x"));
        assert!(changes[1].diff_text.starts_with("diff --git a/scripts/run.sh"));
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(segment_diff("").is_empty());
    }

    #[test]
    fn input_without_headers_yields_no_records() {
        assert!(segment_diff("just some text\nwith lines\n").is_empty());
    }

    #[test]
    fn leading_noise_before_the_first_header_is_dropped() {
        let diff = "\
warning: CRLF will be replaced by LF
diff --git a/a.txt b/a.txt
index 1111111..2222222 100644
--- a/a.txt
+++ b/a.txt
@@ -1 +1 @@
-one
+two
";
        let changes = segment_diff(diff);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].diff_text.starts_with("diff --git a/a.txt"));
        // Coverage starts at the first header, not at offset zero.
        let first = diff.find("diff --git").unwrap();
        assert_eq!(changes[0].diff_text, &diff[first..]);
    }

    #[test]
    fn mode_change_only_section_still_produces_a_record() {
        let diff = "\
diff --git a/run.sh b/run.sh
old mode 100644
new mode 100755
";
        let changes = segment_diff(diff);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].file_name, "run.sh");
        assert!(changes[0].diff_text.contains("new mode 100755"));
    }
}
