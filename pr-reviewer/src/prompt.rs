//! Prompt builders for per-file review and test generation.
//!
//! Keep prompts compact; include fenced blocks for model grounding.

/// System message for the review task.
pub const REVIEW_SYSTEM: &str =
    "You are a strict but constructive senior code reviewer. Reply in concise Markdown.";

/// System message for the test generation task.
pub const TEST_SYSTEM: &str =
    "You are a test engineer. Reply with test source code only, no surrounding prose.";

/// Builds the review prompt for one changed file.
pub fn build_review_prompt(file_name: &str, diff_text: &str, file_content: Option<&str>) -> String {
    let mut s = String::new();
    s.push_str("Review the following pull request change.\n");
    s.push_str("Focus on correctness, potential bugs, security, and readability.\n");
    s.push_str(&format!("\n# File\n{}\n", file_name));
    s.push_str("\n# Diff\n```diff\n");
    s.push_str(diff_text);
    s.push_str("\n```\n");
    if let Some(content) = file_content {
        s.push_str("\n# Full file for context\n```code\n");
        s.push_str(content);
        s.push_str("\n```\n");
    }
    s.push_str("\n# Instructions\n- Be specific, reference lines when possible.\n- Suggest concrete fixes.\n- If the change looks fine, say so briefly.\n");
    s
}

/// Builds the test generation prompt for one changed file.
pub fn build_test_prompt(file_name: &str, diff_text: &str, file_content: Option<&str>) -> String {
    let mut s = String::new();
    s.push_str("Write unit tests covering the behavior changed below.\n");
    s.push_str(&format!("\n# File\n{}\n", file_name));
    s.push_str("\n# Diff\n```diff\n");
    s.push_str(diff_text);
    s.push_str("\n```\n");
    if let Some(content) = file_content {
        s.push_str("\n# Full file under test\n```code\n");
        s.push_str(content);
        s.push_str("\n```\n");
    }
    s.push_str("\n# Instructions\n- Match the language and test framework conventions of the file.\n- Cover the changed paths and the obvious edge cases.\n- Output only the test file content.\n");
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_prompt_carries_file_and_fenced_diff() {
        let p = build_review_prompt("src/app.js", "diff --git a/src/app.js b/src/app.js\n", None);
        assert!(p.contains("# File\nsrc/app.js"));
        assert!(p.contains("```diff\n"));
        assert!(p.contains("diff --git a/src/app.js"));
        assert!(!p.contains("# Full file for context"));
    }

    #[test]
    fn full_content_section_appears_only_when_present() {
        let p = build_review_prompt("a.rs", "…", Some("fn main() {}"));
        assert!(p.contains("# Full file for context"));
        assert!(p.contains("fn main() {}"));
    }

    #[test]
    fn test_prompt_demands_code_only_output() {
        let p = build_test_prompt("lib/util.js", "…", None);
        assert!(p.contains("# File\nlib/util.js"));
        assert!(p.contains("Output only the test file content."));
    }
}
