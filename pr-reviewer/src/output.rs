//! Writing generated test files into the workspace.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Computes where the generated test for `source` should land.
///
/// The source's relative directory is mirrored under `out_dir` and the file
/// name becomes `<stem>.test.<ext>` (`src/app.js` → `<out>/src/app.test.js`),
/// so same-named files in different directories cannot clobber each other.
pub fn test_file_path(out_dir: &Path, source: &str) -> PathBuf {
    let file = Path::new(source);
    let stem = file
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("generated");
    let name = match file.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.test.{ext}"),
        None => format!("{stem}.test"),
    };
    let parent = file.parent().unwrap_or_else(|| Path::new(""));
    out_dir.join(parent).join(name)
}

/// Drops a single wrapping Markdown code fence if the model added one.
///
/// The info string on the opening fence (` ```js `) is discarded along with
/// the fence itself; content without a fence passes through trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };
    let body = rest[newline + 1..].trim_end();
    match body.strip_suffix("```") {
        Some(inner) => inner.trim_end(),
        None => body,
    }
}

/// Writes the generated test content for `source`, creating directories as
/// needed. Returns the path written.
pub fn write_test_file(out_dir: &Path, source: &str, content: &str) -> io::Result<PathBuf> {
    let path = test_file_path(out_dir, source);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let body = strip_code_fence(content);
    let mut data = body.to_string();
    if !data.ends_with('\n') {
        data.push('\n');
    }
    fs::write(&path, data)?;

    debug!(source, path = %path.display(), "generated test written");
    Ok(path)
}
