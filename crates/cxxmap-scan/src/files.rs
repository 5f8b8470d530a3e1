//! Header discovery under include roots.

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while walking include roots.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read a directory entry")]
    Walk(#[from] walkdir::Error),
}

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\.(h|hpp|hxx)$").expect("header pattern is valid"))
}

/// Collect every C++ header under the given roots, in a stable
/// lexicographic walk order per root. Non-header files (sources, build
/// artifacts) are skipped.
pub fn collect_header_files(roots: &[PathBuf]) -> Result<Vec<PathBuf>, FileError> {
    let mut files = Vec::new();
    for root in roots {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if header_pattern().is_match(&entry.file_name().to_string_lossy()) {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}
