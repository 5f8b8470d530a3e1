//! Per-file scan loop.
//!
//! Feeds each translation unit through the scanner in order. A file that
//! fails to parse or carries error-severity diagnostics aborts the run
//! before any of its declarations are consumed; symbols registered from
//! earlier files stay valid in the registry.

use std::path::PathBuf;

use tracing::{info, warn};

use cxxmap_core::error::ScanError;
use cxxmap_core::provider::AstProvider;
use cxxmap_core::summary::ScanSummary;

use crate::visitor::Scanner;

/// Scan `files` in order through one scanner, merging symbols across
/// translation units. `args` is passed to the provider verbatim (compiler
/// flags, include directories).
pub fn run_scan<P: AstProvider>(
    scanner: &mut Scanner<'_, P>,
    files: &[PathBuf],
    args: &[String],
) -> Result<ScanSummary, ScanError> {
    let provider = scanner.provider();
    for file in files {
        info!(file = %file.display(), "importing declarations");
        let unit = provider
            .parse(file, args)
            .map_err(|source| ScanError::Parse {
                path: file.display().to_string(),
                source,
            })?;

        let mut errors = Vec::new();
        for diagnostic in provider.diagnostics(&unit) {
            if diagnostic.severity.is_error() {
                errors.push(diagnostic.message);
            } else {
                warn!(
                    file = %file.display(),
                    message = %diagnostic.message,
                    "parse diagnostic"
                );
            }
        }
        if !errors.is_empty() {
            return Err(ScanError::Diagnostics {
                path: file.display().to_string(),
                messages: errors,
            });
        }

        provider.visit(&unit, &mut |cursor, parent| scanner.visit(cursor, parent));
    }

    let summary = scanner.registry().summary();
    info!(cursors = scanner.visited(), %summary, "scan complete");
    Ok(summary)
}
