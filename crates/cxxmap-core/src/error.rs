//! Scan-level error types.

use thiserror::Error;

use crate::provider::ProviderError;

/// Errors that abort a scan run.
///
/// Both variants carry the offending file path. Symbols registered from
/// files processed before the failure remain valid in the registry.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The provider could not produce a translation unit for a file.
    #[error("failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: ProviderError,
    },

    /// A parsed file carried error-severity diagnostics.
    #[error("{path}: {} parse error(s)", messages.len())]
    Diagnostics { path: String, messages: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_display_counts_messages() {
        let err = ScanError::Diagnostics {
            path: "include/widget.hpp".to_string(),
            messages: vec![
                "unknown type name 'Gadget'".to_string(),
                "expected ';'".to_string(),
            ],
        };
        assert_eq!(err.to_string(), "include/widget.hpp: 2 parse error(s)");
    }

    #[test]
    fn parse_error_exposes_the_provider_source() {
        let err = ScanError::Parse {
            path: "a.hpp".to_string(),
            source: ProviderError::Parse {
                path: "a.hpp".to_string(),
                message: "bad file".to_string(),
            },
        };
        assert_eq!(err.to_string(), "failed to parse a.hpp");
        assert!(std::error::Error::source(&err).is_some());
    }
}
