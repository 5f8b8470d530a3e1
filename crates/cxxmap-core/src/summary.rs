//! Aggregate counts reported at the end of a scan.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Totals over the registry's symbol tables after a scan run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub types: usize,
    pub classes: usize,
    pub enums: usize,
    pub functions: usize,
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} types, {} classes, {} enums, {} functions",
            self.types, self.classes, self.enums, self.functions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_table() {
        let summary = ScanSummary {
            types: 4,
            classes: 2,
            enums: 1,
            functions: 3,
        };
        assert_eq!(summary.to_string(), "4 types, 2 classes, 1 enums, 3 functions");
    }
}
