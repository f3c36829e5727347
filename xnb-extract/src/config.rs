//! Conversion options

use serde::Deserialize;

use crate::value::text::DEFAULT_INDENT;

/// Options threaded through every conversion job
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertOptions {
    /// Indent width of the text document (0 = compact)
    pub indent: usize,
    /// Log a line per file and per extracted asset
    pub verbose: bool,
    /// Only log warnings and errors
    pub quiet: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            verbose: false,
            quiet: false,
        }
    }
}
