//! Conversion results.

use crate::pipeline::detect::Direction;
use serde::{Deserialize, Serialize};

/// The converted document plus what happened while producing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The complete output document (HTML or Markdown).
    pub text: String,
    pub direction: Direction,
    pub stats: ConversionStats,
}

/// Counters for a single conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub input_bytes: usize,
    pub output_bytes: usize,
    /// Code blocks rendered with token markup (Markdown → HTML only).
    pub highlighted_blocks: usize,
    /// Code blocks emitted as plain text because no grammar matched.
    pub fallback_blocks: usize,
    pub duration_ms: u64,
}
