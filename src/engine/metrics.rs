//! Engine run metrics.
//!
//! This module defines a small set of structs used to observe and debug
//! pipeline performance and behavior.
//!
//! The intended usage is:
//!
//! - `parse_message` for normal operation.
//! - `parse_message_verbose` for profiling, debugging regressions, and
//!   inspecting what preprocessing did to a message.
//!
//! Metrics are *opt-in*: the plain entry points never read the clock.
//!
//! ## Design notes
//!
//! - Stage timings stay zero when the pre-scan skipped the stage.
//! - `capped` is the only signal that repetition expansion stopped early; the
//!   parser then sees the leftover brackets and reports a normal message.

use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the verbose run.
    pub total: Duration,
    pub preprocess: PreprocessMetrics,
    /// Time spent tokenizing and building the sequence.
    pub parse: Duration,
    /// Regex matches the parser walked.
    pub tokens: usize,
}

/// Timings and counters for the preprocessing stages.
#[derive(Debug, Default, Clone)]
pub struct PreprocessMetrics {
    pub total: Duration,
    pub macros: Duration,
    pub synonyms: Duration,
    pub expand: Duration,
    /// Macro passes that substituted at least one macro.
    pub macro_passes: usize,
    /// Macro calls replaced across all passes.
    pub macro_substitutions: usize,
    /// `[...]*N` groups expanded.
    pub expansions: usize,
    /// Expansion stopped at the size cap.
    pub capped: bool,
}
