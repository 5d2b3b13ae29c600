//! Parsing pipeline.
//!
//! This module is the entry point for everything between a raw chat message
//! and a validated [`ParsedInputSequence`](crate::ParsedInputSequence), plus
//! the reverse direction. The stages live in focused submodules under
//! `src/engine/` and are re-exported here.
//!
//! ## How the parts work together
//!
//! ```text
//! raw message ── PrepMask::scan ───────────── (trigger.rs)
//!                     │  which stages can apply
//!                     v
//!               prepare (preprocess.rs)
//!                 - strip whitespace
//!                 - macros, synonyms
//!                 - [seq]*N expansion
//!                     │
//!                     v
//! console ── Tokenizer::new (tokenizer.rs)
//!                     │  names sorted longest-first
//!                     v
//!               parse (parser.rs)
//!                 - contiguous matches only
//!                 - groups, durations, max-duration ceiling
//!                     │
//!                     v
//!           validate_* (validate.rs)
//!                 - restricted inputs, combos, ports, levels
//!                     │
//!                     v
//!     InputScheduler::execute (executor.rs, outside this module)
//! ```
//!
//! `reverse.rs` renders a sequence back to canonical or natural text, and
//! `metrics.rs` carries the opt-in timings collected by
//! `parse_message_verbose`.
//!
//! ## Debugging
//!
//! Stages log through the `log` facade at `debug` level: tokenizer rebuilds,
//! macro passes, expansion caps and parse outcomes.

#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/preprocess.rs"]
mod preprocess;
#[path = "engine/reverse.rs"]
mod reverse;
#[path = "engine/tokenizer.rs"]
mod tokenizer;
#[path = "engine/trigger.rs"]
mod trigger;
#[path = "engine/validate.rs"]
mod validate;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use metrics::{PreprocessMetrics, RunMetrics};
pub use parser::{ParserOptions, parse};
pub(crate) use parser::parse_counted;
pub use preprocess::{
    MAX_EXPANDED_LEN, MAX_MACRO_PASSES, expandify, populate_macros, populate_synonyms, prepare, prepare_with_metrics,
    remove_whitespace,
};
pub use reverse::{
    INVALID_NATURAL, ReverseParserOptions, ShowDurations, ShowPorts, reverse_parse, reverse_parse_natural,
};
pub use tokenizer::{TokenMatch, Tokenizer};
pub use trigger::PrepMask;
pub use validate::{validate_combos, validate_input_levels, validate_ports, validate_restricted};
