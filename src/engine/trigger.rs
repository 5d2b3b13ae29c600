//! Trigger scanning (preprocessing pre-classification).
//!
//! Most chat messages contain no macro call and no repetition group. A cheap
//! byte scan decides which preprocessing stages can possibly apply, so those
//! messages skip the regex work entirely.
//!
//! ## Design notes
//!
//! - This is a *heuristic* scan. False positives are fine because each stage
//!   still runs its own full match; false negatives are not.
//! - Synonyms can introduce `[` or `]*`, so `prepare` rescans for repetition
//!   after substitution instead of trusting the first scan.

use bitflags::bitflags;

bitflags! {
    /// Coarse signals derived from the raw message.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PrepMask: u8 {
        const HAS_WHITESPACE = 1 << 0;
        /// A `#` followed by at least one more byte.
        const HAS_MACRO      = 1 << 1;
        /// A `]*` pair.
        const HAS_REPEAT     = 1 << 2;
    }
}

impl PrepMask {
    pub fn scan(input: &str) -> Self {
        let mut mask = PrepMask::empty();
        let bytes = input.as_bytes();

        if input.chars().any(char::is_whitespace) {
            mask |= PrepMask::HAS_WHITESPACE;
        }

        if input.find('#').is_some_and(|pos| pos + 1 < bytes.len()) {
            mask |= PrepMask::HAS_MACRO;
        }

        if bytes.windows(2).any(|w| w == b"]*") {
            mask |= PrepMask::HAS_REPEAT;
        }

        mask
    }
}
