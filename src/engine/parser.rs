//! Input parser.
//!
//! Walks the tokenizer's matches over a prepared message and builds a
//! [`ParsedInputSequence`].
//!
//! ## Design notes
//!
//! - Matches must be byte-contiguous from offset 0 to the end of the text.
//!   Any gap, or trailing text, makes the whole message a normal chat message
//!   rather than a malformed command.
//! - A token that matched but carries a bad value (port `&0`, `150%`, an
//!   overflowing duration) is `Invalid`: the text clearly was meant as input.
//! - `+`-joined tokens form one group whose length is its longest member. The
//!   running total is checked against `max_duration` as each group closes, so
//!   huge expanded messages are rejected without walking every match.

use super::tokenizer::{TokenMatch, Tokenizer};
use crate::error::{ParseError, ParseErrorKind};
use crate::store::{self, SettingsStore};
use crate::{
    DEFAULT_PERCENT, DurationUnit, InputAction, InputGroup, ParseStatus, ParsedInput, ParsedInputSequence,
};

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Zero-based port for tokens without `&N`.
    pub default_port: usize,
    /// Milliseconds for tokens without a duration.
    pub default_duration: u32,
    /// Ceiling on the sequence's total duration, in milliseconds.
    pub max_duration: Option<u64>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions { default_port: 0, default_duration: 200, max_duration: Some(60_000) }
    }
}

impl ParserOptions {
    /// Reads options from host settings. A negative max duration disables the ceiling.
    pub fn from_settings(settings: &dyn SettingsStore) -> Self {
        let defaults = ParserOptions::default();
        let default_port = settings.get_int(store::DEFAULT_CONTROLLER_PORT, defaults.default_port as i64);
        let default_duration =
            settings.get_int(store::DEFAULT_INPUT_DURATION, i64::from(defaults.default_duration));
        let max_duration = settings.get_int(store::MAX_INPUT_DURATION, defaults.max_duration.unwrap_or(0) as i64);

        ParserOptions {
            default_port: usize::try_from(default_port).unwrap_or(defaults.default_port),
            default_duration: u32::try_from(default_duration).unwrap_or(defaults.default_duration),
            max_duration: u64::try_from(max_duration).ok(),
        }
    }
}

/// Parses a prepared message.
pub fn parse(text: &str, tokenizer: &Tokenizer, options: &ParserOptions) -> ParsedInputSequence {
    parse_counted(text, tokenizer, options).0
}

/// Like [`parse`], also returning how many matches were walked.
pub(crate) fn parse_counted(
    text: &str,
    tokenizer: &Tokenizer,
    options: &ParserOptions,
) -> (ParsedInputSequence, usize) {
    let matches = tokenizer.find_iter(text);
    if matches.is_empty() {
        return (ParsedInputSequence::normal_message(), 0);
    }

    let mut seq = ParsedInputSequence {
        status: ParseStatus::Valid,
        groups: Vec::with_capacity(matches.len()),
        total_duration: 0,
        error: None,
    };
    let mut prev_end = 0;
    let mut group: Vec<ParsedInput> = Vec::with_capacity(4);
    let mut walked = 0;

    for (i, m) in matches.iter().enumerate() {
        walked += 1;

        if m.start != prev_end {
            seq.status = ParseStatus::NormalMessage;
            break;
        }

        let input = match input_from_match(m, options) {
            Ok(input) => input,
            Err(kind) => {
                seq.status = ParseStatus::Invalid;
                seq.error = Some(ParseError::at_token(kind, m.text));
                break;
            }
        };
        prev_end = m.end;
        group.push(input);

        if m.plus {
            if i == matches.len() - 1 {
                seq.status = ParseStatus::Invalid;
                seq.error = Some(ParseError::new(ParseErrorKind::PlusAtEnd));
                break;
            }
            continue;
        }

        let closed = InputGroup::new(std::mem::take(&mut group));
        seq.total_duration += u64::from(closed.sub_duration());
        seq.groups.push(closed);

        if options.max_duration.is_some_and(|max| seq.total_duration > max) {
            seq.status = ParseStatus::Invalid;
            seq.error = Some(ParseError::new(ParseErrorKind::MaxDuration));
            break;
        }
    }

    if seq.status == ParseStatus::Valid && prev_end != text.len() {
        seq.status = ParseStatus::NormalMessage;
    }
    if seq.status == ParseStatus::NormalMessage {
        return (ParsedInputSequence::normal_message(), walked);
    }

    log::debug!("parse: {:?} with {} group(s), {} ms", seq.status, seq.groups.len(), seq.total_duration);
    (seq, walked)
}

fn input_from_match(m: &TokenMatch<'_>, options: &ParserOptions) -> Result<ParsedInput, ParseErrorKind> {
    let mut input = ParsedInput::new(m.name.as_str(), options.default_duration, options.default_port);

    if let Some(port) = m.port {
        let port: usize = port.parse().map_err(|_| ParseErrorKind::InvalidControllerPort)?;
        input.controller_port = port.checked_sub(1).ok_or(ParseErrorKind::InvalidControllerPort)?;
    }

    input.action = match m.modifier {
        Some("_") => InputAction::Hold,
        Some("-") => InputAction::Release,
        _ => InputAction::Press,
    };

    if input.name.is_empty() {
        return Err(ParseErrorKind::NoInput);
    }

    if let Some(percent) = m.percent {
        let percent: u32 = percent.parse().map_err(|_| ParseErrorKind::InvalidPercentage)?;
        input.percent = u8::try_from(percent)
            .ok()
            .filter(|p| *p <= DEFAULT_PERCENT)
            .ok_or(ParseErrorKind::InvalidPercentage)?;
    }

    if let Some(ms) = m.millis {
        input.duration = ms.parse().map_err(|_| ParseErrorKind::InvalidMsDuration)?;
        input.duration_unit = DurationUnit::Milliseconds;
    } else if let Some(secs) = m.seconds {
        let secs: u32 = secs.parse().map_err(|_| ParseErrorKind::InvalidSecDuration)?;
        input.duration = secs.checked_mul(1000).ok_or(ParseErrorKind::InvalidSecDuration)?;
        input.duration_unit = DurationUnit::Seconds;
    }

    Ok(input)
}
