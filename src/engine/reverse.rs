//! Reverse parsing: sequence back to text.
//!
//! Two renderings of a valid sequence:
//!
//! - canonical syntax (`_a500ms+b 1s`), which parses back to an equal
//!   sequence, used when echoing or storing inputs;
//! - natural language (`Hold "a" for 500 msecs AND ...`), used in chat replies
//!   and vote summaries.
//!
//! Blank inputs never show a port and always show their duration, since the
//! duration is the only thing a wait carries.

use crate::{DEFAULT_PERCENT, DurationUnit, GameConsole, InputAction, ParsedInput, ParsedInputSequence};
use std::fmt::Write;

/// Natural rendering of a sequence that is not valid.
pub const INVALID_NATURAL: &str = "Invalid input!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShowPorts {
    #[default]
    None,
    All,
    NonDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShowDurations {
    #[default]
    All,
    NonDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReverseParserOptions {
    pub show_ports: ShowPorts,
    /// Zero-based port treated as the default.
    pub default_port: usize,
    pub show_durations: ShowDurations,
    pub default_duration: u32,
}

impl Default for ReverseParserOptions {
    fn default() -> Self {
        ReverseParserOptions {
            show_ports: ShowPorts::None,
            default_port: 0,
            show_durations: ShowDurations::All,
            default_duration: 200,
        }
    }
}

impl ReverseParserOptions {
    fn shows_port(&self, input: &ParsedInput, blank: bool) -> bool {
        if blank {
            return false;
        }
        match self.show_ports {
            ShowPorts::None => false,
            ShowPorts::All => true,
            ShowPorts::NonDefault => input.controller_port != self.default_port,
        }
    }

    fn shows_duration(&self, input: &ParsedInput, blank: bool) -> bool {
        blank
            || match self.show_durations {
                ShowDurations::All => true,
                ShowDurations::NonDefault => input.duration != self.default_duration,
            }
    }
}

/// Duration in the unit it was written in.
fn written_duration(input: &ParsedInput) -> u32 {
    match input.duration_unit {
        DurationUnit::Milliseconds => input.duration,
        DurationUnit::Seconds => input.duration / 1000,
    }
}

/// Canonical syntax. Returns an empty string for a non-valid sequence.
pub fn reverse_parse(seq: &ParsedInputSequence, console: &GameConsole, options: &ReverseParserOptions) -> String {
    if !seq.is_valid() || seq.groups.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(seq.groups.len() * 8);
    for (gi, group) in seq.groups.iter().enumerate() {
        if gi > 0 {
            out.push(' ');
        }
        for (ii, input) in group.inputs.iter().enumerate() {
            if ii > 0 {
                out.push('+');
            }
            let blank = console.is_blank(&input.name);

            if options.shows_port(input, blank) {
                let _ = write!(out, "&{}", input.controller_port + 1);
            }
            out.push_str(input.action.prefix());
            out.push_str(&input.name);
            if input.percent != DEFAULT_PERCENT || console.is_axis(input) {
                let _ = write!(out, "{}%", input.percent);
            }
            if options.shows_duration(input, blank) {
                let _ = write!(out, "{}{}", written_duration(input), input.duration_unit.suffix());
            }
        }
    }
    out
}

/// Natural-language rendering. Returns [`INVALID_NATURAL`] for a non-valid sequence.
pub fn reverse_parse_natural(
    seq: &ParsedInputSequence,
    console: &GameConsole,
    options: &ReverseParserOptions,
) -> String {
    if !seq.is_valid() || seq.groups.is_empty() {
        return INVALID_NATURAL.to_string();
    }

    let mut out = String::with_capacity(seq.groups.len() * 32);
    for (gi, group) in seq.groups.iter().enumerate() {
        if gi > 0 {
            out.push_str(", THEN ");
        }
        for (ii, input) in group.inputs.iter().enumerate() {
            if ii > 0 {
                out.push_str(" AND ");
            }
            let blank = console.is_blank(&input.name);
            let verb = match (blank, input.action) {
                (true, _) => "wait",
                (false, InputAction::Press) => "press",
                (false, InputAction::Hold) => "hold",
                (false, InputAction::Release) => "release",
            };
            if gi == 0 && ii == 0 {
                out.push_str(&capitalize(verb));
            } else {
                out.push_str(verb);
            }
            out.push(' ');

            if !blank {
                let _ = write!(out, "\"{}\" ", input.name);
                if !input.is_release() && (input.percent != DEFAULT_PERCENT || console.is_axis(input)) {
                    let _ = write!(out, "{}% ", input.percent);
                }
            }

            let duration = written_duration(input);
            let unit = match input.duration_unit {
                DurationUnit::Milliseconds => "msec",
                DurationUnit::Seconds => "sec",
            };
            let _ = write!(out, "{duration} {unit}{}", if duration == 1 { "" } else { "s" });

            if options.shows_port(input, blank) {
                let _ = write!(out, " on port {}", input.controller_port + 1);
            }
        }
    }
    out.push('.');
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
