extern crate self as padscript;

#[macro_use]
mod macros;
mod api;
mod console;
mod engine;
mod error;

pub mod consoles;
pub mod controller;
pub mod executor;
pub mod store;
pub mod vote;

pub use api::{
    ParseRun, parse, parse_message, parse_message_verbose, preprocess, reverse_parse, reverse_parse_natural,
    validate_combos, validate_input_levels, validate_ports, validate_restricted,
};
pub use console::{AxisDescriptor, GameConsole, InputData, InputKind, InvalidCombo};
pub use engine::{
    INVALID_NATURAL, MAX_EXPANDED_LEN, MAX_MACRO_PASSES, ParserOptions, PrepMask, PreprocessMetrics,
    ReverseParserOptions, RunMetrics, ShowDurations, ShowPorts, TokenMatch, Tokenizer, expandify, populate_macros,
    populate_synonyms, prepare_with_metrics, remove_whitespace,
};
pub use error::{ControllerError, ExecuteError, ParseError, ParseErrorKind, ValidationError, ValidationResult};

/// Percent assumed when an input carries no `N%` suffix.
pub const DEFAULT_PERCENT: u8 = 100;

// --- Parsed data model -------------------------------------------------------

/// What an input does to its button or axis.
///
/// Source syntax: no modifier is a press, `_` a hold, `-` a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputAction {
    /// Pressed, then released by the executor once its duration elapses.
    #[default]
    Press,
    /// Pressed and left down after its duration.
    Hold,
    /// Released instead of pressed.
    Release,
}

impl InputAction {
    /// Source-syntax prefix for this action.
    pub fn prefix(self) -> &'static str {
        match self {
            InputAction::Press => "",
            InputAction::Hold => "_",
            InputAction::Release => "-",
        }
    }
}

/// Unit the duration was written in. `ParsedInput::duration` is always
/// milliseconds; this only remembers the spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DurationUnit {
    #[default]
    Milliseconds,
    Seconds,
}

impl DurationUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            DurationUnit::Milliseconds => "ms",
            DurationUnit::Seconds => "s",
        }
    }
}

/// One atomic input token, e.g. `&2_left50%1s`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedInput {
    /// Lowercased input name from the console.
    pub name: String,
    pub action: InputAction,
    /// Analog intensity, 0..=100.
    pub percent: u8,
    /// Milliseconds the input is asserted.
    pub duration: u32,
    pub duration_unit: DurationUnit,
    /// Zero-based controller port (`&1` is port 0).
    pub controller_port: usize,
}

impl ParsedInput {
    /// A plain press of `name` with default percent, duration and port.
    pub fn new(name: impl Into<String>, duration: u32, controller_port: usize) -> Self {
        ParsedInput {
            name: name.into(),
            action: InputAction::Press,
            percent: DEFAULT_PERCENT,
            duration,
            duration_unit: DurationUnit::Milliseconds,
            controller_port,
        }
    }

    pub fn is_hold(&self) -> bool {
        self.action == InputAction::Hold
    }

    pub fn is_release(&self) -> bool {
        self.action == InputAction::Release
    }
}

/// Inputs joined by `+` in the source; pressed together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct InputGroup {
    pub inputs: Vec<ParsedInput>,
}

impl InputGroup {
    pub fn new(inputs: Vec<ParsedInput>) -> Self {
        InputGroup { inputs }
    }

    /// Wall-clock length of the group: its longest member.
    pub fn sub_duration(&self) -> u32 {
        self.inputs.iter().map(|i| i.duration).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParsedInput> {
        self.inputs.iter()
    }
}

impl<'a> IntoIterator for &'a InputGroup {
    type Item = &'a ParsedInput;
    type IntoIter = std::slice::Iter<'a, ParsedInput>;

    fn into_iter(self) -> Self::IntoIter {
        self.inputs.iter()
    }
}

/// Outcome class of a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseStatus {
    /// A well-formed input command.
    Valid,
    /// Input-shaped text with a concrete problem; see `ParsedInputSequence::error`.
    Invalid,
    /// Not an input command at all. Callers treat the text as ordinary chat.
    NormalMessage,
}

/// The parser's product: groups executed one after another.
///
/// Equality and hashing are structural so sequences can key vote tallies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedInputSequence {
    pub status: ParseStatus,
    pub groups: Vec<InputGroup>,
    /// Sum of every group's sub-duration, in milliseconds.
    pub total_duration: u64,
    pub error: Option<ParseError>,
}

impl ParsedInputSequence {
    pub(crate) fn normal_message() -> Self {
        ParsedInputSequence { status: ParseStatus::NormalMessage, groups: Vec::new(), total_duration: 0, error: None }
    }

    /// A valid sequence built directly from groups.
    pub fn from_groups(groups: Vec<InputGroup>) -> Self {
        let total_duration = groups.iter().map(|g| u64::from(g.sub_duration())).sum();
        ParsedInputSequence { status: ParseStatus::Valid, groups, total_duration, error: None }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ParseStatus::Valid
    }

    /// Every input of every group, in order.
    pub fn inputs(&self) -> impl Iterator<Item = &ParsedInput> {
        self.groups.iter().flat_map(|g| g.inputs.iter())
    }
}
