//! Error types.
//!
//! Malformed user input never panics: the parser reports it through
//! [`ParseError`] inside an `Invalid` sequence, validators return
//! [`ValidationError`], and device trouble surfaces as [`ControllerError`].

use std::fmt;
use thiserror::Error;

/// Why a token or sequence failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseErrorKind {
    #[error("ERR_INVALID_CONTROLLER_PORT")]
    InvalidControllerPort,
    #[error("ERR_INVALID_PERCENTAGE")]
    InvalidPercentage,
    #[error("ERR_INVALID_MS_DURATION")]
    InvalidMsDuration,
    #[error("ERR_INVALID_SEC_DURATION")]
    InvalidSecDuration,
    #[error("ERR_NO_INPUT")]
    NoInput,
    #[error("ERR_PLUS_AT_END")]
    PlusAtEnd,
    #[error("ERR_MAX_DURATION")]
    MaxDuration,
}

impl ParseErrorKind {
    /// Stable error code, e.g. `"ERR_PLUS_AT_END"`.
    pub fn code(self) -> &'static str {
        match self {
            ParseErrorKind::InvalidControllerPort => "ERR_INVALID_CONTROLLER_PORT",
            ParseErrorKind::InvalidPercentage => "ERR_INVALID_PERCENTAGE",
            ParseErrorKind::InvalidMsDuration => "ERR_INVALID_MS_DURATION",
            ParseErrorKind::InvalidSecDuration => "ERR_INVALID_SEC_DURATION",
            ParseErrorKind::NoInput => "ERR_NO_INPUT",
            ParseErrorKind::PlusAtEnd => "ERR_PLUS_AT_END",
            ParseErrorKind::MaxDuration => "ERR_MAX_DURATION",
        }
    }
}

/// A parse failure and, for token-level failures, the offending token text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub token: Option<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        ParseError { kind, token: None }
    }

    pub fn at_token(kind: ParseErrorKind, token: impl Into<String>) -> Self {
        ParseError { kind, token: Some(token.into()) }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(token) => write!(f, "{} for: \"{}\"", self.kind.code(), token),
            None => f.write_str(self.kind.code()),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Why a parsed sequence may not be executed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No permission to use input \"{0}\".")]
    RestrictedInput(String),
    #[error("Inputs ({}) are not allowed to be pressed at the same time.", quoted_list(.0))]
    InvalidCombo(Vec<String>),
    /// `port` is zero-based; the message shows it one-based like the source syntax.
    #[error("Invalid controller port {}. Number of controllers: {count}.", .port + 1)]
    InvalidPort { port: usize, count: usize },
    #[error("Controller port {} has not been acquired.", .port + 1)]
    PortNotAcquired { port: usize },
    #[error("No permission to use input \"{input}\", which requires at least level {level}.")]
    InsufficientLevel { input: String, level: i64 },
}

pub type ValidationResult = Result<(), ValidationError>;

fn quoted_list(names: &[String]) -> String {
    names.iter().map(|n| format!("\"{n}\"")).collect::<Vec<_>>().join(", ")
}

/// A virtual controller could not be driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("controller {0} is not acquired")]
    NotAcquired(usize),
    #[error("controller {0} is unavailable")]
    Unavailable(usize),
}

/// A sequence was refused by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecuteError {
    #[error("inputs are halted")]
    InputsHalted,
}
