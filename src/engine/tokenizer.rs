//! Console-derived tokenizer.
//!
//! The token grammar is fixed apart from the input-name alternation:
//!
//! ```text
//! (&PORT)? ([_-])? NAME (PCT%)? (MSms | SECs)? (+)?
//! ```
//!
//! ## Design notes
//!
//! - Names are sorted by descending length before they are escaped and joined.
//!   `regex` alternation is leftmost-first, so without the sort `"s"` would
//!   shadow `"ss1"` and `"ss1200ms"` would tokenize as `s` plus garbage.
//! - Matching is case-insensitive; matched names are reported lowercased.
//! - A console with no enabled inputs yields a tokenizer that never matches.

use regex::Regex;

/// One regex match over the prepared text, split into its grammar parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMatch<'t> {
    /// Byte offset of the match start.
    pub start: usize,
    /// Byte offset one past the match end.
    pub end: usize,
    /// The whole matched token.
    pub text: &'t str,
    /// Digits after `&`, if present.
    pub port: Option<&'t str>,
    /// `_` or `-`, if present.
    pub modifier: Option<&'t str>,
    pub name: String,
    /// Digits before `%`, if present.
    pub percent: Option<&'t str>,
    /// Digits before `ms`, if present.
    pub millis: Option<&'t str>,
    /// Digits before `s`, if present.
    pub seconds: Option<&'t str>,
    /// A trailing `+` joins the next token into the same group.
    pub plus: bool,
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    regex: Option<Regex>,
    names: usize,
}

impl Tokenizer {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<String> =
            names.into_iter().filter(|n| !n.is_empty()).map(|n| regex::escape(&n.to_lowercase())).collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();

        if names.is_empty() {
            log::debug!("tokenizer: no enabled inputs");
            return Tokenizer { regex: None, names: 0 };
        }

        let pattern = format!(
            concat!(
                r"(?i)(?:&(?P<port>\d+))?(?P<modifier>[_-])?(?P<name>{})",
                r"(?:(?P<percent>\d+)%)?(?:(?P<ms>\d+)ms|(?P<sec>\d+)s)?(?P<plus>\+)?",
            ),
            names.join("|")
        );
        log::debug!("tokenizer: compiling pattern over {} inputs", names.len());

        match Regex::new(&pattern) {
            Ok(regex) => Tokenizer { regex: Some(regex), names: names.len() },
            Err(err) => {
                // Only reachable if the alternation exceeds the regex size limit.
                log::warn!("tokenizer: pattern rejected: {err}");
                Tokenizer { regex: None, names: 0 }
            }
        }
    }

    /// Number of distinct names in the alternation.
    pub fn len(&self) -> usize {
        self.names
    }

    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.regex.as_ref().map(Regex::as_str)
    }

    /// All non-overlapping matches in `text`, left to right.
    pub fn find_iter<'t>(&self, text: &'t str) -> Vec<TokenMatch<'t>> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };

        regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.name("name")?.as_str().to_lowercase();
                Some(TokenMatch {
                    start: whole.start(),
                    end: whole.end(),
                    text: whole.as_str(),
                    port: caps.name("port").map(|m| m.as_str()),
                    modifier: caps.name("modifier").map(|m| m.as_str()),
                    name,
                    percent: caps.name("percent").map(|m| m.as_str()),
                    millis: caps.name("ms").map(|m| m.as_str()),
                    seconds: caps.name("sec").map(|m| m.as_str()),
                    plus: caps.name("plus").is_some(),
                })
            })
            .collect()
    }
}
