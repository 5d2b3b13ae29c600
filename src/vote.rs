//! Democracy mode: many users vote, one sequence runs.
//!
//! Votes are tallied per structurally equal sequence for the length of a
//! voting window. The window opens with the first vote; once it has run its
//! course, [`DemocracyVote::update`] picks a winner and starts over.
//!
//! Ties go to whichever candidate was submitted first.

use crate::store::{self, SettingsStore};
use crate::{InputGroup, ParsedInput, ParsedInputSequence};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolutionMode {
    /// The exact sequence with the most votes.
    #[default]
    ExactSequence,
    /// The input name that most votes start with, pressed once for the
    /// default duration.
    SameName,
}

impl ResolutionMode {
    /// Accepts `exact_sequence`/`0` and `same_name`/`1`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact_sequence" | "exactsequence" | "0" => Some(ResolutionMode::ExactSequence),
            "same_name" | "samename" | "1" => Some(ResolutionMode::SameName),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOptions {
    pub voting_duration: TimeDelta,
    pub mode: ResolutionMode,
    /// Duration of the single input a `SameName` resolution produces.
    pub default_duration: u32,
    pub default_port: usize,
}

impl Default for VoteOptions {
    fn default() -> Self {
        VoteOptions {
            voting_duration: TimeDelta::milliseconds(10_000),
            mode: ResolutionMode::ExactSequence,
            default_duration: 200,
            default_port: 0,
        }
    }
}

impl VoteOptions {
    pub fn from_settings(settings: &dyn SettingsStore) -> Self {
        let defaults = VoteOptions::default();
        let vote_ms = settings.get_int(store::DEMOCRACY_VOTE_TIME, defaults.voting_duration.num_milliseconds());
        let mode = settings.get_str(store::DEMOCRACY_RESOLUTION_MODE, "exact_sequence");
        let mode = ResolutionMode::parse(&mode).unwrap_or_else(|| {
            log::warn!("vote: unknown resolution mode {mode:?}, using exact_sequence");
            ResolutionMode::ExactSequence
        });
        let default_duration =
            settings.get_int(store::DEFAULT_INPUT_DURATION, i64::from(defaults.default_duration));
        let default_port = settings.get_int(store::DEFAULT_CONTROLLER_PORT, defaults.default_port as i64);

        VoteOptions {
            voting_duration: TimeDelta::milliseconds(vote_ms.max(0)),
            mode,
            default_duration: u32::try_from(default_duration).unwrap_or(defaults.default_duration),
            default_port: usize::try_from(default_port).unwrap_or(defaults.default_port),
        }
    }
}

/// Vote tally for one window.
#[derive(Debug, Clone)]
pub struct DemocracyVote {
    options: VoteOptions,
    window_start: DateTime<Utc>,
    /// Candidates in submission order, with their vote counts.
    entries: Vec<(Vec<InputGroup>, u64)>,
    index: HashMap<Vec<InputGroup>, usize>,
}

impl DemocracyVote {
    pub fn new(options: VoteOptions, now: DateTime<Utc>) -> Self {
        DemocracyVote { options, window_start: now, entries: Vec::new(), index: HashMap::new() }
    }

    pub fn options(&self) -> &VoteOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: VoteOptions) {
        self.options = options;
    }

    /// Records one vote and returns the candidate's new count. Sequences that
    /// are not valid, or have no inputs, are ignored.
    pub fn add(&mut self, user: &str, seq: &ParsedInputSequence) -> Option<u64> {
        if !seq.is_valid() || seq.groups.first().is_none_or(InputGroup::is_empty) {
            log::debug!("vote: ignoring empty or invalid sequence from {user}");
            return None;
        }

        let count = match self.index.get(&seq.groups) {
            Some(&i) => {
                self.entries[i].1 += 1;
                self.entries[i].1
            }
            None => {
                self.index.insert(seq.groups.clone(), self.entries.len());
                self.entries.push((seq.groups.clone(), 1));
                1
            }
        };
        log::debug!("vote: {user} voted, count {count}, {} candidate(s)", self.entries.len());
        Some(count)
    }

    /// Distinct candidates in the current window.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every vote. Call when inputs are halted.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Resolves the window if it has elapsed.
    ///
    /// With no votes the window keeps restarting at `now`, so it effectively
    /// opens with the first vote.
    pub fn update(&mut self, now: DateTime<Utc>) -> Option<ParsedInputSequence> {
        if self.entries.is_empty() {
            self.window_start = now;
            return None;
        }
        if now - self.window_start < self.options.voting_duration {
            return None;
        }

        let winner = match self.options.mode {
            ResolutionMode::ExactSequence => self.resolve_exact(),
            ResolutionMode::SameName => self.resolve_same_name(),
        };
        self.clear();
        self.window_start = now;
        winner.map(ParsedInputSequence::from_groups)
    }

    fn resolve_exact(&self) -> Option<Vec<InputGroup>> {
        let mut best: Option<&(Vec<InputGroup>, u64)> = None;
        for entry in &self.entries {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(groups, _)| groups.clone())
    }

    fn resolve_same_name(&self) -> Option<Vec<InputGroup>> {
        let mut order: Vec<&str> = Vec::new();
        let mut tally: HashMap<&str, u64> = HashMap::new();
        for (groups, count) in &self.entries {
            let Some(first) = groups.first().and_then(|g| g.inputs.first()) else {
                continue;
            };
            let name = first.name.as_str();
            let slot = tally.entry(name).or_insert_with(|| {
                order.push(name);
                0
            });
            *slot += count;
        }

        let mut best: Option<(&str, u64)> = None;
        for name in order {
            let count = tally.get(name).copied().unwrap_or(0);
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((name, count));
            }
        }
        let (name, _) = best?;
        let input = ParsedInput::new(name, self.options.default_duration, self.options.default_port);
        Some(vec![InputGroup::new(vec![input])])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MacroTable, MemorySettings};
    use crate::{ParserOptions, consoles, parse_message};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn seq(text: &str) -> ParsedInputSequence {
        parse_message(text, &consoles::gc::get(), &MacroTable::new(), &[], &ParserOptions::default())
    }

    fn options(mode: ResolutionMode) -> VoteOptions {
        VoteOptions { voting_duration: TimeDelta::milliseconds(1000), mode, ..Default::default() }
    }

    #[test]
    fn exact_sequence_takes_most_votes() {
        let mut vote = DemocracyVote::new(options(ResolutionMode::ExactSequence), at(0));
        assert_eq!(vote.update(at(0)), None);

        vote.add("ann", &seq("a b"));
        vote.add("bo", &seq("start"));
        assert_eq!(vote.add("cy", &seq("start")), Some(2));
        assert_eq!(vote.len(), 2);

        assert_eq!(vote.update(at(500)), None);
        let winner = vote.update(at(1000)).unwrap();
        assert_eq!(winner, seq("start"));
        assert!(vote.is_empty());
    }

    #[test]
    fn ties_go_to_first_submission() {
        let mut vote = DemocracyVote::new(options(ResolutionMode::ExactSequence), at(0));
        vote.add("ann", &seq("b"));
        vote.add("bo", &seq("a"));
        assert_eq!(vote.update(at(2000)), Some(seq("b")));
    }

    #[test]
    fn same_name_groups_by_first_input() {
        let mut vote = DemocracyVote::new(options(ResolutionMode::SameName), at(0));
        vote.add("ann", &seq("a500ms b"));
        vote.add("bo", &seq("a+x"));
        vote.add("cy", &seq("b"));
        vote.add("di", &seq("b"));
        vote.add("ed", &seq("b"));

        let winner = vote.update(at(1000)).unwrap();
        assert_eq!(winner.groups, vec![InputGroup::new(vec![ParsedInput::new("b", 200, 0)])]);
        assert_eq!(winner.total_duration, 200);
    }

    #[test]
    fn invalid_votes_are_ignored() {
        let mut vote = DemocracyVote::new(VoteOptions::default(), at(0));
        assert_eq!(vote.add("ann", &seq("hello there")), None);
        assert_eq!(vote.add("bo", &seq("a+")), None);
        assert!(vote.is_empty());
    }

    #[test]
    fn options_from_settings() {
        let mut settings = MemorySettings::new();
        settings.set_int(store::DEMOCRACY_VOTE_TIME, 5000).set_str(store::DEMOCRACY_RESOLUTION_MODE, "same_name");
        let opts = VoteOptions::from_settings(&settings);
        assert_eq!(opts.voting_duration, TimeDelta::milliseconds(5000));
        assert_eq!(opts.mode, ResolutionMode::SameName);
        assert_eq!(ResolutionMode::parse("bogus"), None);
    }
}
