//! Interfaces to externally persisted data.
//!
//! Macros, synonyms and settings live in the host's database. The pipeline
//! only needs a read-only view per call, expressed by the traits here, plus
//! in-memory implementations for hosts without a database and for tests.

use std::collections::{BTreeMap, HashMap};

// --- Macros ------------------------------------------------------------------

/// A named text substitution.
///
/// Dynamic macros take arguments: their name carries one `*` per argument,
/// e.g. `#mash(*)`, and their value refers to arguments as `<0>`, `<1>`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMacro {
    pub name: String,
    pub value: String,
}

impl InputMacro {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        InputMacro { name: name.into(), value: value.into() }
    }

    pub fn is_dynamic(&self) -> bool {
        self.name.contains('(')
    }
}

/// Read access to the macro table.
pub trait MacroStore {
    /// Macros whose name starts with `prefix`.
    fn macros_with_prefix(&self, prefix: &str) -> Vec<InputMacro>;

    fn get(&self, name: &str) -> Option<InputMacro>;
}

/// In-memory macro table with ordered prefix queries.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    macros: BTreeMap<String, String>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a macro. Names are stored lowercased.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.macros.insert(name.to_lowercase(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.macros.remove(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for MacroTable {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut table = MacroTable::new();
        for (name, value) in iter {
            table.insert(name.as_ref(), value.as_ref());
        }
        table
    }
}

impl MacroStore for MacroTable {
    fn macros_with_prefix(&self, prefix: &str) -> Vec<InputMacro> {
        self.macros
            .range(prefix.to_string()..)
            .take_while(|(name, _)| name.starts_with(prefix))
            .map(|(name, value)| InputMacro::new(name.as_str(), value.as_str()))
            .collect()
    }

    fn get(&self, name: &str) -> Option<InputMacro> {
        self.macros.get(name).map(|value| InputMacro::new(name, value.as_str()))
    }
}

// --- Synonyms ----------------------------------------------------------------

/// A console-scoped literal alias, e.g. `"jump"` for `"a"` on one console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSynonym {
    pub console: String,
    pub name: String,
    pub value: String,
}

impl InputSynonym {
    pub fn new(console: &str, name: &str, value: &str) -> Self {
        InputSynonym { console: console.to_string(), name: name.to_string(), value: value.to_string() }
    }
}

/// Synonyms belonging to `console`, in table order.
pub fn synonyms_for<'a>(synonyms: &'a [InputSynonym], console: &'a str) -> impl Iterator<Item = &'a InputSynonym> {
    synonyms.iter().filter(move |s| s.console == console)
}

// --- Settings ----------------------------------------------------------------

pub const DEFAULT_INPUT_DURATION: &str = "default_input_duration";
pub const MAX_INPUT_DURATION: &str = "max_input_duration";
pub const DEFAULT_CONTROLLER_PORT: &str = "default_controller_port";
pub const DEMOCRACY_VOTE_TIME: &str = "democracy_vote_time";
pub const DEMOCRACY_RESOLUTION_MODE: &str = "democracy_resolution_mode";

/// Read access to host configuration. Missing keys yield the given default.
pub trait SettingsStore {
    fn get_int(&self, key: &str, default: i64) -> i64;

    fn get_str(&self, key: &str, default: &str) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SettingValue {
    Int(i64),
    Str(String),
}

/// In-memory settings.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, SettingValue>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_int(&mut self, key: &str, value: i64) -> &mut Self {
        self.values.insert(key.to_string(), SettingValue::Int(value));
        self
    }

    pub fn set_str(&mut self, key: &str, value: &str) -> &mut Self {
        self.values.insert(key.to_string(), SettingValue::Str(value.to_string()));
        self
    }
}

impl SettingsStore for MemorySettings {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(SettingValue::Int(v)) => *v,
            Some(SettingValue::Str(s)) => s.trim().parse().unwrap_or(default),
            None => default,
        }
    }

    fn get_str(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(SettingValue::Str(s)) => s.clone(),
            Some(SettingValue::Int(v)) => v.to_string(),
            None => default.to_string(),
        }
    }
}
