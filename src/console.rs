//! Console input model.
//!
//! A [`GameConsole`] maps symbolic input names (`"a"`, `"left"`, `"ss1"`) to
//! the button and axis codes a virtual controller understands, and lists the
//! input combinations that must never be asserted together.
//!
//! The console also owns the tokenizer derived from its enabled input names.
//! The tokenizer is built on first use and dropped whenever the input set
//! changes, so a stale pattern is never handed out after `add_input` or
//! `remove_input`.
//!
//! ## Design notes
//!
//! - An input can be a button, an axis, both, or neither. Neither means a
//!   blank input: a pure wait with no device mapping (`#`).
//! - Inputs that are both (GameCube L/R) act as an axis up to
//!   `max_axis_percent` and as the digital button above it.
//! - Disabled inputs stay registered but are invisible to every lookup and to
//!   the tokenizer.

use crate::ParsedInput;
use crate::engine::Tokenizer;
use bitflags::bitflags;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;

bitflags! {
    /// How an input maps onto a controller. Empty means a blank (wait) input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputKind: u8 {
        const BUTTON = 1 << 0;
        const AXIS   = 1 << 1;
    }
}

/// One registered input of a console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputData {
    pub name: String,
    pub kind: InputKind,
    pub button: u32,
    pub axis: u32,
    /// Axis value at 0%, in `-1..=1`.
    pub min_axis: i8,
    /// Axis value at 100%, in `-1..=1`.
    pub max_axis: i8,
    /// Highest percent still treated as an analog press.
    pub max_axis_percent: u8,
    pub enabled: bool,
    /// Minimum user level allowed to use the input.
    pub level: i64,
}

impl InputData {
    pub fn blank(name: &str) -> Self {
        InputData {
            name: name.to_lowercase(),
            kind: InputKind::empty(),
            button: 0,
            axis: 0,
            min_axis: 0,
            max_axis: 0,
            max_axis_percent: 100,
            enabled: true,
            level: 0,
        }
    }

    pub fn button(name: &str, button: u32) -> Self {
        InputData { kind: InputKind::BUTTON, button, ..InputData::blank(name) }
    }

    pub fn axis(name: &str, axis: u32, min_axis: i8, max_axis: i8) -> Self {
        InputData { kind: InputKind::AXIS, axis, min_axis, max_axis, ..InputData::blank(name) }
    }

    /// An input that drives both a button and an axis.
    pub fn shared(name: &str, button: u32, axis: u32, min_axis: i8, max_axis: i8, max_axis_percent: u8) -> Self {
        InputData {
            kind: InputKind::BUTTON | InputKind::AXIS,
            button,
            axis,
            min_axis,
            max_axis,
            max_axis_percent,
            ..InputData::blank(name)
        }
    }

    pub fn with_level(mut self, level: i64) -> Self {
        self.level = level;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.kind.is_empty()
    }
}

/// Axis mapping returned by [`GameConsole::get_axis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisDescriptor {
    pub code: u32,
    pub min: i8,
    pub max: i8,
    pub max_percent: u8,
}

/// A set of input names that must never be asserted together on one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCombo {
    pub names: Vec<String>,
}

impl InvalidCombo {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        InvalidCombo { names: names.into_iter().map(Into::into).collect() }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A named console profile.
#[derive(Debug, Clone, Default)]
pub struct GameConsole {
    name: String,
    inputs: HashMap<String, InputData>,
    invalid_combos: Vec<InvalidCombo>,
    tokenizer: OnceCell<Arc<Tokenizer>>,
}

impl GameConsole {
    pub fn new(name: &str, inputs: Vec<InputData>, invalid_combos: Vec<InvalidCombo>) -> Self {
        let inputs = inputs.into_iter().map(|data| (data.name.clone(), data)).collect();
        GameConsole { name: name.to_string(), inputs, invalid_combos, tokenizer: OnceCell::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invalid_combos(&self) -> &[InvalidCombo] {
        &self.invalid_combos
    }

    /// Registered data for `name`, enabled or not.
    pub fn input(&self, name: &str) -> Option<&InputData> {
        self.inputs.get(name)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &InputData> {
        self.inputs.values()
    }

    fn enabled(&self, name: &str) -> Option<&InputData> {
        self.inputs.get(name).filter(|data| data.enabled)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled(name).is_some()
    }

    // --- Lookups -------------------------------------------------------------

    pub fn get_button(&self, name: &str) -> Option<u32> {
        self.enabled(name).filter(|data| data.kind.contains(InputKind::BUTTON)).map(|data| data.button)
    }

    /// Axis mapping for `name`, or `None` when `percent` exceeds the axis's
    /// max percent (the input then acts as its digital button, if any).
    pub fn get_axis(&self, name: &str, percent: u8) -> Option<AxisDescriptor> {
        self.axis_value(name).filter(|axis| percent <= axis.max_percent)
    }

    /// Axis mapping for `name` regardless of percent.
    pub fn axis_value(&self, name: &str) -> Option<AxisDescriptor> {
        self.enabled(name).filter(|data| data.kind.contains(InputKind::AXIS)).map(|data| AxisDescriptor {
            code: data.axis,
            min: data.min_axis,
            max: data.max_axis,
            max_percent: data.max_axis_percent,
        })
    }

    pub fn is_blank(&self, name: &str) -> bool {
        self.enabled(name).is_some_and(InputData::is_blank)
    }

    /// Whether this parsed input is interpreted as an axis press.
    pub fn is_axis(&self, input: &ParsedInput) -> bool {
        self.get_axis(&input.name, input.percent).is_some()
    }

    pub fn is_button(&self, input: &ParsedInput) -> bool {
        self.get_button(&input.name).is_some() && !self.is_axis(input)
    }

    // --- Mutation ------------------------------------------------------------

    /// Adds or replaces an input. Returns `true` if the name was new.
    pub fn add_input(&mut self, data: InputData) -> bool {
        let existed = self.inputs.insert(data.name.clone(), data).is_some();
        self.tokenizer = OnceCell::new();
        !existed
    }

    pub fn remove_input(&mut self, name: &str) -> Option<InputData> {
        let removed = self.inputs.remove(name);
        if removed.is_some() {
            self.tokenizer = OnceCell::new();
        }
        removed
    }

    pub fn set_invalid_combos(&mut self, combos: Vec<InvalidCombo>) {
        self.invalid_combos = combos;
    }

    // --- Tokenizer -----------------------------------------------------------

    /// Tokenizer over the enabled input names, built on first use.
    pub fn tokenizer(&self) -> Arc<Tokenizer> {
        self.tokenizer
            .get_or_init(|| {
                let names = self.inputs.values().filter(|data| data.enabled).map(|data| data.name.as_str());
                Arc::new(Tokenizer::new(names))
            })
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::codes::*;

    fn console() -> GameConsole {
        GameConsole::new(
            "test",
            vec![
                InputData::blank("#"),
                InputData::button("a", BTN1),
                InputData::axis("left", AXIS_X, 0, -1),
                InputData::shared("l", BTN7, AXIS_RZ, 0, 1, 99),
                InputData::button("hidden", BTN2).disabled(),
            ],
            vec![InvalidCombo::new(["a", "l"])],
        )
    }

    #[test]
    fn shared_input_switches_on_percent() {
        let c = console();
        assert!(c.get_axis("l", 99).is_some());
        assert!(c.get_axis("l", 100).is_none());
        assert_eq!(c.get_button("l"), Some(BTN7));
        assert!(c.axis_value("l").is_some());
    }

    #[test]
    fn blank_and_disabled_lookups() {
        let c = console();
        assert!(c.is_blank("#"));
        assert!(!c.is_blank("a"));
        assert!(!c.is_blank("nope"));
        assert_eq!(c.get_button("hidden"), None);
        assert!(c.input("hidden").is_some());
    }

    #[test]
    fn mutation_rebuilds_tokenizer() {
        let mut c = console();
        assert!(c.tokenizer().find_iter("z").is_empty());
        assert!(c.add_input(InputData::button("z", BTN9)));
        let matches = c.tokenizer().find_iter("z");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "z");

        assert!(c.remove_input("z").is_some());
        assert!(c.tokenizer().find_iter("z").is_empty());
    }
}
