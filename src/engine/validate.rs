//! Post-parse validation.
//!
//! Each validator inspects a valid sequence and returns the first problem it
//! finds. None of them touch controller state; the combo check only reads it
//! to learn what is already held from earlier commands.

use crate::controller::{ButtonState, ControllerManager, VirtualController};
use crate::error::{ValidationError, ValidationResult};
use crate::{GameConsole, InvalidCombo, ParsedInputSequence};
use std::collections::{HashMap, HashSet};

/// Refuses the first input whose name is in `restricted`.
pub fn validate_restricted(seq: &ParsedInputSequence, restricted: &HashSet<String>) -> ValidationResult {
    if restricted.is_empty() {
        return Ok(());
    }
    match seq.inputs().find(|input| restricted.contains(&input.name)) {
        Some(input) => Err(ValidationError::RestrictedInput(input.name.clone())),
        None => Ok(()),
    }
}

/// Refuses sequences that would assert every member of an invalid combo on
/// one controller at the same time.
///
/// Per port, two sets are tracked: inputs held going in (already asserted on
/// the controller, or held by an earlier group of this sequence) and inputs
/// pressed within the current group. The combo trips when together they
/// cover every member.
pub fn validate_combos(
    seq: &ParsedInputSequence,
    combos: &[InvalidCombo],
    controllers: &ControllerManager,
    console: &GameConsole,
) -> ValidationResult {
    for combo in combos.iter().filter(|c| !c.is_empty()) {
        check_combo(seq, combo, controllers, console)?;
    }
    Ok(())
}

fn check_combo(
    seq: &ParsedInputSequence,
    combo: &InvalidCombo,
    controllers: &ControllerManager,
    console: &GameConsole,
) -> ValidationResult {
    let mut held: HashMap<usize, HashSet<&str>> = HashMap::new();
    let mut pressed: HashMap<usize, HashSet<&str>> = HashMap::new();

    for controller in controllers.iter().filter(|c| c.is_acquired()) {
        for name in &combo.names {
            if is_asserted(controller.as_ref(), console, name) {
                held.entry(controller.index()).or_default().insert(name.as_str());
            }
        }
    }

    let tripped = || Err(ValidationError::InvalidCombo(combo.names.clone()));

    for group in &seq.groups {
        pressed.values_mut().for_each(HashSet::clear);

        for input in group {
            if !combo.contains(&input.name) {
                continue;
            }
            let name = input.name.as_str();
            let current = held.entry(input.controller_port).or_default();
            let sub = pressed.entry(input.controller_port).or_default();

            if !input.is_release() && !sub.contains(name) && !current.contains(name) {
                sub.insert(name);
                if sub.len() + current.len() == combo.len() {
                    return tripped();
                }
            }

            if input.is_hold() {
                if current.insert(name) {
                    sub.remove(name);
                    if sub.len() + current.len() == combo.len() {
                        return tripped();
                    }
                }
            } else if input.is_release() {
                current.remove(name);
            }
        }
    }

    Ok(())
}

fn is_asserted(controller: &dyn VirtualController, console: &GameConsole, name: &str) -> bool {
    let button = console.get_button(name);
    let axis = console.axis_value(name);
    if button.is_none() && axis.is_none() {
        log::warn!("validate: {name:?} is part of an invalid combo but doesn't exist for {}", console.name());
        return false;
    }
    button.is_some_and(|code| controller.button_state(code) == ButtonState::Pressed)
        || axis.is_some_and(|axis| controller.axis_state(axis.code) != 0)
}

/// Every input must target an existing, acquired controller.
pub fn validate_ports(seq: &ParsedInputSequence, controllers: &ControllerManager) -> ValidationResult {
    for input in seq.inputs() {
        let port = input.controller_port;
        let Some(controller) = controllers.get(port) else {
            return Err(ValidationError::InvalidPort { port, count: controllers.count() });
        };
        if !controller.is_acquired() {
            return Err(ValidationError::PortNotAcquired { port });
        }
    }
    Ok(())
}

/// Refuses inputs whose required level is above `user_level`.
pub fn validate_input_levels(seq: &ParsedInputSequence, user_level: i64, console: &GameConsole) -> ValidationResult {
    for input in seq.inputs() {
        if let Some(data) = console.input(&input.name).filter(|data| user_level < data.level) {
            return Err(ValidationError::InsufficientLevel { input: input.name.clone(), level: data.level });
        }
    }
    Ok(())
}
