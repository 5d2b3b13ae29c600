//! Virtual controller interface.
//!
//! Drivers (vJoy, uinput, ...) live outside this crate and plug in through
//! [`VirtualController`]. Calls record pending changes; `update` flushes them
//! to the device in one batch.
//!
//! [`DummyController`] is the in-memory implementation: it tracks pending and
//! committed state for buttons, axes and input names, which is all the
//! validators and tests need.

use crate::error::ControllerError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Button and axis codes shared by the built-in consoles.
pub mod codes {
    pub const BTN1: u32 = 0;
    pub const BTN2: u32 = 1;
    pub const BTN3: u32 = 2;
    pub const BTN4: u32 = 3;
    pub const BTN5: u32 = 4;
    pub const BTN6: u32 = 5;
    pub const BTN7: u32 = 6;
    pub const BTN8: u32 = 7;
    pub const BTN9: u32 = 8;
    pub const BTN10: u32 = 9;
    pub const BTN11: u32 = 10;
    pub const BTN12: u32 = 11;
    pub const BTN13: u32 = 12;
    pub const BTN14: u32 = 13;
    pub const BTN15: u32 = 14;
    pub const BTN16: u32 = 15;
    pub const BTN17: u32 = 16;
    pub const BTN18: u32 = 17;
    pub const BTN19: u32 = 18;
    pub const BTN20: u32 = 19;
    pub const BTN21: u32 = 20;
    pub const BTN22: u32 = 21;
    pub const BTN23: u32 = 22;
    pub const BTN24: u32 = 23;
    pub const BTN25: u32 = 24;
    pub const BTN26: u32 = 25;
    pub const BTN27: u32 = 26;
    pub const BTN28: u32 = 27;
    pub const BTN29: u32 = 28;
    pub const BTN30: u32 = 29;
    pub const BTN31: u32 = 30;
    pub const BTN32: u32 = 31;

    pub const AXIS_X: u32 = 0;
    pub const AXIS_Y: u32 = 1;
    pub const AXIS_Z: u32 = 2;
    pub const AXIS_RX: u32 = 3;
    pub const AXIS_RY: u32 = 4;
    pub const AXIS_RZ: u32 = 5;
    pub const AXIS_M1: u32 = 6;
    pub const AXIS_M2: u32 = 7;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    Pressed,
    #[default]
    Released,
}

/// A virtual game controller.
///
/// Methods take `&self`: a controller is shared between the scheduler's
/// workers and the validators, so implementations synchronize internally.
pub trait VirtualController: Send + Sync {
    /// Zero-based port this controller occupies.
    fn index(&self) -> usize;

    fn is_acquired(&self) -> bool;

    fn press_button(&self, code: u32);
    fn release_button(&self, code: u32);

    /// Moves an axis to `percent` of the way from `min` to `max` (each in `-1..=1`).
    fn press_axis(&self, code: u32, min: i8, max: i8, percent: u8);
    fn release_axis(&self, code: u32);

    /// Tracks that an input name is pressed, independent of its mapping.
    fn set_input_pressed(&self, name: &str);
    fn set_input_released(&self, name: &str);

    fn button_state(&self, code: u32) -> ButtonState;
    /// Signed axis deflection in percent; `0` is neutral.
    fn axis_state(&self, code: u32) -> i32;
    fn input_state(&self, name: &str) -> ButtonState;

    /// Flushes pending changes to the device.
    fn update(&self) -> Result<(), ControllerError>;

    /// Releases everything and flushes.
    fn reset(&self) -> Result<(), ControllerError>;
}

/// The controllers available to the scheduler, indexed by port.
#[derive(Clone, Default)]
pub struct ControllerManager {
    controllers: Vec<Arc<dyn VirtualController>>,
}

impl std::fmt::Debug for ControllerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerManager").field("count", &self.controllers.len()).finish()
    }
}

impl ControllerManager {
    pub fn new(controllers: Vec<Arc<dyn VirtualController>>) -> Self {
        ControllerManager { controllers }
    }

    /// `count` acquired [`DummyController`]s on ports `0..count`.
    pub fn with_dummies(count: usize) -> Self {
        let controllers = (0..count)
            .map(|port| {
                let controller = DummyController::new(port);
                controller.acquire();
                Arc::new(controller) as Arc<dyn VirtualController>
            })
            .collect();
        ControllerManager { controllers }
    }

    pub fn get(&self, port: usize) -> Option<&Arc<dyn VirtualController>> {
        self.controllers.get(port)
    }

    pub fn count(&self) -> usize {
        self.controllers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn VirtualController>> {
        self.controllers.iter()
    }
}

// --- Dummy controller --------------------------------------------------------

#[derive(Debug, Default, Clone)]
struct TrackedState {
    inputs: HashMap<String, ButtonState>,
    buttons: HashMap<u32, ButtonState>,
    axes: HashMap<u32, i32>,
}

#[derive(Debug, Default)]
struct Tracker {
    pending: TrackedState,
    current: TrackedState,
}

/// In-memory controller. State changes become visible after `update`.
#[derive(Debug, Default)]
pub struct DummyController {
    index: usize,
    acquired: AtomicBool,
    state: Mutex<Tracker>,
}

impl DummyController {
    pub fn new(index: usize) -> Self {
        DummyController { index, ..Default::default() }
    }

    pub fn acquire(&self) {
        self.acquired.store(true, Ordering::SeqCst);
    }

    pub fn close(&self) {
        self.acquired.store(false, Ordering::SeqCst);
    }

    /// Names of the inputs currently committed as pressed, sorted.
    pub fn pressed_inputs(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut names: Vec<String> = state
            .current
            .inputs
            .iter()
            .filter(|(_, s)| **s == ButtonState::Pressed)
            .map(|(n, _)| n.clone())
            .collect();
        names.sort();
        names
    }

    /// Whether any committed button, axis or input name is still asserted.
    pub fn any_asserted(&self) -> bool {
        let state = self.state.lock();
        let current = &state.current;
        current.buttons.values().any(|s| *s == ButtonState::Pressed)
            || current.axes.values().any(|v| *v != 0)
            || current.inputs.values().any(|s| *s == ButtonState::Pressed)
    }
}

impl VirtualController for DummyController {
    fn index(&self) -> usize {
        self.index
    }

    fn is_acquired(&self) -> bool {
        self.acquired.load(Ordering::SeqCst)
    }

    fn press_button(&self, code: u32) {
        self.state.lock().pending.buttons.insert(code, ButtonState::Pressed);
    }

    fn release_button(&self, code: u32) {
        self.state.lock().pending.buttons.insert(code, ButtonState::Released);
    }

    fn press_axis(&self, code: u32, min: i8, max: i8, percent: u8) {
        let value = i32::from(min) * 100 + (i32::from(max) - i32::from(min)) * i32::from(percent);
        self.state.lock().pending.axes.insert(code, value);
    }

    fn release_axis(&self, code: u32) {
        self.state.lock().pending.axes.insert(code, 0);
    }

    fn set_input_pressed(&self, name: &str) {
        self.state.lock().pending.inputs.insert(name.to_string(), ButtonState::Pressed);
    }

    fn set_input_released(&self, name: &str) {
        self.state.lock().pending.inputs.insert(name.to_string(), ButtonState::Released);
    }

    fn button_state(&self, code: u32) -> ButtonState {
        self.state.lock().current.buttons.get(&code).copied().unwrap_or_default()
    }

    fn axis_state(&self, code: u32) -> i32 {
        self.state.lock().current.axes.get(&code).copied().unwrap_or(0)
    }

    fn input_state(&self, name: &str) -> ButtonState {
        self.state.lock().current.inputs.get(name).copied().unwrap_or_default()
    }

    fn update(&self) -> Result<(), ControllerError> {
        if !self.is_acquired() {
            return Err(ControllerError::NotAcquired(self.index));
        }
        let mut state = self.state.lock();
        let Tracker { pending, current } = &mut *state;
        current.inputs.extend(pending.inputs.drain());
        current.buttons.extend(pending.buttons.drain());
        current.axes.extend(pending.axes.drain());
        Ok(())
    }

    fn reset(&self) -> Result<(), ControllerError> {
        if !self.is_acquired() {
            return Err(ControllerError::NotAcquired(self.index));
        }
        let mut state = self.state.lock();
        state.pending = TrackedState::default();
        state.current = TrackedState::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::codes::*;
    use super::*;

    #[test]
    fn changes_commit_on_update() {
        let c = DummyController::new(0);
        c.acquire();
        c.press_button(BTN5);
        c.press_axis(AXIS_X, 0, -1, 50);
        assert_eq!(c.button_state(BTN5), ButtonState::Released);
        assert_eq!(c.axis_state(AXIS_X), 0);

        c.update().unwrap();
        assert_eq!(c.button_state(BTN5), ButtonState::Pressed);
        assert_eq!(c.axis_state(AXIS_X), -50);

        c.release_axis(AXIS_X);
        c.release_button(BTN5);
        c.update().unwrap();
        assert!(!c.any_asserted());
    }

    #[test]
    fn unacquired_update_fails() {
        let c = DummyController::new(3);
        c.press_button(BTN1);
        assert_eq!(c.update(), Err(ControllerError::NotAcquired(3)));
        assert_eq!(c.button_state(BTN1), ButtonState::Released);
    }

    #[test]
    fn manager_hands_out_acquired_dummies() {
        let m = ControllerManager::with_dummies(2);
        assert_eq!(m.count(), 2);
        assert!(m.get(1).is_some_and(|c| c.is_acquired() && c.index() == 1));
        assert!(m.get(2).is_none());
    }
}
