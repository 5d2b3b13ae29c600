//! Built-in console profiles.
//!
//! Each submodule exposes `get() -> GameConsole` returning a fresh, mutable
//! profile. Hosts that keep their input tables elsewhere build a
//! [`GameConsole`] directly instead.

use crate::GameConsole;

pub mod gc;
pub mod n64;
pub mod snes;

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["gc", "n64", "snes"];

/// Looks up a built-in profile by case-insensitive name.
pub fn by_name(name: &str) -> Option<GameConsole> {
    match name.to_ascii_lowercase().as_str() {
        "gc" => Some(gc::get()),
        "n64" => Some(n64::get()),
        "snes" => Some(snes::get()),
        _ => None,
    }
}
