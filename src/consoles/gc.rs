use crate::controller::codes::*;
use crate::{GameConsole, InvalidCombo};

/// Nintendo GameCube.
///
/// `l` and `r` are analog triggers up to 99% and click their digital button
/// at 100%. Pressing `x`, `y` and `start` together resets the console, so that
/// combo is refused.
pub fn get() -> GameConsole {
    GameConsole::new(
        "gc",
        vec![
            input!(axis "left" => AXIS_X, 0, -1),
            input!(axis "right" => AXIS_X, 0, 1),
            input!(axis "up" => AXIS_Y, 0, -1),
            input!(axis "down" => AXIS_Y, 0, 1),
            input!(axis "cleft" => AXIS_RX, 0, -1),
            input!(axis "cright" => AXIS_RX, 0, 1),
            input!(axis "cup" => AXIS_RY, 0, -1),
            input!(axis "cdown" => AXIS_RY, 0, 1),
            input!(shared "l" => BTN7, AXIS_RZ, 0, 1, 99),
            input!(shared "r" => BTN8, AXIS_Z, 0, 1, 99),
            input!(button "a" => BTN5),
            input!(button "b" => BTN6),
            input!(button "z" => BTN9),
            input!(button "start" => BTN10),
            input!(button "dleft" => BTN15),
            input!(button "dright" => BTN16),
            input!(button "dup" => BTN17),
            input!(button "ddown" => BTN18),
            input!(button "ss1" => BTN19),
            input!(button "ss2" => BTN20),
            input!(button "ss3" => BTN21),
            input!(button "ss4" => BTN22),
            input!(button "ss5" => BTN23),
            input!(button "ss6" => BTN24),
            input!(button "ls1" => BTN25),
            input!(button "ls2" => BTN26),
            input!(button "ls3" => BTN27),
            input!(button "ls4" => BTN28),
            input!(button "ls5" => BTN29),
            input!(button "ls6" => BTN30),
            input!(button "x" => BTN31),
            input!(button "y" => BTN32),
            input!(blank "#"),
        ],
        vec![InvalidCombo::new(["x", "y", "start"])],
    )
}
