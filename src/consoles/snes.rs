use crate::GameConsole;
use crate::controller::codes::*;

/// Super Nintendo. Fully digital; `.` is an extra wait token next to `#`.
pub fn get() -> GameConsole {
    GameConsole::new(
        "snes",
        vec![
            input!(button "left" => BTN1),
            input!(button "right" => BTN2),
            input!(button "up" => BTN3),
            input!(button "down" => BTN4),
            input!(button "a" => BTN5),
            input!(button "b" => BTN6),
            input!(button "l" => BTN7),
            input!(button "r" => BTN8),
            input!(button "select" => BTN9),
            input!(button "start" => BTN10),
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
            input!(blank "."),
        ],
        Vec::new(),
    )
}
