use crate::GameConsole;
use crate::controller::codes::*;

/// Nintendo 64. The C buttons are digital here.
pub fn get() -> GameConsole {
    GameConsole::new(
        "n64",
        vec![
            input!(axis "left" => AXIS_X, 0, -1),
            input!(axis "right" => AXIS_X, 0, 1),
            input!(axis "up" => AXIS_Y, 0, -1),
            input!(axis "down" => AXIS_Y, 0, 1),
            input!(button "a" => BTN5),
            input!(button "b" => BTN6),
            input!(button "l" => BTN7),
            input!(button "r" => BTN8),
            input!(button "z" => BTN9),
            input!(button "start" => BTN10),
            input!(button "cleft" => BTN11),
            input!(button "cright" => BTN12),
            input!(button "cup" => BTN13),
            input!(button "cdown" => BTN14),
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
            input!(blank "#"),
        ],
        Vec::new(),
    )
}
