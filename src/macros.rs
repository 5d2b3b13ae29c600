/// A `&'static Regex` compiled once, on first use.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

/// Console table entries.
///
/// ```ignore
/// input!(blank "#")
/// input!(button "a" => BTN5)
/// input!(axis "left" => AXIS_X, 0, -1)
/// input!(shared "l" => BTN7, AXIS_RZ, 0, 1, 99)
/// ```
#[macro_export]
macro_rules! input {
    (blank $name:literal) => {
        $crate::InputData::blank($name)
    };
    (button $name:literal => $button:expr) => {
        $crate::InputData::button($name, $button)
    };
    (axis $name:literal => $axis:expr, $min:expr, $max:expr) => {
        $crate::InputData::axis($name, $axis, $min, $max)
    };
    (shared $name:literal => $button:expr, $axis:expr, $min:expr, $max:expr, $max_percent:expr) => {
        $crate::InputData::shared($name, $button, $axis, $min, $max, $max_percent)
    };
}
