use super::{
    ParserOptions, ReverseParserOptions, ShowDurations, ShowPorts, expandify, parse, populate_macros,
    populate_synonyms, prepare, reverse_parse, reverse_parse_natural, validate_combos, validate_input_levels,
    validate_ports, validate_restricted,
};
use crate::controller::codes::*;
use crate::controller::{ControllerManager, DummyController, VirtualController};
use crate::store::{InputSynonym, MacroTable};
use crate::{
    GameConsole, InputData, InvalidCombo, ParseErrorKind, ParseStatus, ParsedInputSequence, ValidationError, consoles,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Arc;

fn run(text: &str, console: &GameConsole, options: &ParserOptions) -> ParsedInputSequence {
    let prepared = prepare(text, &MacroTable::new(), &[]);
    parse(&prepared, &console.tokenizer(), options)
}

fn run_default(text: &str, console: &GameConsole) -> ParsedInputSequence {
    run(text, console, &ParserOptions::default())
}

// --- Preprocessing -----------------------------------------------------------

#[test]
fn expandify_examples() {
    // Array of (input, expected)
    let cases: Vec<(&str, &str)> = vec![
        ("[a]*2", "aa"),
        ("[a3s#17ms]*2", "a3s#17msa3s#17ms"),
        ("r[#17msa+b]*2b", "r#17msa+b#17msa+bb"),
        ("[a#17ms[b]*3x]*2", "a#17msbbbxa#17msbbbx"),
        ("[a]*10", "aaaaaaaaaa"),
        ("[r #500ms b37ms #1s a80000ms -l+_right]*0", ""),
        ("[a100ms ]*3", "a100ms a100ms a100ms "),
        ("[a100ms]*1", "a100ms"),
        ("b[a100ms]*0b", "bb"),
        ("[a]*", "[a]*"),
        ("[a", "[a"),
    ];

    for (input, expected) in cases {
        assert_eq!(expandify(input), expected, "input: {input}");
    }
}

#[test]
fn macro_examples() {
    let macros: MacroTable = [
        ("#atwo", "aa"),
        ("#mash(*)", "[<0>34ms#34ms]*20"),
        ("#mashalt(*,*)", "[<0>34ms#34ms<1>34ms#34ms]*20"),
        ("#press(*,*)", "<0>ms _<1>"),
        ("#t", "b"),
        ("#test", "start"),
        ("#nest", "#t#t"),
    ]
    .into_iter()
    .collect();

    // Array of (input, expected)
    let cases: Vec<(&str, &str)> = vec![
        ("#atwo", "aa"),
        ("#mash(a)", "[a34ms#34ms]*20"),
        ("#mashalt(a,b)", "[a34ms#34msb34ms#34ms]*20"),
        ("#press(35,b)", "35ms _b"),
        ("#test", "start"),
        ("#testa", "starta"),
        ("#t", "b"),
        ("#tx", "bx"),
        ("a#atwo.#t", "aaa.b"),
        ("#nest", "bb"),
        ("#unknown", "#unknown"),
        ("#", "#"),
        ("#mash(a", "#mash(a"),
        ("#test(a)", "start"),
        ("#t(x,y)a", "ba"),
    ];

    for (input, expected) in cases {
        assert_eq!(populate_macros(input, &macros), expected, "input: {input}");
    }
}

#[test]
fn synonym_examples() {
    // Array of (synonym name, synonym value, input, expected)
    let cases: Vec<(&str, &str, &str, &str)> = vec![
        ("b", "q", "abr", "aqr"),
        ("ab", "ww", "abw", "www"),
        ("a", "triangle", "triangle", "tritrianglengle"),
        ("jump", "a", "b jump", "b a"),
    ];

    for (name, value, input, expected) in cases {
        let synonyms = [InputSynonym::new("gc", name, value)];
        assert_eq!(populate_synonyms(input, &synonyms), expected, "input: {input}");
    }
}

#[test]
fn prepare_runs_stages_in_order() {
    let macros: MacroTable = [("#mash(*)", "[<0>34ms#34ms]*2")].into_iter().collect();
    let synonyms = [InputSynonym::new("gc", "jump", "A")];
    assert_eq!(prepare(" #mash(jump)  B ", &macros, &synonyms), "a34ms#34msa34ms#34msb");
}

// --- Parsing -----------------------------------------------------------------

#[test]
fn total_duration_examples() {
    let snes = consoles::snes::get();

    // Array of (default duration, input, expected total)
    let cases: Vec<(u32, &str, u64)> = vec![
        (200, "a . b", 600),
        (300, "a . b", 900),
        (200, "_a500ms b200ms #1s -a1300ms", 3000),
        (200, "a1000ms+b1000ms", 1000),
        (200, "a1000ms b1000ms", 2000),
        (200, "a300ms+b", 300),
        (200, "a2s+b500ms", 2000),
    ];

    for (default_duration, input, expected) in cases {
        let options = ParserOptions { default_duration, ..Default::default() };
        let seq = run(input, &snes, &options);
        assert_eq!(seq.status, ParseStatus::Valid, "input: {input}");
        assert_eq!(seq.total_duration, expected, "input: {input}");
    }
}

#[test]
fn input_count_example() {
    let seq = run_default("a+b start+a+b+x+y . . b . . a", &consoles::snes::get());
    assert_eq!(seq.inputs().count(), 13);
    assert_eq!(seq.groups.len(), 8);
}

#[test]
fn status_examples() {
    let snes = consoles::snes::get();

    // Array of (input, expected status, expected error)
    let cases: Vec<(&str, ParseStatus, Option<ParseErrorKind>)> = vec![
        ("a100ms b200ms", ParseStatus::Valid, None),
        ("A100MS", ParseStatus::Valid, None),
        ("a100ms xyz b200ms", ParseStatus::NormalMessage, None),
        ("hello", ParseStatus::NormalMessage, None),
        ("a b what", ParseStatus::NormalMessage, None),
        ("", ParseStatus::NormalMessage, None),
        ("a100", ParseStatus::NormalMessage, None),
        ("a100ms+", ParseStatus::Invalid, Some(ParseErrorKind::PlusAtEnd)),
        ("a+b+", ParseStatus::Invalid, Some(ParseErrorKind::PlusAtEnd)),
        ("&0a", ParseStatus::Invalid, Some(ParseErrorKind::InvalidControllerPort)),
        ("a101%", ParseStatus::Invalid, Some(ParseErrorKind::InvalidPercentage)),
        ("a61s", ParseStatus::Invalid, Some(ParseErrorKind::MaxDuration)),
    ];

    for (input, status, error) in cases {
        let seq = run_default(input, &snes);
        assert_eq!(seq.status, status, "input: {input}");
        assert_eq!(seq.error.map(|e| e.kind), error, "input: {input}");
    }
}

#[test]
fn max_duration_counts_groups_not_members() {
    let snes = consoles::snes::get();
    let options = ParserOptions { default_duration: 300, max_duration: Some(500), ..Default::default() };

    let seq = run("a+b+x", &snes, &options);
    assert!(seq.is_valid());
    assert_eq!(seq.total_duration, 300);

    let seq = run("a+b+x y", &snes, &options);
    assert_eq!(seq.status, ParseStatus::Invalid);
    assert_eq!(seq.error.map(|e| e.kind), Some(ParseErrorKind::MaxDuration));
}

#[test]
fn longest_input_name_wins() {
    let console = GameConsole::new("t", vec![InputData::button("s", BTN1), InputData::button("ss1", BTN2)], vec![]);
    let seq = run_default("ss1200ms", &console);
    assert!(seq.is_valid());
    assert_eq!(seq.inputs().map(|i| (i.name.as_str(), i.duration)).collect::<Vec<_>>(), vec![("ss1", 200)]);
}

// --- Reverse parsing ---------------------------------------------------------

#[test]
fn reverse_canonical_examples() {
    let gc = consoles::gc::get();
    let all_ports = ReverseParserOptions { show_ports: ShowPorts::All, ..Default::default() };
    let non_default_ports = ReverseParserOptions { show_ports: ShowPorts::NonDefault, ..Default::default() };
    let non_default_durations =
        ReverseParserOptions { show_durations: ShowDurations::NonDefault, ..Default::default() };

    // Array of (options, input, expected)
    let cases: Vec<(ReverseParserOptions, &str, &str)> = vec![
        (ReverseParserOptions::default(), "_a500ms+b 1s", "_a500ms+b1s"),
        (ReverseParserOptions::default(), "left", "left100%200ms"),
        (ReverseParserOptions::default(), "l", "l200ms"),
        (ReverseParserOptions::default(), "l40%", "l40%200ms"),
        (ReverseParserOptions::default(), "#", "#200ms"),
        (non_default_durations, "a b300ms #", "a b300ms #200ms"),
        (non_default_ports, "&2a a", "&2a200ms a200ms"),
        (all_ports, "a #", "&1a200ms #200ms"),
    ];

    for (options, input, expected) in cases {
        let seq = run_default(input, &gc);
        assert_eq!(reverse_parse(&seq, &gc, &options), expected, "input: {input}");
    }
}

#[test]
fn reverse_natural_examples() {
    let gc = consoles::gc::get();
    let ports = ReverseParserOptions { show_ports: ShowPorts::NonDefault, ..Default::default() };

    // Array of (input, expected)
    let cases: Vec<(&str, &str)> = vec![
        ("_a500ms+b 1s", "Hold \"a\" 500 msecs AND press \"b\" 1 sec."),
        ("left50% #1s -a", "Press \"left\" 50% 200 msecs, THEN wait 1 sec, THEN release \"a\" 200 msecs."),
        ("&2start", "Press \"start\" 200 msecs on port 2."),
        ("#1ms", "Wait 1 msec."),
    ];

    for (input, expected) in cases {
        let seq = run_default(input, &gc);
        assert_eq!(reverse_parse_natural(&seq, &gc, &ports), expected, "input: {input}");
    }
}

#[test]
fn reverse_of_non_valid_is_sentinel() {
    let gc = consoles::gc::get();
    let options = ReverseParserOptions::default();
    for input in ["a+", "hello there"] {
        let seq = run_default(input, &gc);
        assert_eq!(reverse_parse(&seq, &gc, &options), "");
        assert_eq!(reverse_parse_natural(&seq, &gc, &options), "Invalid input!");
    }
}

// --- Validation --------------------------------------------------------------

#[test]
fn combo_examples() {
    let gc = consoles::gc::get();
    let controllers = ControllerManager::with_dummies(2);

    // Array of (input, expect rejection)
    let cases: Vec<(&str, bool)> = vec![
        ("x+y+start", true),
        ("x y start", false),
        ("_x _y start", true),
        ("_x -x _y start", false),
        ("_x+_y start", true),
        ("_x+y start", false),
        ("&2_x _y start", false),
        ("x+y+-start", false),
        ("x+x+y", false),
    ];

    for (input, rejected) in cases {
        let seq = run_default(input, &gc);
        assert!(seq.is_valid(), "input: {input}");
        let result = validate_combos(&seq, gc.invalid_combos(), &controllers, &gc);
        assert_eq!(result.is_err(), rejected, "input: {input}");
    }
}

#[test]
fn combo_message_lists_members() {
    let gc = consoles::gc::get();
    let seq = run_default("x+y+start", &gc);
    let err = validate_combos(&seq, gc.invalid_combos(), &ControllerManager::with_dummies(1), &gc).unwrap_err();
    assert_eq!(err.to_string(), "Inputs (\"x\", \"y\", \"start\") are not allowed to be pressed at the same time.");
}

#[test]
fn combo_counts_inputs_already_held() {
    let console = GameConsole::new(
        "pair",
        vec![InputData::button("a", BTN1), InputData::button("b", BTN2)],
        vec![InvalidCombo::new(["a", "b"])],
    );
    let dummy = Arc::new(DummyController::new(0));
    dummy.acquire();
    let controllers = ControllerManager::new(vec![Arc::clone(&dummy) as Arc<dyn VirtualController>]);
    let check = |text: &str| {
        validate_combos(&run_default(text, &console), console.invalid_combos(), &controllers, &console)
    };

    assert!(check("_a b").is_err());
    assert!(check("_a -a b").is_ok());
    assert!(check("b").is_ok());

    dummy.press_button(BTN1);
    dummy.update().unwrap();
    assert!(check("b").is_err());
    assert!(check("-a b").is_ok());
}

#[test]
fn restricted_inputs_are_refused() {
    let gc = consoles::gc::get();
    let restricted: HashSet<String> = ["start".to_string()].into_iter().collect();

    assert_eq!(validate_restricted(&run_default("a b", &gc), &restricted), Ok(()));
    let err = validate_restricted(&run_default("a start", &gc), &restricted).unwrap_err();
    assert_eq!(err, ValidationError::RestrictedInput("start".into()));
    assert_eq!(err.to_string(), "No permission to use input \"start\".");
}

#[test]
fn ports_must_exist_and_be_acquired() {
    let gc = consoles::gc::get();
    let first = DummyController::new(0);
    first.acquire();
    let controllers: Vec<Arc<dyn VirtualController>> = vec![Arc::new(first), Arc::new(DummyController::new(1))];
    let controllers = ControllerManager::new(controllers);

    assert_eq!(validate_ports(&run_default("a", &gc), &controllers), Ok(()));
    assert_eq!(
        validate_ports(&run_default("&2a", &gc), &controllers),
        Err(ValidationError::PortNotAcquired { port: 1 })
    );
    assert_eq!(
        validate_ports(&run_default("a &3a", &gc), &controllers),
        Err(ValidationError::InvalidPort { port: 2, count: 2 })
    );
}

#[test]
fn input_levels_gate_users() {
    let mut gc = consoles::gc::get();
    gc.add_input(InputData::button("start", BTN10).with_level(5));
    let seq = run_default("a start", &gc);

    assert_eq!(validate_input_levels(&seq, 5, &gc), Ok(()));
    let err = validate_input_levels(&seq, 1, &gc).unwrap_err();
    assert_eq!(err.to_string(), "No permission to use input \"start\", which requires at least level 5.");
}
