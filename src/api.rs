use crate::engine::{self, ParserOptions, RunMetrics, Tokenizer};
use crate::store::{InputSynonym, MacroStore, synonyms_for};
use crate::{GameConsole, ParsedInputSequence};
use std::time::Instant;

pub use crate::engine::{
    reverse_parse, reverse_parse_natural, validate_combos, validate_input_levels, validate_ports, validate_restricted,
};

/// Result from [`parse_message_verbose`].
#[derive(Debug, Clone)]
pub struct ParseRun {
    /// The message after preprocessing, as the parser saw it.
    pub prepared: String,
    pub sequence: ParsedInputSequence,
    pub metrics: RunMetrics,
}

/// Rewrites a raw message into parser-ready text.
///
/// `synonyms` are applied as given; scope them to the console first (see
/// [`synonyms_for`](crate::store::synonyms_for)).
pub fn preprocess(text: &str, macros: &dyn MacroStore, synonyms: &[InputSynonym]) -> String {
    engine::prepare(text, macros, synonyms)
}

/// Parses text that has already been preprocessed.
pub fn parse(text: &str, tokenizer: &Tokenizer, options: &ParserOptions) -> ParsedInputSequence {
    engine::parse(text, tokenizer, options)
}

/// Preprocesses and parses a chat message for `console`.
///
/// Only synonyms scoped to `console` are applied.
pub fn parse_message(
    text: &str,
    console: &GameConsole,
    macros: &dyn MacroStore,
    synonyms: &[InputSynonym],
    options: &ParserOptions,
) -> ParsedInputSequence {
    let scoped: Vec<InputSynonym> = synonyms_for(synonyms, console.name()).cloned().collect();
    let prepared = engine::prepare(text, macros, &scoped);
    engine::parse(&prepared, &console.tokenizer(), options)
}

/// Like [`parse_message`], also returning the prepared text and timings.
pub fn parse_message_verbose(
    text: &str,
    console: &GameConsole,
    macros: &dyn MacroStore,
    synonyms: &[InputSynonym],
    options: &ParserOptions,
) -> ParseRun {
    let start = Instant::now();
    let scoped: Vec<InputSynonym> = synonyms_for(synonyms, console.name()).cloned().collect();
    let (prepared, preprocess) = engine::prepare_with_metrics(text, macros, &scoped);

    let parse_start = Instant::now();
    let tokenizer = console.tokenizer();
    let (sequence, tokens) = engine::parse_counted(&prepared, &tokenizer, options);
    let parse = parse_start.elapsed();

    ParseRun { prepared, sequence, metrics: RunMetrics { total: start.elapsed(), preprocess, parse, tokens } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerManager;
    use crate::controller::codes::*;
    use crate::store::MacroTable;
    use crate::{InputData, ParseStatus, ParsedInput, ReverseParserOptions, ShowPorts, consoles};
    use pretty_assertions::assert_eq;

    fn run(text: &str, console: &GameConsole) -> ParsedInputSequence {
        parse_message(text, console, &MacroTable::new(), &[], &ParserOptions::default())
    }

    #[test]
    fn end_to_end_button_then_axis() {
        let console = GameConsole::new(
            "mini",
            vec![InputData::button("a", BTN1), InputData::axis("left", AXIS_X, 0, -1)],
            Vec::new(),
        );
        let seq = run("a300ms left50%500ms", &console);

        assert_eq!(seq.status, ParseStatus::Valid);
        assert_eq!(seq.total_duration, 800);
        assert_eq!(seq.groups.len(), 2);
        assert_eq!(seq.groups[0].inputs, vec![ParsedInput::new("a", 300, 0)]);
        let left = &seq.groups[1].inputs[0];
        assert_eq!((left.name.as_str(), left.percent, left.duration), ("left", 50, 500));
        assert!(console.is_axis(left));
    }

    #[test]
    fn synonyms_apply_only_to_their_console() {
        let gc = consoles::gc::get();
        let synonyms = vec![
            crate::store::InputSynonym::new("gc", "jump", "a"),
            crate::store::InputSynonym::new("snes", "jump", "b"),
        ];
        let seq = parse_message("jump", &gc, &MacroTable::new(), &synonyms, &ParserOptions::default());
        assert_eq!(seq.groups[0].inputs[0].name, "a");
    }

    #[test]
    fn verbose_run_reports_prepared_text() {
        let gc = consoles::gc::get();
        let macros: MacroTable = [("#jump", "a b")].into_iter().collect();
        let run = parse_message_verbose("#jump [r]*2", &gc, &macros, &[], &ParserOptions::default());

        assert_eq!(run.prepared, "abrr");
        assert!(run.sequence.is_valid());
        assert_eq!(run.metrics.tokens, 4);
        assert_eq!(run.metrics.preprocess.macro_substitutions, 1);
        assert_eq!(run.metrics.preprocess.expansions, 1);
    }

    #[test]
    fn canonical_reverse_round_trips() {
        let gc = consoles::gc::get();
        let options = ParserOptions::default();
        let reverse = ReverseParserOptions { show_ports: ShowPorts::All, ..Default::default() };
        for text in ["_a500ms+b 1s #300ms -a", "&2left30%+r 2s", "l99% l start+x"] {
            let seq = run(text, &gc);
            assert!(seq.is_valid(), "{text}");
            let reversed = reverse_parse(&seq, &gc, &reverse);
            let prepared = preprocess(&reversed, &MacroTable::new(), &[]);
            let again = parse(&prepared, &gc.tokenizer(), &options);
            assert_eq!(again, seq, "{text} -> {reversed}");
        }
    }

    #[test]
    fn validators_run_on_parsed_output() {
        let gc = consoles::gc::get();
        let controllers = ControllerManager::with_dummies(1);

        let seq = run("x+y+start", &gc);
        assert!(validate_combos(&seq, gc.invalid_combos(), &controllers, &gc).is_err());

        let seq = run("&2a", &gc);
        assert!(validate_ports(&seq, &controllers).is_err());
    }
}
