//! Text preprocessing.
//!
//! Rewrites a raw chat message into the canonical text the parser expects.
//! Stages run in a fixed order:
//!
//! ```text
//! raw ── strip whitespace ── macros (≤ 10 passes) ── synonyms ── [..]*N ── strip + lowercase
//! ```
//!
//! Preprocessing never fails. Text it cannot expand is passed on as-is and
//! the parser decides whether the result is an input.
//!
//! ## Macros
//!
//! A macro call is `#name` optionally followed by `(arg,arg,..)`. Calls with
//! `n` arguments look up the dynamic macro `#name(*,..,*)` with `n` stars and
//! substitute `<0>`, `<1>`, .. in its body. The longest registered name that
//! prefixes a call wins, so `#testa` expands `#test` followed by a literal `a`.
//! An argument list with no closing `)` leaves the message untouched. A call
//! with arguments but no dynamic match falls back to the longest plain macro,
//! which still consumes the whole `(..)`.
//!
//! Every pass is checked against [`MAX_EXPANDED_LEN`] before it is applied, so
//! self-multiplying macros stop at the last pass that fits.

use super::metrics::PreprocessMetrics;
use super::trigger::PrepMask;
use crate::store::{InputSynonym, MacroStore};
use std::time::Instant;

/// Macro passes per message. Bounds self-referencing macros.
pub const MAX_MACRO_PASSES: usize = 10;

/// Largest message macro or repetition expansion may produce, in bytes.
pub const MAX_EXPANDED_LEN: usize = 65_536;

pub fn remove_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

// --- Macros ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct MacroSub {
    name: String,
    start: usize,
    end: usize,
    args: Vec<String>,
}

pub fn populate_macros(text: &str, macros: &dyn MacroStore) -> String {
    populate_macros_counted(text, macros, &mut PreprocessMetrics::default())
}

fn populate_macros_counted(text: &str, macros: &dyn MacroStore, metrics: &mut PreprocessMetrics) -> String {
    let mut message = text.to_string();

    for _ in 0..MAX_MACRO_PASSES {
        let Some(subs) = find_macro_calls(&message, macros) else {
            log::debug!("macros: unterminated argument list in {text:?}");
            return text.to_string();
        };
        if subs.is_empty() {
            break;
        }

        let mut bodies = Vec::with_capacity(subs.len());
        for sub in &subs {
            let Some(found) = macros.get(&sub.name) else {
                log::warn!("macros: {:?} disappeared during expansion", sub.name);
                return text.to_string();
            };
            bodies.push(substitute_args(&found.value, &sub.args));
        }

        let replaced: usize = subs.iter().map(|sub| sub.end - sub.start).sum();
        let new_len = message.len() - replaced + bodies.iter().map(String::len).sum::<usize>();
        if new_len > MAX_EXPANDED_LEN {
            log::debug!("macros: {new_len} bytes would exceed the {MAX_EXPANDED_LEN} byte cap");
            metrics.capped = true;
            break;
        }

        let mut out = String::with_capacity(new_len);
        let mut prev_end = 0;
        for (sub, body) in subs.iter().zip(&bodies) {
            out.push_str(&message[prev_end..sub.start]);
            out.push_str(body);
            prev_end = sub.end;
        }
        out.push_str(&message[prev_end..]);

        metrics.macro_passes += 1;
        metrics.macro_substitutions += subs.len();
        log::debug!("macros: pass {} replaced {} call(s)", metrics.macro_passes, subs.len());
        message = out;
    }

    message
}

/// Macro calls in `message`, left to right. `None` aborts expansion.
fn find_macro_calls(message: &str, macros: &dyn MacroStore) -> Option<Vec<MacroSub>> {
    let candidates = regex!(r"#[a-zA-Z0-9(,.+_\-&%!]*");
    let mut subs = Vec::new();

    for cand in candidates.find_iter(message) {
        let text = cand.as_str().to_ascii_lowercase();

        let (plain, args) = match text.find('(') {
            Some(paren) => {
                if message.as_bytes().get(cand.end()) != Some(&b')') {
                    return None;
                }
                let args: Vec<String> = text[paren + 1..].split(',').map(str::to_string).collect();
                (text[..paren].to_string(), Some(args))
            }
            None => (text, None),
        };

        // A lone '#' is a blank input, not a macro.
        if plain.len() < 2 {
            continue;
        }
        let known = macros.macros_with_prefix(&plain[..2]);

        if let Some(args) = &args {
            let generic = format!("{plain}({})", vec!["*"; args.len()].join(","));
            if known.iter().any(|m| m.name == generic) {
                subs.push(MacroSub { name: generic, start: cand.start(), end: cand.end() + 1, args: args.clone() });
                continue;
            }
        }

        let longest = known
            .iter()
            .filter(|m| !m.is_dynamic() && plain.starts_with(m.name.as_str()))
            .max_by_key(|m| m.name.len());
        if let Some(m) = longest {
            // A call with arguments consumes its whole `(..)` span.
            let (end, args) = match args {
                Some(args) => (cand.end() + 1, args),
                None => (cand.start() + m.name.len(), Vec::new()),
            };
            subs.push(MacroSub { name: m.name.clone(), start: cand.start(), end, args });
        }
    }

    Some(subs)
}

fn substitute_args(body: &str, args: &[String]) -> String {
    let mut out = body.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("<{i}>"), arg);
    }
    out
}

// --- Synonyms ----------------------------------------------------------------

/// Literal replacement of each synonym, in order.
pub fn populate_synonyms<'a>(text: &str, synonyms: impl IntoIterator<Item = &'a InputSynonym>) -> String {
    let mut message = text.to_string();
    for synonym in synonyms {
        if synonym.name.is_empty() {
            continue;
        }
        message = message.replace(&synonym.name, &synonym.value);
    }
    message
}

// --- Repetition --------------------------------------------------------------

/// Expands `[seq]*N` groups innermost first until none remain.
pub fn expandify(text: &str) -> String {
    expandify_counted(text, &mut PreprocessMetrics::default())
}

fn expandify_counted(text: &str, metrics: &mut PreprocessMetrics) -> String {
    let group = regex!(r"\[([^\[\]]*)\]\*(\d{1,3})");
    let mut message = text.to_string();

    while let Some(caps) = group.captures(&message) {
        let (Some(whole), Some(body), Some(count)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            break;
        };
        let count: usize = count.as_str().parse().unwrap_or(0);
        let body = body.as_str();

        let new_len = message.len() - whole.len() + body.len() * count;
        if new_len > MAX_EXPANDED_LEN {
            log::debug!("expand: {new_len} bytes would exceed the {MAX_EXPANDED_LEN} byte cap");
            metrics.capped = true;
            break;
        }

        let mut next = String::with_capacity(new_len);
        next.push_str(&message[..whole.start()]);
        next.push_str(&body.repeat(count));
        next.push_str(&message[whole.end()..]);
        message = next;
        metrics.expansions += 1;
    }

    message
}

// --- Pipeline ----------------------------------------------------------------

pub fn prepare(text: &str, macros: &dyn MacroStore, synonyms: &[InputSynonym]) -> String {
    prepare_with_metrics(text, macros, synonyms).0
}

pub fn prepare_with_metrics(
    text: &str,
    macros: &dyn MacroStore,
    synonyms: &[InputSynonym],
) -> (String, PreprocessMetrics) {
    let start = Instant::now();
    let mut metrics = PreprocessMetrics::default();
    let mask = PrepMask::scan(text);

    let mut message =
        if mask.contains(PrepMask::HAS_WHITESPACE) { remove_whitespace(text) } else { text.to_string() };

    if mask.contains(PrepMask::HAS_MACRO) {
        let t = Instant::now();
        message = populate_macros_counted(&message, macros, &mut metrics);
        metrics.macros = t.elapsed();
    }

    if !synonyms.is_empty() {
        let t = Instant::now();
        message = populate_synonyms(&message, synonyms);
        metrics.synonyms = t.elapsed();
    }

    if PrepMask::scan(&message).contains(PrepMask::HAS_REPEAT) {
        let t = Instant::now();
        message = expandify_counted(&message, &mut metrics);
        metrics.expand = t.elapsed();
    }

    let message = remove_whitespace(&message).to_lowercase();
    metrics.total = start.elapsed();
    (message, metrics)
}
