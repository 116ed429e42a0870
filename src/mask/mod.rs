mod format;
mod model;
mod parser;

use crate::core::char_class::CharClass;
use crate::error::ConfigError;
use indexmap::IndexMap;
use std::ops::Range;
use tracing::trace;

pub use format::{display_to_raw, extract_raw, raw_to_display, render};
pub use model::{Edit, EditOutcome, FormatterState, MaskTemplate, MaskToken};
pub use parser::DIGIT_PLACEHOLDER;

impl MaskTemplate {
    /// Parses a mask where `#` is a digit placeholder and every other char
    /// is a literal.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoPlaceholders`] when the mask has no `#`.
    pub fn parse(mask: &str) -> Result<Self, ConfigError> {
        parser::parse_mask(mask, &parser::digit_placeholders())
    }

    /// Parses a mask with a caller-supplied placeholder table.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoPlaceholders`] when no char of the mask is in
    /// `placeholders`.
    pub fn parse_with(
        mask: &str,
        placeholders: &IndexMap<char, CharClass>,
    ) -> Result<Self, ConfigError> {
        parser::parse_mask(mask, placeholders)
    }

    /// `len` digit placeholders and no literals.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoPlaceholders`] when `len` is zero.
    pub fn digits(len: usize) -> Result<Self, ConfigError> {
        Self::parse(DIGIT_PLACEHOLDER.to_string().repeat(len).as_str())
    }
}

/// Applies `edit` to `state` and re-renders. Never fails: chars that do not
/// fit their placeholder, or that arrive once the template is full, are
/// dropped.
pub fn apply(template: &MaskTemplate, state: &FormatterState, edit: &Edit) -> EditOutcome {
    let classes: Vec<&CharClass> = template.placeholders().collect();
    let raw: Vec<char> = state.raw.chars().collect();

    let (raw, caret) = match edit {
        Edit::Insert { text, at } => insert(&classes, &raw, *at, text),
        Edit::Delete { range } => delete(&raw, range.clone(), state.caret),
        Edit::Backspace { at } => {
            let at = (*at).min(raw.len());
            delete(&raw, at.saturating_sub(1)..at, state.caret)
        }
        Edit::SetRaw { text } => {
            let mut out = Vec::with_capacity(classes.len());
            fit(&classes, &mut out, text.chars(), classes.len());
            let caret = out.len();
            (out, caret)
        }
    };

    let raw: String = raw.into_iter().collect();
    let display = render(template, raw.as_str());
    let caret_in_display = raw_to_display(template, caret);
    EditOutcome {
        state: FormatterState { raw, caret },
        display,
        caret_in_display,
    }
}

fn insert(classes: &[&CharClass], raw: &[char], at: usize, text: &str) -> (Vec<char>, usize) {
    let at = at.min(raw.len());
    let mut out = Vec::with_capacity(classes.len());
    fit(classes, &mut out, raw[..at].iter().copied(), classes.len());

    let room = classes.len().saturating_sub(raw.len());
    let limit = (out.len() + room).min(classes.len());
    fit(classes, &mut out, text.chars(), limit);
    let caret = out.len();

    fit(classes, &mut out, raw[at..].iter().copied(), classes.len());
    (out, caret)
}

/// Removes exactly `range`. The tail shifts left unchanged; a char that
/// lands on a placeholder it does not match stays and fails validation.
fn delete(raw: &[char], range: Range<usize>, caret: usize) -> (Vec<char>, usize) {
    let end = range.end.min(raw.len());
    let start = range.start.min(end);
    if start == end {
        return (raw.to_vec(), caret.min(raw.len()));
    }

    let mut out = Vec::with_capacity(raw.len() - (end - start));
    out.extend_from_slice(&raw[..start]);
    out.extend_from_slice(&raw[end..]);
    (out, start)
}

/// Appends each char that matches the placeholder at its landing position,
/// stopping once `out` reaches `limit`.
fn fit(
    classes: &[&CharClass],
    out: &mut Vec<char>,
    chars: impl Iterator<Item = char>,
    limit: usize,
) {
    for ch in chars {
        if out.len() >= limit {
            trace!(ch = ?ch, limit, "mask full, dropping char");
            break;
        }
        let class = classes[out.len()];
        if class.matches(ch) {
            out.push(ch);
        } else {
            trace!(ch = ?ch, class = class.name(), "char rejected by placeholder");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Edit, FormatterState, MaskTemplate, apply};
    use crate::core::char_class::CharClass;
    use indexmap::IndexMap;
    use tracing_test::traced_test;

    fn ssn() -> MaskTemplate {
        MaskTemplate::parse("###-##-####").expect("mask")
    }

    #[test]
    fn mask_without_placeholders_is_rejected() {
        assert!(MaskTemplate::parse("---").is_err());
        assert!(MaskTemplate::parse("").is_err());
        assert!(MaskTemplate::digits(0).is_err());
    }

    #[test]
    fn typing_fills_placeholders_and_skips_literals() {
        let template = ssn();
        let mut state = FormatterState::default();
        let mut display = String::new();
        for ch in "123456789".chars() {
            let out = apply(&template, &state, &Edit::insert(ch.to_string(), state.caret));
            state = out.state;
            display = out.display;
        }
        assert_eq!(state.raw, "123456789");
        assert_eq!(display, "123-45-6789");
        assert_eq!(state.caret, 9);
    }

    #[test]
    fn non_matching_chars_are_dropped() {
        let out = apply(&ssn(), &FormatterState::default(), &Edit::insert("1a-2 3", 0));
        assert_eq!(out.state.raw, "123");
        assert_eq!(out.display, "123-");
        assert_eq!(out.caret_in_display, 4);
    }

    #[test]
    fn paste_truncates_at_capacity() {
        let out = apply(&ssn(), &FormatterState::default(), &Edit::insert("1234567890123", 0));
        assert_eq!(out.state.raw, "123456789");
        assert_eq!(out.state.caret, 9);
    }

    #[test]
    fn insert_into_full_value_is_discarded() {
        let state = FormatterState::at_end("123456789");
        let out = apply(&ssn(), &state, &Edit::insert("0", 2));
        assert_eq!(out.state.raw, "123456789");
        assert_eq!(out.state.caret, 2);
    }

    #[test]
    fn insert_in_middle_shifts_tail() {
        let state = FormatterState::at_end("1245");
        let out = apply(&ssn(), &state, &Edit::insert("3", 2));
        assert_eq!(out.state.raw, "12345");
        assert_eq!(out.display, "123-45-");
        assert_eq!(out.state.caret, 3);
        assert_eq!(out.caret_in_display, 4);
    }

    #[test]
    fn empty_delete_is_noop() {
        let state = FormatterState::new("1234", 2);
        let out = apply(&ssn(), &state, &Edit::delete(3..3));
        assert_eq!(out.state, state);
    }

    #[test]
    fn delete_range_removes_exactly_those_chars() {
        let state = FormatterState::at_end("123456789");
        let out = apply(&ssn(), &state, &Edit::delete(2..5));
        assert_eq!(out.state.raw, "126789");
        assert_eq!(out.display, "126-78-9");
        assert_eq!(out.state.caret, 2);
    }

    #[test]
    fn backspace_after_literal_removes_one_raw_char() {
        let state = FormatterState::at_end("123");
        let out = apply(&ssn(), &state, &Edit::backspace(3));
        assert_eq!(out.state.raw, "12");
        assert_eq!(out.display, "12");
        assert_eq!(out.caret_in_display, 2);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let state = FormatterState::new("123", 0);
        let out = apply(&ssn(), &state, &Edit::backspace(0));
        assert_eq!(out.state.raw, "123");
        assert_eq!(out.state.caret, 0);
    }

    #[test]
    fn set_raw_fits_formatted_paste() {
        let out = apply(&ssn(), &FormatterState::default(), &Edit::set_raw("123-45-6789"));
        assert_eq!(out.state.raw, "123456789");
        assert_eq!(out.display, "123-45-6789");
    }

    fn plate() -> MaskTemplate {
        let mut table = IndexMap::new();
        table.insert('#', CharClass::digit());
        table.insert('A', CharClass::letter());
        MaskTemplate::parse_with("AA-##", &table).expect("mask")
    }

    #[test]
    fn mixed_classes_keep_tail_after_delete() {
        let template = plate();
        let out = apply(&template, &FormatterState::default(), &Edit::set_raw("ab12"));
        assert_eq!(out.display, "ab-12");

        let out = apply(&template, &out.state, &Edit::delete(0..1));
        assert_eq!(out.state.raw, "b12");
        assert_eq!(out.display, "b1-2");
        assert_eq!(out.state.caret, 0);
    }

    #[test]
    fn mixed_classes_backspace_removes_one_char() {
        let template = plate();
        let state = FormatterState::at_end("ab12");
        let out = apply(&template, &state, &Edit::backspace(2));
        assert_eq!(out.state.raw, "a12");
        assert_eq!(out.state.caret, 1);
        assert_eq!(out.caret_in_display, 1);
    }

    #[traced_test]
    #[test]
    fn rejected_and_overflowing_chars_are_logged() {
        let template = MaskTemplate::digits(2).expect("mask");
        let out = apply(&template, &FormatterState::default(), &Edit::insert("1x23", 0));
        assert_eq!(out.state.raw, "12");
        assert!(logs_contain("char rejected by placeholder"));
        assert!(logs_contain("mask full, dropping char"));
    }
}
