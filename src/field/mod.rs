//! Display-space adapter around a [`Formatter`].
//!
//! A presentation layer reports carets and selections in display offsets;
//! [`MaskedField`] maps them into raw space, runs the formatter and keeps
//! the latest outcome around for rendering.

pub mod secure;

use crate::core::text_edit;
use crate::core::validation::ValidationResult;
use crate::formatters::{FormatOutcome, Formatter};
use crate::mask::{Edit, FormatterState};
use secure::{SecureEntry, SecureEntryMode};
use std::borrow::Cow;
use std::ops::Range;
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    Char(char),
    Paste(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    ToggleSecure,
}

#[derive(Debug, Clone)]
pub struct MaskedField {
    formatter: Arc<Formatter>,
    outcome: FormatOutcome,
    selection: Option<Range<usize>>,
    secure: SecureEntry,
}

impl MaskedField {
    pub fn new(formatter: Arc<Formatter>) -> Self {
        let outcome = formatter.outcome(FormatterState::default());
        Self {
            formatter,
            outcome,
            selection: None,
            secure: SecureEntry::default(),
        }
    }

    #[must_use]
    pub fn with_secure_entry(mut self, mode: SecureEntryMode) -> Self {
        self.secure = SecureEntry::new(mode);
        self
    }

    #[must_use]
    pub fn with_default(mut self, raw: impl Into<String>) -> Self {
        self.set_raw(raw);
        self
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn state(&self) -> &FormatterState {
        &self.outcome.state
    }

    pub fn raw(&self) -> &str {
        self.outcome.state.raw.as_str()
    }

    /// True display value, never obscured.
    pub fn display(&self) -> &str {
        self.outcome.display.as_str()
    }

    pub fn caret(&self) -> usize {
        self.outcome.caret_in_display
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.outcome.validation
    }

    pub fn outcome(&self) -> &FormatOutcome {
        &self.outcome
    }

    pub fn secure_entry(&self) -> &SecureEntry {
        &self.secure
    }

    /// Display with secure-entry obscuring applied.
    pub fn rendered(&self) -> Cow<'_, str> {
        self.secure.obscure(self.display())
    }

    /// Terminal column of the caret within [`MaskedField::rendered`].
    pub fn cursor_col(&self) -> usize {
        let rendered = self.rendered();
        let (before, _) = text_edit::split_at_char(rendered.as_ref(), self.caret());
        UnicodeWidthStr::width(before)
    }

    /// Selects a display-space range; the next insert or delete replaces it.
    pub fn select(&mut self, range: Range<usize>) {
        let len = text_edit::char_count(self.display());
        let range = text_edit::clamp_range(range, len);
        self.selection = (!range.is_empty()).then_some(range);
    }

    pub fn selection(&self) -> Option<&Range<usize>> {
        self.selection.as_ref()
    }

    /// Moves the caret to a display offset.
    pub fn set_caret(&mut self, display_caret: usize) {
        let caret = self.formatter.caret_to_raw(self.raw(), display_caret);
        self.move_to(caret);
    }

    pub fn insert_str(&mut self, text: &str) {
        self.delete_selection();
        let at = self.outcome.state.caret;
        self.apply(&Edit::insert(text, at));
    }

    pub fn backspace(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let before = self.outcome.state.clone();
        self.apply(&Edit::backspace(before.caret));
        self.outcome.state != before
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        let at = self.outcome.state.caret;
        let before = self.outcome.state.raw.clone();
        self.apply(&Edit::delete(at..at + 1));
        self.outcome.state.raw != before
    }

    /// Deletes a display-space range. Literal chars inside it are skipped;
    /// only raw chars are removed.
    pub fn delete_display_range(&mut self, range: Range<usize>) {
        let raw = self.raw();
        let start = self.formatter.caret_to_raw(raw, range.start);
        let end = self.formatter.caret_to_raw(raw, range.end);
        self.apply(&Edit::delete(start..end));
    }

    pub fn set_raw(&mut self, raw: impl Into<String>) {
        self.selection = None;
        self.apply(&Edit::set_raw(raw));
    }

    pub fn clear(&mut self) {
        self.set_raw(String::new());
    }

    pub fn move_left(&mut self) -> bool {
        let caret = self.outcome.state.caret;
        if caret == 0 {
            return false;
        }
        self.move_to(caret - 1);
        true
    }

    pub fn move_right(&mut self) -> bool {
        let caret = self.outcome.state.caret;
        if caret >= self.outcome.state.raw_len() {
            return false;
        }
        self.move_to(caret + 1);
        true
    }

    pub fn toggle_secure(&mut self) -> bool {
        self.secure.toggle()
    }

    /// Returns whether the key was handled.
    pub fn handle_key(&mut self, key: FieldKey) -> bool {
        match key {
            FieldKey::Char(ch) => {
                let before = self.outcome.state.clone();
                let mut buf = [0u8; 4];
                self.insert_str(ch.encode_utf8(&mut buf));
                self.outcome.state != before
            }
            FieldKey::Paste(text) => {
                self.insert_str(text.as_str());
                true
            }
            FieldKey::Backspace => self.backspace(),
            FieldKey::Delete => self.delete_forward(),
            FieldKey::Left => self.move_left(),
            FieldKey::Right => self.move_right(),
            FieldKey::Home => {
                self.move_to(0);
                true
            }
            FieldKey::End => {
                self.move_to(self.outcome.state.raw_len());
                true
            }
            FieldKey::ToggleSecure => self.toggle_secure(),
        }
    }

    fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection.take() else {
            return false;
        };
        self.delete_display_range(range);
        true
    }

    fn move_to(&mut self, raw_caret: usize) {
        self.selection = None;
        let state = FormatterState::new(self.outcome.state.raw.clone(), raw_caret);
        self.outcome = self.formatter.outcome(state);
    }

    fn apply(&mut self, edit: &Edit) {
        self.outcome = self.formatter.format(&self.outcome.state, edit);
    }
}
