use crate::core::char_class::CharClass;
use std::ops::Range;

#[derive(Debug, Clone)]
pub enum MaskToken {
    Literal(char),
    Placeholder(CharClass),
}

impl MaskToken {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

/// Ordered, immutable token sequence. Always holds at least one placeholder.
#[derive(Debug, Clone)]
pub struct MaskTemplate {
    pub(super) tokens: Vec<MaskToken>,
    pub(super) capacity: usize,
}

impl MaskTemplate {
    pub fn tokens(&self) -> &[MaskToken] {
        self.tokens.as_slice()
    }

    /// Number of placeholders, i.e. the maximum raw length.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &CharClass> {
        self.tokens.iter().filter_map(|token| match token {
            MaskToken::Placeholder(class) => Some(class),
            MaskToken::Literal(_) => None,
        })
    }

    /// Class of the placeholder at raw index `raw_idx`.
    pub fn placeholder(&self, raw_idx: usize) -> Option<&CharClass> {
        self.placeholders().nth(raw_idx)
    }
}

/// Per-field editing state. `caret` is a raw-space offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatterState {
    pub raw: String,
    pub caret: usize,
}

impl FormatterState {
    pub fn new(raw: impl Into<String>, caret: usize) -> Self {
        let raw = raw.into();
        let caret = caret.min(raw.chars().count());
        Self { raw, caret }
    }

    /// State with the caret placed after the last raw char.
    pub fn at_end(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let caret = raw.chars().count();
        Self { raw, caret }
    }

    pub fn raw_len(&self) -> usize {
        self.raw.chars().count()
    }
}

/// Raw-space edit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert { text: String, at: usize },
    Delete { range: Range<usize> },
    SetRaw { text: String },
    /// Removes the raw char before `at`.
    Backspace { at: usize },
}

impl Edit {
    pub fn insert(text: impl Into<String>, at: usize) -> Self {
        Self::Insert {
            text: text.into(),
            at,
        }
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self::Delete { range }
    }

    pub fn set_raw(text: impl Into<String>) -> Self {
        Self::SetRaw { text: text.into() }
    }

    pub fn backspace(at: usize) -> Self {
        Self::Backspace { at }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub state: FormatterState,
    pub display: String,
    pub caret_in_display: usize,
}
