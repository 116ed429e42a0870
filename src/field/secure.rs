use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub const DEFAULT_OBSCURING_GLYPH: char = '*';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SecureEntryMode {
    #[default]
    Visible,
    Masked,
    MaskedWithToggle,
}

/// Presentation-only obscuring. Never touches raw or display values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecureEntry {
    mode: SecureEntryMode,
    revealed: bool,
    glyph: char,
}

impl Default for SecureEntry {
    fn default() -> Self {
        Self::new(SecureEntryMode::Visible)
    }
}

impl SecureEntry {
    pub fn new(mode: SecureEntryMode) -> Self {
        Self {
            mode,
            revealed: false,
            glyph: DEFAULT_OBSCURING_GLYPH,
        }
    }

    #[must_use]
    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    pub fn mode(&self) -> SecureEntryMode {
        self.mode
    }

    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_obscured(&self) -> bool {
        match self.mode {
            SecureEntryMode::Visible => false,
            SecureEntryMode::Masked => true,
            SecureEntryMode::MaskedWithToggle => !self.revealed,
        }
    }

    /// Flips reveal state. Only `MaskedWithToggle` can be toggled; returns
    /// whether anything changed.
    pub fn toggle(&mut self) -> bool {
        if self.mode != SecureEntryMode::MaskedWithToggle {
            return false;
        }
        self.revealed = !self.revealed;
        true
    }

    pub fn obscure<'a>(&self, display: &'a str) -> Cow<'a, str> {
        if !self.is_obscured() {
            return Cow::Borrowed(display);
        }
        Cow::Owned(display.chars().map(|_| self.glyph).collect())
    }
}
