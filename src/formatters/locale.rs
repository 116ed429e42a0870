use crate::error::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Separators used when rendering numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NumberLocale {
    pub grouping_separator: Option<char>,
    pub decimal_separator: char,
    #[serde(default = "default_group_size")]
    pub group_size: usize,
}

fn default_group_size() -> usize {
    3
}

impl Default for NumberLocale {
    fn default() -> Self {
        Self::EN_US
    }
}

impl NumberLocale {
    pub const EN_US: Self = Self {
        grouping_separator: Some(','),
        decimal_separator: '.',
        group_size: 3,
    };

    pub const DE_DE: Self = Self {
        grouping_separator: Some('.'),
        decimal_separator: ',',
        group_size: 3,
    };

    pub const FR_FR: Self = Self {
        grouping_separator: Some('\u{202F}'),
        decimal_separator: ',',
        group_size: 3,
    };

    pub const DE_CH: Self = Self {
        grouping_separator: Some('\''),
        decimal_separator: '.',
        group_size: 3,
    };

    pub const PLAIN: Self = Self {
        grouping_separator: None,
        decimal_separator: '.',
        group_size: 3,
    };

    /// Looks up a locale by tag. Tags are matched case-insensitively and
    /// `_` is treated as `-`.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownLocale`] for tags outside the table.
    pub fn for_tag(tag: &str) -> Result<Self, ConfigError> {
        let normalized = tag.trim().replace('_', "-").to_ascii_lowercase();
        let locale = match normalized.as_str() {
            "en" | "en-us" | "en-gb" | "en-ca" | "en-au" | "ja-jp" | "zh-cn" => Self::EN_US,
            "de" | "de-de" | "de-at" | "es-es" | "it-it" | "nl-nl" | "pt-br" | "id-id" => {
                Self::DE_DE
            }
            "fr" | "fr-fr" | "fr-ca" | "pl-pl" | "cs-cz" | "sv-se" => Self::FR_FR,
            "de-ch" | "fr-ch" | "it-ch" => Self::DE_CH,
            "c" | "posix" | "plain" => Self::PLAIN,
            _ => return Err(ConfigError::UnknownLocale(tag.to_string())),
        };
        Ok(locale)
    }

    /// # Errors
    /// Returns [`ConfigError::ZeroGroupSize`] when `group_size` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.group_size == 0 {
            return Err(ConfigError::ZeroGroupSize);
        }
        Ok(())
    }

    /// Whether `ch` typed by the user means "decimal point".
    pub fn is_decimal_input(&self, ch: char) -> bool {
        ch == self.decimal_separator || (ch == '.' && self.grouping_separator != Some('.'))
    }
}
