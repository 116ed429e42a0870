//! Declarative formatter configuration.
//!
//! ```yaml
//! one_time_code_length: 8
//! phone_styles:
//!   nl: { mask: "+## # ########", digits: 11 }
//! fields:
//!   ssn:
//!     kind: ssn
//!     secure_entry: masked_with_toggle
//!   amount:
//!     kind: decimal
//!     locale: de-DE
//!     max_fraction_digits: 2
//!     validation: required
//! ```

use crate::core::char_class::CharClass;
use crate::core::validation::{Rule, required};
use crate::error::ConfigError;
use crate::field::MaskedField;
use crate::field::secure::SecureEntryMode;
use crate::formatters::locale::NumberLocale;
use crate::formatters::numeric::NumberFormat;
use crate::formatters::phone::{PhoneCatalog, PhoneStyle};
use crate::formatters::{DEFAULT_CODE_LENGTH, Formatter};
use crate::mask::{DIGIT_PLACEHOLDER, MaskTemplate};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Merged over the built-in phone catalog.
    #[serde(default)]
    pub phone_styles: IndexMap<String, PhoneStyle>,
    /// Length for one-time-code fields that do not set their own.
    #[serde(default)]
    pub one_time_code_length: Option<usize>,
    #[serde(default)]
    pub fields: IndexMap<String, FieldConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldConfig {
    #[serde(flatten)]
    pub formatter: FormatterConfig,
    /// Replaces the formatter's built-in rule when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<RuleConfig>,
    #[serde(default)]
    pub secure_entry: SecureEntryMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatterConfig {
    Passthrough,
    Masking {
        mask: String,
        /// Extra placeholder chars mapped to class names; `#` is always a digit.
        #[serde(default)]
        placeholders: IndexMap<char, String>,
    },
    Ssn,
    SsnLastFour,
    Zip,
    ZipPlusFour,
    Decimal {
        #[serde(default)]
        locale: LocaleConfig,
        #[serde(default)]
        max_fraction_digits: Option<usize>,
        #[serde(default)]
        max_integer_digits: Option<usize>,
        #[serde(default)]
        currency: Option<String>,
    },
    Integer {
        #[serde(default)]
        locale: LocaleConfig,
        #[serde(default)]
        max_digits: Option<usize>,
    },
    Phone {
        region: String,
    },
    OneTimeCode {
        #[serde(default)]
        length: Option<usize>,
    },
}

/// Either a locale tag such as `de-DE` or explicit separators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LocaleConfig {
    Tag(String),
    Custom(NumberLocale),
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::Tag("en-US".to_string())
    }
}

impl LocaleConfig {
    /// # Errors
    /// Fails for unknown tags or a zero group size.
    pub fn resolve(&self) -> Result<NumberLocale, ConfigError> {
        let locale = match self {
            Self::Tag(tag) => NumberLocale::for_tag(tag)?,
            Self::Custom(locale) => *locale,
        };
        locale.validate()?;
        Ok(locale)
    }
}

/// Validation rule description.
///
/// Keywords are bare strings (`required`); every other rule is a map with a
/// single key naming it, e.g. `{ length: 4 }` or `{ all: [..] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RuleConfig {
    Keyword(RuleKeyword),
    Length {
        length: usize,
    },
    LengthIn {
        length_in: LengthBounds,
    },
    /// Class names: `digit`, `letter`, `alphanumeric`, `any`, or
    /// `one_of:<chars>`.
    Subset {
        subset: Vec<String>,
    },
    Pattern {
        pattern: String,
    },
    All {
        all: Vec<RuleConfig>,
    },
    Any {
        any: Vec<RuleConfig>,
    },
    Not {
        not: Box<RuleConfig>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleKeyword {
    None,
    Required,
}

/// Inclusive bounds; a missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LengthBounds {
    #[serde(default)]
    pub min: Option<usize>,
    #[serde(default)]
    pub max: Option<usize>,
}

impl RuleConfig {
    /// # Errors
    /// Fails for unknown class names and invalid patterns.
    pub fn build(&self) -> Result<Rule, ConfigError> {
        let rule = match self {
            Self::Keyword(RuleKeyword::None) => Rule::none(),
            Self::Keyword(RuleKeyword::Required) => required(),
            Self::Length { length } => Rule::length(*length),
            Self::LengthIn { length_in } => match (length_in.min, length_in.max) {
                (Some(min), Some(max)) => Rule::length_in(min..=max),
                (Some(min), None) => Rule::length_in(min..),
                (None, Some(max)) => Rule::length_in(..=max),
                (None, None) => Rule::length_in(..),
            },
            Self::Subset { subset } => Rule::subset(
                subset
                    .iter()
                    .map(|name| char_class(name))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Self::Pattern { pattern } => Rule::pattern(pattern)?,
            Self::All { all } => Rule::all(build_rules(all)?),
            Self::Any { any } => Rule::any(build_rules(any)?),
            Self::Not { not } => not.build()?.negate(),
        };
        Ok(rule)
    }
}

fn build_rules(rules: &[RuleConfig]) -> Result<Vec<Rule>, ConfigError> {
    rules.iter().map(RuleConfig::build).collect()
}

fn char_class(name: &str) -> Result<CharClass, ConfigError> {
    if let Some(chars) = name.strip_prefix("one_of:") {
        return Ok(CharClass::one_of(chars));
    }
    CharClass::named(name).ok_or_else(|| ConfigError::UnknownCharClass(name.to_string()))
}

/// A built field: shared formatter plus its secure-entry mode.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub formatter: Arc<Formatter>,
    pub secure_entry: SecureEntryMode,
}

impl FieldSpec {
    pub fn new_field(&self) -> MaskedField {
        MaskedField::new(Arc::clone(&self.formatter)).with_secure_entry(self.secure_entry)
    }
}

/// All fields of an [`EngineConfig`], in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FieldSet {
    fields: IndexMap<String, FieldSpec>,
}

impl FieldSet {
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// # Errors
    /// Returns [`ConfigError::UnknownField`] when `name` was not configured.
    pub fn field(&self, name: &str) -> Result<MaskedField, ConfigError> {
        self.get(name)
            .map(FieldSpec::new_field)
            .ok_or_else(|| ConfigError::UnknownField(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl EngineConfig {
    /// # Errors
    /// Returns [`ConfigError::Yaml`] on malformed input.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// # Errors
    /// Returns [`ConfigError::Json`] on malformed input.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Reads a `.json` file as JSON and anything else as YAML.
    ///
    /// # Errors
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(input.as_str())
        } else {
            Self::from_yaml_str(input.as_str())
        }
    }

    pub fn phone_catalog(&self) -> PhoneCatalog {
        let mut catalog = PhoneCatalog::builtin();
        catalog.extend(self.phone_styles.clone());
        catalog
    }

    /// Builds every field, failing on the first invalid one.
    ///
    /// # Errors
    /// Any [`ConfigError`] raised while building a formatter or rule.
    pub fn build(&self) -> Result<FieldSet, ConfigError> {
        let catalog = self.phone_catalog();
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for (name, field) in &self.fields {
            let mut formatter = self.build_formatter(&field.formatter, &catalog)?;
            if let Some(rule) = &field.validation {
                formatter = formatter.with_rule(rule.build()?);
            }
            fields.insert(
                name.clone(),
                FieldSpec {
                    formatter: Arc::new(formatter),
                    secure_entry: field.secure_entry,
                },
            );
        }
        info!(fields = fields.len(), "formatter config built");
        Ok(FieldSet { fields })
    }

    fn build_formatter(
        &self,
        config: &FormatterConfig,
        catalog: &PhoneCatalog,
    ) -> Result<Formatter, ConfigError> {
        let formatter = match config {
            FormatterConfig::Passthrough => Formatter::passthrough(),
            FormatterConfig::Masking { mask, placeholders } => {
                let mut table = IndexMap::with_capacity(placeholders.len() + 1);
                table.insert(DIGIT_PLACEHOLDER, CharClass::digit());
                for (ch, name) in placeholders {
                    table.insert(*ch, char_class(name)?);
                }
                Formatter::from_template(MaskTemplate::parse_with(mask, &table)?)
            }
            FormatterConfig::Ssn => Formatter::ssn()?,
            FormatterConfig::SsnLastFour => Formatter::ssn_last_four()?,
            FormatterConfig::Zip => Formatter::zip()?,
            FormatterConfig::ZipPlusFour => Formatter::zip_plus_four()?,
            FormatterConfig::Decimal {
                locale,
                max_fraction_digits,
                max_integer_digits,
                currency,
            } => {
                let mut format = NumberFormat::decimal(locale.resolve()?);
                if let Some(digits) = max_fraction_digits {
                    format = format.with_max_fraction_digits(*digits);
                }
                if let Some(digits) = max_integer_digits {
                    format = format.with_max_integer_digits(*digits);
                }
                if let Some(symbol) = currency {
                    format = format.with_currency(symbol.as_str());
                }
                Formatter::decimal(format)
            }
            FormatterConfig::Integer { locale, max_digits } => {
                let mut format = NumberFormat::integer(locale.resolve()?);
                if let Some(digits) = max_digits {
                    format = format.with_max_integer_digits(*digits);
                }
                Formatter::integer(format)
            }
            FormatterConfig::Phone { region } => Formatter::phone(catalog, region)?,
            FormatterConfig::OneTimeCode { length } => Formatter::one_time_code(
                length
                    .or(self.one_time_code_length)
                    .unwrap_or(DEFAULT_CODE_LENGTH),
            )?,
        };
        Ok(formatter)
    }

    /// JSON schema describing the config format.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] if the schema cannot be serialized.
    pub fn json_schema() -> Result<serde_json::Value, ConfigError> {
        Ok(serde_json::to_value(schemars::schema_for!(EngineConfig))?)
    }
}
