pub mod locale;
pub mod numeric;
pub mod phone;

use crate::core::text_edit;
use crate::core::validation::{Rule, ValidationResult};
use crate::error::ConfigError;
use crate::mask::{self, Edit, FormatterState, MaskTemplate};
use locale::NumberLocale;
use numeric::NumberFormat;
use phone::{PhoneCatalog, PhoneFormat};
use tracing::debug;

/// Length used by [`Formatter::one_time_code_default`].
pub const DEFAULT_CODE_LENGTH: usize = 6;

pub const SSN_MASK: &str = "###-##-####";
pub const SSN_LAST_FOUR_MASK: &str = "####";
pub const ZIP_MASK: &str = "#####";
pub const ZIP_PLUS_FOUR_MASK: &str = "#####-####";

/// The closed set of formatter behaviors.
#[derive(Debug, Clone)]
pub enum FormatterKind {
    Passthrough,
    Masking(MaskTemplate),
    Decimal(NumberFormat),
    Integer(NumberFormat),
    Phone(PhoneFormat),
    OneTimeCode(MaskTemplate),
}

/// Result of one [`Formatter::format`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOutcome {
    pub state: FormatterState,
    pub display: String,
    pub caret_in_display: usize,
    pub validation: ValidationResult,
}

/// Immutable formatter: a [`FormatterKind`] plus the rule its extracted
/// value is checked against. Holds no per-field state, so one instance can
/// serve any number of fields.
#[derive(Debug, Clone)]
pub struct Formatter {
    kind: FormatterKind,
    rule: Rule,
}

impl Formatter {
    pub fn passthrough() -> Self {
        Self::new(FormatterKind::Passthrough, Rule::none())
    }

    /// # Errors
    /// Returns [`ConfigError::NoPlaceholders`] for a mask without `#`.
    pub fn masking(mask: &str) -> Result<Self, ConfigError> {
        let template = MaskTemplate::parse(mask)?;
        Ok(Self::from_template(template))
    }

    pub fn from_template(template: MaskTemplate) -> Self {
        Self::new(FormatterKind::Masking(template), Rule::none())
    }

    /// # Errors
    /// Never fails for the built-in mask; kept fallible like every mask
    /// constructor.
    pub fn ssn() -> Result<Self, ConfigError> {
        Ok(Self::masking(SSN_MASK)?.with_rule(Rule::length(9)))
    }

    /// # Errors
    /// See [`Formatter::ssn`].
    pub fn ssn_last_four() -> Result<Self, ConfigError> {
        Ok(Self::masking(SSN_LAST_FOUR_MASK)?.with_rule(Rule::length(4)))
    }

    /// # Errors
    /// See [`Formatter::ssn`].
    pub fn zip() -> Result<Self, ConfigError> {
        Ok(Self::masking(ZIP_MASK)?.with_rule(Rule::length(5)))
    }

    /// Accepts both the five and nine digit forms.
    ///
    /// # Errors
    /// See [`Formatter::ssn`].
    pub fn zip_plus_four() -> Result<Self, ConfigError> {
        Ok(Self::masking(ZIP_PLUS_FOUR_MASK)?.with_rule(Rule::length(5).or(Rule::length(9))))
    }

    pub fn decimal(format: NumberFormat) -> Self {
        Self::new(FormatterKind::Decimal(format), Rule::none())
    }

    pub fn integer(format: NumberFormat) -> Self {
        Self::new(FormatterKind::Integer(format), Rule::none())
    }

    /// Two fraction digits and a leading currency symbol.
    pub fn currency(locale: NumberLocale, symbol: impl Into<String>) -> Self {
        Self::decimal(
            NumberFormat::decimal(locale)
                .with_max_fraction_digits(2)
                .with_currency(symbol),
        )
    }

    /// # Errors
    /// Fails for regions missing from `catalog` or with an inconsistent
    /// style; see [`PhoneFormat::for_region`].
    pub fn phone(catalog: &PhoneCatalog, region: &str) -> Result<Self, ConfigError> {
        let format = PhoneFormat::for_region(catalog, region)?;
        let rule = Rule::length(format.digits());
        Ok(Self::new(FormatterKind::Phone(format), rule))
    }

    /// # Errors
    /// Returns [`ConfigError::ZeroCodeLength`] when `length` is zero.
    pub fn one_time_code(length: usize) -> Result<Self, ConfigError> {
        if length == 0 {
            return Err(ConfigError::ZeroCodeLength);
        }
        let template = MaskTemplate::digits(length)?;
        Ok(Self::new(FormatterKind::OneTimeCode(template), Rule::length(length)))
    }

    /// # Errors
    /// See [`Formatter::one_time_code`].
    pub fn one_time_code_default() -> Result<Self, ConfigError> {
        Self::one_time_code(DEFAULT_CODE_LENGTH)
    }

    fn new(kind: FormatterKind, rule: Rule) -> Self {
        debug!(kind = kind.name(), rule = %rule, "formatter created");
        Self { kind, rule }
    }

    /// Replaces the validation rule.
    #[must_use]
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    pub fn kind(&self) -> &FormatterKind {
        &self.kind
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn template(&self) -> Option<&MaskTemplate> {
        match &self.kind {
            FormatterKind::Masking(template) | FormatterKind::OneTimeCode(template) => {
                Some(template)
            }
            FormatterKind::Phone(format) => Some(format.template()),
            FormatterKind::Passthrough
            | FormatterKind::Decimal(_)
            | FormatterKind::Integer(_) => None,
        }
    }

    /// Applies `edit` to `state`, renders and validates.
    pub fn format(&self, state: &FormatterState, edit: &Edit) -> FormatOutcome {
        let state = match &self.kind {
            FormatterKind::Passthrough => passthrough_apply(state, edit),
            FormatterKind::Decimal(format) | FormatterKind::Integer(format) => {
                format.apply(state, edit)
            }
            FormatterKind::Masking(template) | FormatterKind::OneTimeCode(template) => {
                mask::apply(template, state, edit).state
            }
            FormatterKind::Phone(format) => mask::apply(format.template(), state, edit).state,
        };
        self.outcome(state)
    }

    /// Renders and validates `state` without editing it.
    pub fn outcome(&self, state: FormatterState) -> FormatOutcome {
        let display = self.render(state.raw.as_str());
        let caret_in_display = self.caret_to_display(state.raw.as_str(), state.caret);
        let validation = self.validate_display(state.raw.as_str(), display.as_str());
        FormatOutcome {
            state,
            display,
            caret_in_display,
            validation,
        }
    }

    pub fn render(&self, raw: &str) -> String {
        match &self.kind {
            FormatterKind::Passthrough => raw.to_string(),
            FormatterKind::Decimal(format) | FormatterKind::Integer(format) => format.render(raw),
            FormatterKind::Masking(template) | FormatterKind::OneTimeCode(template) => {
                mask::render(template, raw)
            }
            FormatterKind::Phone(format) => mask::render(format.template(), raw),
        }
    }

    pub fn caret_to_display(&self, raw: &str, raw_caret: usize) -> usize {
        let raw_caret = raw_caret.min(text_edit::char_count(raw));
        match &self.kind {
            FormatterKind::Passthrough => raw_caret,
            FormatterKind::Decimal(format) | FormatterKind::Integer(format) => {
                format.raw_to_display(raw, raw_caret)
            }
            FormatterKind::Masking(template) | FormatterKind::OneTimeCode(template) => {
                mask::raw_to_display(template, raw_caret)
            }
            FormatterKind::Phone(format) => mask::raw_to_display(format.template(), raw_caret),
        }
    }

    pub fn caret_to_raw(&self, raw: &str, display_caret: usize) -> usize {
        let raw_len = text_edit::char_count(raw);
        match &self.kind {
            FormatterKind::Passthrough => display_caret.min(raw_len),
            FormatterKind::Decimal(format) | FormatterKind::Integer(format) => {
                format.display_to_raw(raw, display_caret)
            }
            FormatterKind::Masking(template) | FormatterKind::OneTimeCode(template) => {
                mask::display_to_raw(template, raw_len, display_caret)
            }
            FormatterKind::Phone(format) => {
                mask::display_to_raw(format.template(), raw_len, display_caret)
            }
        }
    }

    /// The value the rule is evaluated against.
    pub fn extract(&self, raw: &str, display: &str) -> String {
        match &self.kind {
            FormatterKind::Phone(_) => phone::extract_digits(display),
            FormatterKind::Passthrough
            | FormatterKind::Masking(_)
            | FormatterKind::OneTimeCode(_)
            | FormatterKind::Decimal(_)
            | FormatterKind::Integer(_) => raw.to_string(),
        }
    }

    pub fn validate(&self, state: &FormatterState) -> ValidationResult {
        let display = self.render(state.raw.as_str());
        self.validate_display(state.raw.as_str(), display.as_str())
    }

    fn validate_display(&self, raw: &str, display: &str) -> ValidationResult {
        let value = self.extract(raw, display);
        let result = self.rule.evaluate(value.as_str());
        if !result.is_valid {
            debug!(kind = self.kind.name(), reason = ?result.reason, "value failed validation");
        }
        result
    }
}

impl FormatterKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::Masking(_) => "masking",
            Self::Decimal(_) => "decimal",
            Self::Integer(_) => "integer",
            Self::Phone(_) => "phone",
            Self::OneTimeCode(_) => "one_time_code",
        }
    }
}

fn passthrough_apply(state: &FormatterState, edit: &Edit) -> FormatterState {
    let mut raw = state.raw.clone();
    let caret = match edit {
        Edit::Insert { text, at } => text_edit::insert_str(&mut raw, *at, text),
        Edit::Delete { range } => {
            let range = text_edit::clamp_range(range.clone(), text_edit::char_count(&raw));
            if text_edit::remove_range(&mut raw, range.clone()) {
                range.start
            } else {
                state.caret
            }
        }
        Edit::Backspace { at } => {
            let at = text_edit::clamp_cursor(*at, &raw);
            if at > 0 && text_edit::remove_range(&mut raw, at - 1..at) {
                at - 1
            } else {
                state.caret
            }
        }
        Edit::SetRaw { text } => {
            raw.clone_from(text);
            text_edit::char_count(&raw)
        }
    };
    FormatterState::new(raw, caret)
}
