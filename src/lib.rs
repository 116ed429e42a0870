pub mod config;
pub mod core;
pub mod error;
pub mod field;
pub mod formatters;
pub mod mask;

pub use crate::core::char_class;
pub use crate::core::text_edit;
pub use crate::core::validation;

pub use crate::core::char_class::CharClass;
pub use crate::core::validation::{Rule, ValidationResult, evaluate, required};

pub use config::{EngineConfig, FieldSet, FieldSpec};
pub use error::ConfigError;
pub use field::secure::{SecureEntry, SecureEntryMode};
pub use field::{FieldKey, MaskedField};
pub use formatters::locale::NumberLocale;
pub use formatters::numeric::NumberFormat;
pub use formatters::phone::{PhoneCatalog, PhoneStyle};
pub use formatters::{FormatOutcome, Formatter, FormatterKind};
pub use mask::{Edit, EditOutcome, FormatterState, MaskTemplate, MaskToken};
