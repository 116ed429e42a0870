use std::path::PathBuf;
use thiserror::Error;

/// Invalid formatter configuration. Raised only while building formatters,
/// never while editing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("mask {mask:?} has no placeholders")]
    NoPlaceholders { mask: String },

    #[error("unknown phone region {0:?}")]
    UnknownRegion(String),

    #[error("unknown number locale {0:?}")]
    UnknownLocale(String),

    #[error("unknown character class {0:?}")]
    UnknownCharClass(String),

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("one-time code length must be at least 1")]
    ZeroCodeLength,

    #[error("phone region {region:?} expects {digits} digits but its mask only holds {capacity}")]
    PhoneDigitsExceedMask {
        region: String,
        digits: usize,
        capacity: usize,
    },

    #[error("group size must be at least 1")]
    ZeroGroupSize,

    #[error("unknown field {0:?}")]
    UnknownField(String),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}
