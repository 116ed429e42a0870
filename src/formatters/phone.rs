use crate::error::ConfigError;
use crate::mask::MaskTemplate;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Mask and expected digit count for one phone region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PhoneStyle {
    pub mask: String,
    pub digits: usize,
}

impl PhoneStyle {
    pub fn new(mask: impl Into<String>, digits: usize) -> Self {
        Self {
            mask: mask.into(),
            digits,
        }
    }
}

/// Region key -> [`PhoneStyle`]. Treated as data: the built-in entries are
/// defaults, configuration may replace or extend them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PhoneCatalog {
    styles: IndexMap<String, PhoneStyle>,
}

impl PhoneCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.insert("us", PhoneStyle::new("(###) ###-####", 10));
        catalog.insert("us-intl", PhoneStyle::new("+# (###) ###-####", 11));
        catalog.insert("uk", PhoneStyle::new("+## #### ######", 12));
        catalog.insert("fr", PhoneStyle::new("+## # ## ## ## ##", 11));
        catalog
    }

    pub fn insert(&mut self, region: impl Into<String>, style: PhoneStyle) {
        self.styles.insert(region.into(), style);
    }

    /// Overlays `other` on top of this catalog.
    pub fn extend(&mut self, other: impl IntoIterator<Item = (String, PhoneStyle)>) {
        self.styles.extend(other);
    }

    pub fn get(&self, region: &str) -> Option<&PhoneStyle> {
        self.styles.get(region)
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }
}

/// Resolved phone formatting for one region.
#[derive(Debug, Clone)]
pub struct PhoneFormat {
    region: String,
    template: MaskTemplate,
    digits: usize,
}

impl PhoneFormat {
    /// # Errors
    /// Fails when the region is not in `catalog`, its mask has no
    /// placeholders, or it expects more digits than the mask holds.
    pub fn for_region(catalog: &PhoneCatalog, region: &str) -> Result<Self, ConfigError> {
        let style = catalog
            .get(region)
            .ok_or_else(|| ConfigError::UnknownRegion(region.to_string()))?;
        let template = MaskTemplate::parse(style.mask.as_str())?;
        if style.digits > template.capacity() {
            return Err(ConfigError::PhoneDigitsExceedMask {
                region: region.to_string(),
                digits: style.digits,
                capacity: template.capacity(),
            });
        }
        Ok(Self {
            region: region.to_string(),
            template,
            digits: style.digits,
        })
    }

    pub fn region(&self) -> &str {
        self.region.as_str()
    }

    pub fn template(&self) -> &MaskTemplate {
        &self.template
    }

    pub fn digits(&self) -> usize {
        self.digits
    }
}

/// Strips everything but ASCII digits.
pub fn extract_digits(display: &str) -> String {
    display.chars().filter(char::is_ascii_digit).collect()
}
