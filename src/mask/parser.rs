use super::model::{MaskTemplate, MaskToken};
use crate::core::char_class::CharClass;
use crate::error::ConfigError;
use indexmap::IndexMap;

pub const DIGIT_PLACEHOLDER: char = '#';

pub(super) fn parse_mask(
    mask: &str,
    placeholders: &IndexMap<char, CharClass>,
) -> Result<MaskTemplate, ConfigError> {
    let tokens: Vec<MaskToken> = mask
        .chars()
        .map(|ch| match placeholders.get(&ch) {
            Some(class) => MaskToken::Placeholder(class.clone()),
            None => MaskToken::Literal(ch),
        })
        .collect();

    let capacity = tokens.iter().filter(|token| token.is_placeholder()).count();
    if capacity == 0 {
        return Err(ConfigError::NoPlaceholders {
            mask: mask.to_string(),
        });
    }

    Ok(MaskTemplate { tokens, capacity })
}

pub(super) fn digit_placeholders() -> IndexMap<char, CharClass> {
    let mut table = IndexMap::new();
    table.insert(DIGIT_PLACEHOLDER, CharClass::digit());
    table
}
