use crate::core::char_class::CharClass;
use crate::error::ConfigError;
use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

pub type ValuePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason.into()),
        }
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.reason.unwrap_or_default())
        }
    }
}

/// Immutable validation expression.
///
/// Rules carry no state: evaluating the same rule against the same value
/// always gives the same result.
#[derive(Clone, Default)]
pub enum Rule {
    #[default]
    None,
    Length(usize),
    LengthIn(Bound<usize>, Bound<usize>),
    Subset(Vec<CharClass>),
    Pattern(Regex),
    Custom {
        name: Cow<'static, str>,
        predicate: ValuePredicate,
    },
    And(Box<Rule>, Box<Rule>),
    Or(Box<Rule>, Box<Rule>),
    Not(Box<Rule>),
}

impl Rule {
    pub fn none() -> Self {
        Self::None
    }

    pub fn length(len: usize) -> Self {
        Self::Length(len)
    }

    pub fn length_in(range: impl RangeBounds<usize>) -> Self {
        Self::LengthIn(range.start_bound().cloned(), range.end_bound().cloned())
    }

    pub fn subset(classes: impl IntoIterator<Item = CharClass>) -> Self {
        Self::Subset(classes.into_iter().collect())
    }

    /// Full-match regular expression rule.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidPattern`] when `pattern` does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
        let anchored = format!("^(?:{pattern})$");
        Regex::new(anchored.as_str())
            .map(Self::Pattern)
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn custom<F>(name: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Custom {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    #[must_use]
    pub fn and(self, other: Rule) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Rule) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Left-fold of `and`. An empty list is `none`.
    pub fn all(rules: impl IntoIterator<Item = Rule>) -> Self {
        rules
            .into_iter()
            .reduce(Rule::and)
            .unwrap_or(Rule::None)
    }

    /// Left-fold of `or`. An empty list never succeeds.
    pub fn any(rules: impl IntoIterator<Item = Rule>) -> Self {
        rules
            .into_iter()
            .reduce(Rule::or)
            .unwrap_or_else(|| Rule::None.negate())
    }

    pub fn evaluate(&self, value: &str) -> ValidationResult {
        match self {
            Self::None => ValidationResult::valid(),
            Self::Length(expected) => {
                let len = value.chars().count();
                if len == *expected {
                    ValidationResult::valid()
                } else {
                    ValidationResult::invalid(format!(
                        "Expected {expected} characters, got {len}"
                    ))
                }
            }
            Self::LengthIn(start, end) => {
                let len = value.chars().count();
                if (*start, *end).contains(&len) {
                    return ValidationResult::valid();
                }
                let below = match start {
                    Bound::Included(min) => len < *min,
                    Bound::Excluded(min) => len <= *min,
                    Bound::Unbounded => false,
                };
                if below {
                    ValidationResult::invalid(format!("Length {len} is too short"))
                } else {
                    ValidationResult::invalid(format!("Length {len} is too long"))
                }
            }
            Self::Subset(classes) => {
                match value
                    .chars()
                    .find(|ch| !classes.iter().any(|class| class.matches(*ch)))
                {
                    None => ValidationResult::valid(),
                    Some(ch) => ValidationResult::invalid(format!(
                        "Character {ch:?} is not allowed"
                    )),
                }
            }
            Self::Pattern(re) => {
                if re.is_match(value) {
                    ValidationResult::valid()
                } else {
                    ValidationResult::invalid(format!(
                        "Value must match pattern: {}",
                        re.as_str()
                    ))
                }
            }
            Self::Custom { name, predicate } => {
                if predicate(value) {
                    ValidationResult::valid()
                } else {
                    ValidationResult::invalid(format!("Failed check: {name}"))
                }
            }
            Self::And(left, right) => {
                let left = left.evaluate(value);
                if !left.is_valid {
                    return left;
                }
                right.evaluate(value)
            }
            Self::Or(left, right) => {
                let left = left.evaluate(value);
                if left.is_valid {
                    return left;
                }
                let right = right.evaluate(value);
                if right.is_valid {
                    return right;
                }
                ValidationResult::invalid(format!(
                    "{} or {}",
                    left.reason.unwrap_or_default(),
                    right.reason.unwrap_or_default()
                ))
            }
            Self::Not(inner) => {
                if inner.evaluate(value).is_valid {
                    ValidationResult::invalid(format!("Value must not satisfy {inner}"))
                } else {
                    ValidationResult::valid()
                }
            }
        }
    }
}

impl std::ops::Not for Rule {
    type Output = Rule;

    fn not(self) -> Rule {
        self.negate()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Length(len) => write!(f, "length({len})"),
            Self::LengthIn(start, end) => {
                f.write_str("length(in: ")?;
                match start {
                    Bound::Included(min) => write!(f, "{min}")?,
                    Bound::Excluded(min) => write!(f, "{}", min + 1)?,
                    Bound::Unbounded => {}
                }
                match end {
                    Bound::Included(max) => write!(f, "..={max})"),
                    Bound::Excluded(max) => write!(f, "..{max})"),
                    Bound::Unbounded => f.write_str("..)"),
                }
            }
            Self::Subset(classes) => {
                f.write_str("subset(")?;
                for (idx, class) in classes.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(class.name())?;
                }
                f.write_str(")")
            }
            Self::Pattern(re) => write!(f, "pattern({})", re.as_str()),
            Self::Custom { name, .. } => write!(f, "custom({name})"),
            Self::And(left, right) => write!(f, "and({left}, {right})"),
            Self::Or(left, right) => write!(f, "or({left}, {right})"),
            Self::Not(inner) => write!(f, "not({inner})"),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({self})")
    }
}

pub fn evaluate(rule: &Rule, value: &str) -> ValidationResult {
    rule.evaluate(value)
}

pub fn required() -> Rule {
    Rule::length_in(1..)
}
