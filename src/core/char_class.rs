use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type CharPredicate = Arc<dyn Fn(char) -> bool + Send + Sync>;

/// A named predicate over a single character.
///
/// Classes are immutable and cheap to clone; clones share the predicate.
#[derive(Clone)]
pub struct CharClass {
    name: Cow<'static, str>,
    predicate: CharPredicate,
}

impl CharClass {
    pub fn custom<F>(name: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(char) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn digit() -> Self {
        Self::custom("digit", |ch| ch.is_ascii_digit())
    }

    pub fn letter() -> Self {
        Self::custom("letter", char::is_alphabetic)
    }

    pub fn alphanumeric() -> Self {
        Self::custom("alphanumeric", char::is_alphanumeric)
    }

    pub fn any() -> Self {
        Self::custom("any", |_| true)
    }

    pub fn one_of(chars: impl Into<String>) -> Self {
        let chars: String = chars.into();
        let name = format!("one of {chars:?}");
        Self::custom(name, move |ch| chars.contains(ch))
    }

    /// Resolves one of the built-in class names used in configuration files.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "digit" => Some(Self::digit()),
            "letter" | "alpha" => Some(Self::letter()),
            "alphanumeric" | "alnum" => Some(Self::alphanumeric()),
            "any" => Some(Self::any()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn matches(&self, ch: char) -> bool {
        (self.predicate)(ch)
    }
}

impl fmt::Debug for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CharClass").field(&self.name).finish()
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
