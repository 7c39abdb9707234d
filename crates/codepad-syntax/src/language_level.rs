//! Java source level model.
//!
//! The code pad grammar is always the full one; the level only decides which typing
//! rules apply (for example, which conditional-operator variant is used).

use std::fmt;
use std::str::FromStr;

/// The effective Java language mode.
///
/// `major` follows the modern numbering: `4` for Java 1.4, `5` for Java 5 (1.5), and
/// so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JavaLanguageLevel {
    pub major: u16,
}

impl JavaLanguageLevel {
    pub const JAVA_1_4: Self = Self { major: 4 };
    pub const JAVA_5: Self = Self { major: 5 };
    pub const JAVA_8: Self = Self { major: 8 };

    pub const fn new(major: u16) -> Self {
        Self { major }
    }

    pub fn is_enabled(self, feature: JavaFeature) -> bool {
        feature
            .stable_since()
            .is_some_and(|since| self.major >= since)
    }

    #[inline]
    pub fn supports_generics(self) -> bool {
        self.is_enabled(JavaFeature::Generics)
    }

    #[inline]
    pub fn supports_autoboxing(self) -> bool {
        self.is_enabled(JavaFeature::Autoboxing)
    }
}

impl Default for JavaLanguageLevel {
    fn default() -> Self {
        JavaLanguageLevel::JAVA_8
    }
}

impl fmt::Display for JavaLanguageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.major < 5 {
            write!(f, "1.{}", self.major)
        } else {
            write!(f, "{}", self.major)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid Java source level `{0}`")]
pub struct InvalidLanguageLevel(pub String);

/// Accepts both `1.x` and plain major numbers: `"1.4"`, `"1.8"`, `"8"`, `"17"`.
impl FromStr for JavaLanguageLevel {
    type Err = InvalidLanguageLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let major = match trimmed.strip_prefix("1.") {
            Some(minor) => minor.parse::<u16>().ok().filter(|m| (1..=9).contains(m)),
            None => trimmed.parse::<u16>().ok().filter(|m| *m >= 5),
        };
        major
            .map(JavaLanguageLevel::new)
            .ok_or_else(|| InvalidLanguageLevel(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaFeature {
    Generics,   // Java 5
    Autoboxing, // Java 5
}

impl JavaFeature {
    pub const fn display_name(self) -> &'static str {
        match self {
            JavaFeature::Generics => "generics",
            JavaFeature::Autoboxing => "autoboxing",
        }
    }

    pub const fn stable_since(self) -> Option<u16> {
        match self {
            JavaFeature::Generics => Some(5),
            JavaFeature::Autoboxing => Some(5),
        }
    }
}
