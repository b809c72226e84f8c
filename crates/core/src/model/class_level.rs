use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Lowest and highest class with a dedicated catalog.
pub const MIN_CLASS: u8 = 5;
pub const MAX_CLASS: u8 = 12;

/// Class (grade) level that selects which catalog is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassLevel {
    /// No class selected; loads the general catalog.
    #[default]
    Default,
    Class(u8),
}

impl ClassLevel {
    /// Creates a class level, rejecting numbers without a catalog.
    ///
    /// # Errors
    ///
    /// Returns `ParseClassLevelError` if `class` is outside 5..=12.
    pub fn class(class: u8) -> Result<Self, ParseClassLevelError> {
        if (MIN_CLASS..=MAX_CLASS).contains(&class) {
            Ok(Self::Class(class))
        } else {
            Err(ParseClassLevelError {
                raw: class.to_string(),
            })
        }
    }

    /// Lenient reading of a stored preference: anything unrecognised falls back
    /// to `ClassLevel::Default`.
    #[must_use]
    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }

    /// File name / URL path segment of the catalog for this level.
    #[must_use]
    pub fn catalog_key(self) -> String {
        match self {
            Self::Default => "physics.json".to_string(),
            Self::Class(class) => format!("physics-{class}.json"),
        }
    }

    /// Every selectable level, default first.
    pub fn all() -> impl Iterator<Item = ClassLevel> {
        std::iter::once(Self::Default).chain((MIN_CLASS..=MAX_CLASS).map(Self::Class))
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Class(class) => write!(f, "{class}"),
        }
    }
}

/// Error type for parsing a class level from string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported class level: {raw}")]
pub struct ParseClassLevelError {
    raw: String,
}

impl FromStr for ClassLevel {
    type Err = ParseClassLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("default") {
            return Ok(Self::Default);
        }
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(|class| Self::class(class).ok())
            .ok_or_else(|| ParseClassLevelError {
                raw: s.to_string(),
            })
    }
}
