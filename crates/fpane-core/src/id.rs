#![forbid(unsafe_code)]

//! Pane and element identifiers.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PaneError;

/// Case-insensitive pane identifier.
///
/// Stored lower-cased so `"Menu"` and `"menu"` name the same pane. Cloning is
/// cheap (shared string).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(Arc<str>);

impl PaneId {
    /// Validate and normalize an identifier.
    ///
    /// Identifiers must be non-empty and contain no whitespace.
    pub fn new(raw: &str) -> Result<Self, PaneError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(PaneError::InvalidId(raw.to_owned()));
        }
        Ok(Self(Arc::from(trimmed.to_lowercase())))
    }

    /// The normalized identifier.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PaneId({})", self.0)
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for PaneId {
    type Error = PaneError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for PaneId {
    type Error = PaneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<&PaneId> for PaneId {
    type Error = PaneError;

    fn try_from(value: &PaneId) -> Result<Self, Self::Error> {
        Ok(value.clone())
    }
}

#[cfg(feature = "serde")]
impl Serialize for PaneId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PaneId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Opaque handle to an element owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_case_insensitive() {
        let a = PaneId::new("Menu").unwrap();
        let b = PaneId::new("MENU").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "menu");
    }

    #[test]
    fn ids_trim_surrounding_space() {
        assert_eq!(PaneId::new("  tip ").unwrap().as_str(), "tip");
    }

    #[test]
    fn invalid_ids_rejected() {
        assert!(matches!(PaneId::new(""), Err(PaneError::InvalidId(_))));
        assert!(matches!(PaneId::new("   "), Err(PaneError::InvalidId(_))));
        assert!(matches!(PaneId::new("a b"), Err(PaneError::InvalidId(_))));
    }
}
