//! Liquid colors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal identifier of one liquid color.
///
/// An empty slot has no color at all and is modelled as `Option<Color>::None`,
/// so every `u8` value is a usable color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u8);

impl Color {
    /// Number of distinct colors that can be represented.
    pub const MAX_COLORS: usize = u8::MAX as usize + 1;

    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Color for a zero-based palette index, if it fits the palette.
    pub fn from_index(index: usize) -> Option<Self> {
        u8::try_from(index).ok().map(Self)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u8> for Color {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index_bounds() {
        assert_eq!(Color::from_index(0), Some(Color::new(0)));
        assert_eq!(Color::from_index(255), Some(Color::new(255)));
        assert_eq!(Color::from_index(Color::MAX_COLORS), None);
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Color::new(7)).unwrap(), "7");
        let color: Color = serde_json::from_str("3").unwrap();
        assert_eq!(color.index(), 3);
    }
}
