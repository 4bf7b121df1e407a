//! Composite orientation
//!
//! ```text
//! horizontal   ← →
//! vertical     ↑ ↓
//! both         ← → ↑ ↓
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Items laid out in a row
    #[default]
    Horizontal,
    /// Items laid out in a column
    Vertical,
    /// Arrow keys on both axes move through the items
    Both,
}

/// Arrow direction requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Orientation {
    /// Whether arrows along this direction move the selection
    pub fn accepts(&self, direction: Direction) -> bool {
        match (self, direction) {
            (Orientation::Both, _) => true,
            (Orientation::Horizontal, Direction::Left | Direction::Right) => true,
            (Orientation::Vertical, Direction::Up | Direction::Down) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
            Orientation::Both => "both",
        }
    }
}

impl Direction {
    /// True for directions that move towards the end of the sequence
    pub fn is_forward(&self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "horizontal" => Ok(Orientation::Horizontal),
            "vertical" => Ok(Orientation::Vertical),
            "both" => Ok(Orientation::Both),
            _ => Err(format!("Unknown orientation: {}", s)),
        }
    }
}
