use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the three independent shift channels. Serialized lowercase, parsed
/// in either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const fn ordered() -> [Axis; 3] {
        [Axis::X, Axis::Y, Axis::Z]
    }

    pub const fn count() -> usize {
        3
    }

    /// Component index of this axis inside a 3-vector.
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }

    /// Name of the persisted property holding this axis's membership.
    pub fn field_name(self) -> &'static str {
        match self {
            Axis::X => "x_verts",
            Axis::Y => "y_verts",
            Axis::Z => "z_verts",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown shift axis: {0:?}")]
pub struct ParseAxisError(pub String);

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Axis::X),
            "y" | "Y" => Ok(Axis::Y),
            "z" | "Z" => Ok(Axis::Z),
            other => Err(ParseAxisError(other.to_string())),
        }
    }
}

impl TryFrom<String> for Axis {
    type Error = ParseAxisError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
