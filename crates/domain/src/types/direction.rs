//! Spatial direction relative to the companion.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction relative to the companion, as named in `parameters.spatial_direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpatialDirection {
    Front,
    Left,
    Right,
    Back,
}

impl SpatialDirection {
    pub fn all() -> &'static [SpatialDirection] {
        &[
            SpatialDirection::Front,
            SpatialDirection::Left,
            SpatialDirection::Right,
            SpatialDirection::Back,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpatialDirection::Front => "Front",
            SpatialDirection::Left => "Left",
            SpatialDirection::Right => "Right",
            SpatialDirection::Back => "Back",
        }
    }
}

impl fmt::Display for SpatialDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpatialDirection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Front" => Ok(SpatialDirection::Front),
            "Left" => Ok(SpatialDirection::Left),
            "Right" => Ok(SpatialDirection::Right),
            "Back" => Ok(SpatialDirection::Back),
            _ => Err(DomainError::parse(format!("Unknown spatial direction: {}", s))),
        }
    }
}
