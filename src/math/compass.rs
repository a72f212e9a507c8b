use std::fmt;
use std::str::FromStr;

use crate::error::SimulationError;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Correction added to the yaw so that a boat at rest (yaw 0, facing +Z) reads south
pub const HEADING_CORRECTION_DEGREES: f64 = 270.0;

/// One of the four coarse compass quadrants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum CompassDirection {
    #[default]
    North,
    East,
    South,
    West,
}

impl CompassDirection {
    /// All quadrants in clockwise order
    pub const ALL: [CompassDirection; 4] = [
        CompassDirection::North,
        CompassDirection::East,
        CompassDirection::South,
        CompassDirection::West,
    ];

    /// Buckets a yaw angle (radians) into a compass quadrant.
    ///
    /// The corrected heading is split into 90° quadrants centred on 0/90/180/270:
    ///
    /// | corrected heading | bucket |
    /// |-------------------|--------|
    /// | [315, 45)         | E      |
    /// | [45, 135)         | N      |
    /// | [135, 225)        | W      |
    /// | [225, 315)        | S      |
    pub fn from_yaw(yaw: f64) -> Self {
        let heading = heading_degrees(yaw);

        if !(45.0..315.0).contains(&heading) {
            CompassDirection::East
        } else if heading < 135.0 {
            CompassDirection::North
        } else if heading < 225.0 {
            CompassDirection::West
        } else {
            CompassDirection::South
        }
    }

    /// Single-letter abbreviation
    pub fn as_char(&self) -> char {
        match self {
            CompassDirection::North => 'N',
            CompassDirection::East => 'E',
            CompassDirection::South => 'S',
            CompassDirection::West => 'W',
        }
    }
}

/// Corrected compass heading in degrees, always in `[0, 360)`
pub fn heading_degrees(yaw: f64) -> f64 {
    (crate::math::to_degrees(yaw) + HEADING_CORRECTION_DEGREES).rem_euclid(360.0)
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for CompassDirection {
    type Err = SimulationError;

    /// Parses by first letter, case-insensitive ("n", "North", "W" ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('N') => Ok(CompassDirection::North),
            Some('E') => Ok(CompassDirection::East),
            Some('S') => Ok(CompassDirection::South),
            Some('W') => Ok(CompassDirection::West),
            _ => Err(SimulationError::InvalidParameter(format!(
                "unknown compass direction: {:?}",
                s
            ))),
        }
    }
}
