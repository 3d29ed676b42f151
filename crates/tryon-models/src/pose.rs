//! Pose selection for try-on requests.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Poses supported by the try-on service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Pose {
    /// Person facing the camera
    #[default]
    Front,
    /// Profile view
    Side,
    /// Halfway between front and side
    ThreeQuarter,
}

impl Pose {
    /// All available poses, in form order.
    pub const ALL: &'static [Pose] = &[Pose::Front, Pose::Side, Pose::ThreeQuarter];

    /// Returns the pose as sent in the `pose` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pose::Front => "front",
            Pose::Side => "side",
            Pose::ThreeQuarter => "three-quarter",
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Pose {
    type Err = PoseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "front" => Ok(Pose::Front),
            "side" => Ok(Pose::Side),
            "three-quarter" | "three_quarter" => Ok(Pose::ThreeQuarter),
            _ => Err(PoseParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown pose: {0} (expected front, side or three-quarter)")]
pub struct PoseParseError(String);
