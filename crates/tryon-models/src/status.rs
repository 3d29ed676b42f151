//! Try-on request status.
//!
//! The service reports status as an open string. The recognized values get
//! their own variants; anything else is kept verbatim in [`TryOnStatus::Unknown`]
//! so callers can still render it instead of matching no branch at all.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lifecycle status of a try-on request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TryOnStatus {
    /// Accepted, not yet picked up
    #[default]
    Pending,
    /// Inference in progress
    Processing,
    /// Result image is available
    Completed,
    /// The service gave up on the request
    Failed,
    /// Value this client does not recognize
    Unknown(String),
}

impl TryOnStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &str {
        match self {
            TryOnStatus::Pending => "pending",
            TryOnStatus::Processing => "processing",
            TryOnStatus::Completed => "completed",
            TryOnStatus::Failed => "failed",
            TryOnStatus::Unknown(raw) => raw,
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TryOnStatus::Completed | TryOnStatus::Failed)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TryOnStatus::Completed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TryOnStatus::Failed)
    }
}

impl From<&str> for TryOnStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "pending" => TryOnStatus::Pending,
            "processing" => TryOnStatus::Processing,
            "completed" => TryOnStatus::Completed,
            "failed" => TryOnStatus::Failed,
            other => TryOnStatus::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for TryOnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TryOnStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl JsonSchema for TryOnStatus {
    fn schema_name() -> String {
        "TryOnStatus".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

impl<'de> Deserialize<'de> for TryOnStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TryOnStatus::from(raw.as_str()))
    }
}
