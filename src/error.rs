//! Unified error handling for the trail-junctions library.
//!
//! The classifier itself never fails. Errors only come from the boundary:
//! building trails, validating configuration and parsing GeoJSON text.

use std::fmt;

/// Unified error type for trail-junctions operations.
#[derive(Debug, Clone, PartialEq)]
pub enum JunctionError {
    /// Trail has no points at all
    EmptyTrail { name: String },
    /// Trail name is empty or whitespace
    EmptyName,
    /// Record at `index` has no usable name
    MissingName { index: usize },
    /// Trail has a coordinate that is not a finite number pair
    InvalidCoordinates { name: String, message: String },
    /// Configuration error
    ConfigError { message: String },
    /// GeoJSON text could not be parsed
    GeoJsonError { message: String },
}

impl fmt::Display for JunctionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JunctionError::EmptyTrail { name } => {
                write!(f, "Trail '{}' has no points", name)
            }
            JunctionError::EmptyName => write!(f, "Trail name is blank"),
            JunctionError::MissingName { index } => {
                write!(f, "Record {} has no name", index)
            }
            JunctionError::InvalidCoordinates { name, message } => {
                write!(f, "Trail '{}' has invalid coordinates: {}", name, message)
            }
            JunctionError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            JunctionError::GeoJsonError { message } => {
                write!(f, "GeoJSON error: {}", message)
            }
        }
    }
}

impl std::error::Error for JunctionError {}

impl From<serde_json::Error> for JunctionError {
    fn from(err: serde_json::Error) -> Self {
        JunctionError::GeoJsonError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for trail-junctions operations.
pub type Result<T> = std::result::Result<T, JunctionError>;

/// Extension trait for converting Option to JunctionError.
pub trait OptionExt<T> {
    /// Convert Option to Result with a missing name error.
    fn ok_or_missing_name(self, index: usize) -> Result<T>;

    /// Convert Option to Result with an empty trail error.
    fn ok_or_empty_trail(self, name: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_missing_name(self, index: usize) -> Result<T> {
        self.ok_or(JunctionError::MissingName { index })
    }

    fn ok_or_empty_trail(self, name: &str) -> Result<T> {
        self.ok_or_else(|| JunctionError::EmptyTrail {
            name: name.to_string(),
        })
    }
}
