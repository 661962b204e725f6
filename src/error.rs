//! Error types shared by configuration, generation and export.

use std::fmt;

use thiserror::Error;

/// Result type used throughout the crate.
pub type RodMeshResult<T> = Result<T, RodMeshError>;

/// Which axial stack a segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stack {
    Fuel,
    Clad,
}

impl Stack {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fuel => "fuel",
            Self::Clad => "clad",
        }
    }
}

/// Points at one segment of a stack, 1-based like the patch suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRef {
    pub stack: Stack,
    pub index: usize,
}

impl SegmentRef {
    #[must_use]
    pub const fn fuel(index: usize) -> Self {
        Self {
            stack: Stack::Fuel,
            index,
        }
    }

    #[must_use]
    pub const fn clad(index: usize) -> Self {
        Self {
            stack: Stack::Clad,
            index,
        }
    }
}

impl fmt::Display for SegmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} segment {}", self.stack.label(), self.index)
    }
}

#[derive(Debug, Error)]
pub enum RodMeshError {
    /// Missing or contradictory input parameters. Detected before any output is produced.
    #[error("configuration error{}: `{parameter}` {message}", segment_suffix(.segment))]
    Configuration {
        segment: Option<SegmentRef>,
        parameter: String,
        message: String,
    },
    /// An internal invariant of the generated topology does not hold.
    #[error("topology error: {0}")]
    Topology(String),
    #[error("invalid rod description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RodMeshError {
    pub fn config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            segment: None,
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    pub fn config_at(
        segment: SegmentRef,
        parameter: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            segment: Some(segment),
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    pub fn topology(message: impl Into<String>) -> Self {
        Self::Topology(message.into())
    }

    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

fn segment_suffix(segment: &Option<SegmentRef>) -> String {
    segment.map(|s| format!(" ({s})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_message_names_parameter_and_segment() {
        let err = RodMeshError::config_at(SegmentRef::fuel(3), "rDishFuel", "exceeds land radius");
        let text = err.to_string();
        assert!(text.contains("rDishFuel"));
        assert!(text.contains("fuel segment 3"));
        assert!(err.is_configuration());
    }

    #[test]
    fn configuration_without_segment_has_no_suffix() {
        let err = RodMeshError::config("geometryType", "is missing");
        assert_eq!(err.to_string(), "configuration error: `geometryType` is missing");
    }
}
