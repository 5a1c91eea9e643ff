//! Error types for map loading and saving
//!
//! [`MapError`] is fatal to a whole load or save call. [`RecordError`] is fatal
//! to a single line only: the parser reports it and moves on.

use std::path::PathBuf;

use crate::coercion::CoercionError;

/// Errors that abort a load or save call
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Cannot open {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid file format: expected header {expected:?}, found {found:?}")]
    Format {
        expected: &'static str,
        found: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Field '{field}' cannot be written to a map file: {value:?}")]
    Unrepresentable {
        field: &'static str,
        value: String,
    },
}

impl MapError {
    /// Check if the error came from the header check
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

/// Result type for map operations
pub type MapResult<T> = Result<T, MapError>;

/// Errors that reject a single record line
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("'{keyword}' needs at least {required} parameters, found {found}")]
    ParameterCount {
        keyword: String,
        found: usize,
        required: usize,
    },

    #[error("'{keyword}' is not a mesh type")]
    MeshType { keyword: String },

    #[error("{0}")]
    Coercion(#[from] CoercionError),

    #[error("point light limit of {max} reached")]
    Capacity { max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coercion::FieldKind;

    #[test]
    fn test_format_error_display() {
        let err = MapError::Format {
            expected: "[RENGINE MAP FORMAT V1.0]",
            found: "hello".to_string(),
        };
        assert!(err.is_format_error());
        assert!(err.to_string().contains("hello"));
    }

    #[test]
    fn test_coercion_converts_to_record_error() {
        let coercion = CoercionError {
            field: "fov",
            token: "wide".to_string(),
            expected: FieldKind::Float,
        };
        let err: RecordError = coercion.clone().into();
        assert_eq!(err, RecordError::Coercion(coercion));
        assert_eq!(err.to_string(), "field 'fov' expected float, found \"wide\"");
    }

    #[test]
    fn test_source_unavailable_keeps_cause() {
        use std::error::Error;

        let err = MapError::SourceUnavailable {
            path: PathBuf::from("missing.rem"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(!err.is_format_error());
    }
}
