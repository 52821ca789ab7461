//! Custom error types for imputation analysis.
//!
//! This module provides the error hierarchy using `thiserror` so callers can
//! tell a missing input file apart from malformed metadata or a polars failure.
//!
//! Errors are serializable as `{code, message}` pairs, which keeps the CLI's
//! JSON output and any embedding application on the same footing.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// Which input file an I/O-level failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Metadata,
    Data,
    Config,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Metadata => write!(f, "metadata"),
            InputKind::Data => write!(f, "data"),
            InputKind::Config => write!(f, "config"),
        }
    }
}

/// The main error type for imputation analysis.
#[derive(Error, Debug)]
pub enum ImputeError {
    /// An input file does not exist.
    #[error("{kind} file not found: {}", .path.display())]
    FileNotFound { kind: InputKind, path: PathBuf },

    /// No column metadata was supplied.
    #[error("No column metadata provided")]
    EmptyMetadata,

    /// A metadata record is malformed.
    #[error("Invalid metadata at row {row}: {reason}")]
    InvalidMetadata { row: usize, reason: String },

    /// The same column is described twice.
    #[error("Column '{0}' is declared more than once in metadata")]
    DuplicateColumn(String),

    /// Declared data type is not recognised.
    #[error("Unknown data type '{value}' for column '{column}'")]
    UnknownColumnType { column: String, value: String },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Analysis of a single column failed.
    #[error("Failed to analyze column '{column}': {reason}")]
    AnalysisFailed { column: String, reason: String },

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ImputeError>,
    },
}

impl ImputeError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ImputeError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, independent of the message text.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "FILE_NOT_FOUND",
            Self::EmptyMetadata => "EMPTY_METADATA",
            Self::InvalidMetadata { .. } => "INVALID_METADATA",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::UnknownColumnType { .. } => "UNKNOWN_COLUMN_TYPE",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::AnalysisFailed { .. } => "ANALYSIS_FAILED",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a missing input file (looks through context).
    pub fn is_file_not_found(&self) -> bool {
        match self {
            Self::FileNotFound { .. } => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            Self::WithContext { source, .. } => source.is_file_not_found(),
            _ => false,
        }
    }

    /// Which input a `FileNotFound` refers to, if any.
    pub fn missing_input(&self) -> Option<InputKind> {
        match self {
            Self::FileNotFound { kind, .. } => Some(*kind),
            Self::WithContext { source, .. } => source.missing_input(),
            _ => None,
        }
    }

    /// Check if the error stems from caller-supplied metadata.
    pub fn is_metadata_error(&self) -> bool {
        match self {
            Self::EmptyMetadata
            | Self::InvalidMetadata { .. }
            | Self::DuplicateColumn(_)
            | Self::UnknownColumnType { .. } => true,
            Self::WithContext { source, .. } => source.is_metadata_error(),
            _ => false,
        }
    }
}

impl From<ConfigValidationError> for ImputeError {
    fn from(err: ConfigValidationError) -> Self {
        ImputeError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for ImputeError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ImputeError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, ImputeError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ImputeError::Polars(e).with_context(context))
    }
}
