//! Unified error types for riskmap-tools.
//!
//! Every failure the scoring engine can detect maps onto one variant of
//! [`RiskMapError`]. Errors are raised at the call that detects them and are
//! never retried or silently replaced by defaults.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for riskmap-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RiskMapError {
    /// Malformed or duplicate input records, negative population/area
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid weights, cut points or unknown factor lookups
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A zone's factor set does not match the weight set
    #[error(
        "Incomplete factors for zone {zone}: missing [{}], unexpected [{}]",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    IncompleteFactors {
        zone: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// Operation not valid in the engine's current state
    #[error("Invalid engine state: {0}")]
    State(String),

    /// Unknown export format token
    #[error("Unsupported export format: '{0}' (supported: tabular, geo, json)")]
    UnsupportedFormat(String),

    /// Errors while reading zone input files
    #[error("Failed to parse zone data: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Output serialization errors
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Unknown input format for '{0}' - expected .csv, .json or .geojson")]
    UnknownFormat(String),

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Row {row}: expected {expected} fields, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: invalid number '{value}' in column '{column}'")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for riskmap-tools operations
pub type Result<T> = std::result::Result<T, RiskMapError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl RiskMapError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }

    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let message = format!("{source}");
        Self::Io {
            path: Some(path.into()),
            message,
            source,
        }
    }

    /// True for the error kinds that signal bad caller configuration.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for RiskMapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for RiskMapError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse("JSON deserialization", ParseErrorKind::InvalidJson(err.to_string()))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are prepended to the existing context, so a failure deep
/// in loading reads like `"loading zones.csv: row 4: ..."`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<RiskMapError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// `IncompleteFactors` and `UnsupportedFormat` carry structured payloads
/// that callers match on, so they pass through unchanged.
fn add_context_to_error(err: RiskMapError, new_ctx: &str) -> RiskMapError {
    match err {
        RiskMapError::Parse {
            context: existing,
            source,
        } => RiskMapError::Parse {
            context: chain_context(new_ctx, &existing),
            source,
        },
        RiskMapError::Io {
            path,
            message,
            source,
        } => RiskMapError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        RiskMapError::Validation(msg) => RiskMapError::Validation(chain_context(new_ctx, &msg)),
        RiskMapError::Config(msg) => RiskMapError::Config(chain_context(new_ctx, &msg)),
        RiskMapError::State(msg) => RiskMapError::State(chain_context(new_ctx, &msg)),
        RiskMapError::Serialization(msg) => {
            RiskMapError::Serialization(chain_context(new_ctx, &msg))
        }
        other @ (RiskMapError::IncompleteFactors { .. } | RiskMapError::UnsupportedFormat(_)) => {
            other
        }
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to a validation error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to a validation error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| RiskMapError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| RiskMapError::Validation(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_factors_display() {
        let err = RiskMapError::IncompleteFactors {
            zone: "10001".to_string(),
            missing: vec!["bird_density".to_string()],
            unexpected: vec!["rainfall".to_string()],
        };
        let display = err.to_string();
        assert!(display.contains("10001"), "{display}");
        assert!(display.contains("bird_density"), "{display}");
        assert!(display.contains("rainfall"), "{display}");
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = RiskMapError::UnsupportedFormat("xml".to_string());
        assert!(err.to_string().contains("'xml'"));
    }

    #[test]
    fn test_io_error_carries_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = RiskMapError::io("/data/zones.csv", io_err);
        assert!(err.to_string().contains("/data/zones.csv"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(RiskMapError::parse(
                "row 3",
                ParseErrorKind::MissingColumn("population".to_string()),
            ))
        }

        fn outer() -> Result<()> {
            inner().context("reading zones.csv").context("loading input")
        }

        match outer() {
            Err(RiskMapError::Parse { context, .. }) => {
                assert_eq!(context, "loading input: reading zones.csv: row 3");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_context_leaves_structured_errors_alone() {
        let err: Result<()> = Err(RiskMapError::UnsupportedFormat("xml".to_string()));
        match err.context("exporting") {
            Err(RiskMapError::UnsupportedFormat(token)) => assert_eq!(token, "xml"),
            other => panic!("Expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;
        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(RiskMapError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_option_context() {
        let none_value: Option<i32> = None;
        match none_value.context_none("missing zone") {
            Err(RiskMapError::Validation(msg)) => assert_eq!(msg, "missing zone"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
        assert_eq!(Some(7).context_none("unused").unwrap(), 7);
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
