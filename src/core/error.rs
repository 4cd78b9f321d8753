//! Error handling and error types for the OneR classifier.
//!
//! Fatal caller mistakes are reported through [`OneRError`] and abort the
//! current call without a partial result. Non-fatal signals (rows removed,
//! levels dropped, fallbacks taken) are not errors; they travel alongside the
//! result as [`Diagnostic`](crate::core::diagnostics::Diagnostic) values.

use std::io;
use thiserror::Error;

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum OneRError {
    /// Caller supplied inputs that cannot be processed (fewer than two
    /// columns, fewer than two target levels, label/bin count mismatch...)
    #[error("Usage error: {message}")]
    Usage {
        /// What was wrong with the input
        message: String,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Rejected value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Dimension mismatch errors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected size
        expected: String,
        /// Size found
        actual: String,
    },

    /// A named column is absent from a table
    #[error("Column not found: {name}")]
    MissingColumn {
        /// Requested column name
        name: String,
    },

    /// Missing values present where they are not allowed
    #[error("Missing values not allowed: {context}")]
    MissingValues {
        /// Where the missing values were found
        context: String,
    },

    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
    },

    /// Numerical computation errors (non-convergence, singular systems,
    /// degenerate statistical tests)
    #[error("Numerical error: {message}")]
    Numerical {
        /// Error description
        message: String,
    },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        /// Underlying error
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        /// Underlying error
        #[from]
        source: serde_json::Error,
    },

    /// TOML deserialization errors
    #[error("TOML parse error: {source}")]
    TomlDe {
        /// Underlying error
        #[from]
        source: toml::de::Error,
    },

    /// TOML serialization errors
    #[error("TOML serialization error: {source}")]
    TomlSer {
        /// Underlying error
        #[from]
        source: toml::ser::Error,
    },

    /// Bincode serialization errors
    #[error("Bincode error: {source}")]
    Bincode {
        /// Underlying error
        #[from]
        source: bincode::Error,
    },

    /// CSV parsing errors
    #[cfg(feature = "csv")]
    #[error("CSV parsing error: {source}")]
    Csv {
        /// Underlying error
        #[from]
        source: csv::Error,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
    },
}

/// Type alias for Results using OneRError
pub type Result<T> = std::result::Result<T, OneRError>;

impl OneRError {
    /// Create a usage error
    pub fn usage<S: Into<String>>(message: S) -> Self {
        OneRError::Usage {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        OneRError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        OneRError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a missing column error
    pub fn missing_column<S: Into<String>>(name: S) -> Self {
        OneRError::MissingColumn { name: name.into() }
    }

    /// Create a missing values error
    pub fn missing_values<S: Into<String>>(context: S) -> Self {
        OneRError::MissingValues {
            context: context.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        OneRError::Config {
            message: message.into(),
        }
    }

    /// Create a numerical error
    pub fn numerical<S: Into<String>>(message: S) -> Self {
        OneRError::Numerical {
            message: message.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        OneRError::Internal {
            message: message.into(),
        }
    }

    /// Whether the error belongs to the usage class: the caller must change
    /// its inputs before retrying.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            OneRError::Usage { .. }
                | OneRError::InvalidParameter { .. }
                | OneRError::DimensionMismatch { .. }
                | OneRError::MissingColumn { .. }
                | OneRError::MissingValues { .. }
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            OneRError::Usage { .. } => "usage",
            OneRError::InvalidParameter { .. } => "invalid_parameter",
            OneRError::DimensionMismatch { .. } => "dimension_mismatch",
            OneRError::MissingColumn { .. } => "missing_column",
            OneRError::MissingValues { .. } => "missing_values",
            OneRError::Config { .. } => "config",
            OneRError::Numerical { .. } => "numerical",
            OneRError::IO { .. } => "io",
            OneRError::Json { .. } => "json",
            OneRError::TomlDe { .. } | OneRError::TomlSer { .. } => "toml",
            OneRError::Bincode { .. } => "bincode",
            #[cfg(feature = "csv")]
            OneRError::Csv { .. } => "csv",
            OneRError::Internal { .. } => "internal",
        }
    }
}

/// Convenience macro for usage error creation
#[macro_export]
macro_rules! usage_error {
    ($msg:expr) => {
        $crate::core::error::OneRError::usage($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::OneRError::usage(format!($fmt, $($arg)*))
    };
}

/// Return early with the given error when the condition does not hold
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = OneRError::usage("data must have at least two columns");
        assert_eq!(err.category(), "usage");
        assert!(err.is_usage_error());

        let err = OneRError::numerical("logistic fit did not converge");
        assert_eq!(err.category(), "numerical");
        assert!(!err.is_usage_error());
    }

    #[test]
    fn test_error_macros() {
        let err = usage_error!("test error");
        assert!(matches!(err, OneRError::Usage { .. }));

        let err = usage_error!("nbins must be at least {}", 2);
        assert!(err.to_string().contains("at least 2"));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(n: usize) -> Result<usize> {
            ensure!(n > 1, OneRError::invalid_parameter("nbins", n.to_string(), "must be at least 2"));
            Ok(n)
        }
        assert!(check(1).is_err());
        assert_eq!(check(3).unwrap(), 3);
    }

    #[test]
    fn test_error_display() {
        let err = OneRError::missing_column("Petal.Width");
        let error_string = format!("{}", err);
        assert!(error_string.contains("Column not found"));
        assert!(error_string.contains("Petal.Width"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: OneRError = io_err.into();
        assert!(matches!(err, OneRError::IO { .. }));
        assert_eq!(err.category(), "io");
    }
}
