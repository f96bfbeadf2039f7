//! Errors for CASS record parsing and file loading
//!
//! All record errors are fatal for the single record being parsed; no
//! partial tree is ever returned. Callers that iterate a file decide
//! whether to skip, log, or escalate.

use crate::cass::config::ConfigError;
use std::fmt;

/// Errors that can occur while deserializing one CASS record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// A mode knob was outside its enumerated range.
    Config(ConfigError),
    /// Declared node count disagrees with the number of nodes produced.
    CountMismatch { declared: usize, actual: usize },
    /// A node token carried an unrecognized tag byte.
    UnknownNodeTag(String),
    /// An internal label was missing its `#annotation#` prefix.
    MalformedInternalLabel(String),
    /// Child-arity accounting failed to consume exactly the node table.
    TreeShapeMismatch { consumed: usize, total: usize },
    /// A prev/next-use index pointed outside the node table.
    UseIndexOutOfRange { index: usize, len: usize },
    /// The record was truncated or carried an ill-typed token where a
    /// count, arity, or use index was expected.
    Malformed(String),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Config(err) => write!(f, "{}", err),
            RecordError::CountMismatch { declared, actual } => {
                write!(
                    f,
                    "declared node count {} but record produced {} nodes",
                    declared, actual
                )
            }
            RecordError::UnknownNodeTag(token) => {
                write!(f, "unknown node tag in token {:?}", token)
            }
            RecordError::MalformedInternalLabel(label) => {
                write!(f, "malformed internal label {:?}", label)
            }
            RecordError::TreeShapeMismatch { consumed, total } => {
                write!(
                    f,
                    "tree shape mismatch: consumed {} of {} structural nodes",
                    consumed, total
                )
            }
            RecordError::UseIndexOutOfRange { index, len } => {
                write!(
                    f,
                    "use index {} out of range for node table of length {}",
                    index, len
                )
            }
            RecordError::Malformed(msg) => write!(f, "malformed record: {}", msg),
        }
    }
}

impl std::error::Error for RecordError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for RecordError {
    fn from(err: ConfigError) -> Self {
        RecordError::Config(err)
    }
}

/// Errors that can occur when loading a CASS file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// IO error when reading the file.
    Io(String),
    /// A record failed to parse; carries the 1-based line number.
    Record { line: usize, source: RecordError },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(msg) => write!(f, "IO error: {}", msg),
            LoadError::Record { line, source } => write!(f, "line {}: {}", line, source),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(_) => None,
            LoadError::Record { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_display() {
        let err = RecordError::CountMismatch {
            declared: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "declared node count 3 but record produced 2 nodes"
        );

        let err = RecordError::UnknownNodeTag("Xfoo".to_string());
        assert!(err.to_string().contains("Xfoo"));
    }

    #[test]
    fn test_load_error_carries_line_number() {
        let err = LoadError::Record {
            line: 7,
            source: RecordError::Malformed("truncated".to_string()),
        };
        assert_eq!(err.to_string(), "line 7: malformed record: truncated");
    }

    #[test]
    fn test_config_error_converts() {
        let config_err = crate::cass::config::ConfigError::InvalidMode {
            knob: "gvar_mode",
            value: 9,
            max: 3,
        };
        let err: RecordError = config_err.into();
        assert_eq!(err.to_string(), "invalid gvar_mode value 9 (expected 0..=3)");
    }
}
