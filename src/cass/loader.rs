//! CASS file loading
//!
//! A `.cas` file holds a forest: one record per non-blank line, each
//! parsed independently, results concatenated in file order. [`Loader`]
//! wraps the per-record parser with file/string sources and line-number
//! error context. `forest` fails on the first bad record; `forest_lossy`
//! skips bad records and hands them back so the batch layer can decide
//! whether to log or escalate.

use crate::cass::builder::parse_record;
use crate::cass::config::Config;
use crate::cass::error::{LoadError, RecordError};
use crate::cass::tree::Tree;
use std::fs;
use std::path::Path;

/// The ordered sequence of trees parsed from one file.
pub type Forest = Vec<Tree>;

/// Loads CASS sources and parses them into forests.
pub struct Loader {
    source: String,
    config: Config,
}

impl Loader {
    /// Load from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P, config: Config) -> Result<Self, LoadError> {
        let source = fs::read_to_string(path)?;
        Ok(Loader { source, config })
    }

    /// Load from a string.
    pub fn from_string<S: Into<String>>(source: S, config: Config) -> Self {
        Loader {
            source: source.into(),
            config,
        }
    }

    /// Parse every record, failing on the first bad one with its 1-based
    /// line number attached.
    pub fn forest(&self) -> Result<Forest, LoadError> {
        let mut trees = Vec::new();
        for (number, line) in self.source.lines().enumerate() {
            match parse_record(line, &self.config) {
                Ok(Some(tree)) => trees.push(tree),
                Ok(None) => {}
                Err(source) => {
                    return Err(LoadError::Record {
                        line: number + 1,
                        source,
                    })
                }
            }
        }
        Ok(trees)
    }

    /// Parse every record, skipping bad ones. Returns the forest plus
    /// the skipped records' line numbers and errors.
    pub fn forest_lossy(&self) -> (Forest, Vec<(usize, RecordError)>) {
        let mut trees = Vec::new();
        let mut skipped = Vec::new();
        for (number, line) in self.source.lines().enumerate() {
            match parse_record(line, &self.config) {
                Ok(Some(tree)) => trees.push(tree),
                Ok(None) => {}
                Err(err) => skipped.push((number + 1, err)),
            }
        }
        (trees, skipped)
    }
}

/// Shortcut: load and parse a file.
pub fn load_file<P: AsRef<Path>>(path: P, config: Config) -> Result<Forest, LoadError> {
    Loader::from_path(path, config)?.forest()
}

/// Shortcut: parse a forest from an in-memory string.
pub fn load_str(source: &str, config: Config) -> Result<Forest, LoadError> {
    Loader::from_string(source, config).forest()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forest_in_file_order() {
        let source = "2\tI#fd#a\t1\tN1\n2\tI#fd#b\t1\tN2\n";
        let forest = load_str(source, Config::default()).unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].node(forest[0].root()).label, "a");
        assert_eq!(forest[1].node(forest[1].root()).label, "b");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let source = "\n2\tI#fd#a\t1\tN1\n\n   \n2\tI#fd#b\t1\tN2\n\n";
        let forest = load_str(source, Config::default()).unwrap();
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn test_error_carries_line_number() {
        let source = "2\tI#fd#a\t1\tN1\n1\tX\n";
        let err = load_str(source, Config::default()).unwrap_err();
        assert_eq!(
            err,
            LoadError::Record {
                line: 2,
                source: RecordError::UnknownNodeTag("X".to_string()),
            }
        );
    }

    #[test]
    fn test_lossy_loading_skips_bad_records() {
        let source = "2\tI#fd#a\t1\tN1\n1\tX\n2\tI#fd#b\t1\tN2\n";
        let (forest, skipped) = Loader::from_string(source, Config::default()).forest_lossy();
        assert_eq!(forest.len(), 2);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].0, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Loader::from_path("does-not-exist.cas", Config::default());
        assert!(matches!(result, Err(LoadError::Io(_))));
    }

    #[test]
    fn test_windows_line_endings_are_tolerated() {
        let source = "2\tI#fd#a\t1\tN1\r\n2\tI#fd#b\t1\tN2\r\n";
        let forest = load_str(source, Config::default()).unwrap();
        assert_eq!(forest.len(), 2);
    }
}
