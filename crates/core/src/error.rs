//! Syntax error records and the collector they accumulate in, plus the
//! fatal build error for structural invariant violations.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A recoverable syntax error observed during lexing or parsing.
///
/// Syntax errors are data, not control flow: the scan records them and
/// keeps going, and the caller decides what a non-empty list means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxError {
    /// 1-based source line.
    pub line: u32,
    /// 0-based column of the offending token or character.
    pub column: u32,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: u32, column: u32, message: impl Into<String>) -> Self {
        SyntaxError {
            line,
            column,
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Append-only sink for syntax errors.
///
/// Shared by the lexer and the grammar parser for one scan. It has no
/// knowledge of the tree builder; the two are exercised independently.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<SyntaxError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        ErrorCollector::default()
    }

    pub fn record(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }
}

/// A fatal builder failure.
///
/// Unlike [`SyntaxError`], these indicate a defect in the grammar/builder
/// pairing, not malformed input. They abort the walk immediately and are
/// never collected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A stage scope was exited without ever being entered.
    #[error("exited a stage scope that was never entered")]
    UnmatchedStageExit,
    /// A single-use builder was driven through a second walk.
    #[error("tree builder instances are single-use and cannot walk twice")]
    BuilderReused,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collector_preserves_order() {
        let mut errors = ErrorCollector::new();
        errors.record(SyntaxError::new(1, 0, "first"));
        errors.record(SyntaxError::new(2, 4, "second"));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.errors()[0].message, "first");
        assert_eq!(errors.errors()[1].line, 2);
    }

    #[test]
    fn collector_starts_empty() {
        let errors = ErrorCollector::new();
        assert!(errors.is_empty());
        assert_eq!(errors.into_errors(), Vec::new());
    }

    #[test]
    fn syntax_error_displays_position() {
        let e = SyntaxError::new(3, 7, "unexpected token");
        assert_eq!(e.to_string(), "3:7: unexpected token");
    }

    #[test]
    fn syntax_error_serializes_to_json() {
        let e = SyntaxError::new(1, 0, "boom");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "line": 1, "column": 0, "message": "boom" })
        );
    }
}
