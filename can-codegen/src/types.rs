//! Core types for the CAN declaration generator
//!
//! This module defines the row model read from the message CSV, the rendered
//! declaration, the per-run report and the error type shared by the library.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Number of columns every data row must carry
pub const COLUMN_COUNT: usize = 11;

/// Errors that can occur while generating declarations
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("Failed to access {path:?}: {source}")]
    FileAccessError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Row {row}: expected {expected} columns, found {found}")]
    ColumnCountError {
        /// 1-based data row index (header excluded)
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}, column {column}: value {value:?} cannot be placed inside a quoted literal")]
    UnquotableFieldError {
        row: usize,
        /// 1-based column number
        column: usize,
        value: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Selects the input table and the identifier derivation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierMode {
    /// Identifier from column 1, suffixed with the row index
    Input,
    /// Identifier from column 3, no suffix
    Output,
}

impl IdentifierMode {
    /// Lowercase name used on the command line and in config files
    pub const fn as_str(&self) -> &'static str {
        match self {
            IdentifierMode::Input => "input",
            IdentifierMode::Output => "output",
        }
    }
}

impl fmt::Display for IdentifierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IdentifierMode {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "input" => Ok(IdentifierMode::Input),
            "output" => Ok(IdentifierMode::Output),
            other => Err(CodegenError::InvalidConfig(format!(
                "unknown mode '{}' (expected 'input' or 'output')",
                other
            ))),
        }
    }
}

/// One data row of the message table
///
/// Fields are positional. Column 1 is the human readable message name and
/// column 3 is the symbolic name; the remaining columns are copied through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    /// 1-based data row index (header excluded)
    pub index: usize,
    /// The eleven raw column values, in file order
    pub fields: [String; COLUMN_COUNT],
}

impl MessageRow {
    /// Build a row from a CSV record, rejecting anything that is not exactly
    /// eleven columns wide
    pub fn from_record(index: usize, record: &StringRecord) -> Result<Self> {
        Self::from_fields(index, record.iter())
    }

    /// Build a row from any sequence of column values
    pub fn from_fields<I, S>(index: usize, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let found = values.len();

        let fields: [String; COLUMN_COUNT] = values.try_into().map_err(|_| {
            CodegenError::ColumnCountError {
                row: index,
                expected: COLUMN_COUNT,
                found,
            }
        })?;

        Ok(Self { index, fields })
    }

    /// Get a column by its 1-based number, `None` outside 1..=11
    pub fn get(&self, column: usize) -> Option<&str> {
        column
            .checked_sub(1)
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
    }

    /// Column lookup for in-range column numbers
    pub(crate) fn field(&self, column: usize) -> &str {
        &self.fields[column - 1]
    }

    /// Column 1: human readable message name
    pub fn name(&self) -> &str {
        self.field(1)
    }

    /// Column 3: symbolic message name
    pub fn symbol(&self) -> &str {
        self.field(3)
    }
}

/// A rendered declaration for one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDeclaration {
    /// Row the declaration was rendered from
    pub row: usize,
    /// Identifier used for the declaration name and the third slot
    pub identifier: String,
    /// Rendered text, including the trailing newline
    pub text: String,
}

/// Two rows that produced the same identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierCollision {
    pub identifier: String,
    /// Row that first used the identifier
    pub first_row: usize,
    /// Row that repeated it
    pub row: usize,
}

/// Summary of a completed generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Number of declarations written
    pub rows: usize,
    /// Identifiers in output order
    pub identifiers: Vec<String>,
    /// Repeated identifiers, in the order they were found
    pub collisions: Vec<IdentifierCollision>,
}

impl GenerationReport {
    /// True when every identifier in the output is distinct
    pub fn is_collision_free(&self) -> bool {
        self.collisions.is_empty()
    }
}
