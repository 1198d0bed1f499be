//! Generator configuration types
//!
//! Everything that used to be edited in source before a run (which table to
//! read, which column names the declaration) is carried here and handed to
//! the generator at invocation time.

use crate::types::{CodegenError, IdentifierMode, Result};
use serde::{Deserialize, Serialize};

/// What to do with a quoted slot whose value would break the literal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotePolicy {
    /// Fail the run with a validation error
    #[default]
    Reject,
    /// Copy the value into the literal unchanged
    Verbatim,
}

/// Configuration for the generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Identifier derivation rule
    pub mode: IdentifierMode,

    /// CSV field delimiter (default: comma)
    #[serde(default = "default_delimiter")]
    pub delimiter: u8,

    /// Handling of values that cannot sit inside a quoted literal
    #[serde(default)]
    pub quote_policy: QuotePolicy,

    /// Log a warning when two rows produce the same identifier
    #[serde(default = "default_true")]
    pub warn_on_collision: bool,
}

fn default_delimiter() -> u8 {
    b','
}

fn default_true() -> bool {
    true
}

impl GeneratorConfig {
    /// Create a configuration for the given mode with default settings
    pub fn new(mode: IdentifierMode) -> Self {
        Self {
            mode,
            delimiter: default_delimiter(),
            quote_policy: QuotePolicy::default(),
            warn_on_collision: true,
        }
    }

    /// Builder method: set the CSV delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder method: set the quoted-slot policy
    pub fn with_quote_policy(mut self, policy: QuotePolicy) -> Self {
        self.quote_policy = policy;
        self
    }

    /// Builder method: enable or disable collision warnings
    pub fn with_collision_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_collision = enabled;
        self
    }

    /// Check settings the CSV reader cannot work with
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(CodegenError::InvalidConfig(format!(
                "delimiter 0x{:02X} is not usable",
                self.delimiter
            )));
        }
        Ok(())
    }
}
