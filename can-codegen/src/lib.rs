//! CAN Message Declaration Generator Library
//!
//! Reads a CSV table of CAN message definitions and renders one
//! `const CanMessage` declaration per data row in a fixed layout.
//!
//! # Architecture
//!
//! This library holds the whole transform:
//! - Reads the table row by row (header skipped, exactly 11 columns per row)
//! - Derives an identifier per row according to the configured mode
//! - Renders the fixed declaration template and streams it to the output
//! - Reports identifier collisions and values that cannot be quoted
//!
//! The library does NOT:
//! - Parse command line arguments or config files
//! - Set up logging
//! - Write run summaries
//!
//! All of that is in the application layer (can-codegen-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use can_codegen::{Generator, GeneratorConfig, IdentifierMode};
//! use std::path::Path;
//!
//! let config = GeneratorConfig::new(IdentifierMode::Input);
//! let generator = Generator::new(config);
//!
//! let report = generator
//!     .generate_file(
//!         Path::new("rawcsv/CAN IDs (comprehensive) - inverter input.csv"),
//!         Path::new("tools/task_complete.txt"),
//!     )
//!     .unwrap();
//!
//! for collision in &report.collisions {
//!     eprintln!("{} reused on row {}", collision.identifier, collision.row);
//! }
//! ```

// Public modules
pub mod config;
pub mod generator;
pub mod identifier;
pub mod template;
pub mod types;

// Re-export main types for convenience
pub use config::{GeneratorConfig, QuotePolicy};
pub use generator::Generator;
pub use types::{
    CodegenError, GeneratedDeclaration, GenerationReport, IdentifierCollision, IdentifierMode,
    MessageRow, Result, COLUMN_COUNT,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a generator over an empty table writes nothing
        let generator = Generator::new(GeneratorConfig::new(IdentifierMode::Input));
        let mut out: Vec<u8> = Vec::new();
        let report = generator.generate("header\n".as_bytes(), &mut out).unwrap();
        assert_eq!(report.rows, 0);
        assert!(out.is_empty());
    }
}
