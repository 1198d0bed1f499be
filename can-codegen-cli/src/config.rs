//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use can_codegen::IdentifierMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default table read in `input` mode
pub const DEFAULT_INPUT_TABLE: &str = "rawcsv/CAN IDs (comprehensive) - inverter input.csv";
/// Default table read in `output` mode
pub const DEFAULT_OUTPUT_TABLE: &str = "rawcsv/CAN IDs (comprehensive) - inverter output.csv";
/// Default destination for generated declarations
pub const DEFAULT_OUTPUT_FILE: &str = "tools/task_complete.txt";

/// Main application configuration (loaded from a TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Mode to run in when none is given on the command line
    pub mode: Option<IdentifierMode>,
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub generator: GeneratorSettings,
}

/// One candidate table per mode
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputsConfig {
    #[serde(default = "default_input_table")]
    pub input: PathBuf,
    #[serde(default = "default_output_table")]
    pub output: PathBuf,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            input: default_input_table(),
            output: default_output_table(),
        }
    }
}

impl InputsConfig {
    /// Table selected by a mode
    pub fn for_mode(&self, mode: IdentifierMode) -> &Path {
        match mode {
            IdentifierMode::Input => &self.input,
            IdentifierMode::Output => &self.output,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_file")]
    pub file: PathBuf,
    /// Optional JSON run summary
    pub summary: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_output_file(),
            summary: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub allow_unquotable: bool,
    #[serde(default = "default_true")]
    pub warn_on_collision: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            allow_unquotable: false,
            warn_on_collision: true,
        }
    }
}

impl GeneratorSettings {
    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => bail!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ),
        }
    }
}

fn default_input_table() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_TABLE)
}

fn default_output_table() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_TABLE)
}

fn default_output_file() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        self.generator.delimiter_byte()?;
        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}
