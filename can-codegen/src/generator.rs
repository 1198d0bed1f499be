//! Main generator API
//!
//! This module provides the primary interface for the library. The Generator
//! struct reads the message table, renders one declaration per data row and
//! streams the result to the output.

use crate::config::GeneratorConfig;
use crate::identifier;
use crate::template;
use crate::types::{
    CodegenError, GeneratedDeclaration, GenerationReport, IdentifierCollision, MessageRow,
    Result, COLUMN_COUNT,
};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// The main generator struct - entry point for all generation runs
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Create a new generator with the given configuration
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Configuration this generator was built with
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Render a single row into its declaration
    ///
    /// Fails when a quoted column, or the column the identifier is built
    /// from, holds a value the literal cannot carry and the quote policy is
    /// `Reject`.
    pub fn render_row(&self, row: &MessageRow) -> Result<GeneratedDeclaration> {
        let policy = self.config.quote_policy;
        template::check_quoted_fields(row, policy)?;
        template::check_quoted_value(row, identifier::basis_column(self.config.mode), policy)?;

        let identifier = identifier::derive(self.config.mode, row);
        let text = template::render(&identifier, row);

        Ok(GeneratedDeclaration {
            row: row.index,
            identifier,
            text,
        })
    }

    /// Generate declarations from a CSV stream into a writer
    ///
    /// The first record is the header and is skipped without inspection.
    /// Every following line must be a record of exactly eleven columns; an
    /// empty line counts as a row with no columns. The first error aborts the
    /// run; declarations already written stay in `output`.
    ///
    /// # Example
    /// ```
    /// use can_codegen::{Generator, GeneratorConfig, IdentifierMode};
    ///
    /// let csv = "name,id,symbol,type,scale,unit,offset,min,max,bus,node\n\
    ///            Torque Command,0x201,torque-cmd,int16,0.1,Nm,0,-500,500,CAN1,Drive ECU\n";
    ///
    /// let generator = Generator::new(GeneratorConfig::new(IdentifierMode::Input));
    /// let mut out: Vec<u8> = Vec::new();
    /// let report = generator.generate(csv.as_bytes(), &mut out).unwrap();
    ///
    /// assert_eq!(report.identifiers, vec!["Torque_Command_1"]);
    /// let text = String::from_utf8(out).unwrap();
    /// assert!(text.starts_with("const CanMessage Torque_Command_1 = {"));
    /// ```
    pub fn generate<R: Read, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> Result<GenerationReport> {
        self.config.validate()?;

        log::info!("Generating declarations (mode: {})", self.config.mode);

        // The raw bytes are kept so blank lines, which the CSV reader skips,
        // can still be reported as empty rows
        let mut raw = Vec::new();
        input.read_to_end(&mut raw)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.config.delimiter)
            .from_reader(raw.as_slice());

        reader.headers()?;
        let mut after_cr = ends_with_cr(&raw[..byte_offset(&reader)]);

        let mut report = GenerationReport::default();
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut record = StringRecord::new();
        let mut index = 0;

        loop {
            let start = byte_offset(&reader);
            let more = reader.read_record(&mut record)?;
            let consumed = &raw[start..byte_offset(&reader)];

            if starts_with_blank_line(consumed, after_cr) {
                return Err(CodegenError::ColumnCountError {
                    row: index + 1,
                    expected: COLUMN_COUNT,
                    found: 0,
                });
            }
            if !more {
                break;
            }

            index += 1;
            after_cr = ends_with_cr(consumed);

            let row = MessageRow::from_record(index, &record)?;
            let declaration = self.render_row(&row)?;

            log::debug!("Row {}: {}", index, declaration.identifier);

            if !identifier::is_c_identifier(&declaration.identifier) {
                log::warn!(
                    "Row {}: '{}' is not a valid C identifier",
                    index,
                    declaration.identifier
                );
            }

            if let Some(&first_row) = first_seen.get(&declaration.identifier) {
                if self.config.warn_on_collision {
                    log::warn!(
                        "Row {}: identifier '{}' already used by row {}",
                        index,
                        declaration.identifier,
                        first_row
                    );
                }
                report.collisions.push(IdentifierCollision {
                    identifier: declaration.identifier.clone(),
                    first_row,
                    row: index,
                });
            } else {
                first_seen.insert(declaration.identifier.clone(), index);
            }

            output.write_all(declaration.text.as_bytes())?;

            report.rows += 1;
            report.identifiers.push(declaration.identifier);
        }

        output.flush()?;

        log::info!(
            "Generated {} declarations ({} identifier collisions)",
            report.rows,
            report.collisions.len()
        );

        Ok(report)
    }

    /// Generate declarations from a CSV file into an output file
    ///
    /// The output file is created, or truncated if it exists, before the
    /// first row is read.
    pub fn generate_file(&self, input: &Path, output: &Path) -> Result<GenerationReport> {
        log::info!("Reading message table: {:?}", input);

        let input_file = File::open(input).map_err(|source| CodegenError::FileAccessError {
            path: input.to_path_buf(),
            source,
        })?;

        let output_file =
            File::create(output).map_err(|source| CodegenError::FileAccessError {
                path: output.to_path_buf(),
                source,
            })?;

        let report = self.generate(BufReader::new(input_file), BufWriter::new(output_file))?;

        log::info!("Declarations written to {:?}", output);
        Ok(report)
    }
}

/// Byte offset of the reader within the input
fn byte_offset<R: Read>(reader: &csv::Reader<R>) -> usize {
    reader.position().byte() as usize
}

fn ends_with_cr(consumed: &[u8]) -> bool {
    consumed.last() == Some(&b'\r')
}

/// True when the bytes consumed for a record begin with an empty line
///
/// A record ended by `\r` leaves the `\n` of a CRLF pair to the next read,
/// so that byte is not a line of its own.
fn starts_with_blank_line(consumed: &[u8], after_cr: bool) -> bool {
    let consumed = if after_cr {
        consumed.strip_prefix(b"\n").unwrap_or(consumed)
    } else {
        consumed
    };
    matches!(consumed.first(), Some(b'\n' | b'\r'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuotePolicy;
    use crate::types::IdentifierMode;

    const HEADER: &str = "Name,ID,Symbol,Type,Scale,Unit,Offset,Min,Max,Bus,Node\n";

    fn run(mode: IdentifierMode, body: &str) -> Result<(GenerationReport, String)> {
        let generator = Generator::new(GeneratorConfig::new(mode));
        let mut out: Vec<u8> = Vec::new();
        let report = generator.generate(format!("{}{}", HEADER, body).as_bytes(), &mut out)?;
        Ok((report, String::from_utf8(out).unwrap()))
    }

    #[test]
    fn test_one_block_per_row_in_order() {
        let body = "\
Motor Speed,0x100,motor-speed,uint16,1,rpm,0,0,8000,CAN1,Inverter
Motor Temp,0x101,motor temp,int8,1,C,-40,-40,215,CAN1,Inverter
DC Voltage,0x102,dc_voltage,uint16,0.1,V,0,0,800,CAN2,BMS
";
        let (report, text) = run(IdentifierMode::Input, body).unwrap();

        assert_eq!(report.rows, 3);
        assert_eq!(
            report.identifiers,
            vec!["Motor_Speed_1", "Motor_Temp_2", "DC_Voltage_3"]
        );
        assert_eq!(text.matches("const CanMessage ").count(), 3);

        let speed = text.find("Motor_Speed_1").unwrap();
        let temp = text.find("Motor_Temp_2").unwrap();
        let volt = text.find("DC_Voltage_3").unwrap();
        assert!(speed < temp && temp < volt);
    }

    #[test]
    fn test_header_is_not_validated() {
        let generator = Generator::new(GeneratorConfig::new(IdentifierMode::Output));
        let input = "just,a,short,header\nA,1,a,2,3,4,5,6,7,B,C\n";
        let mut out: Vec<u8> = Vec::new();

        let report = generator.generate(input.as_bytes(), &mut out).unwrap();
        assert_eq!(report.identifiers, vec!["a"]);
    }

    #[test]
    fn test_empty_table_produces_empty_output() {
        let (report, text) = run(IdentifierMode::Input, "").unwrap();
        assert_eq!(report.rows, 0);
        assert!(text.is_empty());
    }

    #[test]
    fn test_output_mode_collisions_still_emitted() {
        let body = "\
Status A,0x200,inv-status,u8,1,-,0,0,255,CAN1,Inverter
Status B,0x201,inv status,u8,1,-,0,0,255,CAN1,Inverter
";
        let (report, text) = run(IdentifierMode::Output, body).unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(text.matches("const CanMessage inv_status = {").count(), 2);
        assert_eq!(
            report.collisions,
            vec![IdentifierCollision {
                identifier: "inv_status".to_string(),
                first_row: 1,
                row: 2,
            }]
        );
        assert!(!report.is_collision_free());
    }

    #[test]
    fn test_input_mode_same_name_is_unique() {
        let body = "\
Status,0x200,a,u8,1,-,0,0,255,CAN1,Inverter
Status,0x201,b,u8,1,-,0,0,255,CAN1,Inverter
";
        let (report, _) = run(IdentifierMode::Input, body).unwrap();
        assert_eq!(report.identifiers, vec!["Status_1", "Status_2"]);
        assert!(report.is_collision_free());
    }

    #[test]
    fn test_blank_line_between_rows_aborts() {
        let body = "\
A,1,a,2,3,4,5,6,7,B,C

D,1,d,2,3,4,5,6,7,B,C
";
        match run(IdentifierMode::Input, body) {
            Err(CodegenError::ColumnCountError { row, found, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(found, 0);
            }
            other => panic!("expected column count error, got {:?}", other.map(|r| r.0)),
        }
    }

    #[test]
    fn test_trailing_blank_line_aborts() {
        let body = "A,1,a,2,3,4,5,6,7,B,C\n\n";
        assert!(matches!(
            run(IdentifierMode::Input, body),
            Err(CodegenError::ColumnCountError { row: 2, found: 0, .. })
        ));
    }

    #[test]
    fn test_crlf_line_endings() {
        let generator = Generator::new(GeneratorConfig::new(IdentifierMode::Input));
        let input = "h\r\nA,1,a,2,3,4,5,6,7,B,C\r\nD,1,d,2,3,4,5,6,7,B,C\r\n";
        let mut out: Vec<u8> = Vec::new();

        let report = generator.generate(input.as_bytes(), &mut out).unwrap();
        assert_eq!(report.identifiers, vec!["A_1", "D_2"]);

        let input = "h\r\nA,1,a,2,3,4,5,6,7,B,C\r\n\r\nD,1,d,2,3,4,5,6,7,B,C\r\n";
        let mut out: Vec<u8> = Vec::new();
        assert!(matches!(
            generator.generate(input.as_bytes(), &mut out),
            Err(CodegenError::ColumnCountError { row: 2, found: 0, .. })
        ));
    }

    #[test]
    fn test_blank_line_inside_quoted_field_is_data() {
        let body = "A,\"1\n\n2\",a,2,3,4,5,6,7,B,C\nD,1,d,2,3,4,5,6,7,B,C\n";
        let (report, text) = run(IdentifierMode::Input, body).unwrap();

        assert_eq!(report.identifiers, vec!["A_1", "D_2"]);
        assert!(text.contains("    1\n\n2, \n"));
    }

    #[test]
    fn test_output_mode_symbol_with_quote_rejected() {
        let body = "Name,0x1,\"sym\"\"x\",u8,1,-,0,0,1,CAN1,ECU\n";
        match run(IdentifierMode::Output, body) {
            Err(CodegenError::UnquotableFieldError { row, column, value }) => {
                assert_eq!(row, 1);
                assert_eq!(column, 3);
                assert_eq!(value, "sym\"x");
            }
            other => panic!("expected unquotable field error, got {:?}", other.map(|r| r.0)),
        }

        // Column 3 is replaced by the identifier in input mode, so it is not checked
        let (report, _) = run(IdentifierMode::Input, body).unwrap();
        assert_eq!(report.identifiers, vec!["Name_1"]);

        let generator = Generator::new(
            GeneratorConfig::new(IdentifierMode::Output).with_quote_policy(QuotePolicy::Verbatim),
        );
        let mut out: Vec<u8> = Vec::new();
        let input = format!("{}{}", HEADER, body);
        assert!(generator.generate(input.as_bytes(), &mut out).is_ok());
    }

    #[test]
    fn test_wrong_column_count_aborts() {
        let body = "\
A,1,a,2,3,4,5,6,7,B,C
A,1,a,2,3,4,5,6,7,B
";
        match run(IdentifierMode::Input, body) {
            Err(CodegenError::ColumnCountError { row, found, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(found, 10);
            }
            other => panic!("expected column count error, got {:?}", other.map(|r| r.0)),
        }

        let body = "A,1,a,2,3,4,5,6,7,B,C,extra\n";
        assert!(matches!(
            run(IdentifierMode::Input, body),
            Err(CodegenError::ColumnCountError { row: 1, found: 12, .. })
        ));
    }

    #[test]
    fn test_quoted_csv_field_with_comma() {
        let body = "\"Torque, Limited\",0x300,tl,int16,1,Nm,0,0,100,CAN1,\"Drive ECU\"\n";
        let (_, text) = run(IdentifierMode::Input, body).unwrap();

        assert!(text.starts_with("const CanMessage Torque,_Limited_1 = {\n"));
        assert!(text.contains("    \"Torque, Limited\", \n"));
    }

    #[test]
    fn test_embedded_quote_rejected_by_default() {
        let body = "\"Torque \"\"Cmd\"\"\",0x300,tl,int16,1,Nm,0,0,100,CAN1,ECU\n";
        assert!(matches!(
            run(IdentifierMode::Input, body),
            Err(CodegenError::UnquotableFieldError { row: 1, column: 1, .. })
        ));

        let generator = Generator::new(
            GeneratorConfig::new(IdentifierMode::Input).with_quote_policy(QuotePolicy::Verbatim),
        );
        let mut out: Vec<u8> = Vec::new();
        let input = format!("{}{}", HEADER, body);
        assert!(generator.generate(input.as_bytes(), &mut out).is_ok());
    }

    #[test]
    fn test_custom_delimiter() {
        let generator =
            Generator::new(GeneratorConfig::new(IdentifierMode::Output).with_delimiter(b';'));
        let input = "h\nName;0x1;sym-1;u8;1;-;0;0;1;CAN1;ECU\n";
        let mut out: Vec<u8> = Vec::new();

        let report = generator.generate(input.as_bytes(), &mut out).unwrap();
        assert_eq!(report.identifiers, vec!["sym_1"]);
    }
}
