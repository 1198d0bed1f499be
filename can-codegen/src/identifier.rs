//! Identifier derivation
//!
//! Turns a row into the name used for its declaration.

use crate::types::{IdentifierMode, MessageRow};

/// Replace spaces and hyphens with underscores, one for one
///
/// Nothing else is rewritten: digits at the start, punctuation and non-ASCII
/// characters pass through. Use [`is_c_identifier`] to detect those.
pub fn sanitize(basis: &str) -> String {
    basis
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            other => other,
        })
        .collect()
}

/// Column the identifier is built from
pub fn basis_column(mode: IdentifierMode) -> usize {
    match mode {
        IdentifierMode::Input => 1,
        IdentifierMode::Output => 3,
    }
}

/// Derive the declaration identifier for a row
///
/// * `Input` - sanitized column 1 followed by `_<row index>`, unique per row
/// * `Output` - sanitized column 3 as-is, uniqueness is up to the table
pub fn derive(mode: IdentifierMode, row: &MessageRow) -> String {
    match mode {
        IdentifierMode::Input => format!("{}_{}", sanitize(row.name()), row.index),
        IdentifierMode::Output => sanitize(row.symbol()),
    }
}

/// Check whether a string is a legal C identifier (`[A-Za-z_][A-Za-z0-9_]*`)
pub fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(index: usize, name: &str, symbol: &str) -> MessageRow {
        MessageRow::from_fields(
            index,
            [name, "0x100", symbol, "u8", "1", "-", "0", "0", "255", "CAN1", "ECU"],
        )
        .unwrap()
    }

    #[test]
    fn test_sanitize_spaces_and_hyphens() {
        assert_eq!(sanitize("Torque Command"), "Torque_Command");
        assert_eq!(sanitize("torque-cmd"), "torque_cmd");
        assert_eq!(sanitize(" a--b "), "_a__b_");
    }

    #[test]
    fn test_sanitize_leaves_other_characters() {
        assert_eq!(sanitize("2nd.Motor/Temp"), "2nd.Motor/Temp");
        assert_eq!(sanitize("tab\there"), "tab\there");
        assert_eq!(sanitize("Drehmoment Ä"), "Drehmoment_Ä");
    }

    #[test]
    fn test_derive_input_mode_suffixes_index() {
        let r = row(5, "Torque Command", "torque-cmd");
        assert_eq!(derive(IdentifierMode::Input, &r), "Torque_Command_5");
    }

    #[test]
    fn test_derive_output_mode_uses_symbol() {
        let r = row(5, "Torque Command", "torque-cmd");
        assert_eq!(derive(IdentifierMode::Output, &r), "torque_cmd");
    }

    #[test]
    fn test_input_mode_distinct_rows_distinct_identifiers() {
        let a = row(1, "Status", "s");
        let b = row(2, "Status", "s");
        assert_ne!(
            derive(IdentifierMode::Input, &a),
            derive(IdentifierMode::Input, &b)
        );
    }

    #[test]
    fn test_basis_column() {
        assert_eq!(basis_column(IdentifierMode::Input), 1);
        assert_eq!(basis_column(IdentifierMode::Output), 3);
    }

    #[test]
    fn test_is_c_identifier() {
        assert!(is_c_identifier("Torque_Command_5"));
        assert!(is_c_identifier("_private"));
        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("2nd_motor"));
        assert!(!is_c_identifier("motor.temp"));
        assert!(!is_c_identifier("Ä_status"));
    }
}
