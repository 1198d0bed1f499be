//! Declaration template
//!
//! The output layout is fixed and must stay byte-for-byte stable, including
//! the space left after every comma and after the last value.

use crate::config::QuotePolicy;
use crate::types::{CodegenError, MessageRow, Result};
use std::fmt::Write;

/// Columns rendered inside double quotes (column 3 is replaced by the identifier)
pub const QUOTED_COLUMNS: [usize; 3] = [1, 10, 11];

/// Render the declaration block for a row
///
/// The identifier names the declaration and fills the third slot. Columns
/// 1, 10 and 11 are emitted as string literals, the rest verbatim.
pub fn render(identifier: &str, row: &MessageRow) -> String {
    let mut out = String::with_capacity(256);

    // Writing into a String cannot fail
    let _ = writeln!(out, "const CanMessage {} = {{", identifier);
    let _ = writeln!(out, "    \"{}\", ", row.field(1));
    let _ = writeln!(out, "    {}, ", row.field(2));
    let _ = writeln!(out, "    \"{}\", ", identifier);
    for column in 4..=9 {
        let _ = writeln!(out, "    {}, ", row.field(column));
    }
    let _ = writeln!(out, "    \"{}\", ", row.field(10));
    let _ = writeln!(out, "    \"{}\" ", row.field(11));
    out.push_str("};\n");

    out
}

/// Check that every quoted column can be placed inside a literal
///
/// A double quote, backslash or line break would end or corrupt the literal.
/// Under [`QuotePolicy::Verbatim`] nothing is checked.
pub fn check_quoted_fields(row: &MessageRow, policy: QuotePolicy) -> Result<()> {
    for column in QUOTED_COLUMNS {
        check_quoted_value(row, column, policy)?;
    }

    Ok(())
}

/// Check a single column that ends up inside a literal
pub(crate) fn check_quoted_value(
    row: &MessageRow,
    column: usize,
    policy: QuotePolicy,
) -> Result<()> {
    if policy == QuotePolicy::Verbatim {
        return Ok(());
    }

    let value = row.field(column);
    if value.contains(['"', '\\', '\n', '\r']) {
        return Err(CodegenError::UnquotableFieldError {
            row: row.index,
            column,
            value: value.to_string(),
        });
    }

    Ok(())
}
