//! CSV output writer.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::Table;
use crate::error::Result;

/// Writes a table as CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - First record: the table headers
/// - Encoding: UTF-8
pub fn write_csv(table: &Table, output_path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(table, file)
}

/// Converts a table to a CSV string.
///
/// Same format as [`write_csv`], but returns a String instead of writing to file.
pub fn to_csv(table: &Table) -> Result<String> {
    let mut buffer = Vec::new();
    write_records(table, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::other(e).into())
}

fn write_records<W: Write>(table: &Table, sink: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(sink);

    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }

    writer.flush()?;
    Ok(())
}
