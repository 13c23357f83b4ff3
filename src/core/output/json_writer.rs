//! JSON output writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::Table;
use crate::error::Result;

/// Writes a table to a JSON file as an array of row objects.
///
/// # Format
/// ```json
/// [
///   {"Participant": "Alice", "Hour": "9", "Count": 2},
///   {"Participant": "Bob", "Hour": "10", "Count": 1}
/// ]
/// ```
pub fn write_json(table: &Table, output_path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(table)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts a table to a pretty-printed JSON string.
///
/// Same format as [`write_json`], but returns a String instead of writing to file.
pub fn to_json(table: &Table) -> Result<String> {
    Ok(serde_json::to_string_pretty(table)?)
}
