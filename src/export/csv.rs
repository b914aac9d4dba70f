//! CSV rendering of the comparison matrix.

use std::io::{self, Write};

use crate::models::ComparisonResult;

const LINE_END: &str = "\r\n";

/// Write the matrix as CSV: one row per term, one column per file.
///
/// Text fields (the `Term` header, file names, terms) are always quoted;
/// cells are bare `Found` / `Not Found`.
pub fn write_csv<W: Write>(result: &ComparisonResult, mut out: W) -> io::Result<()> {
    let mut header = vec![quote_csv("Term")];
    header.extend(result.files().iter().map(|f| quote_csv(&f.name)));
    write!(out, "{}{}", header.join(","), LINE_END)?;

    for term in result.terms() {
        let mut row = vec![quote_csv(term)];
        row.extend(result.files().iter().map(|file| {
            let found = result.cell(term, &file.id).is_some_and(|c| c.found);
            let cell = if found { "Found" } else { "Not Found" };
            cell.to_string()
        }));
        write!(out, "{}{}", row.join(","), LINE_END)?;
    }

    out.flush()
}

/// Render the matrix as a CSV string.
pub fn to_csv_string(result: &ComparisonResult) -> String {
    let mut output = Vec::new();
    // Writing into a Vec cannot fail.
    write_csv(result, &mut output).ok();
    String::from_utf8_lossy(&output).into_owned()
}

/// Quote a CSV field, doubling embedded quotes.
fn quote_csv(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
