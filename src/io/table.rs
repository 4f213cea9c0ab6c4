use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use csv::ReaderBuilder;
use log::debug;

/// One line of a table, split into fields.
pub type Row = Vec<String>;
/// All lines of a table, in file order.
pub type Table = Vec<Row>;

/// Splits every record of `reader` into fields.
///
/// Records may have differing lengths and no line is treated as a header.
/// Quoted fields are unquoted; surrounding whitespace is kept.
pub fn read_rows_from<R: Read>(
    reader: R,
    delimiter: u8,
) -> anyhow::Result<Table> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        let record =
            record.with_context(|| format!("could not read record {}", line + 1))?;
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

pub fn read_rows<P: AsRef<Path>>(
    path: P,
    delimiter: u8,
) -> anyhow::Result<Table> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("could not open {}", path.display()))?;
    let rows = read_rows_from(file, delimiter)
        .with_context(|| format!("could not read {}", path.display()))?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
