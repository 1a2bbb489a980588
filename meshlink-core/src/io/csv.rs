/// CSV rows to and from bytes, without schema or header handling
use ::csv::{ReaderBuilder, Terminator, WriterBuilder};
use log::debug;

use crate::error::Result;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Split input into record lines at newlines outside quoted fields.
///
/// A trailing `\r` is dropped from each line, and the empty piece after a
/// final terminator is not a record.
fn record_lines(data: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, &byte) in data.iter().enumerate() {
        match byte {
            b'"' => quoted = !quoted,
            b'\n' if !quoted => {
                lines.push(&data[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < data.len() {
        lines.push(&data[start..]);
    }
    lines
        .into_iter()
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect()
}

fn parse_line(builder: &ReaderBuilder, line: &[u8]) -> Result<Vec<String>> {
    match builder.from_reader(line).records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

/// Read every record as a row of strings; rows may differ in length and a
/// blank line is an empty row
pub fn read_csv(data: &[u8]) -> Result<Vec<Vec<String>>> {
    let builder = {
        let mut builder = ReaderBuilder::new();
        builder.has_headers(false).flexible(true);
        builder
    };

    let rows = record_lines(data)
        .into_iter()
        .map(|line| -> Result<Vec<String>> {
            if line.is_empty() {
                return Ok(Vec::new());
            }
            // A leading byte order mark is field data here; keep it away from the reader
            match line.strip_prefix(BOM) {
                Some(rest) => {
                    let mut fields = parse_line(&builder, rest)?;
                    match fields.first_mut() {
                        Some(first) => first.insert(0, '\u{feff}'),
                        None => fields.push('\u{feff}'.to_string()),
                    }
                    Ok(fields)
                }
                None => parse_line(&builder, line),
            }
        })
        .collect::<Result<Vec<_>>>()?;
    debug!("read {} CSV rows", rows.len());
    Ok(rows)
}

/// Write rows as CRLF-terminated CSV, quoting fields only where needed
pub fn write_csv<R, S>(rows: &[R]) -> Result<Vec<u8>>
where
    R: AsRef<[S]>,
    S: AsRef<[u8]>,
{
    let mut builder = WriterBuilder::new();
    builder.flexible(true).terminator(Terminator::CRLF);

    let mut out = Vec::new();
    for row in rows {
        let fields = row.as_ref();
        // The writer quotes an empty record as `""`; a bare terminator reads back as no fields
        if fields.is_empty() {
            out.extend_from_slice(b"\r\n");
            continue;
        }
        let mut writer = builder.from_writer(&mut out);
        writer.write_record(fields)?;
        writer.flush().map_err(::csv::Error::from)?;
    }
    debug!("wrote {} CSV rows", rows.len());
    Ok(out)
}
