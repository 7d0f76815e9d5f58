use anyhow::Context;
use std::io::{BufRead, BufReader, BufWriter, Write};

/// Opens `input` for reading; `stdin` reads the standard input and `.gz`
/// files are decompressed on the fly.
///
/// ```
/// use std::io::BufRead;
/// let reader = ppit::reader("tests/ppit/interactome_a.tsv").unwrap();
/// assert_eq!(reader.lines().count(), 4);
/// ```
pub fn reader(input: &str) -> anyhow::Result<Box<dyn BufRead>> {
    let reader: Box<dyn BufRead> = if input == "stdin" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let path = std::path::Path::new(input);
        let file = std::fs::File::open(path)
            .with_context(|| format!("could not open {}", path.display()))?;

        if path.extension() == Some(std::ffi::OsStr::new("gz")) {
            Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        }
    };

    Ok(reader)
}

pub fn writer(output: &str) -> anyhow::Result<Box<dyn Write>> {
    let writer: Box<dyn Write> = if output == "stdout" {
        Box::new(BufWriter::new(std::io::stdout()))
    } else {
        let file = std::fs::File::create(output)
            .with_context(|| format!("could not create {}", output))?;
        Box::new(BufWriter::new(file))
    };

    Ok(writer)
}

/// Headed table reader. `delimiter` is `b','` for CSV or `b'\t'` for TSV.
pub fn table_reader(input: &str, delimiter: u8) -> anyhow::Result<csv::Reader<Box<dyn BufRead>>> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader(input)?))
}

/// Comma-separated writer; the caller writes the header row.
pub fn table_writer(output: &str) -> anyhow::Result<csv::Writer<Box<dyn Write>>> {
    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer(output)?))
}

/// Formats a float the way every output table does: rounded to 3 decimals,
/// without trailing zeros.
///
/// ```
/// assert_eq!(ppit::format_value(1.0), "1");
/// assert_eq!(ppit::format_value(0.12345), "0.123");
/// assert_eq!(ppit::format_value(-2.5), "-2.5");
/// ```
pub fn format_value(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}
