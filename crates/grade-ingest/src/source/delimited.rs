//! Comma separated text.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use grade_model::{ImportError, Result};

const UTF8_BOM: char = '\u{feff}';

/// Options for tokenizing delimited text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedOptions {
    pub delimiter: u8,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl DelimitedOptions {
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Tokenizes delimited text into raw rows.
///
/// Rows keep their own length; nothing is treated as a header here. A UTF-8
/// byte order mark on the first cell is removed. `source_name` only appears
/// in error messages.
pub fn read_delimited<R: Read>(
    reader: R,
    options: &DelimitedOptions,
    source_name: &Path,
) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ImportError::FileFormat {
            path: source_name.to_path_buf(),
            message: e.to_string(),
        })?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if let Some(first) = rows.first_mut().and_then(|row| row.first_mut())
        && first.starts_with(UTF8_BOM)
    {
        *first = first.trim_start_matches(UTF8_BOM).to_string();
    }

    debug!(source = %source_name.display(), rows = rows.len(), "tokenized delimited text");
    Ok(rows)
}

/// Reads a delimited file from disk.
///
/// UTF-16 files are rejected up front; the tokenizer only handles UTF-8.
pub fn read_delimited_path(path: &Path, options: &DelimitedOptions) -> Result<Vec<Vec<String>>> {
    let file = File::open(path).map_err(|e| ImportError::from_io(path, e))?;
    let mut reader = BufReader::new(file);

    let mut head = Vec::with_capacity(2);
    (&mut reader)
        .take(2)
        .read_to_end(&mut head)
        .map_err(|e| ImportError::from_io(path, e))?;
    let encoding = match head.as_slice() {
        [0xFF, 0xFE] => Some("UTF-16 LE"),
        [0xFE, 0xFF] => Some("UTF-16 BE"),
        _ => None,
    };
    if let Some(encoding) = encoding {
        return Err(ImportError::FileFormat {
            path: path.to_path_buf(),
            message: format!("unsupported encoding {encoding}, save the file as UTF-8"),
        });
    }

    read_delimited(head.as_slice().chain(reader), options, path)
}
