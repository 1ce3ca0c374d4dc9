use csv::{ByteRecord, ByteRecordsIntoIter, ReaderBuilder};
use thiserror::Error;

use crate::errors::CoexprError;

/// Field separator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabFormat {
    /// ASCII separator byte
    pub separator: u8,
}

impl TabFormat {
    pub const TSV: TabFormat = TabFormat { separator: b'\t' };

    pub fn new(separator: u8) -> Self {
        Self { separator }
    }
}

impl Default for TabFormat {
    fn default() -> Self {
        Self::TSV
    }
}

/// One non-blank line split into fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based line number in the input
    pub line: usize,
    pub fields: Vec<String>,
}

impl Record {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field `i`, trimmed of surrounding whitespace
    pub fn field(&self, i: usize) -> Option<&str> {
        self.fields.get(i).map(|f| f.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Line {line}: invalid UTF-8")]
    InvalidUtf8 { line: usize },

    #[error("Line {line}: {reason}")]
    Unreadable { line: usize, reason: String },

    #[error("Line {line}, column {column}: invalid number '{field}'")]
    InvalidNumber {
        line: usize,
        column: usize,
        field: String,
    },
}

impl From<RecordError> for CoexprError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::InvalidUtf8 { .. } | RecordError::Unreadable { .. } => {
                CoexprError::InvalidInput {
                    reason: err.to_string(),
                }
            }
            RecordError::InvalidNumber {
                line,
                column,
                field,
            } => CoexprError::InvalidValue {
                line,
                column,
                field,
            },
        }
    }
}

/// Iterator over the records of a byte buffer
///
/// Fields are split on the separator only: no quoting, no escapes, and rows
/// may differ in width. Whitespace-only lines are skipped.
pub struct Records<'a> {
    input: &'a [u8],
    inner: ByteRecordsIntoIter<&'a [u8]>,
}

/// Split `input` into records
pub fn parse_records(input: &[u8], format: TabFormat) -> Records<'_> {
    let reader = ReaderBuilder::new()
        .delimiter(format.separator)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(input);
    Records {
        input,
        inner: reader.into_byte_records(),
    }
}

impl Iterator for Records<'_> {
    type Item = Result<Record, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = match self.inner.next()? {
                Ok(raw) => raw,
                Err(e) => {
                    let line = e.position().map_or(0, |p| p.line() as usize);
                    return Some(Err(RecordError::Unreadable {
                        line,
                        reason: e.to_string(),
                    }));
                }
            };
            if is_blank(&raw) {
                continue;
            }
            return Some(decode(&raw, self.line_of(&raw)));
        }
    }
}

impl Records<'_> {
    /// 1-based line on which `raw` starts
    ///
    /// The reader may report the position from before the empty lines it
    /// skipped, so those are counted here.
    fn line_of(&self, raw: &ByteRecord) -> usize {
        let Some(pos) = raw.position() else {
            return 0;
        };
        let start = usize::try_from(pos.byte())
            .unwrap_or(usize::MAX)
            .min(self.input.len());
        let skipped = self.input[start..]
            .iter()
            .take_while(|&&b| b == b'\n' || b == b'\r')
            .filter(|&&b| b == b'\n')
            .count();
        pos.line() as usize + skipped
    }
}

/// Number of records (non-blank lines) in `input`
pub fn count_records(input: &[u8]) -> usize {
    parse_records(input, TabFormat::TSV).count()
}

/// Parse an expression value
///
/// # Errors
///
/// Returns `InvalidNumber` unless the field is a finite decimal number.
pub fn parse_value(field: &str, line: usize, column: usize) -> Result<f64, RecordError> {
    match field.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RecordError::InvalidNumber {
            line,
            column,
            field: field.to_string(),
        }),
    }
}

fn decode(raw: &ByteRecord, line: usize) -> Result<Record, RecordError> {
    let fields = raw
        .iter()
        .map(|field| std::str::from_utf8(field).map(str::to_string))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| RecordError::InvalidUtf8 { line })?;
    Ok(Record { line, fields })
}

fn is_blank(raw: &ByteRecord) -> bool {
    raw.iter().all(|field| field.iter().all(u8::is_ascii_whitespace))
}
