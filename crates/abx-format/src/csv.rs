//! CSV output format.

use abx_types::{RecordSet, TickerRecord};
use std::borrow::Cow;
use std::io::Write;

use crate::{FormatError, Formatter};

const COLUMNS: [&str; 5] = ["sequence", "symbol", "side", "quantity", "price"];

/// Delimited text formatter, one row per record.
///
/// Symbol and side bytes come straight off the wire, so a field holding the
/// delimiter, a double quote or a line break is wrapped in quotes with inner
/// quotes doubled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvFormatter {
    delimiter: char,
    header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Comma-separated output with a header row.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            header: true,
        }
    }

    /// Tab-separated output with a header row.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter('\t')
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(self, delimiter: char) -> Self {
        Self { delimiter, ..self }
    }

    /// Sets whether the first row names the columns.
    #[must_use]
    pub const fn with_header(self, header: bool) -> Self {
        Self { header, ..self }
    }

    fn escape<'a>(&self, field: &'a str) -> Cow<'a, str> {
        let quoted = field
            .chars()
            .any(|c| c == self.delimiter || matches!(c, '"' | '\r' | '\n'));
        if quoted {
            Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
        } else {
            Cow::Borrowed(field)
        }
    }

    fn write_row<W: Write>(&self, writer: &mut W, fields: &[&str]) -> Result<(), FormatError> {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                write!(writer, "{}", self.delimiter)?;
            }
            writer.write_all(self.escape(field).as_bytes())?;
        }
        writeln!(writer)?;
        Ok(())
    }
}

impl Formatter for CsvFormatter {
    fn write_records<W: Write + Send>(
        &self,
        records: &RecordSet,
        mut writer: W,
    ) -> Result<(), FormatError> {
        if self.header {
            self.write_row(&mut writer, &COLUMNS)?;
        }

        for record in records {
            let TickerRecord {
                sequence,
                symbol,
                side,
                quantity,
                price,
            } = *record;
            let fields = [
                sequence.to_string(),
                symbol.to_string(),
                side.to_string(),
                quantity.to_string(),
                price.to_string(),
            ];
            self.write_row(&mut writer, &fields.each_ref().map(String::as_str))?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        "csv"
    }
}
