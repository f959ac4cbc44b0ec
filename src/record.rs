//! Input record parsing.
//!
//! One input line holds `code[,pallet[,item]]`. The parser only splits the
//! line; whether `code` is a valid SSCC is decided later by
//! [`crate::sscc::validate`].

/// Field separator in input lines.
pub const FIELD_SEPARATOR: char = ',';

/// Why a line could not be turned into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The first field is empty
    #[error("missing code")]
    MissingCode,
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    /// Candidate SSCC, not yet validated
    pub code: String,
    /// Pallet identifier
    pub pallet: Option<String>,
    /// Item description
    pub item: Option<String>,
}

impl InputRecord {
    /// Whether the record carries any auxiliary text.
    pub fn has_auxiliary(&self) -> bool {
        self.pallet.is_some() || self.item.is_some()
    }
}

/// Parse one input line into a record.
///
/// A single trailing `\n` or `\r\n` is removed; no other whitespace is
/// trimmed. The line is split into at most three fields, so an item
/// description may itself contain commas. Empty pallet or item fields are
/// treated as absent.
pub fn parse(line: &str) -> Result<InputRecord, ParseError> {
    let line = strip_line_terminator(line);
    let mut fields = line.splitn(3, FIELD_SEPARATOR);

    let code = match fields.next() {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => return Err(ParseError::MissingCode),
    };

    Ok(InputRecord {
        code,
        pallet: non_empty(fields.next()),
        item: non_empty(fields.next()),
    })
}

pub(crate) fn strip_line_terminator(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

fn non_empty(field: Option<&str>) -> Option<String> {
    field.filter(|f| !f.is_empty()).map(str::to_string)
}
