use std::fmt;

use log::warn;

use crate::error::DigestError;

pub const DELIMITER: char = ',';
pub const QUOTE: char = '"';

// Stand-ins for delimiters inside a quoted field. The first one absent from
// the line is used.
const SENTINELS: [char; 4] = ['@', '\u{1f}', '\u{1e}', '\u{7f}'];

/// What a record parser made of one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome<T> {
    Record(T),
    /// Blank line or a known header row.
    Skip,
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    pub line_no: usize,
    pub line: String,
    pub reason: String,
}

impl LineDiagnostic {
    pub fn into_error(self) -> DigestError {
        DigestError::MalformedLine {
            line_no: self.line_no,
            line: self.line,
            reason: self.reason,
        }
    }
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line_no, self.reason, self.line)
    }
}

/// Valid records plus everything that was rejected on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLines<T> {
    pub records: Vec<T>,
    pub diagnostics: Vec<LineDiagnostic>,
    pub skipped: usize,
}

impl<T> Default for ParsedLines<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            diagnostics: Vec::new(),
            skipped: 0,
        }
    }
}

impl<T> ParsedLines<T> {
    pub fn lines_seen(&self) -> usize {
        self.records.len() + self.diagnostics.len() + self.skipped
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn log_diagnostics(&self, source: &str) {
        for diag in &self.diagnostics {
            warn!("{source}: {diag}");
        }
        if !self.diagnostics.is_empty() {
            warn!(
                "{source}: {} of {} lines rejected",
                self.diagnostics.len(),
                self.lines_seen()
            );
        }
    }
}

/// Run `parse` over every line, keeping rejections next to the records.
/// Line numbers are 1-based.
pub fn parse_lines<'a, T>(
    lines: impl IntoIterator<Item = &'a str>,
    mut parse: impl FnMut(&str) -> LineOutcome<T>,
) -> ParsedLines<T> {
    let mut out = ParsedLines::default();
    for (idx, line) in lines.into_iter().enumerate() {
        match parse(line) {
            LineOutcome::Record(record) => out.records.push(record),
            LineOutcome::Skip => out.skipped += 1,
            LineOutcome::Rejected(reason) => out.diagnostics.push(LineDiagnostic {
                line_no: idx + 1,
                line: line.to_string(),
                reason,
            }),
        }
    }
    out
}

pub fn is_skippable(line: &str, header_prefixes: &[&str]) -> bool {
    line.trim().is_empty() || header_prefixes.iter().any(|p| line.starts_with(p))
}

/// Split a line on [`DELIMITER`].
///
/// With `expected = Some(n)`, a line carrying a quote must hold exactly one
/// quoted field, quotes at both of its edges; delimiters inside it do not
/// split. More than `n` fields after that is a rejection. The quotes stay on
/// the recovered field. Lines with fewer fields are returned as-is;
/// minimum-count checks belong to the record parser.
pub fn split_fields(line: &str, expected: Option<usize>) -> Result<Vec<String>, String> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    let Some(expected) = expected else {
        return Ok(fields.into_iter().map(str::to_string).collect());
    };
    if line.contains(QUOTE) {
        return split_protected(line, expected);
    }
    if fields.len() > expected {
        return Err(format!(
            "{} fields where {expected} expected and no quoted field",
            fields.len()
        ));
    }
    Ok(fields.into_iter().map(str::to_string).collect())
}

fn split_protected(line: &str, expected: usize) -> Result<Vec<String>, String> {
    let quotes = line.matches(QUOTE).count();
    if quotes % 2 == 1 {
        return Err("unpaired quote characters".to_string());
    }
    if quotes != 2 {
        return Err("more than one quoted field".to_string());
    }
    let (Some(start), Some(end)) = (line.find(QUOTE), line.rfind(QUOTE)) else {
        return Err("unpaired quote characters".to_string());
    };
    let head = &line[..start];
    let span = &line[start..=end];
    let tail = &line[end + 1..];

    let fields: Vec<String> = if span.contains(DELIMITER) {
        let sentinel = SENTINELS
            .iter()
            .copied()
            .find(|c| !line.contains(*c))
            .ok_or_else(|| "no free sentinel character for quoted field".to_string())?;
        let masked = format!(
            "{head}{}{tail}",
            span.replace(DELIMITER, &sentinel.to_string())
        );
        masked
            .split(DELIMITER)
            .map(|f| f.replace(sentinel, &DELIMITER.to_string()))
            .collect()
    } else {
        line.split(DELIMITER).map(str::to_string).collect()
    };
    if fields.len() > expected {
        return Err(format!(
            "quoted field left {} fields where {expected} expected",
            fields.len()
        ));
    }
    check_quoted_field(&fields)?;
    Ok(fields)
}

// Exactly one field may carry quotes, and only as its first and last char.
fn check_quoted_field(fields: &[String]) -> Result<(), String> {
    let mut quoted = fields.iter().filter(|f| f.contains(QUOTE));
    let (Some(field), None) = (quoted.next(), quoted.next()) else {
        return Err("more than one quoted field".to_string());
    };
    let enclosed = field.len() >= 2
        && field.starts_with(QUOTE)
        && field.ends_with(QUOTE)
        && field[1..field.len() - 1].matches(QUOTE).count() == 0;
    if !enclosed {
        return Err(format!("quote does not enclose a whole field: {field}"));
    }
    Ok(())
}

/// Parse a non-negative count, naming the field in the rejection reason.
pub fn parse_count(raw: &str, what: &str) -> Result<u32, String> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid {what} {raw:?}"))
}
