use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{DigestError, DigestResult};
use crate::line_parser::{LineOutcome, ParsedLines, parse_lines};

/// Character encoding of the data files.
///
/// The historical election and league files are ISO-8859-1. Reading them as
/// UTF-8 fails on the first accented byte, which is reported instead of being
/// papered over with replacement characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    #[default]
    Latin1,
    Utf8,
}

impl TextEncoding {
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Some(Self::Latin1),
            "utf8" | "utf-8" => Some(Self::Utf8),
            _ => None,
        }
    }

    pub fn decode(self, bytes: &[u8]) -> io::Result<String> {
        match self {
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Self::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err)),
        }
    }

    /// Characters outside Latin-1 are written as `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            Self::Utf8 => text.as_bytes().to_vec(),
        }
    }
}

pub fn read_text(path: &Path, encoding: TextEncoding) -> DigestResult<String> {
    let bytes = fs::read(path).map_err(|source| DigestError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    encoding
        .decode(&bytes)
        .map_err(|source| DigestError::FileAccess {
            path: path.to_path_buf(),
            source,
        })
}

/// Read a whole file and run every line through `parse`.
pub fn load_records<T>(
    path: &Path,
    encoding: TextEncoding,
    parse: impl FnMut(&str) -> LineOutcome<T>,
) -> DigestResult<ParsedLines<T>> {
    let text = read_text(path, encoding)?;
    let parsed = parse_lines(text.lines(), parse);
    info!(
        "{}: {} records, {} skipped, {} rejected",
        path.display(),
        parsed.records.len(),
        parsed.skipped,
        parsed.diagnostics.len()
    );
    Ok(parsed)
}

/// Write `text` into an existing directory. A missing output directory is an
/// error; it is never created here.
pub fn write_text(path: &Path, text: &str, encoding: TextEncoding) -> DigestResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if !dir.is_dir() {
        return Err(DigestError::Write {
            path: path.to_path_buf(),
            reason: format!("no {} folder present", dir.display()),
        });
    }
    fs::write(path, encoding.encode(text)).map_err(|err| DigestError::Write {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}
