//! The vimball container format.
//!
//! A vimball is plain text:
//!
//! ```text
//! " Vimball Archiver by Charles E. Campbell, Jr., Ph.D.
//! UseVimball
//! finish
//! plugin/foo.vim<TAB>[[[1
//! 2
//! <line 1>
//! <line 2>
//! doc/foo.txt<TAB>[[[1
//! 1
//! <line 1>
//! ```
//!
//! Member content is carried as raw bytes: only the signature, the member
//! headers and the line counts are interpreted, so Latin-1 or other non-UTF-8
//! plugin sources pass through unchanged.
//!
//! The declared line count is the only thing that delimits one member from
//! the next. Content is never escaped, so a content line that happens to look
//! like a member header is indistinguishable from a real one, and a wrong
//! count silently misaligns every following member. The decoder never looks
//! ahead to correct either case.

use super::error::DecodeError;

/// The literal three-line signature every vimball starts with.
pub const HEADER: &str = "\" Vimball Archiver by Charles E. Campbell, Jr., Ph.D.\nUseVimball\nfinish\n";

/// Trailing marker of a member header line (`<path>\t[[[1`).
pub const MEMBER_MARKER: &str = "\t[[[1";

const HEADER_LINES: usize = 3;

/// One member of a vimball: a relative path and its content lines.
///
/// Lines are stored as bytes without their `\n` terminator. A `\r`
/// preceding the terminator is kept as part of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Forward-slash relative path of the member.
    pub path: String,

    /// Content lines in file order.
    pub lines: Vec<Vec<u8>>,
}

impl Entry {
    /// Create an entry from a path and its lines.
    pub fn new(path: impl Into<String>, lines: Vec<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }

    /// Create an entry from a file's full content.
    ///
    /// A missing final newline does not produce an extra empty line.
    pub fn from_bytes(path: impl Into<String>, content: &[u8]) -> Self {
        Self::new(path, split_lines(content).map(<[u8]>::to_vec).collect())
    }

    /// Create an entry from text.
    pub fn from_text(path: impl Into<String>, text: &str) -> Self {
        Self::from_bytes(path, text.as_bytes())
    }

    /// The member content as it is written to disk on install.
    pub fn content(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.extend_from_slice(line);
            out.push(b'\n');
        }
        out
    }
}

/// An ordered list of entries, encodable to and decodable from the vimball
/// byte format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    entries: Vec<Entry>,
}

impl Archive {
    /// Create an archive from entries in member order.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Entries in member order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Consume the archive, returning its entries.
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Member paths in order; this is the recipe the archive was built from.
    pub fn recipe(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.path.as_str()).collect()
    }

    /// Encode to the vimball byte format.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = HEADER.as_bytes().to_vec();
        for entry in &self.entries {
            out.extend_from_slice(entry.path.as_bytes());
            out.extend_from_slice(MEMBER_MARKER.as_bytes());
            out.push(b'\n');
            out.extend_from_slice(entry.lines.len().to_string().as_bytes());
            out.push(b'\n');
            out.extend_from_slice(&entry.content());
        }
        out
    }

    /// Decode a vimball byte stream.
    ///
    /// # Errors
    ///
    /// * [`DecodeError::Format`] if the signature does not match
    /// * [`DecodeError::Parse`] on a malformed member header, a missing,
    ///   non-numeric or zero line count, or a truncated member
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let lines: Vec<&[u8]> = split_lines(bytes).collect();

        let signature: Vec<&[u8]> = split_lines(HEADER.as_bytes()).collect();
        if lines.len() < HEADER_LINES || lines[..HEADER_LINES] != signature[..] {
            return Err(DecodeError::Format);
        }

        let mut entries = Vec::new();
        let mut pos = HEADER_LINES;

        while pos < lines.len() {
            // 1-based line numbers for messages
            let header_lineno = pos + 1;
            let path = parse_member_header(lines[pos]).ok_or_else(|| {
                DecodeError::parse(
                    header_lineno,
                    format!("bad member header: {:?}", String::from_utf8_lossy(lines[pos])),
                )
            })?;

            let count_line = lines
                .get(pos + 1)
                .ok_or_else(|| DecodeError::parse(header_lineno + 1, "missing line count"))?;
            let count = parse_line_count(count_line).ok_or_else(|| {
                DecodeError::parse(
                    header_lineno + 1,
                    format!("bad line count: {:?}", String::from_utf8_lossy(count_line)),
                )
            })?;

            let start = pos + 2;
            let end = start + count;
            if end > lines.len() {
                return Err(DecodeError::parse(
                    header_lineno,
                    format!(
                        "member {} declares {} lines but only {} remain",
                        path,
                        count,
                        lines.len() - start
                    ),
                ));
            }

            let content = lines[start..end].iter().map(|l| l.to_vec()).collect();
            entries.push(Entry::new(path, content));
            pos = end;
        }

        Ok(Self { entries })
    }

    /// Decode a vimball that is already text.
    pub fn decode_str(text: &str) -> Result<Self, DecodeError> {
        Self::decode(text.as_bytes())
    }
}

/// Split bytes into lines, dropping each `\n` terminator.
fn split_lines(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .split_inclusive(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\n").unwrap_or(line))
}

/// Extract the member path from a `<path>\t[[[1` line.
fn parse_member_header(line: &[u8]) -> Option<&str> {
    std::str::from_utf8(line)
        .ok()?
        .strip_suffix(MEMBER_MARKER)
        .filter(|path| !path.is_empty())
}

/// Parse a member line count; only positive decimal integers are valid.
fn parse_line_count(line: &[u8]) -> Option<usize> {
    if line.is_empty() || !line.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(line).ok()?.parse::<usize>().ok().filter(|&n| n > 0)
}
