// Author: Dustin Pilgrim
// License: MIT

//! Line-oriented reader that turns raw config text into an ordered stream
//! of section headers, each carrying its ordered `key = raw` pairs.
//!
//! Nothing here evaluates a value; raw text is kept exactly as written
//! (trimmed).

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Number of leading nesting markers.
    pub depth: usize,
    pub name: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    pub key: String,
    pub raw: String,
    pub line: usize,
}

/// One header and the pairs that follow it. The first record of a stream
/// has no header and collects pairs written before any `[Section]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSection {
    pub header: Option<Header>,
    pub entries: Vec<RawEntry>,
}

/// Read `input` into records. `separator` is the nesting marker.
pub fn read_records(input: &str, separator: char) -> Result<Vec<RawSection>, ConfigError> {
    let mut sections = vec![RawSection::default()];

    for (idx, raw_line) in input.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if trimmed.starts_with('[') {
            let header = parse_header(trimmed, separator, line)?;
            sections.push(RawSection {
                header: Some(header),
                entries: Vec::new(),
            });
            continue;
        }

        let entry = parse_entry(trimmed, line)?;
        if let Some(current) = sections.last_mut() {
            current.entries.push(entry);
        }
    }

    Ok(sections)
}

fn parse_header(trimmed: &str, separator: char, line: usize) -> Result<Header, ConfigError> {
    let malformed = |message: &str| ConfigError::MalformedHeader {
        header: trimmed.to_string(),
        message: message.to_string(),
        line,
    };

    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| malformed("missing closing ']'"))?
        .trim();

    let depth = inner.chars().take_while(|&c| c == separator).count();
    let name = inner[depth * separator.len_utf8()..].trim();

    if name.is_empty() {
        return Err(malformed("section name is empty"));
    }
    if name.contains(separator) {
        return Err(malformed("section name contains the nesting marker"));
    }
    if name.contains('[') || name.contains(']') {
        return Err(malformed("unbalanced brackets"));
    }

    Ok(Header {
        depth,
        name: name.to_string(),
        line,
    })
}

fn parse_entry(trimmed: &str, line: usize) -> Result<RawEntry, ConfigError> {
    // First of `=` or `:` splits key from value
    let split_at = trimmed.find(['=', ':']).ok_or_else(|| ConfigError::SyntaxError {
        message: format!("expected `key = value`, found '{}'", trimmed),
        line,
    })?;

    let key = trimmed[..split_at].trim();
    let raw = trimmed[split_at + 1..].trim();

    if key.is_empty() {
        return Err(ConfigError::SyntaxError {
            message: "missing key before '='".into(),
            line,
        });
    }

    Ok(RawEntry {
        key: key.to_string(),
        raw: raw.to_string(),
        line,
    })
}
