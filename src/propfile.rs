// Property File Parser
// Parses simple `key = value` settings files

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// One `key = value` entry and the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropEntry {
    pub line: usize,
    pub key: String,
    pub value: String,
}

/// Parse property text, invoking `handler` with `(line, key, value)`.
///
/// Grammar:
/// - `#` starts a comment, either on its own line or after a value
/// - keys and values are trimmed; key case is preserved
/// - a line with no `=` is skipped with a warning
/// - `prefix`, when given, is prepended to every key
pub fn parse_propfile(data: &str, handler: &mut dyn FnMut(usize, &str, &str), prefix: Option<&str>) {
    for (index, raw) in data.lines().enumerate() {
        let line_no = index + 1;
        let content = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let content = content.trim();
        if content.is_empty() {
            continue;
        }

        let Some((key, value)) = content.split_once('=') else {
            log::warn!("line {}: key without value", line_no);
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            log::warn!("line {}: value without key", line_no);
            continue;
        }

        match prefix {
            Some(pfx) => handler(line_no, &format!("{}{}", pfx, key), value),
            None => handler(line_no, key, value),
        }
    }
}

/// Collect every entry of a property string.
pub fn read_entries(data: &str) -> Vec<PropEntry> {
    let mut entries = Vec::new();
    parse_propfile(
        data,
        &mut |line, key, value| {
            entries.push(PropEntry {
                line,
                key: key.to_string(),
                value: value.to_string(),
            })
        },
        None,
    );
    entries
}

/// Read and parse a property file from disk.
pub fn read_file(path: &Path) -> Result<Vec<PropEntry>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read property file {}", path.display()))?;
    Ok(read_entries(&data))
}
