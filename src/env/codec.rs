//! `.env` parsing and serialization.
//!
//! This module converts between the raw bytes of an env file and an
//! [`EnvSnapshot`], the key-value mapping every other part of envpull
//! works with.

use anyhow::Context;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{EnvpullError, Result};

/// Characters that force a value to be written in double quotes.
const QUOTE_TRIGGERS: [char; 6] = [' ', '\t', '"', '\'', '\\', '\n'];

/// A parsed env file: unique, non-empty keys mapped to string values.
///
/// Iteration order is ascending by key, which is also the order
/// [`serialize`] writes them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.vars.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in iter {
            snapshot.insert(key, value);
        }
        snapshot
    }
}

impl<'a> IntoIterator for &'a EnvSnapshot {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

/// Parse env file bytes into a snapshot.
///
/// Parsing never fails. Blank lines, `#` comments, lines without `=` and
/// lines with an empty key are skipped. The first `=` splits key from
/// value, both are trimmed, and one matching pair of outer `"` or `'`
/// quotes is stripped from the value. Later duplicates win.
///
/// # Example
///
/// ```
/// use envpull::env::parse;
///
/// let snapshot = parse(b"FOO=bar\n# comment\nBAZ=\"hello world\"\n");
/// assert_eq!(snapshot.get("FOO"), Some("bar"));
/// assert_eq!(snapshot.get("BAZ"), Some("hello world"));
/// assert_eq!(snapshot.len(), 2);
/// ```
pub fn parse(bytes: &[u8]) -> EnvSnapshot {
    let content = String::from_utf8_lossy(bytes);
    let mut snapshot = EnvSnapshot::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = parse_line(line) {
            snapshot.insert(key, value);
        }
    }

    snapshot
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, unquote(value.trim())))
}

/// Strip exactly one pair of matching outer quotes.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' || first == b'\'') && first == last {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Serialize a snapshot as `KEY=value` lines in ascending key order.
///
/// Values containing whitespace, quotes, backslashes or newlines are
/// wrapped in double quotes with their content written verbatim.
///
/// ```
/// use envpull::env::{serialize, EnvSnapshot};
///
/// let snapshot: EnvSnapshot = [("B", "two words"), ("A", "1")].into_iter().collect();
/// assert_eq!(serialize(&snapshot), "A=1\nB=\"two words\"\n");
/// ```
pub fn serialize(snapshot: &EnvSnapshot) -> String {
    let mut out = String::new();
    for (key, value) in snapshot {
        out.push_str(key);
        out.push('=');
        if needs_quoting(value) {
            out.push('"');
            out.push_str(value);
            out.push('"');
        } else {
            out.push_str(value);
        }
        out.push('\n');
    }
    out
}

/// Edge whitespace of any kind would be trimmed away by [`parse`].
fn needs_quoting(value: &str) -> bool {
    value.contains(QUOTE_TRIGGERS)
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
}

/// Read and parse an env file.
pub fn load_file(path: &Path) -> Result<EnvSnapshot> {
    let bytes = read_file(path)?;
    Ok(parse(&bytes))
}

/// Read the raw bytes of an env file.
///
/// Fails with [`EnvpullError::LocalFileNotFound`] when the file is absent.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvpullError::LocalFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EnvpullError::Io(e)
        }
    })
}

/// Write raw bytes to an env file, replacing it.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)
        .with_context(|| format!("Failed to write env file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot(pairs: &[(&str, &str)]) -> EnvSnapshot {
        pairs.iter().copied().collect()
    }

    #[test]
    fn parses_simple_env_file() {
        let vars = parse(b"\nKEY1=value1\nKEY2=value2\n");

        assert_eq!(vars.get("KEY1"), Some("value1"));
        assert_eq!(vars.get("KEY2"), Some("value2"));
    }

    #[test]
    fn parses_spec_example() {
        let vars = parse(b"FOO=bar\n# comment\nBAZ=\"hello world\"\n");

        assert_eq!(vars, snapshot(&[("FOO", "bar"), ("BAZ", "hello world")]));
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let content = "\n# This is a comment\nKEY=value\n\n   # indented comment\n";
        let vars = parse(content.as_bytes());

        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("KEY"), Some("value"));
    }

    #[test]
    fn handles_quoted_values() {
        let content = "DOUBLE=\"double quoted\"\nSINGLE='single quoted'\nUNQUOTED=no quotes\n";
        let vars = parse(content.as_bytes());

        assert_eq!(vars.get("DOUBLE"), Some("double quoted"));
        assert_eq!(vars.get("SINGLE"), Some("single quoted"));
        assert_eq!(vars.get("UNQUOTED"), Some("no quotes"));
    }

    #[test]
    fn strips_only_one_pair_of_quotes() {
        let vars = parse(b"A=\"\"nested\"\"\nB='\"mixed\"'\n");

        assert_eq!(vars.get("A"), Some("\"nested\""));
        assert_eq!(vars.get("B"), Some("\"mixed\""));
    }

    #[test]
    fn keeps_mismatched_or_lone_quotes() {
        let vars = parse(b"A=\"open'\nB=\"\nC='\n");

        assert_eq!(vars.get("A"), Some("\"open'"));
        assert_eq!(vars.get("B"), Some("\""));
        assert_eq!(vars.get("C"), Some("'"));
    }

    #[test]
    fn does_not_process_escapes() {
        let vars = parse(br#"PATHS="C:\new\table""#);

        assert_eq!(vars.get("PATHS"), Some(r"C:\new\table"));
    }

    #[test]
    fn handles_empty_values() {
        let vars = parse(b"EMPTY=\nQUOTED_EMPTY=\"\"");

        assert_eq!(vars.get("EMPTY"), Some(""));
        assert_eq!(vars.get("QUOTED_EMPTY"), Some(""));
    }

    #[test]
    fn splits_on_first_equals() {
        let vars = parse(b"URL=https://example.com?foo=bar");

        assert_eq!(vars.get("URL"), Some("https://example.com?foo=bar"));
    }

    #[test]
    fn trims_whitespace_around_key_and_value() {
        let vars = parse(b"  KEY =   value with spaces  \t");

        assert_eq!(vars.get("KEY"), Some("value with spaces"));
    }

    #[test]
    fn skips_lines_without_equals_and_empty_keys() {
        let vars = parse(b"KEY1=value1\ninvalid line without equals\n=orphan\n  = x\nKEY2=value2");

        assert_eq!(vars.len(), 2);
        assert!(!vars.contains_key(""));
    }

    #[test]
    fn last_duplicate_wins() {
        let vars = parse(b"KEY=first\nKEY=second\n");

        assert_eq!(vars.get("KEY"), Some("second"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn handles_crlf_line_endings() {
        let vars = parse(b"A=1\r\nB=\"two\"\r\n");

        assert_eq!(vars.get("A"), Some("1"));
        assert_eq!(vars.get("B"), Some("two"));
    }

    #[test]
    fn parse_tolerates_invalid_utf8() {
        let vars = parse(b"A=\xff\xfe\nB=ok\n");

        assert_eq!(vars.get("B"), Some("ok"));
        assert!(vars.contains_key("A"));
    }

    #[test]
    fn serialize_sorts_keys() {
        let vars = snapshot(&[("ZED", "1"), ("ALPHA", "2"), ("MID", "3")]);

        assert_eq!(serialize(&vars), "ALPHA=2\nMID=3\nZED=1\n");
    }

    #[test]
    fn serialize_quotes_special_values() {
        let vars = snapshot(&[
            ("SPACE", "a b"),
            ("TAB", "a\tb"),
            ("DQ", "say \"hi\""),
            ("SQ", "it's"),
            ("BS", r"C:\tmp"),
            ("PLAIN", "postgres://u:p@host/db"),
            ("EMPTY", ""),
        ]);

        let out = serialize(&vars);

        assert!(out.contains("SPACE=\"a b\"\n"));
        assert!(out.contains("TAB=\"a\tb\"\n"));
        assert!(out.contains("DQ=\"say \"hi\"\"\n"));
        assert!(out.contains("SQ=\"it's\"\n"));
        assert!(out.contains("BS=\"C:\\tmp\"\n"));
        assert!(out.contains("PLAIN=postgres://u:p@host/db\n"));
        assert!(out.contains("EMPTY=\n"));
    }

    #[test]
    fn serialize_empty_snapshot_is_empty() {
        assert_eq!(serialize(&EnvSnapshot::new()), "");
    }

    #[test]
    fn round_trips_tricky_values() {
        let vars = snapshot(&[
            ("A", " leading"),
            ("B", "trailing\t"),
            ("C", "\"already quoted\""),
            ("D", "'single'"),
            ("E", r#"back\slash "and" quotes"#),
            ("F", "=starts-with-equals"),
            ("G", "#not-a-comment"),
            ("H", ""),
        ]);

        assert_eq!(parse(serialize(&vars).as_bytes()), vars);
    }

    #[test]
    fn quotes_values_with_edge_whitespace() {
        let vars = snapshot(&[("NBSP", "\u{a0}x"), ("VT", "x\x0b"), ("CR", "\rx"), ("MID", "a\u{a0}b")]);

        let out = serialize(&vars);

        assert!(out.contains("NBSP=\"\u{a0}x\"\n"));
        assert!(out.contains("VT=\"x\x0b\"\n"));
        assert!(out.contains("CR=\"\rx\"\n"));
        assert!(out.contains("MID=a\u{a0}b\n"));
        assert_eq!(parse(out.as_bytes()), vars);
    }

    #[test]
    fn load_file_reads_and_parses() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(&path, "KEY=value\n").unwrap();

        let vars = load_file(&path).unwrap();

        assert_eq!(vars.get("KEY"), Some("value"));
    }

    #[test]
    fn read_file_reports_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env.missing");

        let err = read_file(&path).unwrap_err();

        assert!(matches!(err, EnvpullError::LocalFileNotFound { .. }));
    }

    #[test]
    fn write_file_replaces_contents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".env");
        fs::write(&path, "OLD=1\n").unwrap();

        write_file(&path, b"NEW=2\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "NEW=2\n");
    }
}
