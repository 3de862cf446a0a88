//! `KEY=VALUE` configuration files: parsing, lookup, and line rewrites.
//!
//! The format is deliberately lenient. Blank lines, `#` comments, and lines
//! without `=` are skipped; an `export ` prefix is accepted; a value wrapped
//! in matching quotes is unwrapped. There is no escape processing and no
//! `$VAR` substitution, so encrypted blobs and secrets containing `$` are
//! read back exactly as written.

use crate::error::{EnvError, EnvResult};
use envseal_crypto::{MasterKey, decode_key};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Splits one line into a trimmed key and value, or `None` for lines that
/// carry no assignment.
pub fn parse_line(raw: &str) -> Option<(&str, &str)> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line).trim_start();
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, unquote(value.trim())))
}

fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Parses every assignment in `text`, in file order, duplicates included.
pub fn parse(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(parse_line)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A parsed configuration file.
#[derive(Clone)]
pub struct EnvFile {
    name: String,
    path: PathBuf,
    entries: HashMap<String, String>,
    prefer_process_env: bool,
}

impl EnvFile {
    /// Reads and parses `path`. A missing file is an I/O error.
    pub fn load(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        prefer_process_env: bool,
    ) -> EnvResult<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|e| EnvError::io(&path, e))?;
        let file = Self::from_contents(name, path, &text, prefer_process_env);
        debug!(
            "loaded {} configuration from {} ({} keys)",
            file.name,
            file.path.display(),
            file.entries.len()
        );
        Ok(file)
    }

    /// Builds a configuration from in-memory text.
    pub fn from_contents(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        text: &str,
        prefer_process_env: bool,
    ) -> Self {
        let mut entries = HashMap::new();
        for (key, value) in parse(text) {
            // First assignment wins, matching which line a rewrite replaces.
            entries.entry(key).or_insert(value);
        }
        Self {
            name: name.into(),
            path: path.into(),
            entries,
            prefer_process_env,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value as written in the file, ignoring the process environment.
    pub fn raw_value(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Looks up a non-empty value. When enabled, a non-empty process
    /// environment variable of the same name takes precedence over the file.
    pub fn get_property(&self, key: &str) -> EnvResult<String> {
        if self.prefer_process_env {
            if let Some(value) = std::env::var(key).ok().filter(|v| !v.is_empty()) {
                return Ok(value);
            }
        }
        self.raw_value(key)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| EnvError::not_found(key, &self.name))
    }

    pub fn get_property_or(&self, key: &str, default: &str) -> String {
        self.get_property(key).unwrap_or_else(|_| default.to_string())
    }

    /// Parses a value, returning `None` when it is missing or unparseable.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get_property(key).ok()?.trim().parse().ok()
    }

    /// Reads and decodes a base64 master key stored under `name`.
    pub fn master_key(&self, name: &str) -> EnvResult<MasterKey> {
        let encoded = self.get_property(name)?;
        Ok(decode_key(&encoded)?)
    }

    /// Re-reads the file from disk.
    pub fn reload(&self) -> EnvResult<Self> {
        Self::load(self.name.clone(), self.path.clone(), self.prefer_process_env)
    }
}

impl fmt::Debug for EnvFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Values may be master keys or not-yet-encrypted secrets.
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("EnvFile")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("keys", &keys)
            .field("prefer_process_env", &self.prefer_process_env)
            .finish()
    }
}

// ── File helpers ────────────────────────────────────────────────

/// Creates the file and its parent directory if either is missing.
pub fn ensure_file(path: &Path) -> EnvResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| EnvError::io(parent, e))?;
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| EnvError::io(path, e))?;
    Ok(())
}

/// Reads the file as lines.
pub fn read_lines(path: &Path) -> EnvResult<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| EnvError::io(path, e))?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Replaces the whole file with `lines`: written to a sibling temp file,
/// synced, then renamed over the original.
pub fn write_lines(path: &Path, lines: &[String]) -> EnvResult<()> {
    let file_name = path.file_name().ok_or_else(|| {
        EnvError::InvalidArgument(format!("not a file path: {}", path.display()))
    })?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut contents = lines.join("\n");
    if !lines.is_empty() {
        contents.push('\n');
    }

    let mut file = fs::File::create(&tmp_path).map_err(|e| EnvError::io(&tmp_path, e))?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| EnvError::io(&tmp_path, e))?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| EnvError::io(path, e))
}

/// Returns `lines` with the first assignment to `variable` replaced by
/// `variable=value`, or with that assignment appended if there is none.
pub fn update_lines(lines: &[String], variable: &str, value: &str) -> Vec<String> {
    let replacement = format!("{variable}={value}");
    let mut out = lines.to_vec();
    match out
        .iter()
        .position(|line| parse_line(line).is_some_and(|(k, _)| k == variable))
    {
        Some(index) => out[index] = replacement,
        None => out.push(replacement),
    }
    out
}

/// Rewrites one variable in place. Callers serialize access per path.
pub fn update_variable(path: &Path, variable: &str, value: &str) -> EnvResult<()> {
    let lines = read_lines(path)?;
    write_lines(path, &update_lines(&lines, variable, value))
}

/// True when the file assigns a non-empty value to `variable`.
pub fn is_variable_set(path: &Path, variable: &str) -> EnvResult<bool> {
    let lines = read_lines(path)?;
    Ok(lines
        .iter()
        .filter_map(|line| parse_line(line))
        .find(|(k, _)| *k == variable)
        .is_some_and(|(_, v)| !v.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_line_rules() {
        assert_eq!(parse_line("A=1"), Some(("A", "1")));
        assert_eq!(parse_line("  B = two words  "), Some(("B", "two words")));
        assert_eq!(parse_line("export C=3"), Some(("C", "3")));
        assert_eq!(parse_line("D=\"quoted # value\""), Some(("D", "quoted # value")));
        assert_eq!(parse_line("E='single'"), Some(("E", "single")));
        assert_eq!(parse_line("F=a=b=c"), Some(("F", "a=b=c")));
        assert_eq!(parse_line("G="), Some(("G", "")));
        assert_eq!(parse_line("H=\"mismatched'"), Some(("H", "\"mismatched'")));
        assert_eq!(parse_line("# A=1"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("no assignment"), None);
        assert_eq!(parse_line("=orphan"), None);
    }

    #[test]
    fn no_substitution() {
        assert_eq!(parse_line("P=$HOME/${USER}"), Some(("P", "$HOME/${USER}")));
    }

    #[test]
    fn first_duplicate_wins() {
        let file = EnvFile::from_contents("T", "t", "K=first\nK=second\n", false);
        assert_eq!(file.raw_value("K"), Some("first"));
        assert_eq!(file.len(), 1);
    }

    #[test]
    fn empty_value_is_not_found() {
        let file = EnvFile::from_contents("T", "t", "EMPTY=\n", false);
        assert_eq!(file.raw_value("EMPTY"), Some(""));
        assert!(matches!(
            file.get_property("EMPTY"),
            Err(EnvError::NotFound { .. })
        ));
    }

    #[test]
    fn debug_output_hides_values() {
        let file = EnvFile::from_contents("BASE", ".env", "DEV_SECRET_KEY=c2VjcmV0
", false);
        let shown = format!("{file:?}");
        assert!(shown.contains("DEV_SECRET_KEY"));
        assert!(!shown.contains("c2VjcmV0"));
    }

    #[test]
    fn update_replaces_first_match_only() {
        let lines: Vec<String> = ["# header", "A=1", "B=2", "A=3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let updated = update_lines(&lines, "A", "x");
        assert_eq!(updated, vec!["# header", "A=x", "B=2", "A=3"]);
    }

    #[test]
    fn update_appends_when_absent() {
        let lines = vec!["A=1".to_string()];
        assert_eq!(update_lines(&lines, "B", "2"), vec!["A=1", "B=2"]);
        assert_eq!(update_lines(&[], "B", "2"), vec!["B=2"]);
    }

    #[test]
    fn update_ignores_commented_assignment() {
        let lines = vec!["#A=old".to_string()];
        assert_eq!(update_lines(&lines, "A", "new"), vec!["#A=old", "A=new"]);
    }

    #[test]
    fn update_does_not_match_prefix_of_longer_name() {
        let lines = vec!["AB=1".to_string()];
        assert_eq!(update_lines(&lines, "A", "2"), vec!["AB=1", "A=2"]);
    }
}
