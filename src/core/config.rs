//! The `salt.conf` model, parser and writer.
//!
//! `salt.conf` is an INI-like file checked into the parent repository. Blank
//! lines and `#`-prefixed lines are comments; an inline `#` starts a comment
//! unless it sits inside quotes; quoted values are stripped of surrounding
//! matched single or double quotes. Branch mappings live in a
//! `branches = { ... }` block with `pattern -> target` lines.
//!
//! The writer emits mappings sorted by key, so `parse(emit(c)) == c` holds
//! for any config.
//!
//! # Public API
//! - [`Submodule`]: one configured submodule
//! - [`SaltConfig`]: ordered list of submodules with lookup/edit helpers

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::error::{Result, SaltError};
use crate::core::fsutil::atomic_write;

/// A submodule as declared in `salt.conf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submodule {
    pub name: String,
    pub path: String,
    pub url: String,
    pub default_branch: String,
    pub shallow: bool,
    /// Parent-branch pattern -> target branch template. Keys may contain a
    /// single `*` wildcard. Sorted by key, which also fixes the wildcard
    /// iteration order.
    pub branch_mappings: BTreeMap<String, String>,
}

impl Submodule {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        url: impl Into<String>,
        default_branch: impl Into<String>,
    ) -> Self {
        Submodule {
            name: name.into(),
            path: path.into(),
            url: url.into(),
            default_branch: default_branch.into(),
            shallow: true,
            branch_mappings: BTreeMap::new(),
        }
    }
}

/// Parsed contents of `salt.conf`, preserving declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaltConfig {
    pub submodules: Vec<Submodule>,
}

impl SaltConfig {
    pub fn find(&self, name: &str) -> Option<&Submodule> {
        self.submodules.iter().find(|s| s.name == name)
    }

    /// Insert or replace the record with the same name.
    pub fn upsert(&mut self, submodule: Submodule) {
        match self.submodules.iter_mut().find(|s| s.name == submodule.name) {
            Some(existing) => *existing = submodule,
            None => self.submodules.push(submodule),
        }
    }

    /// Remove by name; returns whether a record was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.submodules.len();
        self.submodules.retain(|s| s.name != name);
        self.submodules.len() != before
    }

    /// Read and parse a config file. A missing file is [`SaltError::ConfigNotFound`].
    pub fn load(path: &Path) -> Result<SaltConfig> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SaltError::ConfigNotFound)
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&text)
    }

    /// Serialize and atomically write the config file.
    pub fn save(&self, path: &Path) -> Result<()> {
        atomic_write(path, self.emit().as_bytes())
    }

    pub fn parse(text: &str) -> Result<SaltConfig> {
        Parser::default().parse(text)
    }

    pub fn emit(&self) -> String {
        let mut out = String::new();
        for (i, sub) in self.submodules.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("[submodule \"{}\"]\n", sub.name));
            out.push_str(&format!("  path = {}\n", quote_if_needed(&sub.path)));
            out.push_str(&format!("  url = {}\n", quote_if_needed(&sub.url)));
            out.push_str(&format!(
                "  default_branch = {}\n",
                quote_if_needed(&sub.default_branch)
            ));
            out.push_str(&format!("  shallow = {}\n", sub.shallow));
            if !sub.branch_mappings.is_empty() {
                out.push_str("  branches = {\n");
                for (pattern, target) in &sub.branch_mappings {
                    out.push_str(&format!("    {pattern} -> {target}\n"));
                }
                out.push_str("  }\n");
            }
        }
        out
    }
}

/// Quote a value on emit when parsing it back bare would change it.
fn quote_if_needed(value: &str) -> String {
    let needs = value.is_empty()
        || value.contains('#')
        || value.contains('"')
        || value.contains('\'')
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace);
    if !needs {
        return value.to_string();
    }
    if value.contains('"') {
        format!("'{value}'")
    } else {
        format!("\"{value}\"")
    }
}

#[derive(Default)]
struct Parser {
    config: SaltConfig,
    current: Option<PartialSubmodule>,
    in_branches: bool,
}

struct PartialSubmodule {
    name: String,
    line: usize,
    path: Option<String>,
    url: Option<String>,
    default_branch: Option<String>,
    shallow: bool,
    branch_mappings: BTreeMap<String, String>,
}

impl Parser {
    fn parse(mut self, text: &str) -> Result<SaltConfig> {
        for (idx, raw) in text.lines().enumerate() {
            let lineno = idx + 1;
            let line = strip_inline_comment(raw);
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if self.in_branches {
                self.branches_line(line, lineno)?;
            } else if line.starts_with('[') {
                self.section_header(line, lineno)?;
            } else {
                self.key_value(line, lineno)?;
            }
        }
        if self.in_branches {
            return Err(SaltError::config_parse(
                text.lines().count(),
                "unterminated 'branches' block, expected '}'",
            ));
        }
        self.finish_current()?;
        Ok(self.config)
    }

    fn section_header(&mut self, line: &str, lineno: usize) -> Result<()> {
        self.finish_current()?;
        let inner = line
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| SaltError::config_parse(lineno, "malformed section header"))?;
        let name = inner
            .trim()
            .strip_prefix("submodule")
            .map(str::trim)
            .map(strip_quotes)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                SaltError::config_parse(lineno, "expected [submodule \"<name>\"]")
            })?;
        if self.config.find(&name).is_some() {
            return Err(SaltError::config_parse(
                lineno,
                format!("duplicate submodule '{name}'"),
            ));
        }
        self.current = Some(PartialSubmodule {
            name,
            line: lineno,
            path: None,
            url: None,
            default_branch: None,
            shallow: true,
            branch_mappings: BTreeMap::new(),
        });
        Ok(())
    }

    fn key_value(&mut self, line: &str, lineno: usize) -> Result<()> {
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| SaltError::config_parse(lineno, "expected 'key = value'"))?;
        let key = key.trim();
        let value = value.trim();
        let current = self.current.as_mut().ok_or_else(|| {
            SaltError::config_parse(lineno, "entry outside a [submodule] section")
        })?;
        match key {
            "path" => current.path = Some(strip_quotes(value)),
            "url" => current.url = Some(strip_quotes(value)),
            "default_branch" => current.default_branch = Some(strip_quotes(value)),
            "shallow" => {
                current.shallow = match strip_quotes(value).as_str() {
                    "true" => true,
                    "false" => false,
                    other => {
                        return Err(SaltError::config_parse(
                            lineno,
                            format!("shallow must be 'true' or 'false', got '{other}'"),
                        ))
                    }
                }
            }
            "branches" => {
                if value != "{" {
                    return Err(SaltError::config_parse(
                        lineno,
                        "expected 'branches = {' to open a mapping block",
                    ));
                }
                self.in_branches = true;
            }
            other => {
                return Err(SaltError::config_parse(
                    lineno,
                    format!("unknown key '{other}'"),
                ))
            }
        }
        Ok(())
    }

    fn branches_line(&mut self, line: &str, lineno: usize) -> Result<()> {
        if line == "}" {
            self.in_branches = false;
            return Ok(());
        }
        let (pattern, target) = line.split_once("->").ok_or_else(|| {
            SaltError::config_parse(lineno, "expected '<pattern> -> <target>' or '}'")
        })?;
        let pattern = strip_quotes(pattern.trim());
        let target = strip_quotes(target.trim());
        if pattern.is_empty() || target.is_empty() {
            return Err(SaltError::config_parse(
                lineno,
                "branch mapping pattern and target must be non-empty",
            ));
        }
        let current = self.current.as_mut().ok_or_else(|| {
            SaltError::config_parse(lineno, "entry outside a [submodule] section")
        })?;
        current.branch_mappings.insert(pattern, target);
        Ok(())
    }

    fn finish_current(&mut self) -> Result<()> {
        let Some(partial) = self.current.take() else {
            return Ok(());
        };
        fn require(
            field: Option<String>,
            key: &str,
            name: &str,
            line: usize,
        ) -> Result<String> {
            field.filter(|v| !v.is_empty()).ok_or_else(|| {
                SaltError::config_parse(line, format!("submodule '{name}' is missing '{key}'"))
            })
        }
        let submodule = Submodule {
            path: require(partial.path, "path", &partial.name, partial.line)?,
            url: require(partial.url, "url", &partial.name, partial.line)?,
            default_branch: require(
                partial.default_branch,
                "default_branch",
                &partial.name,
                partial.line,
            )?,
            shallow: partial.shallow,
            branch_mappings: partial.branch_mappings,
            name: partial.name,
        };
        self.config.submodules.push(submodule);
        Ok(())
    }
}

/// Cut an unquoted `#` comment off a line.
fn strip_inline_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '#') => return &line[..i],
            (None, '"') | (None, '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            _ => {}
        }
    }
    line
}

/// Strip one layer of surrounding matched single or double quotes.
fn strip_quotes(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}
