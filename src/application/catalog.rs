//! Localized message catalogs read from `.properties` files.
//!
//! A catalog set named `app` is made of `app.properties` plus optional localized
//! variants such as `app_fr.properties` and `app_fr_CA.properties`. The catalog for a
//! locale layers the base file, the language file and the full locale file, the more
//! specific value winning.

use super::{MessageCatalog, MessagesSource};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Messages of a single `.properties` file, or several merged together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesCatalog {
    messages: HashMap<String, String>,
}

impl PropertiesCatalog {
    /// Parse `.properties` content.
    ///
    /// Keys end at the first unescaped `=`, `:` or whitespace. `#` and `!` start comments,
    /// a line ending in an odd number of backslashes continues on the next line, and
    /// `\uXXXX`, `\t`, `\n`, `\r`, `\f` and `\<char>` escapes are decoded in keys and values.
    pub fn parse(content: &str) -> Self {
        let mut messages = HashMap::new();
        let mut lines = content.lines();

        while let Some(line) = lines.next() {
            let mut logical = line.trim_start().to_string();
            if logical.is_empty() || logical.starts_with('#') || logical.starts_with('!') {
                continue;
            }
            while is_continued(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            messages.insert(unescape(key), unescape(value));
        }

        Self { messages }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading message catalog {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read message catalog: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Overlay `other` on top of this catalog
    pub fn merge(&mut self, other: &PropertiesCatalog) {
        for (key, value) in &other.messages {
            self.messages.insert(key.clone(), value.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageCatalog for PropertiesCatalog {
    fn get(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| format!("[[missing key: {}]]", key))
    }
}

/// A trailing backslash continues the line unless it is itself escaped
fn is_continued(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Split a logical line at its first unescaped separator
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = index;
                break;
            }
            c if c.is_whitespace() => {
                key_end = index;
                break;
            }
            _ => {}
        }
    }

    let rest = line[key_end..].trim_start();
    let value = rest.strip_prefix(['=', ':']).unwrap_or(rest).trim_start();
    (&line[..key_end], value)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => match read_code_unit(&mut chars) {
                Some(high @ 0xD800..=0xDBFF) => {
                    let low = read_low_surrogate(&mut chars);
                    let combined = low.map(|low| 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00));
                    out.push(combined.and_then(char::from_u32).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                Some(unit) => out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)),
                None => out.push_str("\\u"),
            },
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

/// Four hex digits following `\u`; nothing is consumed when they are malformed
fn read_code_unit(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let digits: String = chars.clone().take(4).collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    chars.nth(3);
    u32::from_str_radix(&digits, 16).ok()
}

fn read_low_surrogate(chars: &mut std::str::Chars<'_>) -> Option<u32> {
    let mut lookahead = chars.clone();
    if lookahead.next() != Some('\\') || lookahead.next() != Some('u') {
        return None;
    }
    match read_code_unit(&mut lookahead) {
        Some(low @ 0xDC00..=0xDFFF) => {
            *chars = lookahead;
            Some(low)
        }
        _ => None,
    }
}

/// All localized variants of one catalog, keyed by locale suffix (`""` for the base file)
#[derive(Debug, Clone, Default)]
pub struct CatalogSet {
    base_name: String,
    catalogs: HashMap<String, PropertiesCatalog>,
}

impl CatalogSet {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            catalogs: HashMap::new(),
        }
    }

    /// Load every file in `files` belonging to the `base_name` catalog; other files are ignored
    pub fn load(base_name: &str, files: &[PathBuf]) -> Result<Self> {
        let mut set = Self::new(base_name);
        for file in files {
            match set.locale_suffix(file) {
                Some(suffix) => {
                    let catalog = PropertiesCatalog::from_file(file)?;
                    debug!("Catalog {:?} has {} messages", suffix, catalog.len());
                    set.add(&suffix, catalog);
                }
                None => warn!("Ignoring message catalog {}", file.display()),
            }
        }
        Ok(set)
    }

    /// Add (or merge into) the variant for `suffix`, e.g. `""`, `"fr"` or `"fr_CA"`
    pub fn add(&mut self, suffix: &str, catalog: PropertiesCatalog) {
        self.catalogs
            .entry(suffix.to_string())
            .or_default()
            .merge(&catalog);
    }

    /// `Some("")` for `app.properties`, `Some("fr_CA")` for `app_fr_CA.properties`
    fn locale_suffix(&self, file: &Path) -> Option<String> {
        if file.extension().and_then(|e| e.to_str()) != Some("properties") {
            return None;
        }
        let stem = file.file_stem()?.to_str()?;
        if stem == self.base_name {
            return Some(String::new());
        }
        stem.strip_prefix(&self.base_name)?
            .strip_prefix('_')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

impl MessagesSource for CatalogSet {
    fn catalog_for(&self, locale: &str) -> Arc<dyn MessageCatalog> {
        let locale = locale.replace('-', "_");
        let language = locale.split('_').next().unwrap_or_default().to_string();

        let mut merged = PropertiesCatalog::default();
        let mut seen = Vec::new();
        for suffix in [String::new(), language, locale] {
            if seen.contains(&suffix) {
                continue;
            }
            if let Some(catalog) = self.catalogs.get(&suffix) {
                merged.merge(catalog);
            }
            seen.push(suffix);
        }
        Arc::new(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_properties() {
        let catalog = PropertiesCatalog::parse(
            "# comment\n\
             ! another comment\n\
             \n\
             openapi-title = Widget Store\n\
             openapi.response.200: OK\n\
             openapi./a/{id}.get.summary=Fetch a\n\
             empty=\n",
        );

        assert_eq!(catalog.get("openapi-title"), "Widget Store");
        assert_eq!(catalog.get("openapi.response.200"), "OK");
        assert_eq!(catalog.get("openapi./a/{id}.get.summary"), "Fetch a");
        assert_eq!(catalog.get("empty"), "");
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_continuation_lines() {
        let catalog = PropertiesCatalog::parse("long=first \\\n    second\n");
        assert_eq!(catalog.get("long"), "first second");
    }

    #[test]
    fn test_unicode_escapes() {
        let catalog = PropertiesCatalog::parse("title=Caf\\u00e9\nsmile=\\uD83D\\uDE00\nbad=\\u00zz");
        assert_eq!(catalog.get("title"), "Café");
        assert_eq!(catalog.get("smile"), "\u{1F600}");
        assert_eq!(catalog.get("bad"), "\\u00zz");
    }

    #[test]
    fn test_escaped_trailing_backslash_ends_the_entry() {
        let catalog = PropertiesCatalog::parse("dir=C:\\\\\nnext=1\nodd=a\\\\\\\n  b\n");
        assert_eq!(catalog.get("dir"), "C:\\");
        assert_eq!(catalog.get("next"), "1");
        assert_eq!(catalog.get("odd"), "a\\b");
    }

    #[test]
    fn test_escaped_separators_in_keys() {
        let catalog = PropertiesCatalog::parse("openapi./a\\:b.get.summary=S\nequation\\=key = 1\\=1\nwith\\ space: x");
        assert_eq!(catalog.get("openapi./a:b.get.summary"), "S");
        assert_eq!(catalog.get("equation=key"), "1=1");
        assert_eq!(catalog.get("with space"), "x");
    }

    #[test]
    fn test_whitespace_separator_and_character_escapes() {
        let catalog = PropertiesCatalog::parse("greeting   Hello there\nlines=one\\ntwo\\tend\nbare\n");
        assert_eq!(catalog.get("greeting"), "Hello there");
        assert_eq!(catalog.get("lines"), "one\ntwo\tend");
        assert_eq!(catalog.get("bare"), "");
    }

    #[test]
    fn test_missing_key_placeholder() {
        let catalog = PropertiesCatalog::default();
        assert_eq!(catalog.get("nope"), "[[missing key: nope]]");
    }

    #[test]
    fn test_locale_layers() {
        let mut set = CatalogSet::new("app");
        set.add("", PropertiesCatalog::parse("a=base\nb=base\nc=base"));
        set.add("fr", PropertiesCatalog::parse("b=fr\nc=fr"));
        set.add("fr_CA", PropertiesCatalog::parse("c=fr_CA"));

        let canadian = set.catalog_for("fr-CA");
        assert_eq!(canadian.get("a"), "base");
        assert_eq!(canadian.get("b"), "fr");
        assert_eq!(canadian.get("c"), "fr_CA");

        let french = set.catalog_for("fr");
        assert_eq!(french.get("c"), "fr");

        let english = set.catalog_for("en_US");
        assert_eq!(english.get("c"), "base");
    }

    #[test]
    fn test_load_from_files() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("app.properties");
        let german = temp_dir.path().join("app_de.properties");
        let other = temp_dir.path().join("other.properties");
        fs::write(&base, "greeting=Hello").unwrap();
        fs::write(&german, "greeting=Hallo").unwrap();
        fs::write(&other, "greeting=Ignored").unwrap();

        let set = CatalogSet::load("app", &[base, german, other]).unwrap();

        assert_eq!(set.catalog_for("de").get("greeting"), "Hallo");
        assert_eq!(set.catalog_for("it").get("greeting"), "Hello");
    }
}
