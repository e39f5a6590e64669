//! # Lexicon
//!
//! Word → `{role tag, sentiment}` table plus the stores that persist it.
//!
//! - Keys are always lower-case; lookups fold the query the same way.
//! - Persisted as a JSON object: `{"hola": {"token": "SALUDO", "sentimiento": 1.0}}`.
//! - Writes are read-merge-write: the current file is re-read, the new entries are
//!   overlaid, and the full table is written to a sibling temp file and renamed
//!   into place. A file that exists but does not parse is never overwritten.
//! - The merge works on the file's raw JSON: stored keys keep their spelling (only
//!   the in-memory table folds case) and fields this crate does not model are kept.
//!
//! Concurrent writers are not coordinated; one operator per lexicon file.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// One lexicon row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Free-form role tag; protocol phases are matched case-insensitively.
    #[serde(rename = "token", default)]
    pub role_tag: String,
    #[serde(rename = "sentimiento", default)]
    pub sentiment: Option<f64>,
}

impl LexiconEntry {
    pub fn new(role_tag: impl Into<String>, sentiment: Option<f64>) -> Self {
        Self {
            role_tag: role_tag.into(),
            sentiment,
        }
    }
}

/// In-memory lexicon. Ordered so that iteration (and thus ranking ties and the
/// persisted JSON) is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    entries: BTreeMap<String, LexiconEntry>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &str) -> Option<&LexiconEntry> {
        self.entries.get(&query.to_lowercase())
    }

    pub fn contains(&self, query: &str) -> bool {
        self.get(query).is_some()
    }

    /// Insert under the lower-cased key; returns the replaced entry, if any.
    pub fn insert(&mut self, key: &str, entry: LexiconEntry) -> Option<LexiconEntry> {
        self.entries.insert(key.to_lowercase(), entry)
    }

    /// Overlay every entry of `other` (last write wins).
    pub fn extend_from(&mut self, other: &Lexicon) {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LexiconEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, LexiconEntry)> for Lexicon {
    fn from_iter<I: IntoIterator<Item = (String, LexiconEntry)>>(iter: I) -> Self {
        let mut lex = Lexicon::new();
        for (k, v) in iter {
            lex.insert(&k, v);
        }
        lex
    }
}

/// Durable home of the lexicon.
pub trait LexiconStore {
    /// Read the whole table.
    fn load_all(&self) -> Result<Lexicon>;
    /// Overlay `entries` onto whatever is currently stored, preserving everything else.
    fn merge_write(&self, entries: &Lexicon) -> Result<()>;
}

/// JSON file store (the format the analyzer has always used).
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LexiconStore for JsonFileStore {
    fn load_all(&self) -> Result<Lexicon> {
        match load_lexicon_file(&self.path) {
            Ok(lex) => {
                info!(path = %self.path.display(), entries = lex.len(), "lexicon loaded");
                Ok(lex)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "lexicon file not found, starting empty");
                Ok(Lexicon::new())
            }
            Err(e) => {
                Err(e).with_context(|| format!("reading lexicon from {}", self.path.display()))
            }
        }
    }

    fn merge_write(&self, entries: &Lexicon) -> Result<()> {
        // Raw map: stored keys keep their spelling, unknown fields survive the rewrite.
        let mut current = match read_raw_lexicon(&self.path) {
            Ok(map) => map,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "creating new lexicon file");
                Map::new()
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "refusing to overwrite unreadable lexicon at {}",
                        self.path.display()
                    )
                })
            }
        };
        for (key, entry) in entries.iter() {
            let fresh = serde_json::to_value(entry).context("encoding lexicon entry")?;
            match current.get_mut(key) {
                Some(Value::Object(stored)) => {
                    if let Value::Object(fields) = fresh {
                        stored.extend(fields);
                    }
                }
                _ => {
                    current.insert(key.to_string(), fresh);
                }
            }
        }
        write_lexicon_file(&self.path, &current)?;
        info!(
            path = %self.path.display(),
            added = entries.len(),
            total = current.len(),
            "lexicon merge-written"
        );
        Ok(())
    }
}

/// In-memory store: used for dry runs (nothing touches disk) and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Lexicon>,
}

impl MemoryStore {
    pub fn new(initial: Lexicon) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }

    /// Current contents; a poisoned lock still yields the data it guards.
    pub fn snapshot(&self) -> Lexicon {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LexiconStore for MemoryStore {
    fn load_all(&self) -> Result<Lexicon> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("memory lexicon store poisoned"))?;
        Ok(guard.clone())
    }

    fn merge_write(&self, entries: &Lexicon) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("memory lexicon store poisoned"))?;
        guard.extend_from(entries);
        Ok(())
    }
}

/// Load a lexicon file directly. Parse failures come back as `InvalidData`,
/// a missing file as `NotFound`.
pub fn load_lexicon_file(path: &Path) -> io::Result<Lexicon> {
    let bytes = fs::read(path)?;
    let raw: BTreeMap<String, LexiconEntry> = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(raw.into_iter().collect())
}

/// Persisted table as raw JSON. Every value must still read as a [`LexiconEntry`];
/// anything else is `InvalidData`, same as [`load_lexicon_file`].
fn read_raw_lexicon(path: &Path) -> io::Result<Map<String, Value>> {
    let bytes = fs::read(path)?;
    let map: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    for value in map.values() {
        LexiconEntry::deserialize(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    }
    Ok(map)
}

fn write_lexicon_file<T: Serialize>(path: &Path, table: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating lexicon directory {}", dir.display()))?;
    }

    let mut buf = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    table.serialize(&mut ser).context("serializing lexicon")?;
    buf.push(b'\n');

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, &buf).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("replacing {} with {}", path.display(), tmp.display()))?;
    Ok(())
}
