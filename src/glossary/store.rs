/*!
 * Local glossary state.
 *
 * `GlossaryStore` reads the user's CSV glossary and answers "has it changed
 * since we last synchronized?". The last-synced digest lives behind the
 * `FingerprintStore` trait: a sidecar file in production, memory in tests.
 */

use log::{debug, warn};
use parking_lot::RwLock;
use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ContentFingerprinter, GlossaryEntries};
use crate::errors::GlossaryError;

/// Single-record store for the digest of the last synchronized glossary
pub trait FingerprintStore: Send + Sync + Debug {
    /// Read the stored digest. `Ok(None)` when nothing was stored yet; an error
    /// when the record exists but cannot be read.
    fn load(&self) -> io::Result<Option<String>>;

    /// Replace the stored digest
    fn save(&self, digest: &str) -> io::Result<()>;
}

/// Digest kept in a plain-text sidecar file
#[derive(Debug, Clone)]
pub struct FileFingerprintStore {
    path: PathBuf,
}

impl FileFingerprintStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FingerprintStore for FileFingerprintStore {
    fn load(&self) -> io::Result<Option<String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let digest = String::from_utf8(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(digest.trim().to_string()))
    }

    fn save(&self, digest: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, digest)
    }
}

/// Digest kept in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryFingerprintStore {
    record: Arc<RwLock<Option<String>>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryFingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a digest already recorded
    pub fn with_digest(digest: impl Into<String>) -> Self {
        let store = Self::default();
        *store.record.write() = Some(digest.into());
        store
    }

    /// The currently recorded digest
    pub fn current(&self) -> Option<String> {
        self.record.read().clone()
    }

    /// How many times a digest was written
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl FingerprintStore for MemoryFingerprintStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.record.read().clone())
    }

    fn save(&self, digest: &str) -> io::Result<()> {
        *self.record.write() = Some(digest.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// The user's glossary file plus the record of its last synchronized state
#[derive(Debug)]
pub struct GlossaryStore {
    path: PathBuf,
    fingerprints: Box<dyn FingerprintStore>,
}

impl GlossaryStore {
    pub fn new<P: Into<PathBuf>>(path: P, fingerprints: impl FingerprintStore + 'static) -> Self {
        Self {
            path: path.into(),
            fingerprints: Box::new(fingerprints),
        }
    }

    /// Glossary at `path` with its digest in the sidecar file at `hash_path`
    pub fn with_sidecar<P: Into<PathBuf>, H: Into<PathBuf>>(path: P, hash_path: H) -> Self {
        Self::new(path, FileFingerprintStore::new(hash_path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Parse the glossary file.
    ///
    /// Column 0 is the source term and column 1 the target term; further
    /// columns are ignored. Both fields are trimmed. Rows with fewer than two
    /// columns or an empty field are skipped, and a repeated source term keeps
    /// its last target. Unreadable or syntactically broken files are an error
    /// rather than a partial result.
    pub fn read_entries(&self) -> Result<GlossaryEntries, GlossaryError> {
        let raw = fs::read(&self.path)?;
        let content = String::from_utf8(raw)
            .map_err(|e| GlossaryError::Encoding(e.to_string()))?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut entries = GlossaryEntries::new();
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record?;
            if record.len() < 2 {
                skipped += 1;
                continue;
            }

            let source = record[0].trim();
            let target = record[1].trim();
            if source.is_empty() || target.is_empty() {
                skipped += 1;
                continue;
            }
            entries.insert(source.to_string(), target.to_string());
        }

        if skipped > 0 {
            debug!("Skipped {} unusable row(s) in glossary {:?}", skipped, self.path);
        }
        Ok(entries)
    }

    /// Digest of the glossary file if it differs from the last recorded one.
    ///
    /// `None` when there is no glossary file or the record matches. A missing
    /// or unreadable record counts as a difference. Nothing is written.
    pub fn pending_fingerprint(&self) -> Result<Option<String>, GlossaryError> {
        if !self.exists() {
            return Ok(None);
        }

        let current = ContentFingerprinter::fingerprint(&self.path)?;
        match self.fingerprints.load() {
            Ok(Some(stored)) if stored == current => return Ok(None),
            Ok(Some(_)) => debug!("Glossary {:?} changed since last sync", self.path),
            Ok(None) => debug!("No fingerprint recorded for glossary {:?}", self.path),
            Err(e) => warn!("Glossary fingerprint record is unreadable, treating glossary as changed: {}", e),
        }
        Ok(Some(current))
    }

    /// Check the glossary file against the last recorded digest.
    ///
    /// Returns `false` when there is no glossary file or the record matches.
    /// Otherwise the new digest is written before returning `true`. A failed
    /// write is logged and still reports the modification.
    pub fn is_modified_since_last_sync(&self) -> Result<bool, GlossaryError> {
        let Some(current) = self.pending_fingerprint()? else {
            return Ok(false);
        };

        if let Err(e) = self.fingerprints.save(&current) {
            warn!("Failed to record glossary fingerprint: {}", e);
        }
        Ok(true)
    }
}
