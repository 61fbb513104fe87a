/*!
 * Common test utilities for the srtranslator test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use srtranslator::glossary::{GlossaryStore, GlossarySync, MemoryFingerprintStore};

/// Routes library log output through the test harness (RUST_LOG=debug to see it)
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
The hero arrives.

2
00:00:05,000 --> 00:00:09,000
The villain waits
in the dark.

3
00:00:10,000 --> 00:00:14,000
Nobody else is here.
"#;
    create_test_file(dir, filename, content)
}

/// Writes `content` as the glossary CSV inside `dir`
pub fn write_glossary(dir: &Path, content: &str) -> Result<PathBuf> {
    create_test_file(dir, "glossary/glossary.csv", content)
}

/// Glossary sync over `dir/glossary/glossary.csv` with an in-memory fingerprint
/// record. The record handle is returned so tests can inspect or preset it.
pub fn memory_sync(dir: &Path) -> (GlossarySync, MemoryFingerprintStore) {
    let record = MemoryFingerprintStore::new();
    let store = GlossaryStore::new(dir.join("glossary/glossary.csv"), record.clone());
    (GlossarySync::new(store), record)
}

/// Glossary sync with the fingerprint record in a sidecar file, as the binary uses
pub fn sidecar_sync(dir: &Path) -> GlossarySync {
    let store = GlossaryStore::with_sidecar(
        dir.join("glossary/glossary.csv"),
        dir.join("glossary/.glossary_hash"),
    );
    GlossarySync::new(store)
}
