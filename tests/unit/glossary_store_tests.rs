/*!
 * Tests for the glossary file, its fingerprint and the fingerprint record
 */

use std::fs;
use srtranslator::errors::GlossaryError;
use srtranslator::glossary::{
    ContentFingerprinter, FileFingerprintStore, FingerprintStore, GlossaryStore,
    MemoryFingerprintStore,
};
use crate::common;

#[test]
fn test_is_modified_since_last_sync_sequence_shouldTrackContentChanges() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("glossary.csv");
    let record = MemoryFingerprintStore::new();
    let store = GlossaryStore::new(&path, record.clone());

    // No file yet
    assert!(!store.is_modified_since_last_sync().unwrap());
    assert_eq!(record.save_count(), 0);

    fs::write(&path, "hero,héros\n").unwrap();
    assert!(store.is_modified_since_last_sync().unwrap());
    assert!(!store.is_modified_since_last_sync().unwrap());

    fs::write(&path, "hero,héros\nvillain,méchant\n").unwrap();
    assert!(store.is_modified_since_last_sync().unwrap());
    assert!(!store.is_modified_since_last_sync().unwrap());

    // Same bytes rewritten
    fs::write(&path, "hero,héros\nvillain,méchant\n").unwrap();
    assert!(!store.is_modified_since_last_sync().unwrap());

    assert_eq!(record.save_count(), 2);
    assert_eq!(
        record.current().unwrap(),
        ContentFingerprinter::fingerprint(&path).unwrap()
    );
}

#[test]
fn test_is_modified_since_last_sync_withSidecar_shouldPersistAcrossStores() {
    let dir = common::create_temp_dir().unwrap();
    let glossary = common::write_glossary(dir.path(), "hero,héros\n").unwrap();
    let hash_path = dir.path().join("glossary/.glossary_hash");

    let first = GlossaryStore::with_sidecar(&glossary, &hash_path);
    assert!(first.is_modified_since_last_sync().unwrap());

    let second = GlossaryStore::with_sidecar(&glossary, &hash_path);
    assert!(!second.is_modified_since_last_sync().unwrap());

    let recorded = fs::read_to_string(&hash_path).unwrap();
    assert_eq!(recorded.len(), 64);
    assert!(recorded.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_is_modified_since_last_sync_corruptSidecar_shouldReportChangeAndRewrite() {
    let dir = common::create_temp_dir().unwrap();
    let glossary = common::write_glossary(dir.path(), "hero,héros\n").unwrap();
    let hash_path = dir.path().join("glossary/.glossary_hash");
    fs::write(&hash_path, [0xff, 0xfe, 0x00]).unwrap();

    let store = GlossaryStore::with_sidecar(&glossary, &hash_path);
    assert!(store.is_modified_since_last_sync().unwrap());
    assert!(!store.is_modified_since_last_sync().unwrap());
}

#[test]
fn test_is_modified_since_last_sync_staleRecord_shouldReportChange() {
    let dir = common::create_temp_dir().unwrap();
    let glossary = common::write_glossary(dir.path(), "hero,héros\n").unwrap();
    // A record left by an older digest format
    let record = MemoryFingerprintStore::with_digest("5d41402abc4b2a76b9719d911017c592");
    let store = GlossaryStore::new(&glossary, record.clone());

    assert!(store.is_modified_since_last_sync().unwrap());
    assert_eq!(record.save_count(), 1);
}

#[test]
fn test_read_entries_malformedRows_shouldBeSkipped() {
    let dir = common::create_temp_dir().unwrap();
    let glossary = common::write_glossary(
        dir.path(),
        "hero,héros\nlonely\n,empty source\nempty target,\n  villain , méchant  \n\nextra,columns,ignored\n",
    ).unwrap();
    let store = GlossaryStore::new(&glossary, MemoryFingerprintStore::new());

    let entries = store.read_entries().unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries["hero"], "héros");
    assert_eq!(entries["villain"], "méchant");
    assert_eq!(entries["extra"], "columns");
}

#[test]
fn test_read_entries_quotedCommasAndBom_shouldParse() {
    let dir = common::create_temp_dir().unwrap();
    let glossary = common::write_glossary(
        dir.path(),
        "\u{feff}\"Smith, John\",\"Smith, Jean\"\nhero,héros\n",
    ).unwrap();
    let store = GlossaryStore::new(&glossary, MemoryFingerprintStore::new());

    let entries = store.read_entries().unwrap();

    assert_eq!(entries["Smith, John"], "Smith, Jean");
    assert_eq!(entries["hero"], "héros");
}

#[test]
fn test_read_entries_duplicateSource_shouldKeepLast() {
    let dir = common::create_temp_dir().unwrap();
    let glossary = common::write_glossary(dir.path(), "hero,héros\nhero,héroïne\n").unwrap();
    let store = GlossaryStore::new(&glossary, MemoryFingerprintStore::new());

    let entries = store.read_entries().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries["hero"], "héroïne");
}

#[test]
fn test_read_entries_invalidUtf8_shouldFailWithEncodingError() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("glossary.csv");
    fs::write(&path, [b'h', b'i', b',', 0xff, b'\n']).unwrap();
    let store = GlossaryStore::new(&path, MemoryFingerprintStore::new());

    assert!(matches!(store.read_entries(), Err(GlossaryError::Encoding(_))));
}

#[test]
fn test_read_entries_missingFile_shouldFailWithIoError() {
    let dir = common::create_temp_dir().unwrap();
    let store = GlossaryStore::new(dir.path().join("absent.csv"), MemoryFingerprintStore::new());

    assert!(!store.exists());
    assert!(matches!(store.read_entries(), Err(GlossaryError::Io(_))));
}

#[test]
fn test_fileFingerprintStore_roundTrip_shouldTrimWhitespace() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("nested/.hash");
    let record = FileFingerprintStore::new(&path);

    assert_eq!(record.load().unwrap(), None);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "abc123\n").unwrap();
    assert_eq!(record.load().unwrap().as_deref(), Some("abc123"));
}
