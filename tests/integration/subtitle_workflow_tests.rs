/*!
 * End-to-end subtitle translation: parse, translate through the adapter,
 * reflow, write, and back up on failure.
 */

use std::fs;
use indicatif::ProgressBar;
use srtranslator::errors::TranslationError;
use srtranslator::providers::mock::MockBackend;
use srtranslator::subtitle_processor::SubtitleCollection;
use srtranslator::translation::TranslationAdapter;
use crate::common;

#[tokio::test]
async fn test_translate_collection_withGlossary_shouldTranslateEveryEntryInOrder() {
    let dir = common::create_temp_dir().unwrap();
    common::write_glossary(dir.path(), "hero,héros\nvillain,méchant\n").unwrap();
    let source = common::create_test_subtitle(dir.path(), "movie.srt").unwrap();
    let backend = MockBackend::working();
    let (sync, _) = common::memory_sync(dir.path());
    let mut adapter = TranslationAdapter::connect(backend.clone(), sync).await.unwrap();

    let mut subtitles = SubtitleCollection::from_file(&source, "en").unwrap();
    let progress = ProgressBar::hidden();
    progress.set_length(subtitles.entries.len() as u64);
    subtitles.translate(&mut adapter, "en", "fr", Some(&progress)).await.unwrap();
    adapter.quit();

    assert_eq!(progress.position(), 3);
    assert_eq!(backend.translate_count(), 3);
    assert_eq!(backend.create_count(), 1);
    assert_eq!(subtitles.entries[0].text, "[fr] The héros arrives.");
    assert_eq!(subtitles.entries[1].text, "[fr] The méchant waits\nin the dark.");
    assert_eq!(subtitles.entries[2].text, "[fr] Nobody else is here.");
}

#[tokio::test]
async fn test_translate_wrap_and_save_shouldWriteTargetFile() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_test_subtitle(dir.path(), "movie.srt").unwrap();
    let backend = MockBackend::working();
    let (sync, _) = common::memory_sync(dir.path());
    let mut adapter = TranslationAdapter::connect(backend, sync).await.unwrap();

    let mut subtitles = SubtitleCollection::from_file(&source, "en").unwrap();
    subtitles.translate(&mut adapter, "en", "de", None).await.unwrap();
    subtitles.wrap_lines(20);
    let output = subtitles.output_path("de");
    subtitles.write_to_srt(&output).unwrap();

    assert_eq!(output, dir.path().join("movie_de.srt"));
    let written = SubtitleCollection::from_file(&output, "de").unwrap();
    assert_eq!(written.entries.len(), 3);
    assert_eq!(written.entries[1].text, "[de] The villain\nwaits in the dark.");
    assert_eq!(written.entries[1].start_time_ms, 5000);
    assert!(written.entries.iter().all(|e| e.text.lines().all(|l| l.chars().count() <= 20)));
}

#[tokio::test]
async fn test_translate_failsMidway_shouldKeepDoneEntriesForBackup() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_test_subtitle(dir.path(), "movie.srt").unwrap();
    let backend = MockBackend::working().failing_translation_after(1);
    let (sync, _) = common::memory_sync(dir.path());
    let mut adapter = TranslationAdapter::connect(backend.clone(), sync).await.unwrap();

    let mut subtitles = SubtitleCollection::from_file(&source, "en").unwrap();
    let result = subtitles.translate(&mut adapter, "en", "fr", None).await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
    assert_eq!(backend.translate_count(), 2);

    let backup = subtitles.save_backup().unwrap();
    let content = fs::read_to_string(&backup).unwrap();
    assert!(content.contains("[fr] The hero arrives."));
    assert!(content.contains("The villain waits"));
    assert!(!content.contains("[fr] The villain"));
    assert!(!dir.path().join("movie_fr.srt").exists());
}

#[tokio::test]
async fn test_translate_afterQuit_shouldFailWithoutTouchingEntries() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_test_subtitle(dir.path(), "movie.srt").unwrap();
    let (sync, _) = common::memory_sync(dir.path());
    let mut adapter = TranslationAdapter::connect(MockBackend::working(), sync).await.unwrap();
    adapter.quit();

    let mut subtitles = SubtitleCollection::from_file(&source, "en").unwrap();
    let result = subtitles.translate(&mut adapter, "en", "fr", None).await;

    assert!(matches!(result, Err(TranslationError::SessionClosed)));
    assert_eq!(subtitles.entries[0].text, "The hero arrives.");
}
