/*!
 * Tests for subtitle processing functionality
 */

use std::fmt::Write;
use std::fs;
use std::path::PathBuf;
use srtranslator::errors::SubtitleError;
use srtranslator::subtitle_processor::{wrap_text, SubtitleCollection, SubtitleEntry};
use crate::common;

/// Test timestamp parsing and formatting
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let ms = SubtitleEntry::parse_timestamp(ts).unwrap();
    assert_eq!(ms, 5025678);
    assert_eq!(SubtitleEntry::format_timestamp(ms), ts);
}

#[test]
fn test_timestamp_parsing_withOutOfRangeComponents_shouldFail() {
    assert!(SubtitleEntry::parse_timestamp("00:61:00,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("00:00:00").is_err());
}

#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatCorrectly() {
    let entry = SubtitleEntry::new(1, 5000, 10000, "Test subtitle".to_string());
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert_eq!(output, "1\n00:00:05,000 --> 00:00:10,000\nTest subtitle\n\n");
}

#[test]
fn test_new_validated_withBadRangeOrEmptyText_shouldFail() {
    assert!(SubtitleEntry::new_validated(1, 2000, 1000, "text".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, 1000, 2000, "   ".to_string()).is_err());
    let entry = SubtitleEntry::new_validated(1, 1000, 2000, "  text  ".to_string()).unwrap();
    assert_eq!(entry.text, "text");
}

#[test]
fn test_parse_srt_string_withMultilineEntries_shouldKeepLines() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nFirst line\nSecond line\n\n2\n00:00:03,000 --> 00:00:04,000\nThird\n";
    let entries = SubtitleCollection::parse_srt_string(content).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "First line\nSecond line");
    assert_eq!(entries[1].start_time_ms, 3000);
}

#[test]
fn test_parse_srt_string_outOfOrder_shouldSortAndRenumber() {
    let content = "7\n00:00:05,000 --> 00:00:06,000\nLater\n\n3\n00:00:01,000 --> 00:00:02,000\nEarlier\n";
    let entries = SubtitleCollection::parse_srt_string(content).unwrap();

    assert_eq!(entries[0].text, "Earlier");
    assert_eq!(entries[0].seq_num, 1);
    assert_eq!(entries[1].seq_num, 2);
}

#[test]
fn test_parse_srt_string_withOutOfRangeTiming_shouldSkipOnlyThatEntry() {
    let content = "1\n00:61:00,000 --> 00:62:00,000\nBad minutes\n42\n\n2\n00:00:03,000 --> 00:00:04,500\nKept\n";
    let entries = SubtitleCollection::parse_srt_string(content).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Kept");
    assert_eq!(entries[0].start_time_ms, 3000);
    assert_eq!(entries[0].end_time_ms, 4500);
}

#[test]
fn test_parse_srt_string_withDotMillisAndLongHours_shouldParse() {
    let content = "1\n100:00:01.250 --> 100:00:02.000\nLate\n";
    let entries = SubtitleCollection::parse_srt_string(content).unwrap();

    assert_eq!(entries[0].start_time_ms, 360_001_250);
    assert_eq!(entries[0].format_start_time(), "100:00:01,250");
}

#[test]
fn test_parse_srt_string_withoutEntries_shouldFail() {
    let result = SubtitleCollection::parse_srt_string("just some text\n");
    assert!(matches!(result, Err(SubtitleError::Parse(_))));
}

#[test]
fn test_from_file_withBom_shouldParse() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "bom.srt",
        "\u{feff}1\n00:00:01,000 --> 00:00:02,000\nHello\n",
    ).unwrap();

    let collection = SubtitleCollection::from_file(&path, "en").unwrap();

    assert_eq!(collection.entries.len(), 1);
    assert_eq!(collection.entries[0].text, "Hello");
    assert_eq!(collection.source_language, "en");
}

#[test]
fn test_write_to_srt_thenFromFile_shouldPreserveEntries() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_test_subtitle(dir.path(), "movie.srt").unwrap();
    let collection = SubtitleCollection::from_file(&source, "en").unwrap();

    let copy = dir.path().join("out/copy.srt");
    collection.write_to_srt(&copy).unwrap();
    let reloaded = SubtitleCollection::from_file(&copy, "en").unwrap();

    assert_eq!(reloaded.entries, collection.entries);
}

#[test]
fn test_output_and_backup_paths_shouldSitNextToSource() {
    let dir = common::create_temp_dir().unwrap();
    let source = common::create_test_subtitle(dir.path(), "movie.srt").unwrap();
    let collection = SubtitleCollection::from_file(&source, "en").unwrap();

    assert_eq!(collection.output_path("fr"), dir.path().join("movie_fr.srt"));

    let backup = collection.save_backup().unwrap();
    assert_eq!(backup, dir.path().join("movie_backup.srt"));
    assert!(fs::read_to_string(&backup).unwrap().contains("The hero arrives."));
}

#[test]
fn test_output_path_withBareFileName_shouldStayRelative() {
    let collection = SubtitleCollection::new(PathBuf::from("show.srt"), "en".to_string());
    assert_eq!(collection.output_path("de"), PathBuf::from("show_de.srt"));
}

#[test]
fn test_wrap_text_shouldBreakOnWordsWithinLimit() {
    assert_eq!(wrap_text("one two three four", 9), "one two\nthree\nfour");
    assert_eq!(wrap_text("joined\nacross lines", 50), "joined across lines");
    assert_eq!(wrap_text("short", 0), "short");
}

#[test]
fn test_wrap_text_longWord_shouldStayWhole() {
    assert_eq!(wrap_text("a supercalifragilistic word", 5), "a\nsupercalifragilistic\nword");
}

#[test]
fn test_wrap_text_shouldCountCharactersNotBytes() {
    // 10 characters, 14 bytes
    assert_eq!(wrap_text("éééé éééée", 10), "éééé éééée");
}

#[test]
fn test_wrap_lines_shouldReflowEveryEntry() {
    let mut collection = SubtitleCollection::new(PathBuf::from("x.srt"), "en".to_string());
    collection.entries.push(SubtitleEntry::new(1, 0, 1000, "aaa bbb\nccc".to_string()));
    collection.entries.push(SubtitleEntry::new(2, 1000, 2000, "dd".to_string()));

    collection.wrap_lines(7);

    assert_eq!(collection.entries[0].text, "aaa bbb\nccc");
    assert_eq!(collection.entries[1].text, "dd");

    collection.wrap_lines(20);
    assert_eq!(collection.entries[0].text, "aaa bbb ccc");
}
