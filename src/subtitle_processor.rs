use std::fs;
use std::fs::File;
use std::fmt;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};
use std::io::Write;
use std::path::{Path, PathBuf};
use log::{warn, debug};
use indicatif::ProgressBar;

use crate::errors::{SubtitleError, TranslationError};
use crate::providers::TranslationBackend;
use crate::translation::TranslationAdapter;

// @module: Subtitle processing and manipulation

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2,}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{2,}:\d{2}:\d{2}[,.]\d{3})").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Result<Self> {
        if end_time_ms <= start_time_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end_time_ms, start_time_ms
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty subtitle text for entry {}", seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Parse an SRT timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Collection of subtitle entries with metadata
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,

    /// Source language
    pub source_language: String,
}

impl SubtitleCollection {
    /// Create a new subtitle collection
    pub fn new(source_file: PathBuf, source_language: String) -> Self {
        SubtitleCollection {
            source_file,
            entries: Vec::new(),
            source_language,
        }
    }

    /// Load an SRT file
    pub fn from_file<P: AsRef<Path>>(path: P, source_language: &str) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read subtitle file: {}", path.display()))?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        let entries = Self::parse_srt_string(content)
            .with_context(|| format!("Failed to parse subtitle file: {}", path.display()))?;

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
            source_language: source_language.to_string(),
        })
    }

    /// Translate every entry through `adapter`, one call per entry, in order.
    ///
    /// Stops at the first failure; entries translated before it keep their
    /// translation so the caller can back up the partial result.
    pub async fn translate<B: TranslationBackend>(
        &mut self,
        adapter: &mut TranslationAdapter<B>,
        source_language: &str,
        target_language: &str,
        progress: Option<&ProgressBar>,
    ) -> Result<(), TranslationError> {
        for entry in self.entries.iter_mut() {
            let translated = adapter.translate(&entry.text, source_language, target_language).await?;
            debug!("Entry {}: {:?} -> {:?}", entry.seq_num, entry.text, translated);
            entry.text = translated;

            if let Some(progress) = progress {
                progress.inc(1);
            }
        }
        Ok(())
    }

    /// Reflow every entry to lines of at most `limit` characters
    pub fn wrap_lines(&mut self, limit: usize) {
        for entry in self.entries.iter_mut() {
            entry.text = wrap_text(&entry.text, limit);
        }
    }

    /// Path of the translated file: `<stem>_<language>.srt` next to the source
    pub fn output_path(&self, target_language: &str) -> PathBuf {
        self.sibling_path(target_language)
    }

    /// Write the current state to `<stem>_backup.srt` next to the source
    pub fn save_backup(&self) -> Result<PathBuf> {
        let path = self.sibling_path("backup");
        self.write_to_srt(&path)
            .with_context(|| format!("Failed to write backup: {}", path.display()))?;
        warn!("Saved backup of subtitles to {}", path.display());
        Ok(path)
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let stem = self.source_file.file_stem().unwrap_or_default().to_string_lossy();
        let file_name = format!("{}_{}.srt", stem, suffix);
        match self.source_file.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Write subtitles to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }

    /// Parse SRT format string into subtitle entries
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let mut entries = Vec::new();

        // State variables for parsing
        let mut current_seq_num: Option<usize> = None;
        let mut current_start_time_ms: Option<u64> = None;
        let mut current_end_time_ms: Option<u64> = None;
        let mut current_text = String::new();
        // Set while the rest of a block with a bad timing line is dropped
        let mut skipping = false;

        let mut add_current_entry = |seq_num: usize, start_ms: u64, end_ms: u64, text: &str| {
            match SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text.to_string()) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", seq_num, e),
            }
        };

        for (line_index, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            // An empty line closes the current entry
            if trimmed.is_empty() {
                skipping = false;
                if let (Some(seq_num), Some(start_ms), Some(end_ms)) = (current_seq_num, current_start_time_ms, current_end_time_ms) {
                    if !current_text.is_empty() {
                        add_current_entry(seq_num, start_ms, end_ms, &current_text);

                        current_seq_num = None;
                        current_start_time_ms = None;
                        current_end_time_ms = None;
                        current_text.clear();
                    }
                }
                continue;
            }

            if skipping {
                continue;
            }

            if current_seq_num.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq_num = Some(num);
                    continue;
                }
            }

            if current_seq_num.is_some() && current_start_time_ms.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    let times = SubtitleEntry::parse_timestamp(&caps[1])
                        .and_then(|start| Ok((start, SubtitleEntry::parse_timestamp(&caps[2])?)));
                    match times {
                        Ok((start_ms, end_ms)) => {
                            current_start_time_ms = Some(start_ms);
                            current_end_time_ms = Some(end_ms);
                        }
                        Err(e) => {
                            warn!("Skipping entry at line {}: {}", line_index + 1, e);
                            skipping = true;
                            current_seq_num = None;
                        }
                    }
                    continue;
                }
            }

            if current_seq_num.is_some() && current_start_time_ms.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!("Unexpected text at line {} before sequence number or timestamp: {}", line_index + 1, trimmed);
            }
        }

        if let (Some(seq_num), Some(start_ms), Some(end_ms)) = (current_seq_num, current_start_time_ms, current_end_time_ms) {
            if !current_text.is_empty() {
                add_current_entry(seq_num, start_ms, end_ms, &current_text);
            }
        }

        if entries.is_empty() {
            return Err(SubtitleError::Parse("No valid subtitle entries were found in the SRT content".to_string()));
        }

        entries.sort_by_key(|entry| entry.start_time_ms);

        // Renumber entries to ensure sequential order
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.seq_num = i + 1;
        }

        Ok(entries)
    }
}

impl fmt::Display for SubtitleCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Language: {}", self.source_language)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}

/// Greedy word wrap: joins the text's lines, then breaks before any word that
/// would push a line past `limit` characters. Words longer than `limit` get a
/// line of their own. A zero limit leaves the text unchanged.
pub fn wrap_text(text: &str, limit: usize) -> String {
    if limit == 0 {
        return text.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= limit {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}
