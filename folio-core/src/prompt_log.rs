//! Agent prompt log: the JSON file behind the "Generated with Agent Prompts"
//! page.
//!
//! The log is a list of sessions; prompts are appended to the latest one.
//! Older sessions kept prompts as bare strings in `userPrompts`; they are
//! read as entries `legacy-1`, `legacy-2`, ... with no timestamp, and are
//! migrated into `userPromptEntries` the first time something is appended.
//!
//! Fields this crate does not know about are carried through unchanged.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{FolioError, Result};

const SCHEMA_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// The whole prompt log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptLog {
    /// Document format version.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Free-form note shown above the log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Sessions, oldest first.
    #[serde(default)]
    pub sessions: Vec<PromptSession>,
    /// Unrecognised top-level fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One working session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSession {
    /// Session id, a `YYYY-MM-DD` date for generated sessions.
    #[serde(default)]
    pub id: String,
    /// When the session began.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Legacy plain-string prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompts: Option<Vec<String>>,
    /// Structured prompt entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_prompt_entries: Option<Vec<PromptEntry>>,
    /// Hand-written recap of the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_level_summary: Option<HighLevelSummary>,
    /// Sample of files the session touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_touched_examples: Option<Vec<String>>,
    /// Unrecognised session fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Session recap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighLevelSummary {
    /// What the session produced.
    #[serde(default)]
    pub outcome: String,
    /// Technologies involved.
    #[serde(default)]
    pub key_tech: Vec<String>,
    /// Deployment remarks.
    #[serde(default)]
    pub deployment_notes: Vec<String>,
    /// UX details worth calling out.
    #[serde(default, rename = "notableUX")]
    pub notable_ux: Vec<String>,
    /// Unrecognised fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One recorded prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptEntry {
    /// `p001`, `p002`, ... or `legacy-N`.
    pub id: String,
    /// RFC 3339 timestamp; `null` for migrated legacy prompts.
    #[serde(default)]
    pub at: Option<String>,
    /// Prompt text as given.
    pub prompt: String,
    /// Whether `prompt` is the exact text sent to the agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbatim: Option<bool>,
    /// Short description of what the prompt did.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Files the prompt touched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    /// Unrecognised entry fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_schema_version() -> u32 { SCHEMA_VERSION }

impl Default for PromptLog {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            note: None,
            sessions: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl PromptSession {
    /// An empty session starting at `now`, id'd by its UTC date.
    #[must_use]
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            id: now.format("%Y-%m-%d").to_string(),
            started_at: Some(iso_millis(now)),
            user_prompts: Some(Vec::new()),
            user_prompt_entries: None,
            high_level_summary: Some(HighLevelSummary::default()),
            files_touched_examples: Some(Vec::new()),
            extra: Map::new(),
        }
    }

    /// Structured entries, or the legacy prompts viewed as entries.
    #[must_use]
    pub fn entries(&self) -> Cow<'_, [PromptEntry]> {
        match &self.user_prompt_entries {
            Some(entries) if !entries.is_empty() => Cow::Borrowed(entries.as_slice()),
            _ => Cow::Owned(self.legacy_entries()),
        }
    }

    fn legacy_entries(&self) -> Vec<PromptEntry> {
        self.user_prompts
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, prompt)| PromptEntry {
                id: format!("legacy-{}", i + 1),
                at: None,
                prompt: prompt.clone(),
                verbatim: Some(false),
                summary: None,
                files: None,
                extra: Map::new(),
            })
            .collect()
    }

    /// Move legacy prompts into structured entries if there are none yet.
    fn migrate_legacy(&mut self) -> &mut Vec<PromptEntry> {
        let migrated = match &self.user_prompt_entries {
            Some(entries) if !entries.is_empty() => None,
            _ => Some(self.legacy_entries()),
        };
        if let Some(migrated) = migrated {
            if !migrated.is_empty() {
                debug!(session = %self.id, count = migrated.len(), "Migrating legacy prompts");
            }
            self.user_prompt_entries = Some(migrated);
        }
        self.user_prompt_entries.get_or_insert_with(Vec::new)
    }
}

// ---------------------------------------------------------------------------
// Appending
// ---------------------------------------------------------------------------

/// A prompt about to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPrompt {
    /// Prompt text.
    pub prompt: String,
    /// Optional summary; empty strings are dropped.
    pub summary: Option<String>,
    /// Optional touched files.
    pub files: Option<Vec<String>>,
}

impl NewPrompt {
    /// A prompt with no summary or files.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            summary: None,
            files: None,
        }
    }

    /// Attach a summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        self.summary = (!summary.is_empty()).then_some(summary);
        self
    }

    /// Attach files from a comma-separated list.
    #[must_use]
    pub fn with_files_csv(mut self, csv: &str) -> Self {
        if !csv.is_empty() {
            self.files = Some(parse_file_list(csv));
        }
        self
    }
}

/// What [`PromptLog::append`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum AppendOutcome {
    /// A new entry was added.
    Appended(PromptEntry),
    /// The latest entry already has this prompt; nothing was added.
    Duplicate,
}

impl PromptLog {
    /// Latest session, if any.
    #[must_use]
    pub fn current_session(&self) -> Option<&PromptSession> {
        self.sessions.last()
    }

    fn current_session_mut(&mut self, now: DateTime<Utc>) -> &mut PromptSession {
        if self.sessions.is_empty() {
            self.sessions.push(PromptSession::starting_at(now));
        }
        let last = self.sessions.len() - 1;
        &mut self.sessions[last]
    }

    /// Append `new` to the latest session, creating one if the log is empty.
    ///
    /// Legacy prompts are migrated first. If the latest entry's trimmed text
    /// equals the new prompt's trimmed text, nothing is added.
    ///
    /// # Errors
    /// Returns [`FolioError::InvalidPrompt`] for an empty or whitespace-only
    /// prompt.
    pub fn append(&mut self, new: NewPrompt, now: DateTime<Utc>) -> Result<AppendOutcome> {
        if new.prompt.trim().is_empty() {
            return Err(FolioError::InvalidPrompt("prompt is empty".into()));
        }

        let entries = self.current_session_mut(now).migrate_legacy();
        if entries
            .last()
            .is_some_and(|last| last.prompt.trim() == new.prompt.trim())
        {
            return Ok(AppendOutcome::Duplicate);
        }

        let mut n = entries.len() + 1;
        let mut id = format!("p{n:03}");
        while entries.iter().any(|e| e.id == id) {
            n += 1;
            id = format!("p{n:03}");
        }

        let entry = PromptEntry {
            id,
            at: Some(iso_millis(now)),
            prompt: new.prompt,
            verbatim: Some(true),
            summary: new.summary.filter(|s| !s.is_empty()),
            files: new.files,
            extra: Map::new(),
        };
        entries.push(entry.clone());
        Ok(AppendOutcome::Appended(entry))
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Entries of the latest session, legacy prompts included.
    #[must_use]
    pub fn entries(&self) -> Cow<'_, [PromptEntry]> {
        self.current_session()
            .map_or(Cow::Borrowed(&[][..]), PromptSession::entries)
    }

    /// Entries whose prompt, summary, or files contain `query`,
    /// case-insensitively. A blank query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<PromptEntry> {
        let q = query.trim().to_lowercase();
        self.entries()
            .iter()
            .filter(|entry| q.is_empty() || entry.matches(&q))
            .cloned()
            .collect()
    }

    /// Entry with `id` in the latest session.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<PromptEntry> {
        self.entries().iter().find(|e| e.id == id).cloned()
    }
}

impl PromptEntry {
    /// `lowered_query` must already be trimmed and lowercased.
    fn matches(&self, lowered_query: &str) -> bool {
        let mut haystack = self.prompt.clone();
        if let Some(summary) = &self.summary {
            haystack.push('\n');
            haystack.push_str(summary);
        }
        if let Some(files) = self.files.as_ref().filter(|f| !f.is_empty()) {
            haystack.push('\n');
            haystack.push_str(&files.join(" "));
        }
        haystack.trim().to_lowercase().contains(lowered_query)
    }
}

/// Keep `selected` if it is still among `visible`, else fall back to the
/// first visible entry.
#[must_use]
pub fn select_entry<'a>(visible: &'a [PromptEntry], selected: Option<&str>) -> Option<&'a PromptEntry> {
    selected
        .and_then(|id| visible.iter().find(|e| e.id == id))
        .or_else(|| visible.first())
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// Split a comma-separated file list, trimming and dropping blanks.
#[must_use]
pub fn parse_file_list(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Collapse all whitespace runs to single spaces.
#[must_use]
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`single_line`], cut to at most `max_chars` characters with a trailing `…`.
#[must_use]
pub fn shorten(text: &str, max_chars: usize) -> String {
    let line = single_line(text);
    if line.chars().count() <= max_chars {
        return line;
    }
    let head: String = line.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", head.trim_end())
}

/// Display form of an entry timestamp.
#[must_use]
pub fn format_timestamp(at: Option<&str>) -> String {
    match at.filter(|s| !s.is_empty()) {
        None => "Unknown time".to_string(),
        Some(raw) => DateTime::parse_from_rfc3339(raw).map_or_else(
            |_| raw.to_string(),
            |t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ),
    }
}

/// Byte ranges of the first case-insensitive occurrence of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    /// Start of the match.
    pub start: usize,
    /// End of the match (exclusive).
    pub end: usize,
}

impl Highlight {
    /// Split `text` into (before, matched, after).
    #[must_use]
    pub fn split<'a>(&self, text: &'a str) -> (&'a str, &'a str, &'a str) {
        (&text[..self.start], &text[self.start..self.end], &text[self.end..])
    }
}

/// Locate `query` (trimmed) in `text`, ignoring case.
#[must_use]
pub fn highlight_match(text: &str, query: &str) -> Option<Highlight> {
    let q = query.trim();
    if q.is_empty() {
        return None;
    }
    text.char_indices().find_map(|(start, _)| {
        let mut rest = text[start..].char_indices();
        let mut end = start;
        for qc in q.chars() {
            let (offset, tc) = rest.next()?;
            if !tc.to_lowercase().eq(qc.to_lowercase()) {
                return None;
            }
            end = start + offset + tc.len_utf8();
        }
        Some(Highlight { start, end })
    })
}

fn iso_millis(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// PromptLogStore
// ---------------------------------------------------------------------------

/// File-backed prompt log.
#[derive(Debug, Clone)]
pub struct PromptLogStore {
    path: PathBuf,
}

impl PromptLogStore {
    /// Bind to the log at `path`. Nothing is read until [`Self::load`].
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the log. A missing file reads as an empty log.
    ///
    /// # Errors
    /// [`FolioError::Io`] if the file can't be read, or
    /// [`FolioError::Serialization`] if it isn't a valid log.
    pub fn load(&self) -> Result<PromptLog> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Prompt log not found, starting empty");
                return Ok(PromptLog::default());
            }
            Err(e) => return Err(e.into()),
        };
        let log: PromptLog = serde_json::from_str(&raw)?;
        debug!(
            path = %self.path.display(),
            sessions = log.sessions.len(),
            "Prompt log loaded"
        );
        Ok(log)
    }

    /// Write the log as 2-space indented JSON with a trailing newline.
    ///
    /// The file is written beside the target and renamed over it, so readers
    /// never see a half-written log.
    ///
    /// # Errors
    /// [`FolioError::Io`] or [`FolioError::Serialization`].
    pub fn save(&self, log: &PromptLog) -> Result<()> {
        let mut json = serde_json::to_string_pretty(log)?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes())
    }

    /// Load, append, and save if something was added.
    ///
    /// # Errors
    /// Anything [`Self::load`], [`PromptLog::append`] or [`Self::save`]
    /// returns.
    pub fn append(&self, new: NewPrompt, now: DateTime<Utc>) -> Result<AppendOutcome> {
        let mut log = self.load()?;
        let outcome = log.append(new, now)?;
        match &outcome {
            AppendOutcome::Appended(entry) => {
                self.save(&log)?;
                info!(
                    path = %self.path.display(),
                    id = %entry.id,
                    at = entry.at.as_deref().unwrap_or_default(),
                    "Prompt appended"
                );
            }
            AppendOutcome::Duplicate => {
                info!(path = %self.path.display(), "Latest entry already matches prompt, skipping append");
            }
        }
        Ok(outcome)
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
