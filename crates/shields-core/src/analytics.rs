//! Analytics client seam and a journal-file implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// An analytics SDK instance bound to a project token
pub trait AnalyticsClient {
    /// Identity currently attached to tracked events
    fn distinct_id(&self) -> &str;

    /// Drop the current identity and start a fresh one
    fn reset(&mut self);

    /// Record an event, optionally with properties
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be recorded
    fn track(&mut self, event: &str, properties: Option<&Map<String, Value>>) -> Result<()>;
}

/// Builds analytics clients for a token
pub trait ClientFactory {
    /// # Errors
    ///
    /// Returns an error if the client cannot be created
    fn create(&self, token: &str) -> Result<Box<dyn AnalyticsClient>>;
}

/// One recorded event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub event: String,
    pub distinct_id: String,
    pub token: String,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

/// Appends events as JSON lines to a local journal file
pub struct JournalClient {
    path: PathBuf,
    id_path: PathBuf,
    token: String,
    distinct_id: String,
}

impl JournalClient {
    /// Open (or start) a journal at `path`. The distinct id lives next to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the journal directory or id file cannot be created
    pub fn open(path: PathBuf, token: String) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create journal directory")?;
        }
        let id_path = path.with_extension("id");

        let distinct_id = match fs::read_to_string(&id_path) {
            Ok(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => {
                let id = uuid::Uuid::new_v4().to_string();
                fs::write(&id_path, &id).with_context(|| {
                    format!("Failed to write distinct id to {}", id_path.display())
                })?;
                id
            }
        };

        Ok(Self {
            path,
            id_path,
            token,
            distinct_id,
        })
    }
}

impl AnalyticsClient for JournalClient {
    fn distinct_id(&self) -> &str {
        &self.distinct_id
    }

    fn reset(&mut self) {
        self.distinct_id = uuid::Uuid::new_v4().to_string();
        if let Err(e) = fs::write(&self.id_path, &self.distinct_id) {
            log::debug!("Failed to persist regenerated distinct id: {e}");
        }
        log::debug!("Analytics identity reset");
    }

    fn track(&mut self, event: &str, properties: Option<&Map<String, Value>>) -> Result<()> {
        let entry = JournalEntry {
            event: event.to_string(),
            distinct_id: self.distinct_id.clone(),
            token: self.token.clone(),
            time: Utc::now(),
            properties: properties.cloned(),
        };
        let line = serde_json::to_string(&entry)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open journal {}", self.path.display()))?;
        writeln!(file, "{line}")?;

        log::debug!("Tracked {event}");
        Ok(())
    }
}

/// Creates [`JournalClient`]s writing to a fixed path
pub struct JournalClientFactory {
    path: PathBuf,
}

impl JournalClientFactory {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ClientFactory for JournalClientFactory {
    fn create(&self, token: &str) -> Result<Box<dyn AnalyticsClient>> {
        Ok(Box::new(JournalClient::open(
            self.path.clone(),
            token.to_string(),
        )?))
    }
}

/// Read every entry from a journal. A missing file is an empty journal.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is not a valid entry
pub fn read_journal(path: &Path) -> Result<Vec<JournalEntry>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open journal {}", path.display()))
        }
    };

    let mut entries = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line)
            .with_context(|| format!("Invalid journal entry on line {}", index + 1))?;
        entries.push(entry);
    }
    Ok(entries)
}
