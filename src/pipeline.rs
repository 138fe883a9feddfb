//! Ingestion pipeline.
//!
//! Per-file state machine: pending -> reading -> categorizing -> done, or
//! -> error at any non-terminal point. Items are processed strictly one at a
//! time in queue order, so at most one remote classification call is ever
//! outstanding; a failed item never blocks the ones behind it.

use std::path::{Path, PathBuf};

use crate::classifier::{self, Classification};
use crate::layout::position_for_new_note;
use crate::settings::SettingsStore;
use crate::store::{Note, NoteMetadata, NotesStore, SourceKind};
use crate::utils::{safe_truncate, word_count};

/// Committed note content falls back to this prefix of the extracted text
/// when the classification carries no summary
const CONTENT_PREFIX: usize = 1000;

const ACCEPTED_EXTENSIONS: [&str; 8] =
    [".txt", ".md", ".pdf", ".png", ".jpg", ".jpeg", ".webp", ".gif"];

/// Upload item lifecycle. Done and Error are terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Reading,
    Categorizing,
    Done,
    Error(String),
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Done | UploadStatus::Error(_))
    }
}

/// One queued file working its way through the pipeline.
/// Transient: lives only as long as the upload queue.
#[derive(Debug)]
pub struct UploadItem {
    pub path: PathBuf,
    pub status: UploadStatus,
    pub content: Option<String>,
    pub result: Option<Classification>,
}

impl UploadItem {
    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Outcome counters for one processing run
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub processed: usize,
    pub failed: usize,
}

/// Source kind from the file extension. Callers only see accepted
/// extensions, so unknown ones just read as plain text.
fn source_kind_for(path: &Path) -> SourceKind {
    let name = path.file_name().map(|n| n.to_string_lossy().to_lowercase()).unwrap_or_default();
    if name.ends_with(".md") {
        SourceKind::Markdown
    } else if name.ends_with(".pdf") {
        SourceKind::Pdf
    } else if [".png", ".jpg", ".jpeg", ".webp", ".gif"].iter().any(|e| name.ends_with(e)) {
        SourceKind::Screenshot
    } else {
        SourceKind::Text
    }
}

/// Extract textual content for a file.
///
/// Text and markdown are read verbatim. Images and PDFs get a fixed
/// descriptive placeholder — real OCR / PDF extraction is stubbed out.
fn read_content(path: &Path, kind: SourceKind) -> Result<String, String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match kind {
        SourceKind::Screenshot => Ok(format!(
            "Screenshot: {}. Image file uploaded for visual reference.",
            name
        )),
        SourceKind::Pdf => Ok(format!(
            "PDF Document: {}. PDF content would be extracted here.",
            name
        )),
        SourceKind::Text | SourceKind::Markdown => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e)),
    }
}

/// The upload queue: accepted files waiting for, or finished with,
/// processing.
#[derive(Debug, Default)]
pub struct UploadQueue {
    items: Vec<UploadItem>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    /// Queue files for ingestion. Files with unaccepted extensions are
    /// silently dropped before entering the queue.
    pub fn add_files(&mut self, paths: impl IntoIterator<Item = PathBuf>) -> usize {
        let mut added = 0;
        for path in paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if !ACCEPTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
                continue;
            }
            self.items.push(UploadItem {
                path,
                status: UploadStatus::Pending,
                content: None,
                result: None,
            });
            added += 1;
        }
        added
    }

    /// Dismiss one item from the visible queue
    pub fn remove(&mut self, index: usize) -> Option<UploadItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Drop all successfully processed items
    pub fn clear_done(&mut self) {
        self.items.retain(|item| item.status != UploadStatus::Done);
    }

    /// Process every pending item, in queue order, one at a time.
    ///
    /// Re-invocation is idempotent with respect to items that already left
    /// Pending: they are skipped. A failure marks that item Error and moves
    /// on; no partial note is ever committed.
    pub async fn process_pending(
        &mut self,
        store: &mut NotesStore,
        settings: &SettingsStore,
    ) -> ProcessOutcome {
        let mut outcome = ProcessOutcome::default();

        for index in 0..self.items.len() {
            if self.items[index].status != UploadStatus::Pending {
                continue;
            }

            match self.process_item(index, store, settings).await {
                Ok(()) => {
                    self.items[index].status = UploadStatus::Done;
                    outcome.processed += 1;
                }
                Err(e) => {
                    eprintln!("[Pipeline] {} failed: {}", self.items[index].file_name(), e);
                    self.items[index].status = UploadStatus::Error(e);
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }

    /// Drive one item through reading -> categorizing -> commit
    async fn process_item(
        &mut self,
        index: usize,
        store: &mut NotesStore,
        settings: &SettingsStore,
    ) -> Result<(), String> {
        let path = self.items[index].path.clone();
        let file_name = self.items[index].file_name();
        let kind = source_kind_for(&path);

        self.items[index].status = UploadStatus::Reading;
        let content = read_content(&path, kind)?;
        self.items[index].content = Some(content.clone());

        self.items[index].status = UploadStatus::Categorizing;
        let result = if settings.has_api_key() {
            let api_key = settings.get_api_key().unwrap_or_default();
            match classifier::categorize_remote(&api_key, settings.get_model(), &content, &file_name, kind)
                .await
            {
                Ok(result) => result,
                Err(e) => {
                    // Remote failure is recovered locally, never an item error
                    eprintln!("[Classify] remote failed for {}, using offline: {}", file_name, e);
                    classifier::categorize_offline(&content, &file_name)
                }
            }
        } else {
            classifier::categorize_offline(&content, &file_name)
        };

        let note = build_note(&result, &content, kind, store.len());
        store.add(note);
        self.items[index].result = Some(result);
        Ok(())
    }
}

/// Assemble the committed note from a classification result
fn build_note(result: &Classification, content: &str, kind: SourceKind, existing: usize) -> Note {
    let now = chrono::Utc::now().timestamp_millis();

    let note_content = if result.summary.is_empty() {
        safe_truncate(content, CONTENT_PREFIX).to_string()
    } else {
        result.summary.clone()
    };

    let mut tags = result.tags.clone();
    if kind == SourceKind::Screenshot {
        tags.insert(0, "screenshot".to_string());
    }

    Note {
        id: uuid::Uuid::new_v4().to_string(),
        title: result.title.clone(),
        content: note_content,
        source_kind: kind,
        created_at: now,
        updated_at: now,
        pillar: result.pillar,
        category: result.category.clone(),
        tags,
        position: position_for_new_note(existing),
        metadata: NoteMetadata {
            word_count: Some(word_count(content)),
            source: Some("upload".to_string()),
            confidence: None,
        },
    }
}
