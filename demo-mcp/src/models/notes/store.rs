// Notes store
//
// This module provides the store that owns the notes collection and keeps
// its on-disk copy in sync.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::Note;
use crate::errors::StoreError;

/// Store owning the persisted notes collection.
///
/// The collection is read from disk on first access. Every append rewrites
/// the whole file before returning, and all access goes through one lock so
/// readers never observe a collection mid-flush.
#[derive(Debug)]
pub struct NotesStore {
    path: PathBuf,
    notes: Mutex<Option<Vec<Note>>>,
}

impl NotesStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            notes: Mutex::new(None),
        }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the collection in creation order.
    ///
    /// A file that exists but cannot be read shows as empty here and is
    /// retried on the next access.
    pub async fn load(&self) -> Vec<Note> {
        let mut notes = self.notes.lock().await;
        match loaded(&mut notes, &self.path).await {
            Ok(notes) => notes.clone(),
            Err(e) => {
                log::warn!("{}; listing no notes", e);
                Vec::new()
            }
        }
    }

    /// Append a note with the next id and flush the collection to disk.
    ///
    /// Fails without touching the file while an existing collection cannot
    /// be read. If the flush fails the note is dropped from memory as well,
    /// so the collection never holds a note the caller was told had failed.
    pub async fn append(&self, title: &str, content: &str) -> Result<Note, StoreError> {
        let mut notes = self.notes.lock().await;
        let notes = loaded(&mut notes, &self.path).await?;

        let id = notes.iter().map(|note| note.id).max().unwrap_or(0) + 1;
        let note = Note::new(id, title, content);
        notes.push(note.clone());

        if let Err(e) = flush(&self.path, notes).await {
            notes.pop();
            log::error!("Note {} was not saved: {}", id, e);
            return Err(e);
        }

        log::debug!("Saved note {} to {}", id, self.path.display());
        Ok(note)
    }
}

/// The cached collection, reading it from disk if no read has succeeded yet
async fn loaded<'a>(slot: &'a mut Option<Vec<Note>>, path: &Path) -> Result<&'a mut Vec<Note>, StoreError> {
    if slot.is_none() {
        *slot = Some(read_notes(path).await?);
    }
    Ok(slot.get_or_insert_with(Vec::new))
}

async fn read_notes(path: &Path) -> Result<Vec<Note>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No notes file at {}, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(persistence(path, format!("cannot read existing notes: {}", e))),
    };

    match serde_json::from_slice::<Vec<Note>>(&bytes) {
        Ok(notes) => {
            log::info!("Loaded {} notes from {}", notes.len(), path.display());
            Ok(notes)
        }
        Err(e) => {
            log::warn!("Notes file {} is corrupt: {}; starting empty", path.display(), e);
            set_aside(path).await?;
            Ok(Vec::new())
        }
    }
}

/// Move a corrupt file out of the way so the next flush does not destroy it
async fn set_aside(path: &Path) -> Result<(), StoreError> {
    let backup = sibling(path, &format!(".corrupt-{}", chrono::Utc::now().timestamp()));
    tokio::fs::rename(path, &backup)
        .await
        .map_err(|e| persistence(path, format!("cannot move corrupt notes file aside: {}", e)))?;
    log::warn!("Moved corrupt notes file to {}", backup.display());
    Ok(())
}

fn persistence(path: &Path, reason: String) -> StoreError {
    StoreError::Persistence {
        path: path.display().to_string(),
        reason,
    }
}

async fn flush(path: &Path, notes: &[Note]) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(notes).map_err(|e| persistence(path, e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| persistence(path, e.to_string()))?;
    }

    // Write a sibling then rename, so a crash leaves either the old or the new file
    let tmp = sibling(path, ".tmp");
    tokio::fs::write(&tmp, &body)
        .await
        .map_err(|e| persistence(path, e.to_string()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| persistence(path, e.to_string()))
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("notes"));
    name.push(suffix);
    path.with_file_name(name)
}
