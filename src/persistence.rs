//! Persistence: the autosaved working diagram and the saved-maps collection.
//!
//! DESIGN
//! ======
//! Two keys in a [`KeyValueStore`]:
//! - the working diagram, `{ nodes, connections, zoom, pan, lastModified }`,
//!   rewritten by autosave and read once when the editor opens;
//! - the saved-maps collection, an array of named snapshots read and
//!   rewritten whole on every named save.
//!
//! Saved maps are matched by id (updating the map the editor opened) or by
//! title (a named save whose title already exists replaces that entry but
//! keeps its id and creation time).
//!
//! ERROR HANDLING
//! ==============
//! A missing or corrupt working record is logged and treated as absent so
//! the editor falls back to the default diagram. A corrupt collection is
//! never overwritten: saves fail with [`PersistError::Json`] and listings
//! come back empty.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::doc::DiagramSnapshot;
use crate::storage::{KeyValueStore, StorageError};

pub const WORKING_DIAGRAM_KEY: &str = "currentMindMap";
pub const SAVED_MAPS_KEY: &str = "savedMindMaps";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved map not found: {0}")]
    MapNotFound(String),
    #[error("map title is blank")]
    BlankTitle,
}

/// Working-diagram record as written by autosave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingRecord {
    #[serde(flatten)]
    pub diagram: DiagramSnapshot,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
}

/// Category picked in the save dialog. Unknown stored values read as `Personal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "escuela")]
    School,
    #[serde(rename = "negocio")]
    Business,
    #[default]
    #[serde(rename = "personal", other)]
    Personal,
}

/// One entry of the saved-maps collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMap {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Mirror of `title`. Older records carry only this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Category,
    pub data: DiagramSnapshot,
    /// PNG data URL, absent when capture failed.
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
}

/// A save-as request from the save dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSave {
    pub title: String,
    pub category: Category,
    pub data: DiagramSnapshot,
    pub thumbnail: Option<String>,
}

/// Whether a named save added an entry or replaced one with the same title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Created,
    Replaced,
}

/// Listing row for the saved-maps collection.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSummary {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub node_count: usize,
    pub thumbnail: Option<String>,
    pub last_modified: OffsetDateTime,
}

// =============================================================================
// WORKING DIAGRAM
// =============================================================================

/// Read the autosaved working diagram.
///
/// Returns `None` when nothing usable is stored: no record, an unreadable or
/// unparseable record, or a record with no nodes.
#[must_use]
pub fn load_working(store: &dyn KeyValueStore, key: &str) -> Option<DiagramSnapshot> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "working diagram unreadable; using default");
            return None;
        }
    };
    match serde_json::from_str::<DiagramSnapshot>(&raw) {
        Ok(snapshot) if !snapshot.nodes.is_empty() => Some(snapshot),
        Ok(_) => None,
        Err(e) => {
            warn!(key, error = %e, "working diagram corrupt; using default");
            None
        }
    }
}

/// Write the working diagram.
///
/// # Errors
///
/// Returns a [`PersistError`] if serialization or the storage write fails.
pub fn write_working(
    store: &dyn KeyValueStore,
    key: &str,
    diagram: &DiagramSnapshot,
    now: OffsetDateTime,
) -> Result<(), PersistError> {
    let record = WorkingRecord { diagram: diagram.clone(), last_modified: now };
    store.set_item(key, &serde_json::to_string(&record)?)?;
    Ok(())
}

// =============================================================================
// SAVED MAPS
// =============================================================================

/// The saved-maps collection.
#[derive(Clone)]
pub struct MapLibrary {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl MapLibrary {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    /// Every saved map in stored order. A missing collection is empty.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the collection cannot be read or parsed.
    pub fn load_all(&self) -> Result<Vec<SavedMap>, PersistError> {
        let Some(raw) = self.store.get_item(&self.key)? else {
            return Ok(Vec::new());
        };
        let mut maps: Vec<SavedMap> = serde_json::from_str(&raw)?;
        for map in maps.iter_mut().filter(|m| m.title.is_empty()) {
            if let Some(name) = &map.name {
                map.title.clone_from(name);
            }
        }
        Ok(maps)
    }

    fn store_all(&self, maps: &[SavedMap]) -> Result<(), PersistError> {
        self.store.set_item(&self.key, &serde_json::to_string(maps)?)?;
        Ok(())
    }

    /// Look up a saved map by id.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the collection cannot be read or parsed.
    pub fn get(&self, id: &str) -> Result<Option<SavedMap>, PersistError> {
        Ok(self.load_all()?.into_iter().find(|m| m.id == id))
    }

    /// Refresh the data of the map with `id`, keeping its title, category, id, and creation time.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::MapNotFound`] if no map has that id; nothing is written.
    pub fn update_existing(
        &self,
        id: &str,
        data: DiagramSnapshot,
        thumbnail: Option<String>,
        now: OffsetDateTime,
    ) -> Result<SavedMap, PersistError> {
        let mut maps = self.load_all()?;
        let Some(map) = maps.iter_mut().find(|m| m.id == id) else {
            return Err(PersistError::MapNotFound(id.to_owned()));
        };
        map.data = data;
        map.thumbnail = thumbnail;
        map.last_modified = now;
        map.updated_at = Some(now);
        let updated = map.clone();
        self.store_all(&maps)?;
        info!(id, "saved map updated");
        Ok(updated)
    }

    /// Save under a title. An existing map with the same title (or legacy
    /// name) is replaced in place, keeping its id and creation time;
    /// otherwise a new map is appended with a time-derived id.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::BlankTitle`] for a blank title, or a storage or
    /// parse error. Nothing is written on error.
    pub fn save_named(&self, request: NamedSave, now: OffsetDateTime) -> Result<(SavedMap, SaveKind), PersistError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(PersistError::BlankTitle);
        }
        let mut maps = self.load_all()?;
        let existing = maps.iter().position(|m| m.title == title || m.name.as_deref() == Some(title));
        let (id, created_at, kind) = match existing {
            Some(index) => (maps[index].id.clone(), maps[index].created_at, SaveKind::Replaced),
            None => (next_map_id(&maps, now), Some(now), SaveKind::Created),
        };
        let map = SavedMap {
            id,
            title: title.to_owned(),
            name: Some(title.to_owned()),
            category: request.category,
            data: request.data,
            thumbnail: request.thumbnail,
            created_at,
            updated_at: Some(now),
            last_modified: now,
        };
        match existing {
            Some(index) => maps[index] = map.clone(),
            None => maps.push(map.clone()),
        }
        self.store_all(&maps)?;
        info!(id = %map.id, title = %map.title, ?kind, "saved map written");
        Ok((map, kind))
    }

    /// Summaries sorted by last modification, newest first.
    ///
    /// An unreadable collection is logged and listed as empty.
    #[must_use]
    pub fn list_recent(&self) -> Vec<MapSummary> {
        let maps = match self.load_all() {
            Ok(maps) => maps,
            Err(e) => {
                warn!(key = %self.key, error = %e, "saved maps unreadable; listing none");
                return Vec::new();
            }
        };
        let mut summaries: Vec<MapSummary> = maps
            .into_iter()
            .map(|m| MapSummary {
                node_count: m.data.node_count(),
                id: m.id,
                title: m.title,
                category: m.category,
                thumbnail: m.thumbnail,
                last_modified: m.last_modified,
            })
            .collect();
        summaries.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        summaries
    }
}

/// Millisecond timestamp id, bumped past any numeric id already in use.
/// Falls back to a random id when the numeric range is exhausted.
fn next_map_id(maps: &[SavedMap], now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let floor = maps
        .iter()
        .filter_map(|m| match m.id.parse::<i128>() {
            Ok(n) => n.checked_add(1),
            Err(_) => None,
        })
        .max()
        .unwrap_or(i128::MIN);
    let id = millis.max(floor).to_string();
    if maps.iter().any(|m| m.id == id) {
        return uuid::Uuid::new_v4().to_string();
    }
    id
}
