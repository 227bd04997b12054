//! Editor session: the engine plus everything around it that touches storage.
//!
//! DESIGN
//! ======
//! `MindMapEditor` wraps [`EngineCore`] the way a host binding would: every
//! input is forwarded to the core, and afterwards the core's revision counter
//! is compared with the last one seen. A change hands a fresh snapshot to the
//! [`Autosaver`], which writes it once the quiet period passes.
//!
//! Named saves go through a small dialog state machine. `save_progress`
//! updates the opened map in place when there is one, otherwise it opens the
//! dialog; `confirm_save` writes under the dialog's name and category.
//!
//! ERROR HANDLING
//! ==============
//! Collaborator and persistence failures become [`Notice`]s for the host to
//! show. Thumbnail failures never block a save. A blank name is returned as
//! [`SaveError::EmptyName`] with the dialog left open.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};

use crate::autosave::Autosaver;
use crate::camera::Point;
use crate::config::EditorConfig;
use crate::engine::{Action, EngineCore};
use crate::input::{Button, Key, Tool, WheelDelta};
use crate::persistence::{Category, MapLibrary, NamedSave, PersistError, SaveKind, SavedMap, load_working};
use crate::render::SceneView;
use crate::storage::KeyValueStore;
use crate::thumbnail::{PdfExporter, Rasterizer, SurfaceRef, capture_thumbnail};
use crate::toolbar::{ToolbarCommand, ToolbarState, dispatch};

const MSG_SAVED: &str = "Mapa guardado exitosamente";
const MSG_UPDATED: &str = "Mapa actualizado exitosamente";
const MSG_UPDATE_MISSING: &str = "Error: No se pudo encontrar el mapa para actualizar";
const MSG_UPDATE_FAILED: &str = "Error al actualizar el mapa";
const MSG_SAVE_FAILED: &str = "Error al guardar el mapa";
const MSG_THUMBNAIL_FAILED: &str = "No se pudo generar la miniatura del mapa";
const MSG_EXPORT_UNAVAILABLE: &str = "Funcionalidad de exportar PDF no disponible";
const MSG_EXPORT_FAILED: &str = "Error al exportar el PDF";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("map name is empty")]
    EmptyName,
    #[error("save dialog is not open")]
    NoDialog,
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// The saved map the editor is working on, if it was opened from the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapInfo {
    pub id: String,
    pub title: String,
    pub is_existing: bool,
}

/// Draft state of the "save as" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveDialog {
    pub name: String,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A non-blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// What `save_progress` did.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveProgress {
    /// The opened map was rewritten in place.
    Updated(SavedMap),
    /// No map is open; the save dialog is now showing.
    DialogOpened,
}

// =============================================================================
// EDITOR
// =============================================================================

pub struct MindMapEditor {
    core: EngineCore,
    library: MapLibrary,
    config: EditorConfig,
    autosaver: Option<Autosaver>,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    exporter: Option<Arc<dyn PdfExporter>>,
    surface: SurfaceRef,
    map_info: Option<MapInfo>,
    save_dialog: Option<SaveDialog>,
    notices: Vec<Notice>,
    seen_revision: u64,
}

impl MindMapEditor {
    /// Open an editor over `store`, restoring the autosaved working diagram.
    ///
    /// Autosave runs only when called inside a Tokio runtime.
    #[must_use]
    pub fn open(store: Arc<dyn KeyValueStore>, config: EditorConfig) -> Self {
        let core = match load_working(store.as_ref(), &config.working_key) {
            Some(snapshot) => EngineCore::from_snapshot(snapshot),
            None => EngineCore::new(),
        };
        let autosaver = if tokio::runtime::Handle::try_current().is_ok() {
            Some(Autosaver::spawn(store.clone(), config.working_key.clone(), config.autosave_quiet))
        } else {
            warn!("no async runtime; autosave disabled");
            None
        };
        let seen_revision = core.revision();
        Self {
            core,
            library: MapLibrary::new(store, config.library_key.clone()),
            config,
            autosaver,
            rasterizer: None,
            exporter: None,
            surface: SurfaceRef::default(),
            map_info: None,
            save_dialog: None,
            notices: Vec::new(),
            seen_revision,
        }
    }

    #[must_use]
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    #[must_use]
    pub fn with_exporter(mut self, exporter: Arc<dyn PdfExporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    #[must_use]
    pub fn with_surface(mut self, surface: SurfaceRef) -> Self {
        self.surface = surface;
        self
    }

    // --- Input forwarding ---

    pub fn set_canvas_rect(&mut self, origin: Point, width: f64, height: f64) {
        self.core.set_canvas_rect(origin, width, height);
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let out = self.core.set_tool(tool);
        self.after(out)
    }

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        let out = self.core.on_pointer_down(screen_pt, button);
        self.after(out)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let out = self.core.on_pointer_move(screen_pt);
        self.after(out)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        let out = self.core.on_pointer_up(screen_pt, button);
        self.after(out)
    }

    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        let out = self.core.on_pointer_cancel();
        self.after(out)
    }

    pub fn on_double_click(&mut self, screen_pt: Point) -> Vec<Action> {
        let out = self.core.on_double_click(screen_pt);
        self.after(out)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta) -> Vec<Action> {
        let out = self.core.on_wheel(screen_pt, delta);
        self.after(out)
    }

    pub fn on_key_down(&mut self, key: Key) -> Vec<Action> {
        let out = self.core.on_key_down(key);
        self.after(out)
    }

    pub fn edit_input(&mut self, draft: &str) -> Vec<Action> {
        let out = self.core.edit_input(draft);
        self.after(out)
    }

    pub fn commit_edit(&mut self) -> Vec<Action> {
        let out = self.core.commit_edit();
        self.after(out)
    }

    pub fn blur_edit(&mut self) -> Vec<Action> {
        let out = self.core.blur_edit();
        self.after(out)
    }

    pub fn cancel_edit(&mut self) -> Vec<Action> {
        let out = self.core.cancel_edit();
        self.after(out)
    }

    /// Apply a toolbar command.
    pub fn toolbar(&mut self, command: ToolbarCommand) -> Vec<Action> {
        let out = dispatch(&mut self.core, command);
        self.after(out)
    }

    fn after(&mut self, out: Vec<Action>) -> Vec<Action> {
        let revision = self.core.revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            if let Some(autosaver) = &self.autosaver {
                autosaver.schedule(self.core.snapshot());
            }
        }
        out
    }

    // --- Saved maps ---

    /// Replace the working diagram with a saved map. The next `save_progress`
    /// updates that map in place. A map saved without nodes opens as the
    /// default root-only diagram.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::MapNotFound`] for an unknown id, or a storage error.
    pub fn open_saved(&mut self, id: &str) -> Result<Vec<Action>, PersistError> {
        let Some(map) = self.library.get(id)? else {
            return Err(PersistError::MapNotFound(id.to_owned()));
        };
        self.map_info = Some(MapInfo { id: map.id, title: map.title, is_existing: true });
        let mut out = if map.data.nodes.is_empty() { self.core.clear_all(true) } else { Vec::new() };
        out.extend(self.core.load_snapshot(map.data));
        Ok(self.after(out))
    }

    /// Save the working diagram: update the opened map, or open the save dialog.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Persist`] if the opened map can no longer be
    /// found or the write fails; an error notice is queued as well.
    pub async fn save_progress(&mut self) -> Result<SaveProgress, SaveError> {
        let Some(info) = self.map_info.clone().filter(|m| m.is_existing) else {
            self.save_dialog = Some(SaveDialog::default());
            return Ok(SaveProgress::DialogOpened);
        };
        let thumbnail = self.thumbnail().await;
        let result = self.library.update_existing(&info.id, self.core.snapshot(), thumbnail, OffsetDateTime::now_utc());
        match result {
            Ok(map) => {
                self.notify(NoticeLevel::Info, MSG_UPDATED);
                Ok(SaveProgress::Updated(map))
            }
            Err(e) => {
                warn!(id = %info.id, error = %e, "saved map update failed");
                let message = match &e {
                    PersistError::MapNotFound(_) => MSG_UPDATE_MISSING,
                    _ => MSG_UPDATE_FAILED,
                };
                self.notify(NoticeLevel::Error, message);
                Err(e.into())
            }
        }
    }

    pub fn set_save_name(&mut self, name: &str) {
        if let Some(dialog) = &mut self.save_dialog {
            dialog.name = name.to_owned();
        }
    }

    pub fn set_save_category(&mut self, category: Category) {
        if let Some(dialog) = &mut self.save_dialog {
            dialog.category = category;
        }
    }

    /// Close the save dialog, dropping its draft.
    pub fn cancel_save_dialog(&mut self) {
        self.save_dialog = None;
    }

    /// Write the working diagram under the dialog's name and category.
    ///
    /// # Errors
    ///
    /// - [`SaveError::NoDialog`] if the dialog is not open.
    /// - [`SaveError::EmptyName`] if the trimmed name is empty; the dialog stays open.
    /// - [`SaveError::Persist`] if the write fails; the dialog stays open.
    pub async fn confirm_save(&mut self) -> Result<(SavedMap, SaveKind), SaveError> {
        let Some(dialog) = self.save_dialog.clone() else {
            return Err(SaveError::NoDialog);
        };
        if dialog.name.trim().is_empty() {
            return Err(SaveError::EmptyName);
        }
        let thumbnail = self.thumbnail().await;
        let request = NamedSave {
            title: dialog.name,
            category: dialog.category,
            data: self.core.snapshot(),
            thumbnail,
        };
        match self.library.save_named(request, OffsetDateTime::now_utc()) {
            Ok((map, kind)) => {
                let message = match kind {
                    SaveKind::Created => MSG_SAVED,
                    SaveKind::Replaced => MSG_UPDATED,
                };
                self.notify(NoticeLevel::Info, message);
                self.save_dialog = None;
                Ok((map, kind))
            }
            Err(e) => {
                warn!(error = %e, "named save failed");
                self.notify(NoticeLevel::Error, MSG_SAVE_FAILED);
                Err(e.into())
            }
        }
    }

    async fn thumbnail(&mut self) -> Option<String> {
        let rasterizer = self.rasterizer.clone()?;
        let captured = capture_thumbnail(Some(rasterizer.as_ref()), &self.surface, &self.config.thumbnail).await;
        if captured.is_none() {
            self.notify(NoticeLevel::Error, MSG_THUMBNAIL_FAILED);
        }
        captured
    }

    /// Hand the diagram to the PDF exporter. Returns whether an export happened.
    pub async fn export_pdf(&mut self) -> bool {
        let Some(exporter) = self.exporter.clone() else {
            self.notify(NoticeLevel::Error, MSG_EXPORT_UNAVAILABLE);
            return false;
        };
        let snapshot = self.core.snapshot();
        let result = exporter.export(&self.surface, &snapshot).await;
        match result {
            Ok(()) => {
                info!(selector = %self.surface.selector, "pdf exported");
                true
            }
            Err(e) => {
                warn!(error = %e, "pdf export failed");
                self.notify(NoticeLevel::Error, MSG_EXPORT_FAILED);
                false
            }
        }
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push(Notice { level, message: message.to_owned() });
    }

    // --- Queries ---

    /// Take every queued notice.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    #[must_use]
    pub fn library(&self) -> &MapLibrary {
        &self.library
    }

    #[must_use]
    pub fn map_info(&self) -> Option<&MapInfo> {
        self.map_info.as_ref()
    }

    #[must_use]
    pub fn save_dialog(&self) -> Option<&SaveDialog> {
        self.save_dialog.as_ref()
    }

    #[must_use]
    pub fn toolbar_state(&self) -> ToolbarState {
        ToolbarState::from_engine(&self.core)
    }

    #[must_use]
    pub fn scene(&self) -> SceneView<'_> {
        self.core.scene()
    }

    /// Release pointer capture and stop autosave. A change still waiting out
    /// its quiet period is not written.
    pub fn teardown(&mut self) -> Vec<Action> {
        self.autosaver = None;
        self.core.teardown()
    }
}
