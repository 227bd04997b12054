//! Editor configuration, loaded from environment variables with defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::persistence::{SAVED_MAPS_KEY, WORKING_DIAGRAM_KEY};
use crate::thumbnail::ThumbnailOptions;

const DEFAULT_AUTOSAVE_QUIET_MS: u64 = 1000;
const DEFAULT_THUMBNAIL_SCALE: f64 = 0.3;
const DEFAULT_THUMBNAIL_WIDTH: u32 = 400;
const DEFAULT_THUMBNAIL_HEIGHT: u32 = 300;

/// Tuning knobs for the editor session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// Quiet period before an autosave write.
    pub autosave_quiet: Duration,
    /// Storage key of the working diagram.
    pub working_key: String,
    /// Storage key of the saved-maps collection.
    pub library_key: String,
    pub thumbnail: ThumbnailOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_quiet: Duration::from_millis(DEFAULT_AUTOSAVE_QUIET_MS),
            working_key: WORKING_DIAGRAM_KEY.to_owned(),
            library_key: SAVED_MAPS_KEY.to_owned(),
            thumbnail: ThumbnailOptions {
                scale: DEFAULT_THUMBNAIL_SCALE,
                width: DEFAULT_THUMBNAIL_WIDTH,
                height: DEFAULT_THUMBNAIL_HEIGHT,
            },
        }
    }
}

impl EditorConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            autosave_quiet: Duration::from_millis(env_parse("MINDMAP_AUTOSAVE_QUIET_MS", DEFAULT_AUTOSAVE_QUIET_MS)),
            working_key: env_string("MINDMAP_WORKING_KEY", WORKING_DIAGRAM_KEY),
            library_key: env_string("MINDMAP_LIBRARY_KEY", SAVED_MAPS_KEY),
            thumbnail: ThumbnailOptions {
                scale: env_parse("MINDMAP_THUMBNAIL_SCALE", DEFAULT_THUMBNAIL_SCALE),
                width: env_parse("MINDMAP_THUMBNAIL_WIDTH", DEFAULT_THUMBNAIL_WIDTH),
                height: env_parse("MINDMAP_THUMBNAIL_HEIGHT", DEFAULT_THUMBNAIL_HEIGHT),
            },
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_string(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().to_owned(),
        _ => default.to_owned(),
    }
}
