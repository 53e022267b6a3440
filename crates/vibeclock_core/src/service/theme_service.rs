//! Persisted dark/light theme.
//!
//! # Invariants
//! - Unknown or unreadable stored values load as the default theme.
//! - A failed write keeps the new theme for the session and is only logged.

use crate::model::theme::Theme;
use crate::repo::kv_repo::KeyValueStore;
use log::{debug, warn};

/// Storage key holding `"dark"` or `"light"`.
pub const THEME_STORAGE_KEY: &str = "vibe-o-clock-theme";

/// Theme preference over a key-value backend.
pub struct ThemeStore<S: KeyValueStore> {
    storage: S,
    theme: Theme,
}

impl<S: KeyValueStore> ThemeStore<S> {
    /// Loads the stored theme, or [`Theme::default`].
    pub fn load(storage: S) -> Self {
        let theme = match storage.get(THEME_STORAGE_KEY) {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!("event=theme_load module=theme status=error error={err}");
                Theme::default()
            }
        };
        Self { storage, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Sets and persists `theme`. Returns `true` when it changed.
    pub fn set(&mut self, theme: Theme) -> bool {
        if self.theme == theme {
            return false;
        }
        self.theme = theme;
        match self.storage.set(THEME_STORAGE_KEY, theme.as_str()) {
            Ok(()) => debug!("event=theme_set module=theme status=ok theme={}", theme.as_str()),
            Err(err) => warn!(
                "event=theme_set module=theme status=error theme={} error={}",
                theme.as_str(),
                err
            ),
        }
        true
    }

    /// Flips dark/light and returns the new theme.
    pub fn toggle(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::{ThemeStore, THEME_STORAGE_KEY};
    use crate::model::theme::Theme;
    use crate::repo::kv_repo::{KeyValueStore, MemoryKeyValueStore};

    #[test]
    fn load_defaults_to_dark_and_ignores_garbage() {
        let empty = MemoryKeyValueStore::new();
        assert_eq!(ThemeStore::load(&empty).theme(), Theme::Dark);

        let garbage = MemoryKeyValueStore::with_entry(THEME_STORAGE_KEY, "neon");
        assert_eq!(ThemeStore::load(&garbage).theme(), Theme::Dark);
    }

    #[test]
    fn toggle_persists_new_theme() {
        let storage = MemoryKeyValueStore::new();
        let mut store = ThemeStore::load(&storage);

        assert_eq!(store.toggle(), Theme::Light);
        assert_eq!(
            storage.get(THEME_STORAGE_KEY).unwrap().as_deref(),
            Some("light")
        );
        assert_eq!(ThemeStore::load(&storage).theme(), Theme::Light);
        assert!(!store.set(Theme::Light));
    }
}
