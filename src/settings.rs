//! Map preferences
//!
//! Persisted as JSON next to the progress flags, in the same key-value store.

use serde::{Deserialize, Serialize};

use crate::consts::{MOVE_DURATION_MS, REDUCED_MOTION_DURATION_MS};
use crate::persistence::KeyValueStore;

/// Map settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Silence all sound cues
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Motion ===
    /// Time to travel between two levels (ms)
    pub move_duration_ms: f64,

    // === Accessibility ===
    /// Reduced motion (near-instant level transitions)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            muted: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            move_duration_ms: MOVE_DURATION_MS,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "level_map_settings";

    /// Transition duration to actually use (respects reduced_motion)
    pub fn effective_move_duration(&self) -> f64 {
        if self.reduced_motion {
            REDUCED_MOTION_DURATION_MS
        } else if self.move_duration_ms.is_finite() {
            self.move_duration_ms.max(1.0)
        } else {
            MOVE_DURATION_MS
        }
    }

    /// Effective cue volume, 0 when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_load_missing_gives_defaults() {
        let store = MemoryStore::new();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.toggle_mute();
        settings.move_duration_ms = 1200.0;
        settings.save(&mut store);

        let loaded = Settings::load(&store);
        assert!(loaded.muted);
        assert_eq!(loaded.move_duration_ms, 1200.0);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{not json");
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, r#"{"muted":true}"#);
        let loaded = Settings::load(&store);
        assert!(loaded.muted);
        assert_eq!(loaded.move_duration_ms, MOVE_DURATION_MS);
    }

    #[test]
    fn test_effective_values() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_move_duration(), MOVE_DURATION_MS);
        settings.move_duration_ms = -5.0;
        assert_eq!(settings.effective_move_duration(), 1.0);
        settings.reduced_motion = true;
        assert_eq!(settings.effective_move_duration(), REDUCED_MOTION_DURATION_MS);

        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_effective_volume_combines_and_clamps() {
        let mut settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        assert!((settings.effective_volume() - 0.25).abs() < 1e-6);
        settings.master_volume = 3.0;
        settings.sfx_volume = -1.0;
        assert_eq!(settings.effective_volume(), 0.0);
        settings.sfx_volume = 1.0;
        assert_eq!(settings.effective_volume(), 1.0);
        settings.toggle_mute();
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
