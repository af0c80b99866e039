//! Level Map - a winding seven-level progression map
//!
//! Core modules:
//! - `map`: Level catalog, path geometry, motion and the progression state machine
//! - `app`: Platform-independent shell (commands, sound cues, UI flags)
//! - `view`: Render-ready snapshot consumed by the front end
//! - `persistence`: Key-value storage of completion flags
//! - `platform`: Browser backends (LocalStorage)
//! - `settings`: Persisted preferences
//! - `audio`: Procedural sound cues

pub mod app;
pub mod audio;
pub mod map;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod view;

pub use app::{Command, LevelMapApp};
pub use map::{LevelStatus, ProgressEvent, Progression};
pub use persistence::{KeyValueStore, MemoryStore};
pub use settings::Settings;

/// Map configuration constants
pub mod consts {
    /// Number of levels on the map
    pub const LEVEL_COUNT: u32 = 7;
    /// Star rating scale
    pub const MAX_STARS: u8 = 3;

    /// Time for the marker to travel between two levels (ms)
    pub const MOVE_DURATION_MS: f64 = 2000.0;
    /// Travel time when reduced motion is on (ms)
    pub const REDUCED_MOTION_DURATION_MS: f64 = 150.0;
    /// How long a newly unlocked node stays highlighted (ms)
    pub const UNLOCK_HIGHLIGHT_MS: f64 = 600.0;

    /// Path bend per unit of segment length
    pub const CURVE_INTENSITY_SCALE: f32 = 0.15;
    /// Maximum path bend (percentage units)
    pub const CURVE_INTENSITY_MAX: f32 = 8.0;
    /// How far along the half-segment the control points sit
    pub const CONTROL_POINT_RATIO: f32 = 0.8;
}
