//! Platform-independent application shell
//!
//! Wraps the progression with the bits of UI state the front end needs
//! (mute, about dialog, hover, unlock highlight) and turns progression events
//! into sound cues. The browser entry point and the native demo both drive
//! this through `handle_command` and `frame`.

use crate::audio::SoundEffect;
use crate::consts::UNLOCK_HIGHLIGHT_MS;
use crate::map::{CurvePath, ProgressEvent, Progression, catalog, compute_curve};
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::view::{self, MapView};

/// User commands (keyboard shortcuts and buttons)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Advance,
    Reset,
    ToggleAbout,
    ToggleMute,
}

impl Command {
    /// Map a keyboard key to a command (case-insensitive)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "n" => Some(Command::Advance),
            "r" => Some(Command::Reset),
            "a" => Some(Command::ToggleAbout),
            "m" => Some(Command::ToggleMute),
            _ => None,
        }
    }
}

/// Level briefly highlighted after it unlocks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnlockHighlight {
    pub level: u32,
    /// Frame time the highlight ends (ms)
    pub until: f64,
}

pub struct LevelMapApp<S: KeyValueStore> {
    store: S,
    progression: Progression,
    settings: Settings,
    curve: CurvePath,
    about_open: bool,
    hovered: Option<u32>,
    highlight: Option<UnlockHighlight>,
    sounds: Vec<SoundEffect>,
}

impl<S: KeyValueStore> LevelMapApp<S> {
    /// Restore settings and progress from `store`
    pub fn new(store: S) -> Self {
        let settings = Settings::load(&store);
        let progression =
            Progression::restore(&store).with_move_duration(settings.effective_move_duration());
        Self {
            store,
            progression,
            settings,
            curve: compute_curve(&catalog::positions()),
            about_open: false,
            hovered: None,
            highlight: None,
            sounds: Vec::new(),
        }
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn curve(&self) -> &CurvePath {
        &self.curve
    }

    pub fn is_about_open(&self) -> bool {
        self.about_open
    }

    pub fn close_about(&mut self) {
        self.about_open = false;
    }

    pub fn hovered(&self) -> Option<u32> {
        self.hovered
    }

    /// Pointer entered (Some) or left (None) a level node
    pub fn set_hovered(&mut self, level: Option<u32>) {
        self.hovered = level.filter(|&id| catalog::get(id).is_some());
    }

    pub fn highlight(&self) -> Option<UnlockHighlight> {
        self.highlight
    }

    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::Advance => {
                self.progression.advance();
            }
            Command::Reset => {
                self.progression.reset(&mut self.store);
                self.hovered = None;
                self.highlight = None;
            }
            Command::ToggleAbout => self.about_open = !self.about_open,
            Command::ToggleMute => {
                self.settings.toggle_mute();
                self.settings.save(&mut self.store);
                log::info!("Sound {}", if self.settings.muted { "muted" } else { "on" });
            }
        }
    }

    /// Per-display-frame update
    pub fn frame(&mut self, now: f64) {
        self.progression.frame(now);

        for event in self.progression.drain_events() {
            let cue = match event {
                ProgressEvent::LevelCompleted(_) => SoundEffect::LevelComplete,
                ProgressEvent::LevelUnlocked(level) => {
                    self.highlight = Some(UnlockHighlight {
                        level,
                        until: now + UNLOCK_HIGHLIGHT_MS,
                    });
                    SoundEffect::LevelUnlock
                }
            };
            // Cues raised while muted are dropped, not replayed on unmute
            if !self.settings.muted {
                self.sounds.push(cue);
            }
        }

        if self.highlight.is_some_and(|h| now >= h.until) {
            self.highlight = None;
        }
    }

    /// Take the sound cues raised since the last call
    pub fn drain_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }

    /// Clicked a level node; returns the page to open if it is selectable
    pub fn select_level(&self, level: u32) -> Option<String> {
        if !self.progression.select_level(level) {
            return None;
        }
        let url = view::level_url(level);
        log::info!("Opening level {} ({})", level, url);
        Some(url)
    }

    /// Everything the front end needs to draw this frame
    pub fn view(&self) -> MapView {
        view::build(
            &self.progression,
            &self.curve,
            &self.settings,
            self.about_open,
            self.hovered,
            self.highlight.map(|h| h.level),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{LEVEL_COUNT, MOVE_DURATION_MS};
    use crate::persistence::{MemoryStore, completion_key, record_completion};

    fn run_until_idle(app: &mut LevelMapApp<MemoryStore>, now: &mut f64) {
        while app.progression().is_moving() {
            app.frame(*now);
            *now += 16.0;
        }
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Command::from_key("n"), Some(Command::Advance));
        assert_eq!(Command::from_key("N"), Some(Command::Advance));
        assert_eq!(Command::from_key("R"), Some(Command::Reset));
        assert_eq!(Command::from_key("a"), Some(Command::ToggleAbout));
        assert_eq!(Command::from_key("m"), Some(Command::ToggleMute));
        assert_eq!(Command::from_key("x"), None);
        assert_eq!(Command::from_key("Enter"), None);
    }

    #[test]
    fn test_advance_raises_cues_once() {
        let mut app = LevelMapApp::new(MemoryStore::new());
        let mut now = 0.0;
        app.handle_command(Command::Advance);
        run_until_idle(&mut app, &mut now);

        assert_eq!(
            app.drain_sounds(),
            vec![SoundEffect::LevelComplete, SoundEffect::LevelUnlock]
        );
        app.frame(now);
        assert!(app.drain_sounds().is_empty());
        assert_eq!(app.highlight().map(|h| h.level), Some(2));
    }

    #[test]
    fn test_highlight_expires() {
        let mut app = LevelMapApp::new(MemoryStore::new());
        let mut now = 0.0;
        app.handle_command(Command::Advance);
        run_until_idle(&mut app, &mut now);
        let until = app.highlight().map(|h| h.until).unwrap_or_default();
        app.frame(until - 1.0);
        assert!(app.highlight().is_some());
        app.frame(until);
        assert!(app.highlight().is_none());
    }

    #[test]
    fn test_muted_cues_are_dropped() {
        let mut app = LevelMapApp::new(MemoryStore::new());
        let mut now = 0.0;
        app.handle_command(Command::ToggleMute);
        app.handle_command(Command::Advance);
        run_until_idle(&mut app, &mut now);
        assert!(app.drain_sounds().is_empty());

        app.handle_command(Command::ToggleMute);
        app.frame(now);
        assert!(app.drain_sounds().is_empty());
    }

    #[test]
    fn test_mute_persists() {
        let mut app = LevelMapApp::new(MemoryStore::new());
        app.handle_command(Command::ToggleMute);
        let reopened = LevelMapApp::new(app.store().clone());
        assert!(reopened.settings().muted);
    }

    #[test]
    fn test_reset_mid_move() {
        let mut store = MemoryStore::new();
        record_completion(&mut store, 1);
        let mut app = LevelMapApp::new(store);
        assert_eq!(app.progression().current_level(), 2);

        app.handle_command(Command::Advance);
        app.frame(0.0);
        app.frame(MOVE_DURATION_MS / 2.0);
        app.handle_command(Command::Reset);
        app.frame(MOVE_DURATION_MS * 2.0);

        assert_eq!(app.progression().current_level(), 1);
        assert!(app.progression().completed_levels().is_empty());
        assert!(app.drain_sounds().is_empty());
        for id in 1..=LEVEL_COUNT {
            assert!(app.store().get(&completion_key(id)).is_none());
        }
    }

    #[test]
    fn test_select_level_url() {
        let app = LevelMapApp::new(MemoryStore::new());
        assert_eq!(app.select_level(1).as_deref(), Some("level1.html"));
        assert_eq!(app.select_level(2), None);
    }

    #[test]
    fn test_about_and_hover() {
        let mut app = LevelMapApp::new(MemoryStore::new());
        app.handle_command(Command::ToggleAbout);
        assert!(app.is_about_open());
        app.close_about();
        assert!(!app.is_about_open());

        app.set_hovered(Some(3));
        assert_eq!(app.hovered(), Some(3));
        app.set_hovered(Some(42));
        assert_eq!(app.hovered(), None);
    }

    #[test]
    fn test_reduced_motion_setting_shortens_moves() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        settings.save(&mut store);

        let mut app = LevelMapApp::new(store);
        app.handle_command(Command::Advance);
        app.frame(0.0);
        app.frame(crate::consts::REDUCED_MOTION_DURATION_MS);
        assert_eq!(app.progression().current_level(), 2);
    }
}
