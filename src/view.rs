//! Render-ready snapshot of the map
//!
//! The front end draws straight from a `MapView`; it never inspects the
//! progression itself.

use glam::Vec2;
use serde::Serialize;

use crate::consts::{LEVEL_COUNT, MAX_STARS};
use crate::map::{
    CurvePath, Difficulty, LevelColor, LevelStatus, Progression, catalog, compute_reveal_fraction,
};
use crate::settings::Settings;

/// Static content of the about dialog
pub const ABOUT_ITEMS: &[(&str, &str)] = &[
    ("Language", "Rust (wasm32)"),
    ("Math", "glam"),
    ("Serialization", "serde + serde_json"),
    ("Browser bindings", "wasm-bindgen + web-sys"),
    ("Sound", "Web Audio API (custom tones)"),
    ("Logging", "log + console_log"),
];

pub const ABOUT_SUMMARY: &str =
    "Interactive level map demonstrating animated UI, progress tracking, and sound effects.";

/// Page opened when a level is selected
pub fn level_url(level: u32) -> String {
    format!("level{}.html", level)
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub id: u32,
    pub position: Vec2,
    pub status: LevelStatus,
    pub clickable: bool,
    pub color: LevelColor,
    /// Filled stars out of MAX_STARS
    pub stars: u8,
    /// Just unlocked; plays the unlock animation
    pub highlighted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TooltipView {
    pub id: u32,
    pub difficulty: Difficulty,
    pub stars: u8,
    pub max_stars: u8,
    pub description: &'static str,
    pub completed: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressBarView {
    pub completed: usize,
    pub total: usize,
    /// 0..100
    pub percent: f32,
    pub current_level: u32,
}

impl ProgressBarView {
    pub fn label(&self) -> String {
        format!("{} / {} Levels Completed", self.completed, self.total)
    }
}

/// Main action area under the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NextButton {
    Enabled,
    /// Still clickable, but the last level is already marked completed
    LastLevelDone,
    Disabled,
    /// Every level done; show the congratulation panel instead
    AllComplete,
}

impl NextButton {
    /// Button caption; empty for the congratulation panel
    pub fn label(&self) -> &'static str {
        match self {
            NextButton::Enabled | NextButton::Disabled => "Next Level",
            NextButton::LastLevelDone => "All Complete!",
            NextButton::AllComplete => "",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PathView {
    /// SVG `d` attribute
    pub d: String,
    /// Fraction of the path drawn as travelled
    pub reveal: f32,
    /// stroke-dasharray (visible, hidden) for the travelled overlay
    pub dash: (f32, f32),
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub nodes: Vec<NodeView>,
    pub path: PathView,
    pub marker: Vec2,
    pub marker_moving: bool,
    pub progress: ProgressBarView,
    pub next_button: NextButton,
    pub tooltip: Option<TooltipView>,
    pub about_open: bool,
    pub muted: bool,
}

pub fn build(
    progression: &Progression,
    curve: &CurvePath,
    settings: &Settings,
    about_open: bool,
    hovered: Option<u32>,
    highlighted: Option<u32>,
) -> MapView {
    let nodes = progression
        .levels_with_status()
        .into_iter()
        .map(|(level, status)| NodeView {
            id: level.id,
            position: level.position,
            status,
            clickable: status != LevelStatus::Locked,
            color: level.color,
            stars: level.stars.min(MAX_STARS),
            highlighted: highlighted == Some(level.id),
        })
        .collect();

    let reveal = compute_reveal_fraction(
        curve.segment_count() as u32,
        progression.current_level(),
        progression.partial_progress(),
    );

    let completed = progression.completed_count();
    let total = LEVEL_COUNT as usize;
    let progress = ProgressBarView {
        completed,
        total,
        percent: completed as f32 / total as f32 * 100.0,
        current_level: progression.current_level(),
    };

    let next_button = if progression.all_completed() {
        NextButton::AllComplete
    } else if progression.current_level() > LEVEL_COUNT {
        NextButton::Disabled
    } else if progression.current_level() == LEVEL_COUNT
        && progression.completed_levels().contains(&LEVEL_COUNT)
    {
        NextButton::LastLevelDone
    } else {
        NextButton::Enabled
    };

    let tooltip = hovered.and_then(catalog::get).map(|level| {
        let status = progression.status(level.id);
        TooltipView {
            id: level.id,
            difficulty: level.difficulty,
            stars: level.stars.min(MAX_STARS),
            max_stars: MAX_STARS,
            description: level.description,
            completed: status == LevelStatus::Completed,
            locked: status == LevelStatus::Locked,
        }
    });

    MapView {
        nodes,
        path: PathView {
            d: curve.to_svg_path(),
            reveal,
            dash: curve.dash_for_fraction(reveal),
        },
        marker: progression.marker_position(),
        marker_moving: progression.is_moving(),
        progress,
        next_button,
        tooltip,
        about_open,
        muted: settings.muted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::compute_curve;

    fn view_of(progression: &Progression, hovered: Option<u32>) -> MapView {
        let curve = compute_curve(&catalog::positions());
        build(progression, &curve, &Settings::default(), false, hovered, None)
    }

    #[test]
    fn test_fresh_map() {
        let view = view_of(&Progression::new(), None);
        assert_eq!(view.nodes.len(), 7);
        assert_eq!(view.nodes[0].status, LevelStatus::Current);
        assert!(view.nodes[0].clickable);
        assert!(view.nodes[1..].iter().all(|n| n.status == LevelStatus::Locked && !n.clickable));
        assert_eq!(view.path.reveal, 0.0);
        assert_eq!(view.progress.percent, 0.0);
        assert_eq!(view.progress.label(), "0 / 7 Levels Completed");
        assert_eq!(view.next_button, NextButton::Enabled);
        assert_eq!(view.marker, catalog::position(1).unwrap());
        assert!(view.tooltip.is_none());
    }

    #[test]
    fn test_all_complete() {
        let p = Progression::from_flags((1..=7).map(|id| (id, true)));
        let view = view_of(&p, None);
        assert_eq!(view.next_button, NextButton::AllComplete);
        assert_eq!(view.path.reveal, 1.0);
        assert_eq!(view.progress.percent, 100.0);
        assert!(view.nodes.iter().all(|n| n.status == LevelStatus::Completed));
    }

    #[test]
    fn test_tooltip_for_locked_level() {
        let view = view_of(&Progression::new(), Some(7));
        let tip = view.tooltip.unwrap();
        assert_eq!(tip.id, 7);
        assert!(tip.locked);
        assert!(!tip.completed);
        assert_eq!(tip.stars, 3);
        assert_eq!(tip.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_last_level_done_from_sparse_flags() {
        // Six flags with a gap put the current level on 7 while 7 is done
        let flags = [1, 2, 3, 4, 5, 7].map(|id| (id, true));
        let p = Progression::from_flags(flags);
        assert_eq!(p.current_level(), 7);
        let view = view_of(&p, None);
        assert_eq!(view.next_button, NextButton::LastLevelDone);
        assert_eq!(view.next_button.label(), "All Complete!");

        let view = view_of(&Progression::new(), None);
        assert_eq!(view.next_button.label(), "Next Level");
    }

    #[test]
    fn test_reveal_tracks_live_transition() {
        let mut p = Progression::from_flags([(1, true), (2, true)]);
        assert_eq!(p.current_level(), 3);
        let segments = (LEVEL_COUNT - 1) as f32;

        p.advance();
        p.frame(0.0);
        p.frame(500.0);
        let view = view_of(&p, None);
        let lower = 2.0 / segments;
        let upper = 3.0 / segments;
        assert!(view.marker_moving);
        assert!(view.path.reveal > lower && view.path.reveal < upper);
        assert!(view.path.dash.0 > 0.0);

        p.frame(1500.0);
        let later = view_of(&p, None);
        assert!(later.path.reveal > view.path.reveal && later.path.reveal < upper);
        assert!(later.path.dash.0 > view.path.dash.0);
    }

    #[test]
    fn test_level_url() {
        assert_eq!(level_url(4), "level4.html");
    }
}
