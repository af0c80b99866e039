//! Static level catalog
//!
//! Seven levels laid out on a 0..100 percentage plane, winding from the
//! bottom-left up to the top-right.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_COUNT;

/// Difficulty tier shown in the tooltip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Colour tag used by the front end to pick a node gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelColor {
    Pink,
    Blue,
    Purple,
    Yellow,
    Green,
    Orange,
    Red,
}

impl LevelColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelColor::Pink => "pink",
            LevelColor::Blue => "blue",
            LevelColor::Purple => "purple",
            LevelColor::Yellow => "yellow",
            LevelColor::Green => "green",
            LevelColor::Orange => "orange",
            LevelColor::Red => "red",
        }
    }
}

/// An immutable catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    /// 1-based id, defines the total order
    pub id: u32,
    /// Position in percentage coordinates
    pub position: Vec2,
    pub difficulty: Difficulty,
    /// Fixed star rating
    pub stars: u8,
    pub description: &'static str,
    pub color: LevelColor,
}

const fn level(
    id: u32,
    x: f32,
    y: f32,
    difficulty: Difficulty,
    stars: u8,
    description: &'static str,
    color: LevelColor,
) -> Level {
    Level {
        id,
        position: Vec2::new(x, y),
        difficulty,
        stars,
        description,
        color,
    }
}

static LEVELS: [Level; LEVEL_COUNT as usize] = [
    level(1, 15.0, 85.0, Difficulty::Easy, 1, "Welcome! Start your journey here.", LevelColor::Pink),
    level(2, 50.0, 65.0, Difficulty::Easy, 1, "Learn the basics with simple challenges.", LevelColor::Blue),
    level(3, 85.0, 55.0, Difficulty::Easy, 2, "Getting warmed up? Try some combos!", LevelColor::Purple),
    level(4, 50.0, 45.0, Difficulty::Medium, 2, "Things are heating up now!", LevelColor::Yellow),
    level(5, 15.0, 35.0, Difficulty::Medium, 2, "Strategic thinking required.", LevelColor::Green),
    level(6, 50.0, 25.0, Difficulty::Medium, 2, "Complex patterns await you.", LevelColor::Orange),
    level(7, 85.0, 15.0, Difficulty::Hard, 3, "Expert level challenges ahead!", LevelColor::Red),
];

/// All levels, ordered by id
pub fn all() -> &'static [Level] {
    &LEVELS
}

/// Look up a level by id
pub fn get(id: u32) -> Option<&'static Level> {
    if id == 0 {
        return None;
    }
    LEVELS.get(id as usize - 1)
}

/// Position of a level, if the id is in the catalog
pub fn position(id: u32) -> Option<Vec2> {
    get(id).map(|l| l.position)
}

/// Positions of every level in path order
pub fn positions() -> Vec<Vec2> {
    LEVELS.iter().map(|l| l.position).collect()
}

/// Number of path segments between consecutive levels
pub fn segment_count() -> u32 {
    LEVEL_COUNT.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        for (i, level) in all().iter().enumerate() {
            assert_eq!(level.id, i as u32 + 1);
        }
        assert_eq!(all().len(), LEVEL_COUNT as usize);
    }

    #[test]
    fn test_positions_in_percent_plane() {
        for level in all() {
            assert!((0.0..=100.0).contains(&level.position.x));
            assert!((0.0..=100.0).contains(&level.position.y));
        }
    }

    #[test]
    fn test_lookup() {
        assert!(get(0).is_none());
        assert!(get(8).is_none());
        assert_eq!(position(1), Some(Vec2::new(15.0, 85.0)));
        assert_eq!(get(7).map(|l| l.difficulty), Some(Difficulty::Hard));
        assert_eq!(get(7).map(|l| l.stars), Some(3));
        assert_eq!(segment_count(), 6);
    }
}
