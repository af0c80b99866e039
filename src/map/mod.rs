//! Level map core
//!
//! Pure, platform-independent state and geometry:
//! - `catalog`: the fixed list of levels
//! - `curve`: the curved path through the levels and how much of it to reveal
//! - `motion`: eased interpolation sampled once per display frame
//! - `progress`: the progression state machine
//!
//! Nothing here touches the DOM, audio or storage directly; storage goes
//! through the `KeyValueStore` trait.

pub mod catalog;
pub mod curve;
pub mod motion;
pub mod progress;

pub use catalog::{Difficulty, Level, LevelColor};
pub use curve::{CubicSegment, CurvePath, compute_curve, compute_reveal_fraction};
pub use motion::{Motion, MotionSample, ease_out_cubic, lerp};
pub use progress::{
    LevelStatus, ProgressEvent, ProgressSnapshot, Progression, TransitionToken, status,
};
