//! Curved path through the level nodes
//!
//! One cubic Bezier per pair of consecutive points. Control points sit 80% of
//! the way towards the segment midpoint and are pushed vertically by a small
//! amount, alternating up/down so the path snakes between levels.

use std::fmt::Write;

use glam::Vec2;

use crate::consts::{CONTROL_POINT_RATIO, CURVE_INTENSITY_MAX, CURVE_INTENSITY_SCALE};

/// Samples per segment for the arc-length table
const ARC_SAMPLES: usize = 32;
const LENGTH_EPSILON: f32 = 1e-5;

/// Evaluate a cubic Bezier at parameter t
#[inline]
pub fn cubic_point(p0: Vec2, c1: Vec2, c2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + c1 * (3.0 * u * u * t) + c2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// One cubic segment with its sampled arc length
#[derive(Debug, Clone)]
pub struct CubicSegment {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
    /// Cumulative length at each of the ARC_SAMPLES + 1 sample points
    cumulative: Vec<f32>,
}

impl CubicSegment {
    pub fn new(start: Vec2, control1: Vec2, control2: Vec2, end: Vec2) -> Self {
        let mut cumulative = Vec::with_capacity(ARC_SAMPLES + 1);
        let mut total = 0.0;
        let mut prev = start;
        cumulative.push(0.0);
        for i in 1..=ARC_SAMPLES {
            let t = i as f32 / ARC_SAMPLES as f32;
            let point = cubic_point(start, control1, control2, end, t);
            total += prev.distance(point);
            cumulative.push(total);
            prev = point;
        }
        Self {
            start,
            control1,
            control2,
            end,
            cumulative,
        }
    }

    /// Point at Bezier parameter t in [0, 1]
    pub fn point_at(&self, t: f32) -> Vec2 {
        cubic_point(self.start, self.control1, self.control2, self.end, t.clamp(0.0, 1.0))
    }

    /// Approximate arc length
    pub fn length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Bezier parameter at a given distance along the segment
    fn param_for_length(&self, length: f32) -> f32 {
        let total = self.length();
        if total <= LENGTH_EPSILON {
            return 0.0;
        }
        let target = length.clamp(0.0, total);
        let idx = self.cumulative.partition_point(|&l| l < target);
        if idx == 0 {
            return 0.0;
        }
        if idx >= self.cumulative.len() {
            return 1.0;
        }

        let prev = self.cumulative[idx - 1];
        let next = self.cumulative[idx];
        let span = next - prev;
        let alpha = if span <= 0.0 { 0.0 } else { (target - prev) / span };
        let samples = (self.cumulative.len() - 1) as f32;
        ((idx - 1) as f32 + alpha) / samples
    }

    /// Point at a distance along the segment
    pub fn point_at_length(&self, length: f32) -> Vec2 {
        self.point_at(self.param_for_length(length))
    }
}

/// Control points for the segment ending at point index `i` (i >= 1)
///
/// Even indices bend towards +y, odd indices towards -y. The bend grows with
/// segment length up to CURVE_INTENSITY_MAX.
pub fn control_points(prev: Vec2, current: Vec2, i: usize) -> (Vec2, Vec2) {
    let mid = (prev + current) / 2.0;
    let intensity = (prev.distance(current) * CURVE_INTENSITY_SCALE).min(CURVE_INTENSITY_MAX);
    let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
    let offset = Vec2::new(0.0, direction * intensity);

    let control1 = prev + (mid - prev) * CONTROL_POINT_RATIO + offset;
    let control2 = current - (current - mid) * CONTROL_POINT_RATIO + offset;
    (control1, control2)
}

/// A piecewise-cubic path starting at the first point
#[derive(Debug, Clone, Default)]
pub struct CurvePath {
    start: Option<Vec2>,
    segments: Vec<CubicSegment>,
    /// Length at the start of each segment
    offsets: Vec<f32>,
    total_length: f32,
}

impl CurvePath {
    /// Build the path through `points`. Fewer than two points gives an empty path.
    pub fn through(points: &[Vec2]) -> Self {
        if points.len() < 2 {
            return Self::default();
        }

        let mut segments = Vec::with_capacity(points.len() - 1);
        let mut offsets = Vec::with_capacity(points.len() - 1);
        let mut total_length = 0.0;
        for i in 1..points.len() {
            let prev = points[i - 1];
            let current = points[i];
            let (c1, c2) = control_points(prev, current, i);
            let segment = CubicSegment::new(prev, c1, c2, current);
            offsets.push(total_length);
            total_length += segment.length();
            segments.push(segment);
        }

        Self {
            start: Some(points[0]),
            segments,
            offsets,
            total_length,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[CubicSegment] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Point at a distance from the start (clamped to the path)
    pub fn point_at_length(&self, length: f32) -> Option<Vec2> {
        let start = self.start?;
        if self.segments.is_empty() {
            return Some(start);
        }
        let length = length.clamp(0.0, self.total_length);
        let idx = self
            .offsets
            .partition_point(|&o| o <= length)
            .saturating_sub(1);
        let segment = &self.segments[idx];
        Some(segment.point_at_length(length - self.offsets[idx]))
    }

    /// Point at a fraction of the total length
    pub fn point_at_fraction(&self, fraction: f32) -> Option<Vec2> {
        self.point_at_length(self.revealed_length(fraction))
    }

    /// Length of the path revealed by `fraction`
    pub fn revealed_length(&self, fraction: f32) -> f32 {
        self.total_length * fraction.clamp(0.0, 1.0)
    }

    /// stroke-dasharray values (visible, hidden) that reveal `fraction` of the path
    pub fn dash_for_fraction(&self, fraction: f32) -> (f32, f32) {
        let visible = self.revealed_length(fraction);
        (visible, self.total_length - visible + 1.0)
    }

    /// SVG path data (`M x y C c1x c1y, c2x c2y, x y ...`)
    pub fn to_svg_path(&self) -> String {
        let Some(start) = self.start else {
            return String::new();
        };
        let mut d = format!("M {} {}", start.x, start.y);
        for s in &self.segments {
            let _ = write!(
                d,
                " C {} {}, {} {}, {} {}",
                s.control1.x, s.control1.y, s.control2.x, s.control2.y, s.end.x, s.end.y
            );
        }
        d
    }
}

/// Build the curve through an ordered list of positions
pub fn compute_curve(points: &[Vec2]) -> CurvePath {
    CurvePath::through(points)
}

/// Portion of the path to show as traversed
///
/// Whole segments behind the current level plus the fraction of the segment
/// currently being travelled, capped at 1.
pub fn compute_reveal_fraction(total_segments: u32, current_level: u32, partial_progress: f32) -> f32 {
    if total_segments == 0 {
        return 1.0;
    }
    let completed_segments = current_level.saturating_sub(1) as f32;
    let total = total_segments as f32;
    let partial = partial_progress.clamp(0.0, 1.0);
    (completed_segments / total + partial / total).min(1.0)
}
