//! Rim-relative shot geometry: smoothing, zone tests and landing prediction.
//!
//! All functions are pure. Screen-space y grows downward, so "above the rim"
//! means a smaller y than the rim top.

use crate::config::ShotConfig;

use super::{Point, Rect, Trajectory};

/// Default weight of the previous point in [`smooth`].
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.7;

/// Exponential smoothing of `new` against `previous`.
///
/// Returns `new` unchanged when there is no previous point.
pub fn smooth(previous: Option<&Point>, new: Point, alpha: f32) -> Point {
    match previous {
        Some(previous) => Point::from(previous.coords * alpha + new.coords * (1.0 - alpha)),
        None => new,
    }
}

/// Zone multipliers for classifying a ball position against the rim.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotGeometry {
    ascent_lateral: f32,
    ascent_top: f32,
    ascent_bottom: f32,
    descent_depth: f32,
    landing_reference: f32,
    landing_window: f32,
}

impl Default for ShotGeometry {
    fn default() -> Self {
        Self::from_config(&ShotConfig::default())
    }
}

impl ShotGeometry {
    pub fn from_config(config: &ShotConfig) -> Self {
        Self {
            ascent_lateral: config.ascent_lateral,
            ascent_top: config.ascent_top,
            ascent_bottom: config.ascent_bottom,
            descent_depth: config.descent_depth,
            landing_reference: config.landing_reference,
            landing_window: config.landing_window,
        }
    }

    /// The region above the rim a shot passes through on its way in.
    pub fn ascent_zone(&self, rim: &Rect) -> Rect {
        let [rx1, ry1, rx2, _] = rim.to_tlbr();
        Rect::from_tlbr(
            rx1 - rim.width * self.ascent_lateral,
            ry1 - rim.height * self.ascent_top,
            rx2 + rim.width * self.ascent_lateral,
            ry1 - rim.height * self.ascent_bottom,
        )
    }

    /// True if the latest point lies inside [`ShotGeometry::ascent_zone`].
    pub fn in_ascent_zone(&self, trajectory: &Trajectory, rim: Option<&Rect>) -> bool {
        let (Some(last), Some(rim)) = (trajectory.last(), rim) else {
            return false;
        };
        self.ascent_zone(rim).contains(last.x, last.y)
    }

    /// True once the latest point has dropped clearly below the rim.
    pub fn in_descent_zone(&self, trajectory: &Trajectory, rim: Option<&Rect>) -> bool {
        let (Some(last), Some(rim)) = (trajectory.last(), rim) else {
            return false;
        };
        last.y > rim.bottom() + self.descent_depth * rim.height
    }

    /// Height used as the rim plane when extrapolating the landing point.
    pub fn landing_height(&self, rim: &Rect) -> f32 {
        rim.top() + self.landing_reference * rim.height
    }

    /// Horizontal position where the trajectory last crossed the rim plane.
    ///
    /// Walks back from the newest point to the latest one still above the
    /// plane and intersects the segment from it to its successor with the
    /// plane. `None` when no point is above the plane or the newest point is.
    pub fn landing_x(&self, trajectory: &Trajectory, rim: &Rect) -> Option<f32> {
        let plane = self.landing_height(rim);
        let n = trajectory.len();
        let i = (0..n).rev().find(|&i| trajectory.get(i).is_some_and(|p| p.y < plane))?;
        let above = trajectory.get(i)?;
        let below = trajectory.get(i + 1)?;

        // below.y >= plane > above.y, so the span is never zero
        let t = (plane - above.y) / (below.y - above.y);
        Some(above.x + t * (below.x - above.x))
    }

    /// Whether the trajectory crossed the rim plane within the rim's scoring window.
    pub fn predict_landing(&self, trajectory: &Trajectory, rim: Option<&Rect>) -> bool {
        let Some(rim) = rim else {
            return false;
        };
        if trajectory.len() < 3 {
            return false;
        }
        let Some(x) = self.landing_x(trajectory, rim) else {
            return false;
        };
        let (cx, _) = rim.center();
        let half = 0.5 * self.landing_window * rim.width;
        cx - half < x && x < cx + half
    }
}
