//! Per-identity record owned by the ball tracker.

use nalgebra::Vector2;

use super::geometry::smooth;
use super::shot_state::ShotState;
use super::{Point, Trajectory};

/// Everything known about one ball identity.
///
/// Trajectory, missing-frame counter, velocity, shot state and cooldown
/// marker live in one record so they are created and dropped together.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityRecord {
    /// Smoothed (and occasionally extrapolated) positions
    pub trajectory: Trajectory,
    /// Consecutive frames without a matching detection
    pub missing_frames: u32,
    /// Displacement of the last trajectory step
    pub velocity: Vector2<f32>,
    pub state: ShotState,
    /// Frame index of the last counted event, if any
    pub last_event_frame: Option<u64>,
}

impl IdentityRecord {
    /// Start a fresh identity at `center`.
    pub fn new(center: Point, capacity: usize) -> Self {
        let mut trajectory = Trajectory::with_capacity(capacity);
        trajectory.push(center);
        Self {
            trajectory,
            missing_frames: 0,
            velocity: Vector2::zeros(),
            state: ShotState::Init,
            last_event_frame: None,
        }
    }

    /// Continue a lost identity at `center`, keeping its history and shot progress.
    pub fn reattach(mut self, center: Point) -> Self {
        self.trajectory.push(center);
        self.missing_frames = 0;
        self
    }

    #[inline]
    pub fn last_point(&self) -> Option<&Point> {
        self.trajectory.last()
    }

    /// Record a matched detection.
    pub fn observe(&mut self, center: Point, alpha: f32) {
        let smoothed = smooth(self.trajectory.last(), center, alpha);
        self.trajectory.push(smoothed);
        self.missing_frames = 0;
    }

    /// Append a point continuing the last step, for short occlusions.
    pub fn extrapolate(&mut self, min_points: usize) -> Option<Point> {
        if self.trajectory.len() < min_points {
            return None;
        }
        let step = self.trajectory.last_step()?;
        let predicted = *self.trajectory.last()? + step;
        self.trajectory.push(predicted);
        Some(predicted)
    }

    pub fn refresh_velocity(&mut self) {
        if let Some(step) = self.trajectory.last_step() {
            self.velocity = step;
        }
    }

    /// Whether more than `window` frames passed since the last counted event.
    #[inline]
    pub fn cooldown_elapsed(&self, frame_index: u64, window: u64) -> bool {
        self.last_event_frame
            .is_none_or(|last| frame_index.saturating_sub(last) > window)
    }

    #[inline]
    pub fn mark_event(&mut self, frame_index: u64) {
        self.last_event_frame = Some(frame_index);
    }
}
