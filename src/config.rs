//! Tuned constants for association, reattachment and shot geometry.
//!
//! Every value here was picked empirically for a single fixed camera facing
//! one rim. They live in one serde-loadable structure so a different camera
//! setup can be retuned from a JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration for a shot tracking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotTrackerConfig {
    /// Ball detections must score strictly above this to be tracked.
    pub confidence_threshold: f32,
    pub tracker: TrackerConfig,
    pub shot: ShotConfig,
}

impl Default for ShotTrackerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.35,
            tracker: TrackerConfig::default(),
            shot: ShotConfig::default(),
        }
    }
}

impl ShotTrackerConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate a configuration from a JSON string.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ShotTrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::InvalidConfig(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        self.tracker.validate()?;
        self.shot.validate()
    }
}

/// Ball identity tracker parameters. Distances are in pixels, counts in frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Nearest-neighbour gate for matching a detection to a live identity.
    pub max_association_distance: f32,
    /// Weight of the previous point when smoothing a matched detection.
    pub smoothing_alpha: f32,
    /// Trajectory length; oldest points are evicted first.
    pub trajectory_capacity: usize,
    /// Identities missing for 1..=this many frames are reattachment candidates.
    pub reattach_max_missing: u32,
    pub reattach_max_distance: f32,
    /// Horizontal margin around the rim for every rim-proximity window.
    pub rim_margin_x: f32,
    /// Vertical margin around the rim for extrapolation and pruning.
    pub rim_margin_y: f32,
    /// Vertical margin around the rim for reattachment.
    pub reattach_margin_y: f32,
    /// How far above the rim top a lost ball may have been to be reattached.
    pub reattach_above_rim: f32,
    /// How far below the rim bottom a lost ball may have been to be reattached.
    pub reattach_below_rim: f32,
    pub max_extrapolated_frames: u32,
    pub min_extrapolation_points: usize,
    pub max_missing_frames: u32,
    pub max_missing_frames_near_rim: u32,
    /// Identities whose last point is this close to the bottom of the frame are dropped.
    pub exit_margin: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_association_distance: 100.0,
            smoothing_alpha: 0.7,
            trajectory_capacity: 50,
            reattach_max_missing: 8,
            reattach_max_distance: 130.0,
            rim_margin_x: 150.0,
            rim_margin_y: 150.0,
            reattach_margin_y: 180.0,
            reattach_above_rim: 10.0,
            reattach_below_rim: 40.0,
            max_extrapolated_frames: 5,
            min_extrapolation_points: 3,
            max_missing_frames: 10,
            max_missing_frames_near_rim: 25,
            exit_margin: 40.0,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.smoothing_alpha) {
            return Err(Error::InvalidConfig(format!(
                "smoothing_alpha must be within [0, 1], got {}",
                self.smoothing_alpha
            )));
        }
        if self.trajectory_capacity == 0 {
            return Err(Error::InvalidConfig(
                "trajectory_capacity must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("max_association_distance", self.max_association_distance),
            ("reattach_max_distance", self.reattach_max_distance),
        ] {
            if value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// What to do when a make is called for an identity that never had a
/// counted attempt (the ascent check never fired for it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnattemptedMake {
    /// Emit the make alone; FGM may exceed FGA.
    #[default]
    MakeOnly,
    /// Emit an attempt immediately followed by the make.
    CountAsAttempt,
    /// Resolve the identity as made without emitting anything.
    Suppress,
}

/// Rim-relative zone multipliers and shot timing.
///
/// Multipliers are fractions of the rim's width or height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotConfig {
    pub ascent_lateral: f32,
    pub ascent_top: f32,
    pub ascent_bottom: f32,
    pub descent_depth: f32,
    pub landing_reference: f32,
    pub landing_window: f32,
    /// Minimum time between two counted events of one identity.
    pub cooldown_seconds: f32,
    pub min_trajectory_points: usize,
    pub unattempted_make: UnattemptedMake,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            ascent_lateral: 2.5,
            ascent_top: 2.5,
            ascent_bottom: 0.5,
            descent_depth: 0.6,
            landing_reference: 0.3,
            landing_window: 0.7,
            cooldown_seconds: 0.6,
            min_trajectory_points: 5,
            unattempted_make: UnattemptedMake::MakeOnly,
        }
    }
}

impl ShotConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cooldown_seconds < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "cooldown_seconds must not be negative, got {}",
                self.cooldown_seconds
            )));
        }
        if self.ascent_top < self.ascent_bottom {
            return Err(Error::InvalidConfig(format!(
                "ascent_top ({}) must not be below ascent_bottom ({})",
                self.ascent_top, self.ascent_bottom
            )));
        }
        Ok(())
    }

    /// Cooldown window in whole frames for the given frame rate.
    pub fn cooldown_frames(&self, frame_rate: f32) -> u64 {
        (frame_rate * self.cooldown_seconds).max(0.0) as u64
    }
}
