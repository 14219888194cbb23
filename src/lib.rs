//! Basketball shot tracking on top of an external ball/rim detector.
//!
//! Per-frame detections flow through an explicit pipeline:
//! detector -> [`BallTracker`] -> [`ShotStateMachine`] -> [`SessionTotals`].
//! [`ShotPipeline`] wires the stages together for a whole video.

pub mod config;
pub mod error;
pub mod integration;
pub mod session;
pub mod tracker;

pub use config::{ShotConfig, ShotTrackerConfig, TrackerConfig, UnattemptedMake};
pub use error::{Error, Result};
pub use integration::{
    DetectionBuilder, DetectionSource, Frame, FrameOutput, FrameSource, ShotPipeline, VideoInfo,
    process_video,
};
pub use session::{SessionReport, SessionSnapshot, SessionTotals};
pub use tracker::{
    BallTracker, Detection, DetectionClass, Point, Rect, ShotEvent, ShotEventKind, ShotGeometry,
    ShotState, ShotStateMachine, TrackId, Trajectory, TrackerUpdate,
};
