//! Integration module connecting a ball/rim detector to the shot tracker.
//!
//! Provides the detector and frame source contracts and the per-frame
//! orchestrator that drives tracker, state machine and session totals.

mod builder;
mod detector;
mod pipeline;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, Frame, FrameSource, IntoDetections, LabeledBox, VideoInfo};
pub use pipeline::{FrameOutput, ShotPipeline, process_video};
