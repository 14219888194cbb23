mod ball_tracker;
pub mod geometry;
mod identity;
pub mod matching;
mod rect;
mod shot_machine;
mod shot_state;
mod trajectory;

/// Integer label of one ball identity; allocated as one past the largest live id.
pub type TrackId = u64;

/// Position in image coordinates (pixels, y down).
pub type Point = nalgebra::Point2<f32>;

pub use ball_tracker::{BallTracker, Reattachment, TrackerUpdate};
pub use geometry::{ShotGeometry, smooth};
pub use identity::IdentityRecord;
pub use matching::{Detection, DetectionClass};
pub use rect::Rect;
pub use shot_machine::ShotStateMachine;
pub use shot_state::{ShotEvent, ShotEventKind, ShotState};
pub use trajectory::Trajectory;
