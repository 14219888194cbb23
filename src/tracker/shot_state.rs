use super::TrackId;

/// Shot lifecycle of one ball identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotState {
    /// Newly seen ball, no shot observed yet
    #[default]
    Init,
    /// Ball seen heading into the rim from above
    Attempting,
    /// Ball dropped below the rim through the scoring window
    Made,
    /// Ball dropped below the rim outside the scoring window
    Missed,
}

impl ShotState {
    /// `Made` and `Missed` are final for an identity.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, ShotState::Made | ShotState::Missed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotEventKind {
    Attempt,
    Make,
    Miss,
}

/// A counted shot event. Never mutated once emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotEvent {
    pub track_id: TrackId,
    pub kind: ShotEventKind,
    pub frame_index: u64,
}

impl ShotEvent {
    pub fn new(track_id: TrackId, kind: ShotEventKind, frame_index: u64) -> Self {
        Self {
            track_id,
            kind,
            frame_index,
        }
    }
}
