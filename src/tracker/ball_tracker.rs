//! Ball identity tracker: distance-gated association with net reattachment.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::config::TrackerConfig;
use crate::tracker::identity::IdentityRecord;
use crate::tracker::matching::{self, ReattachRule};
use crate::tracker::{Point, Rect, TrackId, Trajectory};

/// A new detection that continued a recently lost identity under a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reattachment {
    pub from: TrackId,
    pub to: TrackId,
}

/// What one call to [`BallTracker::update`] changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerUpdate {
    /// Identities matched or created this frame
    pub present: BTreeSet<TrackId>,
    /// Identities allocated this frame, reattached ones included
    pub created: Vec<TrackId>,
    pub reattached: Vec<Reattachment>,
    /// Identities dropped after going missing for too long
    pub expired: Vec<TrackId>,
    /// Identities dropped after leaving through the bottom of the frame,
    /// filled in by [`BallTracker::drop_exited`] once the frame was evaluated
    pub exited: Vec<TrackId>,
}

/// Owns every live ball identity for one video.
#[derive(Debug, Clone)]
pub struct BallTracker {
    identities: BTreeMap<TrackId, IdentityRecord>,
    config: TrackerConfig,
    reattach: ReattachRule,
}

impl Default for BallTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl BallTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let reattach = ReattachRule {
            max_missing: config.reattach_max_missing,
            max_distance: config.reattach_max_distance,
            margin_x: config.rim_margin_x,
            margin_y: config.reattach_margin_y,
            above_rim: config.reattach_above_rim,
            below_rim: config.reattach_below_rim,
        };
        Self {
            identities: BTreeMap::new(),
            config,
            reattach,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn get(&self, id: TrackId) -> Option<&IdentityRecord> {
        self.identities.get(&id)
    }

    /// Live identities in id order.
    pub fn identities(&self) -> impl Iterator<Item = (TrackId, &IdentityRecord)> + '_ {
        self.identities.iter().map(|(&id, record)| (id, record))
    }

    pub fn identities_mut(&mut self) -> impl Iterator<Item = (TrackId, &mut IdentityRecord)> + '_ {
        self.identities.iter_mut().map(|(&id, record)| (id, record))
    }

    pub fn trajectory(&self, id: TrackId) -> Option<&Trajectory> {
        self.identities.get(&id).map(|record| &record.trajectory)
    }

    /// Drop every identity, e.g. before a new video.
    pub fn clear(&mut self) {
        self.identities.clear();
    }

    fn next_id(&self) -> TrackId {
        self.identities
            .last_key_value()
            .map_or(0, |(&id, _)| id + 1)
    }

    fn near_rim(&self, point: &Point, rim: &Rect) -> bool {
        rim.expand(self.config.rim_margin_x, self.config.rim_margin_y)
            .contains(point.x, point.y)
    }

    /// Absorb one frame of ball centers.
    ///
    /// Detections are associated in order, so a ball created by an earlier
    /// detection can be matched by a later one in the same frame. Balls that
    /// left through the bottom of the frame stay until [`BallTracker::drop_exited`].
    pub fn update(&mut self, detections: &[Point], rim: &Rect) -> TrackerUpdate {
        let mut update = TrackerUpdate::default();

        for center in detections {
            if let Some((id, dist)) = matching::nearest_identity(
                &self.identities,
                center,
                self.config.max_association_distance,
            ) {
                if let Some(record) = self.identities.get_mut(&id) {
                    record.observe(*center, self.config.smoothing_alpha);
                }
                debug!(id, dist, "ball matched");
                update.present.insert(id);
                continue;
            }

            let id = self.next_id();
            let record = match self.reattach.find_candidate(&self.identities, center, rim) {
                Some(old_id) => match self.identities.remove(&old_id) {
                    Some(old) => {
                        debug!(from = old_id, to = id, state = ?old.state, "ball reattached");
                        update.reattached.push(Reattachment { from: old_id, to: id });
                        old.reattach(*center)
                    }
                    None => IdentityRecord::new(*center, self.config.trajectory_capacity),
                },
                None => {
                    debug!(id, x = center.x, y = center.y, "new ball");
                    IdentityRecord::new(*center, self.config.trajectory_capacity)
                }
            };
            self.identities.insert(id, record);
            update.created.push(id);
            update.present.insert(id);
        }

        self.age_missing(rim, &mut update);
        update
    }

    fn age_missing(&mut self, rim: &Rect, update: &mut TrackerUpdate) {
        let config = &self.config;
        let near_rim: BTreeSet<TrackId> = self
            .identities
            .iter()
            .filter(|(id, _)| !update.present.contains(*id))
            .filter(|(_, record)| record.last_point().is_some_and(|p| self.near_rim(p, rim)))
            .map(|(&id, _)| id)
            .collect();

        let present = &update.present;
        let expired = &mut update.expired;
        self.identities.retain(|&id, record| {
            if !present.contains(&id) {
                record.missing_frames += 1;
                let near = near_rim.contains(&id);
                if near && record.missing_frames <= config.max_extrapolated_frames {
                    record.extrapolate(config.min_extrapolation_points);
                }
                let limit = if near {
                    config.max_missing_frames_near_rim
                } else {
                    config.max_missing_frames
                };
                if record.missing_frames > limit {
                    debug!(id, missing = record.missing_frames, near_rim = near, "ball expired");
                    expired.push(id);
                    return false;
                }
            }
            record.refresh_velocity();
            true
        });
    }

    /// Drop identities whose last point is within `exit_margin` of the frame bottom.
    ///
    /// Runs after the frame's shot evaluation so a ball scoring on its way out
    /// is still counted.
    pub fn drop_exited(&mut self, frame_height: f32) -> Vec<TrackId> {
        let floor = frame_height - self.config.exit_margin;
        let mut exited = Vec::new();
        self.identities.retain(|&id, record| {
            let gone = record.last_point().is_some_and(|p| p.y > floor);
            if gone {
                debug!(id, "ball left the frame");
                exited.push(id);
            }
            !gone
        });
        exited
    }
}
