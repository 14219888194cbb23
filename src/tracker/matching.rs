//! Detector input types and nearest-neighbour association.

use std::collections::BTreeMap;

use super::identity::IdentityRecord;
use super::{Point, Rect, TrackId};

/// Object classes the shot tracker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionClass {
    Ball,
    Rim,
}

impl DetectionClass {
    /// Classify a detector label such as `"Basketball"` or `"rim"`.
    ///
    /// Matching is case-insensitive on substrings; `"rim"` wins when a label
    /// contains both.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.to_lowercase();
        if label.contains("rim") {
            Some(DetectionClass::Rim)
        } else if label.contains("ball") {
            Some(DetectionClass::Ball)
        } else {
            None
        }
    }
}

/// Detection input for the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub class: DetectionClass,
    /// Bounding box
    pub bbox: Rect,
    /// Detection confidence score
    pub score: f32,
}

impl Detection {
    pub fn new(class: DetectionClass, x1: f32, y1: f32, x2: f32, y2: f32, score: f32) -> Self {
        Self {
            class,
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
            score,
        }
    }

    pub fn from_rect(class: DetectionClass, bbox: Rect, score: f32) -> Self {
        Self { class, bbox, score }
    }

    pub fn center(&self) -> Point {
        let (cx, cy) = self.bbox.center();
        Point::new(cx, cy)
    }
}

/// Live identity whose last point is closest to `center`, within `max_distance`.
///
/// On exact ties the first identity in id order wins.
pub fn nearest_identity(
    identities: &BTreeMap<TrackId, IdentityRecord>,
    center: &Point,
    max_distance: f32,
) -> Option<(TrackId, f32)> {
    let mut best: Option<(TrackId, f32)> = None;
    for (&id, record) in identities {
        let Some(last) = record.last_point() else {
            continue;
        };
        let dist = nalgebra::distance(last, center);
        if dist < max_distance && best.is_none_or(|(_, min)| dist < min) {
            best = Some((id, dist));
        }
    }
    best
}

/// Geometric evidence that a lost ball fell through the net and reappeared.
#[derive(Debug, Clone)]
pub struct ReattachRule {
    pub max_missing: u32,
    pub max_distance: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    pub above_rim: f32,
    pub below_rim: f32,
}

impl ReattachRule {
    /// Whether a ball last seen at `old` can continue at `new`.
    pub fn accepts(&self, old: &Point, new: &Point, rim: &Rect) -> bool {
        if nalgebra::distance(old, new) >= self.max_distance {
            return false;
        }
        if !rim.expand(self.margin_x, self.margin_y).contains(new.x, new.y) {
            return false;
        }
        let (_, rim_center_y) = rim.center();
        let old_in_rim =
            rim.top() - self.above_rim <= old.y && old.y <= rim.bottom() + self.below_rim;
        old_in_rim && new.y >= rim_center_y
    }

    /// First recently lost identity, in id order, that `center` can continue.
    pub fn find_candidate(
        &self,
        identities: &BTreeMap<TrackId, IdentityRecord>,
        center: &Point,
        rim: &Rect,
    ) -> Option<TrackId> {
        identities
            .iter()
            .filter(|(_, record)| (1..=self.max_missing).contains(&record.missing_frames))
            .find(|(_, record)| {
                record
                    .last_point()
                    .is_some_and(|old| self.accepts(old, center, rim))
            })
            .map(|(&id, _)| id)
    }
}
