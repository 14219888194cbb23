//! Bounded point history for one ball identity.

use std::collections::VecDeque;

use nalgebra::Vector2;

use super::Point;

/// Time-ordered positions of one ball, oldest first.
///
/// Holds at most `capacity` points; pushing onto a full trajectory evicts
/// the oldest one.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    points: VecDeque<Point>,
    capacity: usize,
}

impl Trajectory {
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a trajectory from `points`, keeping only the newest `capacity`.
    pub fn from_points(points: impl IntoIterator<Item = Point>, capacity: usize) -> Self {
        let mut trajectory = Self::with_capacity(capacity);
        trajectory.extend(points);
        trajectory
    }

    #[inline]
    pub fn push(&mut self, point: Point) -> Option<Point> {
        if self.capacity == 0 {
            return Some(point);
        }
        let evicted = if self.is_full() {
            self.points.pop_front()
        } else {
            None
        };
        self.points.push_back(point);
        evicted
    }

    pub fn extend(&mut self, points: impl IntoIterator<Item = Point>) {
        for point in points {
            self.push(point);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.points.len() >= self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Point at `index`, counted from the oldest.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Point> {
        self.points.get(index)
    }

    /// Most recent point.
    #[inline]
    pub fn last(&self) -> Option<&Point> {
        self.points.back()
    }

    /// Displacement between the two most recent points.
    pub fn last_step(&self) -> Option<Vector2<f32>> {
        let n = self.points.len();
        if n < 2 {
            return None;
        }
        Some(self.points[n - 1] - self.points[n - 2])
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Point> + ExactSizeIterator + '_ {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<Point> {
        self.points.iter().copied().collect()
    }
}
