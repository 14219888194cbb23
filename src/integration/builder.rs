//! Builder for creating Detection objects from various input formats.

use crate::tracker::{Detection, DetectionClass, Rect};

/// Builder for creating `Detection` objects from various input formats.
#[derive(Debug, Clone)]
pub struct DetectionBuilder {
    class: DetectionClass,
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    score: f32,
}

impl Default for DetectionBuilder {
    fn default() -> Self {
        Self {
            class: DetectionClass::Ball,
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
            score: 0.0,
        }
    }
}

impl DetectionBuilder {
    /// Create a new ball detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ball() -> Self {
        Self::new().class(DetectionClass::Ball)
    }

    /// Rim detection; rims are accepted regardless of score.
    pub fn rim() -> Self {
        Self::new().class(DetectionClass::Rim).score(1.0)
    }

    pub fn class(mut self, class: DetectionClass) -> Self {
        self.class = class;
        self
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - w / 2.0;
        self.y1 = cy - h / 2.0;
        self.x2 = cx + w / 2.0;
        self.y2 = cy + h / 2.0;
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::from_rect(
            self.class,
            Rect::from_tlbr(self.x1, self.y1, self.x2, self.y2),
            self.score,
        )
    }
}
