//! Contracts for the external detector and frame source.

use crate::tracker::{Detection, DetectionClass, Rect};

/// Trait for object detection inference backends.
///
/// Implement this trait to connect a ball/rim detection model to the shot
/// tracker. The tracker applies its own confidence threshold to balls, so
/// implementations should return everything above their own floor.
///
/// # Example
///
/// ```ignore
/// use shot_tracker::{DetectionSource, Detection};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(
///         &mut self,
///         input: &[u8],
///         width: u32,
///         height: u32,
///     ) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on raw image data and return detections.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `Detection`.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

/// One labelled box as emitted by a YOLO-style model.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBox {
    pub label: String,
    pub score: f32,
    /// [x1, y1, x2, y2]
    pub tlbr: [f32; 4],
}

impl IntoDetections for Vec<LabeledBox> {
    /// Boxes whose label is neither a ball nor a rim are dropped.
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter()
            .filter_map(|b| {
                let class = DetectionClass::from_label(&b.label)?;
                let [x1, y1, x2, y2] = b.tlbr;
                Some(Detection::from_rect(class, Rect::from_tlbr(x1, y1, x2, y2), b.score))
            })
            .collect()
    }
}

/// One decoded video frame.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Stream properties the tracker needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub frame_rate: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for VideoInfo {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            width: 1280,
            height: 720,
        }
    }
}

/// A finite or unbounded sequence of frames, pulled one at a time.
pub trait FrameSource {
    type Error;

    fn video_info(&self) -> VideoInfo;

    /// Next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<Frame>, Self::Error>;
}
