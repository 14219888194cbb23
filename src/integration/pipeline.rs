//! ShotPipeline: the per-frame composition root.

use tracing::{debug, info, trace};

use crate::config::ShotTrackerConfig;
use crate::error::{BoxError, Error, Result};
use crate::session::{SessionSnapshot, SessionTotals};
use crate::tracker::{
    BallTracker, Detection, DetectionClass, Point, Rect, ShotEvent, ShotStateMachine, TrackId,
    TrackerUpdate,
};

use super::{DetectionSource, Frame, FrameSource, VideoInfo};

/// Everything a renderer or caller may want to know about one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// 1-based index of the frame
    pub frame_index: u64,
    /// Rim box in use, possibly carried over from an earlier frame
    pub rim: Option<Rect>,
    /// Ball centers that passed the confidence threshold
    pub balls: Vec<Point>,
    /// False when the frame was skipped because no rim has been seen yet
    pub scored: bool,
    pub update: TrackerUpdate,
    pub trajectories: Vec<(TrackId, Vec<Point>)>,
    pub events: Vec<ShotEvent>,
    pub snapshot: SessionSnapshot,
}

/// Drives detector -> tracker -> state machine -> session for one video.
///
/// Frames must be fed in order; each one is fully absorbed before the next.
pub struct ShotPipeline<D: DetectionSource> {
    detector: D,
    tracker: BallTracker,
    machine: ShotStateMachine,
    session: SessionTotals,
    confidence_threshold: f32,
    video: VideoInfo,
    rim: Option<Rect>,
    frame_index: u64,
}

impl<D: DetectionSource> ShotPipeline<D> {
    pub fn new(detector: D, config: &ShotTrackerConfig, video: VideoInfo) -> Self {
        Self {
            detector,
            tracker: BallTracker::new(config.tracker.clone()),
            machine: ShotStateMachine::new(&config.shot, video.frame_rate),
            session: SessionTotals::new(),
            confidence_threshold: config.confidence_threshold,
            video,
            rim: None,
            frame_index: 0,
        }
    }

    pub fn with_default_config(detector: D, video: VideoInfo) -> Self {
        Self::new(detector, &ShotTrackerConfig::default(), video)
    }

    /// Run the detector on `frame` and absorb its detections.
    pub fn process_frame(&mut self, frame: &Frame) -> Result<FrameOutput>
    where
        D::Error: Into<BoxError>,
    {
        let detections = self
            .detector
            .detect(&frame.data, frame.width, frame.height)
            .map_err(|e| Error::Detector {
                frame: self.frame_index + 1,
                source: e.into(),
            })?;
        Ok(self.absorb(detections))
    }

    /// Absorb one frame of detections that were produced elsewhere.
    pub fn absorb(&mut self, detections: Vec<Detection>) -> FrameOutput {
        self.frame_index += 1;
        let frame_index = self.frame_index;

        let mut balls = Vec::new();
        for detection in detections {
            match detection.class {
                DetectionClass::Rim => self.rim = Some(detection.bbox),
                DetectionClass::Ball if detection.score > self.confidence_threshold => {
                    balls.push(detection.center());
                }
                DetectionClass::Ball => {}
            }
        }

        let Some(rim) = self.rim else {
            debug!(frame = frame_index, balls = balls.len(), "no rim seen yet, frame skipped");
            return FrameOutput {
                frame_index,
                rim: None,
                balls,
                scored: false,
                update: TrackerUpdate::default(),
                trajectories: self.trajectories(),
                events: Vec::new(),
                snapshot: self.session.snapshot(),
            };
        };

        let mut update = self.tracker.update(&balls, &rim);
        let events = self.machine.evaluate(&mut self.tracker, &rim, frame_index);
        self.session.absorb(&events);
        update.exited = self.tracker.drop_exited(self.video.height as f32);

        trace!(
            frame = frame_index,
            balls = balls.len(),
            live = self.tracker.len(),
            events = events.len(),
            "frame absorbed"
        );

        FrameOutput {
            frame_index,
            rim: Some(rim),
            balls,
            scored: true,
            update,
            trajectories: self.trajectories(),
            events,
            snapshot: self.session.snapshot(),
        }
    }

    fn trajectories(&self) -> Vec<(TrackId, Vec<Point>)> {
        self.tracker
            .identities()
            .map(|(id, record)| (id, record.trajectory.to_vec()))
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    pub fn session(&self) -> &SessionTotals {
        &self.session
    }

    pub fn rim(&self) -> Option<&Rect> {
        self.rim.as_ref()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn video_info(&self) -> &VideoInfo {
        &self.video
    }

    /// Get a reference to the underlying tracker.
    pub fn tracker(&self) -> &BallTracker {
        &self.tracker
    }

    pub fn machine(&self) -> &ShotStateMachine {
        &self.machine
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Forget all identities, the rim and the totals before a new run.
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.session.reset();
        self.rim = None;
        self.frame_index = 0;
    }

    /// Final totals for the run.
    pub fn finish(&self) -> SessionSnapshot {
        let snapshot = self.session.snapshot();
        info!(
            frames = self.frame_index,
            fgm = snapshot.fgm,
            fga = snapshot.fga,
            misses = self.session.misses(),
            "run finished"
        );
        snapshot
    }
}

/// Run a whole stream through a fresh pipeline and return the final totals.
pub fn process_video<D, S>(
    detector: D,
    source: &mut S,
    config: &ShotTrackerConfig,
) -> Result<SessionSnapshot>
where
    D: DetectionSource,
    D::Error: Into<BoxError>,
    S: FrameSource,
    S::Error: Into<BoxError>,
{
    config.validate()?;
    let video = source.video_info();
    info!(
        frame_rate = video.frame_rate,
        width = video.width,
        height = video.height,
        "processing video"
    );

    let mut pipeline = ShotPipeline::new(detector, config, video);
    while let Some(frame) = source
        .next_frame()
        .map_err(|e| Error::FrameSource(e.into()))?
    {
        pipeline.process_frame(&frame)?;
    }
    Ok(pipeline.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::DetectionBuilder;

    struct MockDetector {
        detections: Vec<Detection>,
    }

    impl DetectionSource for MockDetector {
        type Error = std::convert::Infallible;

        fn detect(
            &mut self,
            _input: &[u8],
            _width: u32,
            _height: u32,
        ) -> std::result::Result<Vec<Detection>, Self::Error> {
            Ok(self.detections.clone())
        }
    }

    fn ball(cx: f32, cy: f32, score: f32) -> Detection {
        DetectionBuilder::ball().xywh(cx, cy, 20.0, 20.0).score(score).build()
    }

    fn rim() -> Detection {
        DetectionBuilder::rim().tlbr(300.0, 200.0, 360.0, 220.0).build()
    }

    #[test]
    fn test_skips_frames_without_rim() {
        let detector = MockDetector {
            detections: vec![ball(330.0, 150.0, 0.9)],
        };
        let mut pipeline = ShotPipeline::with_default_config(detector, VideoInfo::default());
        let output = pipeline.process_frame(&Frame::default()).unwrap();

        assert_eq!(output.frame_index, 1);
        assert!(!output.scored);
        assert_eq!(output.balls.len(), 1);
        assert!(pipeline.tracker().is_empty());
    }

    #[test]
    fn test_rim_persists_and_threshold_applies() {
        let mut pipeline = ShotPipeline::with_default_config(
            MockDetector { detections: vec![] },
            VideoInfo::default(),
        );
        let first = pipeline.absorb(vec![rim(), ball(100.0, 400.0, 0.9)]);
        assert!(first.scored);
        assert_eq!(first.update.created, vec![0]);

        // no rim this frame; the previous one is reused
        let second = pipeline.absorb(vec![ball(600.0, 400.0, 0.35), ball(105.0, 400.0, 0.36)]);
        assert!(second.scored);
        assert_eq!(second.rim, first.rim);
        assert_eq!(second.balls, vec![Point::new(105.0, 400.0)]);
        assert_eq!(second.update.present.len(), 1);
        assert_eq!(second.trajectories.len(), 1);
        assert_eq!(second.trajectories[0].1.len(), 2);
    }

    #[test]
    fn test_last_rim_wins() {
        let mut pipeline = ShotPipeline::with_default_config(
            MockDetector { detections: vec![] },
            VideoInfo::default(),
        );
        let other = DetectionBuilder::rim().tlbr(800.0, 200.0, 860.0, 220.0).build();
        let output = pipeline.absorb(vec![rim(), other]);
        assert_eq!(output.rim, Some(Rect::from_tlbr(800.0, 200.0, 860.0, 220.0)));
    }

    #[test]
    fn test_reset() {
        let mut pipeline = ShotPipeline::with_default_config(
            MockDetector { detections: vec![] },
            VideoInfo::default(),
        );
        pipeline.absorb(vec![rim(), ball(100.0, 400.0, 0.9)]);
        pipeline.reset();
        assert_eq!(pipeline.frame_index(), 0);
        assert!(pipeline.rim().is_none());
        assert!(pipeline.tracker().is_empty());
        assert_eq!(pipeline.snapshot(), SessionSnapshot::default());
    }
}
