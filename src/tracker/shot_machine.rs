//! Per-identity shot classification.
//!
//! Runs after the tracker each frame. An identity goes `Init -> Attempting`
//! when it enters the ascent zone heading toward the rim, and resolves to
//! `Made` or `Missed` once it drops into the descent zone, depending on
//! where its path crossed the rim plane. Every counted event restarts the
//! identity's cooldown, which gates all three event kinds.

use tracing::info;

use crate::config::{ShotConfig, UnattemptedMake};
use crate::tracker::geometry::ShotGeometry;
use crate::tracker::identity::IdentityRecord;
use crate::tracker::shot_state::{ShotEvent, ShotEventKind, ShotState};
use crate::tracker::{BallTracker, Rect, TrackId};

#[derive(Debug, Clone)]
pub struct ShotStateMachine {
    geometry: ShotGeometry,
    cooldown_frames: u64,
    min_trajectory_points: usize,
    unattempted_make: UnattemptedMake,
}

impl ShotStateMachine {
    pub fn new(config: &ShotConfig, frame_rate: f32) -> Self {
        Self {
            geometry: ShotGeometry::from_config(config),
            cooldown_frames: config.cooldown_frames(frame_rate),
            min_trajectory_points: config.min_trajectory_points,
            unattempted_make: config.unattempted_make,
        }
    }

    pub fn geometry(&self) -> &ShotGeometry {
        &self.geometry
    }

    pub fn cooldown_frames(&self) -> u64 {
        self.cooldown_frames
    }

    /// Evaluate every live identity for `frame_index` and return the events it produced.
    pub fn evaluate(
        &self,
        tracker: &mut BallTracker,
        rim: &Rect,
        frame_index: u64,
    ) -> Vec<ShotEvent> {
        let mut events = Vec::new();
        for (id, record) in tracker.identities_mut() {
            self.step(id, record, rim, frame_index, &mut events);
        }
        events
    }

    fn step(
        &self,
        id: TrackId,
        record: &mut IdentityRecord,
        rim: &Rect,
        frame_index: u64,
        events: &mut Vec<ShotEvent>,
    ) {
        if record.state.is_terminal() || record.trajectory.len() < self.min_trajectory_points {
            return;
        }
        let trajectory = &record.trajectory;

        // positive y velocity: moving down the image toward the rim
        if self.geometry.in_ascent_zone(trajectory, Some(rim))
            && record.velocity.y > 0.0
            && record.cooldown_elapsed(frame_index, self.cooldown_frames)
        {
            info!(id, frame = frame_index, "shot attempt");
            events.push(ShotEvent::new(id, ShotEventKind::Attempt, frame_index));
            record.mark_event(frame_index);
            record.state = ShotState::Attempting;
        }

        let trajectory = &record.trajectory;
        if !self.geometry.in_descent_zone(trajectory, Some(rim))
            || !record.cooldown_elapsed(frame_index, self.cooldown_frames)
        {
            return;
        }

        if self.geometry.predict_landing(trajectory, Some(rim)) {
            let attempted = record.state == ShotState::Attempting;
            record.mark_event(frame_index);
            record.state = ShotState::Made;
            match (attempted, self.unattempted_make) {
                (false, UnattemptedMake::Suppress) => {
                    info!(id, frame = frame_index, "make without attempt suppressed");
                }
                (false, UnattemptedMake::CountAsAttempt) => {
                    info!(id, frame = frame_index, "shot made, counted as attempt");
                    events.push(ShotEvent::new(id, ShotEventKind::Attempt, frame_index));
                    events.push(ShotEvent::new(id, ShotEventKind::Make, frame_index));
                }
                _ => {
                    info!(id, frame = frame_index, "shot made");
                    events.push(ShotEvent::new(id, ShotEventKind::Make, frame_index));
                }
            }
        } else {
            info!(id, frame = frame_index, "shot missed");
            events.push(ShotEvent::new(id, ShotEventKind::Miss, frame_index));
            record.mark_event(frame_index);
            record.state = ShotState::Missed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::tracker::Point;

    const FRAME_HEIGHT: f32 = 720.0;

    fn rim() -> Rect {
        // plane at y=206, scoring window x in (309, 351), descent below y=232
        Rect::from_tlbr(300.0, 200.0, 360.0, 220.0)
    }

    fn tracker() -> BallTracker {
        BallTracker::new(TrackerConfig {
            smoothing_alpha: 0.0,
            ..TrackerConfig::default()
        })
    }

    fn machine(frame_rate: f32, policy: UnattemptedMake) -> ShotStateMachine {
        let config = ShotConfig {
            unattempted_make: policy,
            ..ShotConfig::default()
        };
        ShotStateMachine::new(&config, frame_rate)
    }

    fn run(
        tracker: &mut BallTracker,
        machine: &ShotStateMachine,
        path: &[(f32, f32)],
        first_frame: u64,
    ) -> Vec<ShotEvent> {
        let mut events = Vec::new();
        for (i, &(x, y)) in path.iter().enumerate() {
            tracker.update(&[Point::new(x, y)], &rim());
            events.extend(machine.evaluate(tracker, &rim(), first_frame + i as u64));
            tracker.drop_exited(FRAME_HEIGHT);
        }
        events
    }

    fn kinds(events: &[ShotEvent]) -> Vec<ShotEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_needs_five_points() {
        let mut tracker = tracker();
        let machine = machine(5.0, UnattemptedMake::MakeOnly);
        // inside the ascent zone and falling, but only four points
        let path = [(330.0, 150.0), (330.0, 160.0), (330.0, 170.0), (330.0, 180.0)];
        let events = run(&mut tracker, &machine, &path, 1);
        assert!(events.is_empty());
        assert_eq!(tracker.get(0).unwrap().state, ShotState::Init);
    }

    #[test]
    fn test_attempt_then_make() {
        let mut tracker = tracker();
        let machine = machine(5.0, UnattemptedMake::MakeOnly);
        assert_eq!(machine.cooldown_frames(), 3);
        let path = [
            (330.0, 100.0),
            (330.0, 120.0),
            (330.0, 140.0),
            (330.0, 160.0),
            (330.0, 180.0), // frame 5: attempt
            (330.0, 195.0),
            (330.0, 215.0),
            (330.0, 235.0),
            (330.0, 255.0), // frame 9: make
            (330.0, 275.0),
        ];
        let events = run(&mut tracker, &machine, &path, 1);
        assert_eq!(kinds(&events), vec![ShotEventKind::Attempt, ShotEventKind::Make]);
        assert_eq!(events[0].frame_index, 5);
        assert_eq!(events[1].frame_index, 9);
        assert_eq!(tracker.get(0).unwrap().state, ShotState::Made);
    }

    #[test]
    fn test_cooldown_delays_resolution() {
        let mut tracker = tracker();
        let machine = machine(5.0, UnattemptedMake::MakeOnly);
        let path = [
            (330.0, 120.0),
            (330.0, 140.0),
            (330.0, 160.0),
            (330.0, 170.0),
            (330.0, 180.0), // frame 5: attempt
            (330.0, 240.0), // frame 6: descent, cooling down
            (330.0, 250.0),
            (330.0, 260.0),
            (330.0, 270.0), // frame 9: cooldown over
        ];
        let events = run(&mut tracker, &machine, &path, 1);
        assert_eq!(kinds(&events), vec![ShotEventKind::Attempt, ShotEventKind::Make]);
        assert_eq!(events[1].frame_index, 9);
    }

    #[test]
    fn test_miss_outside_window() {
        let mut tracker = tracker();
        let machine = machine(5.0, UnattemptedMake::MakeOnly);
        let path = [
            (380.0, 100.0),
            (385.0, 120.0),
            (390.0, 140.0),
            (395.0, 160.0),
            (400.0, 180.0),
            (405.0, 200.0),
            (410.0, 220.0),
            (415.0, 240.0),
            (420.0, 260.0),
        ];
        let events = run(&mut tracker, &machine, &path, 1);
        assert_eq!(kinds(&events), vec![ShotEventKind::Attempt, ShotEventKind::Miss]);
        assert_eq!(tracker.get(0).unwrap().state, ShotState::Missed);
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut tracker = tracker();
        let machine = machine(5.0, UnattemptedMake::MakeOnly);
        let path = [
            (330.0, 100.0),
            (330.0, 120.0),
            (330.0, 140.0),
            (330.0, 160.0),
            (330.0, 180.0),
            (330.0, 215.0),
            (330.0, 240.0),
            (330.0, 260.0),
            (330.0, 280.0),
        ];
        let mut events = run(&mut tracker, &machine, &path, 1);
        // ball lingers under the rim well past the cooldown
        let lingering: Vec<(f32, f32)> = (0..30).map(|i| (330.0, 290.0 + (i % 2) as f32)).collect();
        events.extend(run(&mut tracker, &machine, &lingering, 10));
        assert_eq!(kinds(&events), vec![ShotEventKind::Attempt, ShotEventKind::Make]);
    }

    #[test]
    fn test_upward_ball_is_not_an_attempt() {
        let mut tracker = tracker();
        let machine = machine(5.0, UnattemptedMake::MakeOnly);
        let path = [(330.0, 189.0), (330.0, 185.0), (330.0, 180.0), (330.0, 175.0), (330.0, 170.0)];
        let events = run(&mut tracker, &machine, &path, 1);
        assert!(events.is_empty());
    }

    fn unattempted_make_path() -> Vec<(f32, f32)> {
        // a ball that appears just above the rim, never inside the ascent zone
        vec![(330.0, 192.0), (330.0, 198.0), (330.0, 204.0), (330.0, 212.0), (330.0, 240.0)]
    }

    #[test]
    fn test_unattempted_make_policies() {
        let cases = [
            (UnattemptedMake::MakeOnly, vec![ShotEventKind::Make]),
            (
                UnattemptedMake::CountAsAttempt,
                vec![ShotEventKind::Attempt, ShotEventKind::Make],
            ),
            (UnattemptedMake::Suppress, vec![]),
        ];
        for (policy, expected) in cases {
            let mut tracker = tracker();
            let machine = machine(30.0, policy);
            let events = run(&mut tracker, &machine, &unattempted_make_path(), 1);
            assert_eq!(kinds(&events), expected, "{policy:?}");
            assert_eq!(tracker.get(0).unwrap().state, ShotState::Made);
        }
    }
}
