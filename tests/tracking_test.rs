use shot_tracker::{BallTracker, Point, Rect, ShotState, TrackerConfig};

const FRAME_HEIGHT: f32 = 720.0;

fn rim() -> Rect {
    Rect::from_tlbr(300.0, 200.0, 360.0, 220.0)
}

#[test]
fn test_basic_tracking() {
    let mut tracker = BallTracker::new(TrackerConfig::default());

    // Frame 1: One detection
    let update1 = tracker.update(&[Point::new(100.0, 400.0)], &rim());
    assert_eq!(update1.created, vec![0]);

    // Frame 2: Same ball moved slightly
    let update2 = tracker.update(&[Point::new(130.0, 380.0)], &rim());
    assert!(update2.created.is_empty());
    assert!(update2.present.contains(&0)); // ID should persist

    // Frame 3: Ball not detected
    let update3 = tracker.update(&[], &rim());
    assert!(update3.present.is_empty());
    assert_eq!(tracker.get(0).unwrap().missing_frames, 1);

    // Frame 4: Ball reappears within the association distance
    let update4 = tracker.update(&[Point::new(150.0, 370.0)], &rim());
    assert!(update4.present.contains(&0));
    assert_eq!(tracker.get(0).unwrap().missing_frames, 0);
    assert_eq!(tracker.len(), 1);
}

#[test]
fn test_two_balls_keep_separate_identities() {
    let mut tracker = BallTracker::default();
    for i in 0..20 {
        let t = i as f32;
        let frame = [Point::new(100.0 + 5.0 * t, 500.0), Point::new(900.0 - 5.0 * t, 300.0)];
        tracker.update(&frame, &rim());
    }
    assert_eq!(tracker.len(), 2);
    let left = tracker.trajectory(0).unwrap().last().unwrap();
    let right = tracker.trajectory(1).unwrap().last().unwrap();
    assert!(left.x < 250.0 && (left.y - 500.0).abs() < 1e-3);
    assert!(right.x > 750.0 && (right.y - 300.0).abs() < 1e-3);
}

#[test]
fn test_records_stay_bounded_and_consistent() {
    let mut tracker = BallTracker::default();
    for i in 0..200u32 {
        let t = i as f32;
        // a ball that sometimes drops out and one that appears every few frames
        let mut frame = Vec::new();
        if i % 7 != 3 {
            frame.push(Point::new(200.0 + (t * 3.0) % 600.0, 300.0 + (t * 2.0) % 200.0));
        }
        if i % 4 == 0 {
            frame.push(Point::new(1000.0, 100.0 + t));
        }
        let update = tracker.update(&frame, &rim());
        for id in &update.present {
            assert!(tracker.get(*id).is_some());
        }
        let exited = tracker.drop_exited(FRAME_HEIGHT);
        for (_, record) in tracker.identities() {
            assert!(record.trajectory.len() <= 50);
            assert!(!record.trajectory.is_empty());
        }
        for id in update.expired.iter().chain(&exited) {
            assert!(tracker.get(*id).is_none());
        }
    }
}

#[test]
fn test_new_id_is_one_past_largest_live_id() {
    let mut tracker = BallTracker::default();
    tracker.update(&[Point::new(50.0, 100.0), Point::new(1200.0, 100.0)], &rim());

    // id 1 goes missing far from the rim and expires after ten frames
    let mut expired = Vec::new();
    for _ in 0..11 {
        let update = tracker.update(&[Point::new(50.0, 100.0)], &rim());
        expired.extend(update.expired);
    }
    assert_eq!(expired, vec![1]);

    let frame = [Point::new(50.0, 100.0), Point::new(600.0, 650.0)];
    let update = tracker.update(&frame, &rim());
    assert_eq!(update.created, vec![1]);
    assert_eq!(tracker.get(1).unwrap().state, ShotState::Init);
    assert_eq!(tracker.get(1).unwrap().trajectory.len(), 1);
}
