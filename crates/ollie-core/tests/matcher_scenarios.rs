use std::sync::Arc;

use ollie_core::{
    Catalog, Event, Matcher, MatcherConfig, Phase, ScanMode, TrickDef, Vec2, Waypoint,
    WaypointDef,
};

fn config() -> MatcherConfig {
    MatcherConfig {
        minimum_required_dot: 0.6,
        exec_distance: 0.1,
        deadzone: 0.05,
        ..MatcherConfig::default()
    }
}

fn matcher_with(defs: Vec<TrickDef>, config: MatcherConfig, durations: Vec<f32>) -> Matcher<Vec<f32>> {
    let catalog = Catalog::load_lenient(defs);
    Matcher::new(Arc::new(catalog), config, durations)
}

fn matcher(defs: Vec<TrickDef>) -> Matcher<Vec<f32>> {
    matcher_with(defs, config(), Vec::new())
}

fn kickflip() -> TrickDef {
    TrickDef::new("Kickflip", vec![WaypointDef::snap(0), WaypointDef::snap(90)])
}

fn executed(events: &[Event]) -> Vec<usize> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::TrickExecuted { trick, .. } => Some(*trick),
            _ => None,
        })
        .collect()
}

fn rim(angle: f32) -> Vec2 {
    Vec2::from_angle(angle.to_radians())
}

const DT: f32 = 1.0 / 60.0;

#[test]
fn test_kickflip_executes() {
    let mut m = matcher(vec![kickflip()]);

    let events = m.step(Vec2::new(1.0, 0.0), DT);
    assert_eq!(
        events[..3],
        [
            Event::AnalogUpdated { position: Vec2::new(1.0, 0.0) },
            Event::WaypointReached { trick: 0, depth: 1 },
            Event::LastHitPositionChanged { position: Vec2::new(1.0, 0.0) },
        ]
    );
    assert_eq!(
        events[3],
        Event::NextWaypoint {
            trick: 0,
            position: Waypoint::new(90, false).direction()
        }
    );
    assert_eq!(m.depth(), 1);
    assert!(m.in_safezone());
    assert!(m.is_dragging());

    let events = m.step(Vec2::new(0.0, 1.0), DT);
    assert!(events.contains(&Event::WaypointReached { trick: 0, depth: 2 }));
    assert!(events.contains(&Event::TrickEligible { trick: 0 }));
    assert!(events.contains(&Event::NoAnimationFound { trick: 0 }));
    assert_eq!(executed(&events), vec![0]);
    assert_eq!(
        events.last(),
        Some(&Event::LastHitPositionChanged { position: Vec2::ZERO })
    );

    assert_eq!(m.depth(), 0);
    assert_eq!(m.candidates(), &[0]);
    assert_eq!(m.eligible(), None);
    assert_eq!(m.last_hit_position(), Vec2::ZERO);
    assert!(m.is_returning_to_origin());
    assert_eq!(m.phase(), Phase::Tracking);
}

#[test]
fn test_shared_first_waypoint_diverging_second() {
    let mut m = matcher(vec![
        TrickDef::new("Up", vec![WaypointDef::snap(0), WaypointDef::snap(90)]),
        TrickDef::new("Back", vec![WaypointDef::snap(0), WaypointDef::snap(180)]),
    ]);

    let events = m.step(Vec2::new(1.0, 0.0), DT);
    assert!(events.contains(&Event::WaypointReached { trick: 0, depth: 1 }));
    assert_eq!(m.candidates(), &[0, 1]);
    assert!(!events.iter().any(|e| matches!(e, Event::NextWaypoint { .. })));

    let events = m.step(Vec2::new(-1.0, 0.0), DT);
    assert!(events.contains(&Event::WaypointReached { trick: 1, depth: 2 }));
    assert!(events.contains(&Event::TrickEligible { trick: 1 }));
    assert_eq!(executed(&events), vec![1]);
    assert_eq!(m.candidates(), &[0, 1]);
}

#[test]
fn test_off_course_prunes_and_exhausts() {
    let mut m = matcher(vec![kickflip()]);
    m.step(Vec2::new(1.0, 0.0), DT);

    let events = m.step(Vec2::new(0.0, -1.0), DT);
    assert!(events.contains(&Event::AttemptExhausted));
    assert!(executed(&events).is_empty());
    assert_eq!(m.depth(), 0);
    assert_eq!(m.candidates(), &[0]);
    assert!(m.is_returning_to_origin());
}

#[test]
fn test_must_return_to_origin_after_attempt() {
    let mut m = matcher(vec![kickflip()]);
    m.step(Vec2::new(1.0, 0.0), DT);
    m.step(Vec2::new(0.0, -1.0), DT);

    let events = m.step(Vec2::new(1.0, 0.0), DT);
    assert_eq!(events, vec![Event::AnalogUpdated { position: Vec2::new(1.0, 0.0) }]);
    assert_eq!(m.depth(), 0);
    assert!(m.is_returning_to_origin());

    let rest = Vec2::new(0.01, 0.0);
    let events = m.step(rest, DT);
    assert_eq!(events, vec![Event::AnalogUpdated { position: rest }]);
    assert!(!m.is_returning_to_origin());

    let events = m.step(rest, DT);
    assert_eq!(events, vec![Event::AnalogUpdated { position: rest }]);
    assert_eq!(m.depth(), 0);
    assert_eq!(m.candidates(), &[0]);
    assert_eq!(m.eligible(), None);

    let events = m.step(Vec2::new(1.0, 0.0), DT);
    assert!(events.contains(&Event::WaypointReached { trick: 0, depth: 1 }));
}

#[test]
fn test_safezone_suspends_pruning() {
    let mut m = matcher(vec![kickflip()]);
    m.step(Vec2::new(1.0, 0.0), DT);

    let events = m.step(Vec2::new(0.9, -0.1), DT);
    assert_eq!(events.len(), 1);
    assert!(m.in_safezone());
    assert_eq!(m.candidates(), &[0]);

    let events = m.step(Vec2::new(0.8, -0.6), DT);
    assert!(events.contains(&Event::AttemptExhausted));
    assert!(!m.in_safezone());
}

#[test]
fn test_stick_at_rest_keeps_attempt_alive() {
    let mut m = matcher(vec![kickflip()]);
    m.step(Vec2::new(1.0, 0.0), DT);

    let events = m.step(Vec2::ZERO, DT);
    assert_eq!(events, vec![Event::AnalogUpdated { position: Vec2::ZERO }]);
    assert_eq!(m.depth(), 1);
    assert_eq!(m.candidates(), &[0]);
    assert!(!m.is_dragging());
}

#[test]
fn test_drag_waypoint_requires_rim() {
    let drag = || TrickDef::new("Hardflip", vec![WaypointDef::snap(0), WaypointDef::drag(90)]);

    let mut m = matcher(vec![drag()]);
    m.step(Vec2::new(1.0, 0.0), DT);
    let events = m.step(Vec2::new(0.5, 0.5), DT);
    assert!(events.contains(&Event::AttemptExhausted));
    assert_eq!(m.depth(), 0);

    let mut m = matcher(vec![drag()]);
    m.step(Vec2::new(1.0, 0.0), DT);
    let events = m.step(rim(45.0), DT);
    assert!(m.is_dragging());
    assert_eq!(m.depth(), 1);
    assert_eq!(events.len(), 1);
    let events = m.step(rim(90.0), DT);
    assert_eq!(executed(&events), vec![0]);
}

#[test]
fn test_first_change_scan_reaches_later_candidates() {
    let defs = || {
        vec![
            TrickDef::new("Nollie", vec![WaypointDef::snap(90)]),
            TrickDef::new("Fakie", vec![WaypointDef::snap(0)]),
        ]
    };

    let mut m = matcher(defs());
    let events = m.step(Vec2::new(1.0, 0.0), DT);
    assert_eq!(executed(&events), vec![1]);

    let head_only = MatcherConfig {
        scan: ScanMode::HeadOnly,
        ..config()
    };
    let mut m = matcher_with(defs(), head_only, Vec::new());
    let events = m.step(Vec2::new(1.0, 0.0), DT);
    assert_eq!(events.len(), 1);
    assert_eq!(m.depth(), 0);
    let events = m.step(Vec2::new(0.0, 1.0), DT);
    assert_eq!(executed(&events), vec![0]);
}

#[test]
fn test_sweep_drops_diverged_siblings() {
    let mut m = matcher(vec![
        kickflip(),
        TrickDef::new("Heelflip", vec![WaypointDef::snap(180), WaypointDef::snap(90)]),
    ]);
    let events = m.step(Vec2::new(1.0, 0.0), DT);
    assert_eq!(m.candidates(), &[0]);
    assert!(events.iter().any(|e| matches!(e, Event::NextWaypoint { trick: 0, .. })));
}

#[test]
fn test_equivalent_angles_share_waypoint() {
    let mut m = matcher(vec![
        kickflip(),
        TrickDef::new("Varial", vec![WaypointDef::snap(360), WaypointDef::snap(180)]),
    ]);
    m.step(Vec2::new(1.0, 0.0), DT);
    assert_eq!(m.candidates(), &[0, 1]);
}

#[test]
fn test_complete_short_trick_waits_for_longer_sibling() {
    let defs = || {
        vec![
            TrickDef::new("Pop", vec![WaypointDef::snap(0)]),
            TrickDef::new("PopShuvit", vec![WaypointDef::snap(0), WaypointDef::snap(90)]),
        ]
    };

    let mut m = matcher(defs());
    let events = m.step(Vec2::new(1.0, 0.0), DT);
    assert!(events.contains(&Event::TrickEligible { trick: 0 }));
    assert!(executed(&events).is_empty());
    assert_eq!(m.eligible(), Some(0));
    assert_eq!(m.candidates(), &[1]);

    let events = m.step(Vec2::new(0.0, 1.0), DT);
    assert_eq!(executed(&events), vec![1]);

    let mut m = matcher(defs());
    m.step(Vec2::new(1.0, 0.0), DT);
    let events = m.step(Vec2::new(0.0, -1.0), DT);
    assert_eq!(executed(&events), vec![0]);
    assert!(!events.contains(&Event::AttemptExhausted));
}

#[test]
fn test_animation_phase_ignores_input() {
    let mut m = matcher_with(vec![kickflip()], config(), vec![0.5]);
    m.step(Vec2::new(1.0, 0.0), DT);
    let events = m.step(Vec2::new(0.0, 1.0), DT);
    assert!(events.contains(&Event::TrickExecuted {
        trick: 0,
        duration: Some(0.5)
    }));
    assert_eq!(m.phase(), Phase::Executing);

    assert!(m.step(Vec2::new(1.0, 0.0), 0.2).is_empty());
    assert!((m.elapsed() - 0.2).abs() < 1e-6);
    let progress = m.animation_progress().unwrap();
    assert_eq!(progress.trick, 0);
    assert_eq!(progress.duration, 0.5);

    assert!(m.step(Vec2::new(1.0, 0.0), 0.2).is_empty());
    let events = m.step(Vec2::new(1.0, 0.0), 0.2);
    assert_eq!(events, vec![Event::TrickAnimationDone { trick: 0 }]);
    assert_eq!(m.phase(), Phase::Tracking);
    assert_eq!(m.elapsed(), 0.0);
    assert!(m.is_returning_to_origin());
}

#[test]
fn test_unplayable_trick_never_candidate() {
    let mut m = matcher(vec![TrickDef::new("Nothing", vec![]), kickflip()]);
    assert_eq!(m.candidates(), &[1]);
    m.step(Vec2::new(1.0, 0.0), DT);
    let events = m.step(Vec2::new(0.0, 1.0), DT);
    assert_eq!(executed(&events), vec![1]);
    assert_eq!(m.candidates(), &[1]);
}

#[test]
fn test_reset_rearms_without_executing() {
    let mut m = matcher_with(vec![kickflip()], config(), vec![1.0]);
    m.step(Vec2::new(1.0, 0.0), DT);
    assert_eq!(m.depth(), 1);

    m.reset();
    assert_eq!(m.depth(), 0);
    assert_eq!(m.last_hit_position(), Vec2::ZERO);
    assert!(!m.is_returning_to_origin());
    assert!(!m.in_safezone());

    let events = m.step(Vec2::new(1.0, 0.0), DT);
    assert!(events.contains(&Event::WaypointReached { trick: 0, depth: 1 }));
}

#[test]
fn test_matchers_share_catalog() {
    let catalog = Arc::new(Catalog::load(vec![kickflip()]).unwrap());
    let mut first = Matcher::new(Arc::clone(&catalog), config(), vec![0.3]);
    let mut second = Matcher::new(Arc::clone(&catalog), config(), vec![0.3]);

    first.step(Vec2::new(1.0, 0.0), DT);
    assert_eq!(first.depth(), 1);
    assert_eq!(second.depth(), 0);

    second.step(Vec2::new(0.0, 1.0), DT);
    assert_eq!(second.depth(), 0);
    assert!(Arc::ptr_eq(first.catalog(), second.catalog()));
}
