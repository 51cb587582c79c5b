use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Output of [`Matcher::step`](crate::Matcher::step), consumed by display and
/// animation collaborators. Trick fields carry catalog indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Event {
    AnalogUpdated { position: Vec2 },
    WaypointReached { trick: usize, depth: usize },
    /// Direction of the most recent waypoint hit, or the origin after a reset.
    LastHitPositionChanged { position: Vec2 },
    /// Where the stick has to go next when only one candidate is left.
    NextWaypoint { trick: usize, position: Vec2 },
    TrickEligible { trick: usize },
    /// `duration` is `None` when the duration table had no entry for the trick.
    TrickExecuted { trick: usize, duration: Option<f32> },
    NoAnimationFound { trick: usize },
    TrickAnimationDone { trick: usize },
    /// Candidate queue ran dry without any trick reaching full depth.
    AttemptExhausted,
}

impl Event {
    pub fn trick(&self) -> Option<usize> {
        match *self {
            Event::WaypointReached { trick, .. }
            | Event::NextWaypoint { trick, .. }
            | Event::TrickEligible { trick }
            | Event::TrickExecuted { trick, .. }
            | Event::NoAnimationFound { trick }
            | Event::TrickAnimationDone { trick } => Some(trick),
            Event::AnalogUpdated { .. }
            | Event::LastHitPositionChanged { .. }
            | Event::AttemptExhausted => None,
        }
    }
}
