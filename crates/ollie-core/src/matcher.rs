//! The trick-matching state machine.
//!
//! Each attempt starts with every playable trick as a candidate. Stick samples
//! either advance the shared waypoint depth (when a candidate's next waypoint
//! is reached) or drop candidates that no longer fit. When the queue runs dry
//! the eligible trick, if any, executes and the matcher re-arms.

use std::sync::Arc;

use glam::Vec2;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::config::{MatcherConfig, ScanMode};
use crate::durations::DurationTable;
use crate::event::Event;

/// Waypoint directions for the same angle compare equal under this tolerance.
const DIRECTION_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Tracking,
    Executing,
}

/// Where an executing trick's animation is; an animator samples its curves from this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationProgress {
    pub trick: usize,
    pub elapsed: f32,
    pub duration: f32,
}

#[derive(Debug)]
pub struct Matcher<D> {
    catalog: Arc<Catalog>,
    config: MatcherConfig,
    durations: D,
    /// Catalog indices still in play this attempt.
    candidates: Vec<usize>,
    depth: usize,
    last_hit: Vec2,
    eligible: Option<usize>,
    dragging: bool,
    in_safezone: bool,
    returning_to_origin: bool,
    animation: Option<AnimationProgress>,
}

impl<D: DurationTable> Matcher<D> {
    pub fn new(catalog: Arc<Catalog>, config: MatcherConfig, durations: D) -> Self {
        let candidates = catalog.playable_indices();
        Self {
            catalog,
            config,
            durations,
            candidates,
            depth: 0,
            last_hit: Vec2::ZERO,
            eligible: None,
            dragging: false,
            in_safezone: false,
            returning_to_origin: false,
            animation: None,
        }
    }

    /// Feed one stick sample. While a trick animation runs the sample is ignored
    /// and only `dt` counts.
    pub fn step(&mut self, sample: Vec2, dt: f32) -> Vec<Event> {
        let mut events = Vec::new();
        if self.animation.is_some() {
            self.advance_animation(dt, &mut events);
        } else {
            self.analyze(sample, &mut events);
        }
        events
    }

    /// Drop any attempt or animation in progress and return to a fresh idle state.
    pub fn reset(&mut self) {
        self.rearm();
        self.returning_to_origin = false;
        self.animation = None;
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        if self.animation.is_some() {
            Phase::Executing
        } else {
            Phase::Tracking
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn last_hit_position(&self) -> Vec2 {
        self.last_hit
    }

    pub fn candidates(&self) -> &[usize] {
        &self.candidates
    }

    pub fn eligible(&self) -> Option<usize> {
        self.eligible
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn in_safezone(&self) -> bool {
        self.in_safezone
    }

    pub fn is_returning_to_origin(&self) -> bool {
        self.returning_to_origin
    }

    pub fn elapsed(&self) -> f32 {
        self.animation.map_or(0.0, |a| a.elapsed)
    }

    pub fn animation_progress(&self) -> Option<AnimationProgress> {
        self.animation
    }

    fn advance_animation(&mut self, dt: f32, events: &mut Vec<Event>) {
        let Some(animation) = self.animation.as_mut() else {
            return;
        };
        animation.elapsed += dt;
        if animation.elapsed >= animation.duration {
            debug!(trick = animation.trick, "trick animation done");
            events.push(Event::TrickAnimationDone {
                trick: animation.trick,
            });
            self.animation = None;
        }
    }

    fn analyze(&mut self, sample: Vec2, events: &mut Vec<Event>) {
        events.push(Event::AnalogUpdated { position: sample });
        let magnitude = sample.length();

        // After an attempt the stick has to settle in the deadzone first.
        if self.returning_to_origin {
            if magnitude > self.config.deadzone {
                return;
            }
            self.returning_to_origin = false;
        }

        if self.in_safezone
            && sample.distance(self.last_hit) >= 2.0 * self.config.exec_distance
        {
            self.in_safezone = false;
        }
        if self.in_safezone {
            return;
        }

        if self.dragging && magnitude < self.config.drag_rim {
            self.dragging = false;
        }

        if magnitude <= self.config.deadzone {
            return;
        }

        self.analyze_candidates(sample, events);
    }

    fn analyze_candidates(&mut self, sample: Vec2, events: &mut Vec<Event>) {
        let catalog = Arc::clone(&self.catalog);
        let scanned = match self.config.scan {
            ScanMode::FirstChange => self.candidates.len(),
            ScanMode::HeadOnly => self.candidates.len().min(1),
        };

        for slot in 0..scanned {
            let trick = &catalog[self.candidates[slot]];
            let Some(waypoint) = trick.waypoints().get(self.depth) else {
                // Unreachable after a sweep; treat as diverged rather than index past the end.
                self.remove_candidate(slot, events);
                return;
            };

            if self.depth != 0 {
                let travel = (sample - self.last_hit).normalize_or_zero();
                let expected = (waypoint.direction() - self.last_hit).normalize_or_zero();
                let dot = travel.dot(expected);
                let off_course = if waypoint.drag() {
                    !self.dragging
                } else {
                    dot < self.config.minimum_required_dot
                };
                if off_course {
                    debug!(
                        trick = trick.name(),
                        index = trick.index(),
                        dot,
                        dragging = self.dragging,
                        "removed candidate"
                    );
                    self.remove_candidate(slot, events);
                    return;
                }
            }

            if sample.distance(waypoint.direction()) <= self.config.exec_distance {
                self.reach_waypoint(slot, events);
                return;
            }
        }
    }

    fn reach_waypoint(&mut self, slot: usize, events: &mut Vec<Event>) {
        let catalog = Arc::clone(&self.catalog);
        let trick = &catalog[self.candidates[slot]];
        let hit = trick.waypoints()[self.depth].direction();

        self.in_safezone = true;
        self.dragging = true;
        self.depth += 1;
        self.last_hit = hit;
        debug!(trick = trick.name(), depth = self.depth, "reached waypoint");
        events.push(Event::WaypointReached {
            trick: trick.index(),
            depth: self.depth,
        });
        events.push(Event::LastHitPositionChanged { position: hit });

        if self.depth == trick.waypoints().len() {
            debug!(trick = trick.name(), "trick eligible");
            self.eligible = Some(trick.index());
            events.push(Event::TrickEligible {
                trick: trick.index(),
            });
            if self.remove_candidate(slot, events) {
                return;
            }
        }

        if self.sweep(events) {
            return;
        }

        if let &[only] = self.candidates.as_slice() {
            let next = &catalog[only];
            events.push(Event::NextWaypoint {
                trick: only,
                position: next.waypoints()[self.depth].direction(),
            });
        }
    }

    /// Drops every candidate that cannot continue from the waypoint just hit.
    /// Afterwards each remaining candidate has a waypoint at `depth`.
    /// Returns true when the queue emptied and the matcher re-armed.
    fn sweep(&mut self, events: &mut Vec<Event>) -> bool {
        let catalog = Arc::clone(&self.catalog);
        let depth = self.depth;
        let last_hit = self.last_hit;
        self.candidates.retain(|&index| {
            let trick = &catalog[index];
            let waypoints = trick.waypoints();
            let keep = waypoints.len() > depth
                && waypoints[depth - 1]
                    .direction()
                    .abs_diff_eq(last_hit, DIRECTION_EPSILON);
            if !keep {
                debug!(trick = trick.name(), index, depth, "removed diverged candidate");
            }
            keep
        });
        if self.candidates.is_empty() {
            self.attempt_execute(events);
            return true;
        }
        false
    }

    /// Returns true when the removal emptied the queue and the matcher re-armed.
    fn remove_candidate(&mut self, slot: usize, events: &mut Vec<Event>) -> bool {
        self.candidates.remove(slot);
        if self.candidates.is_empty() {
            self.attempt_execute(events);
            return true;
        }
        false
    }

    fn attempt_execute(&mut self, events: &mut Vec<Event>) {
        match self.eligible {
            Some(index) => {
                let name = self
                    .catalog
                    .get(index)
                    .map(|t| t.name().to_owned())
                    .unwrap_or_default();
                match self.durations.duration(index) {
                    Some(duration) => {
                        info!(trick = %name, index, duration, "trick executed");
                        events.push(Event::TrickExecuted {
                            trick: index,
                            duration: Some(duration),
                        });
                        self.animation = Some(AnimationProgress {
                            trick: index,
                            elapsed: 0.0,
                            duration,
                        });
                    }
                    None => {
                        warn!(trick = %name, index, "no animation found for trick");
                        events.push(Event::NoAnimationFound { trick: index });
                        events.push(Event::TrickExecuted {
                            trick: index,
                            duration: None,
                        });
                    }
                }
            }
            None => {
                debug!(depth = self.depth, "attempt exhausted without an eligible trick");
                events.push(Event::AttemptExhausted);
            }
        }

        self.rearm();
        self.returning_to_origin = true;
        events.push(Event::LastHitPositionChanged {
            position: Vec2::ZERO,
        });
    }

    fn rearm(&mut self) {
        self.depth = 0;
        self.last_hit = Vec2::ZERO;
        self.dragging = false;
        self.in_safezone = false;
        self.candidates = self.catalog.playable_indices();
        self.eligible = None;
    }
}
