//! Sample scripts for replaying stick input through a matcher.

use std::fs;
use std::path::Path;

use ollie_core::{Catalog, DurationTable, Vec2};
use ollie_platform::{Result, Sample};

/// Degrees per sample when dragging along the rim.
const ARC_STEP: f32 = 10.0;
/// Samples used for a straight move between two points.
const SNAP_STEPS: usize = 5;

/// Reads a whole file, naming the path when it cannot be read.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()).into())
}

/// Reads a JSON array of samples.
pub fn load_script(path: &Path) -> Result<Vec<Sample>> {
    let text = read_text(path)?;
    let samples: Vec<Sample> = serde_json::from_str(&text)?;
    Ok(samples)
}

/// Synthesises a script that performs every playable trick once, in catalog
/// order, resting in the centre long enough for each animation to finish.
pub fn demo_script<D: DurationTable + ?Sized>(catalog: &Catalog, durations: &D, dt: f32) -> Vec<Sample> {
    let mut samples = Vec::new();
    for trick in catalog.iter().filter(|t| t.is_playable()) {
        rest(&mut samples, 0.1, dt);

        let mut previous: Option<i32> = None;
        for waypoint in trick.waypoints() {
            let target = waypoint.direction();
            match previous {
                None => line(&mut samples, Vec2::ZERO, target, dt),
                Some(from) if waypoint.drag() => arc(&mut samples, from, waypoint.angle(), dt),
                Some(from) => line(&mut samples, direction(from), target, dt),
            }
            previous = Some(waypoint.angle());
        }

        let hold = durations.duration(trick.index()).unwrap_or(0.0) + 0.25;
        rest(&mut samples, hold, dt);
    }
    samples
}

fn direction(angle: i32) -> Vec2 {
    Vec2::from_angle((angle as f32).to_radians())
}

fn rest(samples: &mut Vec<Sample>, seconds: f32, dt: f32) {
    let count = ((seconds / dt).ceil() as usize).max(1);
    samples.extend(std::iter::repeat(Sample::new(Vec2::ZERO, dt)).take(count));
}

fn line(samples: &mut Vec<Sample>, from: Vec2, to: Vec2, dt: f32) {
    for i in 1..=SNAP_STEPS {
        let t = i as f32 / SNAP_STEPS as f32;
        samples.push(Sample::new(from.lerp(to, t), dt));
    }
}

fn arc(samples: &mut Vec<Sample>, from: i32, to: i32, dt: f32) {
    let delta = ((to - from) as f32 + 540.0).rem_euclid(360.0) - 180.0;
    let steps = ((delta.abs() / ARC_STEP).ceil() as usize).max(1);
    for i in 1..=steps {
        let angle = from as f32 + delta * i as f32 / steps as f32;
        samples.push(Sample::new(Vec2::from_angle(angle.to_radians()), dt));
    }
}
