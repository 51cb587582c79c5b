//! Trick definitions and the immutable catalog the matcher reads from.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CatalogError;

/// Serde-facing waypoint as written in a session file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaypointDef {
    pub angle: i32,
    #[serde(default)]
    pub drag: bool,
}

impl WaypointDef {
    pub fn snap(angle: i32) -> Self {
        Self { angle, drag: false }
    }

    pub fn drag(angle: i32) -> Self {
        Self { angle, drag: true }
    }
}

/// Serde-facing trick as written in a session file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrickDef {
    pub name: String,
    /// Animation length in seconds. Read by the session, not by the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
    #[serde(default)]
    pub waypoints: Vec<WaypointDef>,
}

impl TrickDef {
    pub fn new(name: impl Into<String>, waypoints: Vec<WaypointDef>) -> Self {
        Self {
            name: name.into(),
            duration: None,
            waypoints,
        }
    }

    pub fn with_duration(mut self, seconds: f32) -> Self {
        self.duration = Some(seconds);
        self
    }
}

/// One directional checkpoint of a trick.
///
/// `direction` is derived from `angle` on construction and never edited afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    angle: i32,
    drag: bool,
    direction: Vec2,
}

impl Waypoint {
    pub fn new(angle: i32, drag: bool) -> Self {
        Self {
            angle,
            drag,
            direction: Vec2::from_angle((angle as f32).to_radians()),
        }
    }

    pub fn angle(&self) -> i32 {
        self.angle
    }

    /// Drag waypoints must be reached with the stick held near the rim.
    pub fn drag(&self) -> bool {
        self.drag
    }

    /// Unit vector `(cos a, sin a)` for the waypoint angle.
    pub fn direction(&self) -> Vec2 {
        self.direction
    }
}

impl From<WaypointDef> for Waypoint {
    fn from(def: WaypointDef) -> Self {
        Waypoint::new(def.angle, def.drag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trick {
    name: String,
    index: usize,
    waypoints: Vec<Waypoint>,
}

impl Trick {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordinal position in the catalog. Duration tables are keyed by it.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// A trick without waypoints can never match.
    pub fn is_playable(&self) -> bool {
        !self.waypoints.is_empty()
    }
}

/// Ordered, read-only set of tricks. Share it between matchers behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tricks: Vec<Trick>,
}

impl Catalog {
    /// Strict load: any trick without waypoints is a configuration error.
    pub fn load<I>(defs: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = TrickDef>,
    {
        let catalog = Self::build(defs);
        if let Some(empty) = catalog.tricks.iter().find(|t| !t.is_playable()) {
            return Err(CatalogError::EmptyTrickDefinition {
                name: empty.name.clone(),
                index: empty.index,
            });
        }
        info!(tricks = catalog.len(), "trick catalog loaded");
        Ok(catalog)
    }

    /// Lenient load: tricks without waypoints keep their index but never
    /// enter a matcher's candidate queue.
    pub fn load_lenient<I>(defs: I) -> Self
    where
        I: IntoIterator<Item = TrickDef>,
    {
        let catalog = Self::build(defs);
        for trick in catalog.tricks.iter().filter(|t| !t.is_playable()) {
            warn!(trick = %trick.name, index = trick.index, "trick has no waypoints; it will never match");
        }
        info!(tricks = catalog.len(), "trick catalog loaded");
        catalog
    }

    /// Tricks are identified by index; a repeated name is allowed but logged.
    fn build<I>(defs: I) -> Self
    where
        I: IntoIterator<Item = TrickDef>,
    {
        let mut seen = HashSet::new();
        let mut tricks = Vec::new();
        for (index, def) in defs.into_iter().enumerate() {
            if !seen.insert(def.name.clone()) {
                warn!(trick = %def.name, index, "trick name repeats an earlier trick");
            }
            tricks.push(Trick {
                name: def.name,
                index,
                waypoints: def.waypoints.into_iter().map(Waypoint::from).collect(),
            });
        }
        Self { tricks }
    }

    pub fn len(&self) -> usize {
        self.tricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tricks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Trick> {
        self.tricks.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Trick> {
        self.tricks.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trick> {
        self.tricks.iter()
    }

    /// Indices of every trick that can match, in catalog order.
    pub fn playable_indices(&self) -> Vec<usize> {
        self.tricks
            .iter()
            .filter(|t| t.is_playable())
            .map(|t| t.index)
            .collect()
    }
}

impl std::ops::Index<usize> for Catalog {
    type Output = Trick;

    fn index(&self, index: usize) -> &Trick {
        &self.tricks[index]
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Trick;
    type IntoIter = std::slice::Iter<'a, Trick>;

    fn into_iter(self) -> Self::IntoIter {
        self.tricks.iter()
    }
}
