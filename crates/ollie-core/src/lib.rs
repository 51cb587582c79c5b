//! Ollie core: platform-agnostic trick recognition for a skateboarding game.
//!
//! A [`Catalog`] of tricks is loaded once, then one [`Matcher`] per player
//! consumes analog-stick samples via [`Matcher::step`] and reports what
//! happened as a list of [`Event`]s.

mod catalog;
mod config;
mod durations;
mod error;
mod event;
mod matcher;

pub use catalog::{Catalog, Trick, TrickDef, Waypoint, WaypointDef};
pub use config::{MatcherConfig, ScanMode, Session, SessionConfig};
pub use durations::{DurationTable, Durations};
pub use error::{CatalogError, ConfigError};
pub use event::Event;
pub use matcher::{AnimationProgress, Matcher, Phase};

pub use glam::Vec2;
