use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, TrickDef};
use crate::durations::Durations;
use crate::error::ConfigError;
use crate::matcher::Matcher;

/// Which candidates a step may evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Walk the queue in order, stopping at the first removal or waypoint hit.
    #[default]
    FirstChange,
    /// Only the front of the queue is looked at each step.
    HeadOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Below this dot product between stick travel and the next waypoint, a
    /// snap candidate is dropped.
    pub minimum_required_dot: f32,
    /// Arrival radius around a waypoint. The safezone is twice this.
    pub exec_distance: f32,
    pub deadzone: f32,
    /// Stick magnitude below which drag posture is lost.
    pub drag_rim: f32,
    pub scan: ScanMode,
    /// Reject tricks without waypoints instead of loading them as unplayable.
    pub strict: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            minimum_required_dot: 0.7,
            exec_distance: 0.1,
            deadzone: 0.05,
            drag_rim: 0.9,
            scan: ScanMode::FirstChange,
            strict: true,
        }
    }
}

impl MatcherConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("exec_distance", self.exec_distance),
            ("deadzone", self.deadzone),
            ("drag_rim", self.drag_rim),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        let dot = self.minimum_required_dot;
        if !(-1.0..=1.0).contains(&dot) {
            return Err(ConfigError::InvalidThreshold {
                name: "minimum_required_dot",
                value: dot,
            });
        }
        Ok(())
    }
}

/// Deserialized form of a session file: matcher tuning plus the trick list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub tricks: Vec<TrickDef>,
}

impl SessionConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validates thresholds and durations, then loads the catalog.
    pub fn into_session(self) -> Result<Session, ConfigError> {
        self.matcher.validate()?;

        let mut durations = Durations::new();
        for (index, def) in self.tricks.iter().enumerate() {
            if let Some(seconds) = def.duration {
                if !seconds.is_finite() || seconds < 0.0 {
                    return Err(ConfigError::NegativeDuration {
                        trick: def.name.clone(),
                        value: seconds,
                    });
                }
                durations.set(index, seconds);
            }
        }

        let catalog = if self.matcher.strict {
            Catalog::load(self.tricks)?
        } else {
            Catalog::load_lenient(self.tricks)
        };

        Ok(Session {
            catalog: Arc::new(catalog),
            config: self.matcher,
            durations,
        })
    }
}

/// A loaded, validated session ready to hand out matchers.
#[derive(Debug, Clone)]
pub struct Session {
    pub catalog: Arc<Catalog>,
    pub config: MatcherConfig,
    pub durations: Durations,
}

impl Session {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        SessionConfig::from_toml_str(text)?.into_session()
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        SessionConfig::from_json_str(text)?.into_session()
    }

    /// A fresh matcher over the shared catalog, e.g. one per player.
    pub fn matcher(&self) -> Matcher<Durations> {
        Matcher::new(
            Arc::clone(&self.catalog),
            self.config.clone(),
            self.durations.clone(),
        )
    }
}
