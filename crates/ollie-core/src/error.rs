use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("trick '{name}' (index {index}) has no waypoints")]
    EmptyTrickDefinition { name: String, index: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("invalid value for {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f32 },

    #[error("trick '{trick}' has a negative or non-finite duration: {value}")]
    NegativeDuration { trick: String, value: f32 },
}
