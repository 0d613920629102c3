//! Configuration errors

use thiserror::Error;

/// Reasons a configuration cannot be used for a run
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("repository is not configured (set `owner`/`repo` or GITHUB_REPOSITORY)")]
    MissingRepository,

    #[error("GITHUB_REPOSITORY must look like `owner/repo`, got `{0}`")]
    InvalidRepository(String),

    #[error("invalid value `{value}` for {key}")]
    InvalidEnv { key: String, value: String },

    #[error("no category labels configured")]
    NoCategories,

    #[error("{0} marker must not be empty")]
    EmptyMarker(&'static str),

    #[error("assignment and reminder markers must differ")]
    IdenticalMarkers,

    #[error("{0} marker must not contain the other marker")]
    NestedMarkers(&'static str),

    #[error("{0} template must contain `{{marker}}`")]
    TemplateWithoutMarker(&'static str),

    #[error("{key} must not be negative, got {value}")]
    NegativeThreshold { key: &'static str, value: i64 },

    #[error("poll interval ({interval}s) must be positive and not exceed the ceiling ({ceiling}s)")]
    InvalidPolling { interval: u64, ceiling: u64 },

    #[error("project board is missing `{0}`")]
    IncompleteProject(&'static str),
}
