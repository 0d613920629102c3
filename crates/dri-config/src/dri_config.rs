//! Run configuration
//!
//! Loaded from `.dri-bot.toml` (see [`crate::load_config_file`]), then
//! overridden from the environment. The resulting value is immutable and
//! passed to every workflow step.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::time::Duration;

const MARKER_PLACEHOLDER: &str = "{marker}";

/// Maps a category label to the team that owns it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CategoryTeam {
    /// Label on the pull request (e.g. "area/backend")
    pub label: String,
    /// Team slug within the organization (e.g. "backend")
    pub team: String,
}

impl CategoryTeam {
    pub fn new(label: &str, team: &str) -> Self {
        Self {
            label: label.to_string(),
            team: team.to_string(),
        }
    }
}

/// Project (v2) board whose status is set to "Delayed" on escalation
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ProjectBoardConfig {
    /// Node id of the project
    #[serde(default)]
    pub project_id: String,
    /// Node id of the single-select status field
    #[serde(default)]
    pub status_field_id: String,
    /// Option id of the "Delayed" status
    #[serde(default)]
    pub delayed_option_id: String,
}

/// Bot configuration loaded from .dri-bot.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DriConfig {
    /// GitHub host, "github.com" or an Enterprise host
    #[serde(default = "default_host")]
    pub host: String,

    /// Repository owner
    #[serde(default)]
    pub owner: String,

    /// Repository name
    #[serde(default)]
    pub repo: String,

    /// Organization owning the teams (defaults to the repository owner)
    #[serde(default)]
    pub org: Option<String>,

    /// Login of the bot opening dependency updates
    #[serde(default = "default_bot_login")]
    pub bot_login: String,

    /// Minimum age in whole days before a pull request is handled
    #[serde(default = "default_days_threshold")]
    pub days_threshold: i64,

    /// Days an assignment may stay open before escalation
    #[serde(default = "default_reminder_days_threshold")]
    pub reminder_days_threshold: i64,

    #[serde(default = "default_stale_label")]
    pub stale_label: String,

    /// Category labels in priority order; the first label present wins
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryTeam>,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_poll_ceiling_secs")]
    pub poll_ceiling_secs: u64,

    /// Substring identifying the assignment comment
    #[serde(default = "default_assignment_marker")]
    pub assignment_marker: String,

    /// Substring identifying the reminder comment
    #[serde(default = "default_reminder_marker")]
    pub reminder_marker: String,

    /// Link to the dependency update policy; derived from the repository if empty
    #[serde(default)]
    pub policy_url: String,

    #[serde(default = "default_assignment_template")]
    pub assignment_template: String,

    #[serde(default = "default_reminder_template")]
    pub reminder_template: String,

    #[serde(default)]
    pub project: Option<ProjectBoardConfig>,

    /// Log writes instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

fn default_host() -> String {
    "github.com".to_string()
}

fn default_bot_login() -> String {
    "renovate[bot]".to_string()
}

fn default_days_threshold() -> i64 {
    7
}

fn default_reminder_days_threshold() -> i64 {
    21
}

fn default_stale_label() -> String {
    "stale".to_string()
}

fn default_categories() -> Vec<CategoryTeam> {
    vec![
        CategoryTeam::new("area/backend", "backend"),
        CategoryTeam::new("area/frontend", "frontend"),
        CategoryTeam::new("area/build", "build"),
        CategoryTeam::new("area/docs", "docs"),
    ]
}

fn default_poll_interval_secs() -> u64 {
    3
}

fn default_poll_ceiling_secs() -> u64 {
    10
}

fn default_assignment_marker() -> String {
    "<!-- dri-bot:assignment -->".to_string()
}

fn default_reminder_marker() -> String {
    "<!-- dri-bot:reminder -->".to_string()
}

fn default_assignment_template() -> String {
    "{marker}\n\
     :wave: @{dri} you are now the DRI (directly responsible individual) for this dependency update.\n\n\
     Please review it and merge it, or close it if it does not apply. \
     See the [dependency update policy]({policy_url}) for details."
        .to_string()
}

fn default_reminder_template() -> String {
    "{marker}\n\
     :alarm_clock: @{dri} this dependency update has been assigned to you for {days} days.\n\n\
     Please act on it or hand it over to someone else on your team. \
     It has been marked as delayed, see the [dependency update policy]({policy_url})."
        .to_string()
}

impl Default for DriConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            owner: String::new(),
            repo: String::new(),
            org: None,
            bot_login: default_bot_login(),
            days_threshold: default_days_threshold(),
            reminder_days_threshold: default_reminder_days_threshold(),
            stale_label: default_stale_label(),
            categories: default_categories(),
            poll_interval_secs: default_poll_interval_secs(),
            poll_ceiling_secs: default_poll_ceiling_secs(),
            assignment_marker: default_assignment_marker(),
            reminder_marker: default_reminder_marker(),
            policy_url: String::new(),
            assignment_template: default_assignment_template(),
            reminder_template: default_reminder_template(),
            project: None,
            dry_run: false,
        }
    }
}

impl DriConfig {
    /// Load config from file, or use defaults
    pub fn load() -> Self {
        if let Some(content) = crate::load_config_file() {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded dri-bot config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default dri-bot config");
        Self::default()
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// `lookup` is `std::env::var(..).ok()` in the binary and a map in tests.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("GITHUB_REPOSITORY") {
            let (owner, repo) = value
                .split_once('/')
                .filter(|(o, r)| !o.is_empty() && !r.is_empty() && !r.contains('/'))
                .ok_or_else(|| ConfigError::InvalidRepository(value.clone()))?;
            self.owner = owner.to_string();
            self.repo = repo.to_string();
        }
        if let Some(host) = lookup("GITHUB_HOST") {
            self.host = host;
        }
        if let Some(login) = lookup("BOT_LOGIN") {
            self.bot_login = login;
        }
        if let Some(value) = lookup("DAYS_THRESHOLD") {
            self.days_threshold = parse_days("DAYS_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("REMINDER_DAYS_THRESHOLD") {
            self.reminder_days_threshold = parse_days("REMINDER_DAYS_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("DRY_RUN") {
            self.dry_run = parse_bool("DRY_RUN", &value)?;
        }

        let project_id = lookup("PROJECT_ID");
        let field_id = lookup("PROJECT_STATUS_FIELD_ID");
        let option_id = lookup("PROJECT_DELAYED_OPTION_ID");
        if project_id.is_some() || field_id.is_some() || option_id.is_some() {
            let project = self.project.get_or_insert_with(ProjectBoardConfig::default);
            if let Some(id) = project_id {
                project.project_id = id;
            }
            if let Some(id) = field_id {
                project.status_field_id = id;
            }
            if let Some(id) = option_id {
                project.delayed_option_id = id;
            }
        }

        Ok(self)
    }

    /// Check that the configuration can drive a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_empty() || self.repo.is_empty() {
            return Err(ConfigError::MissingRepository);
        }
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        if self.assignment_marker.is_empty() {
            return Err(ConfigError::EmptyMarker("assignment"));
        }
        if self.reminder_marker.is_empty() {
            return Err(ConfigError::EmptyMarker("reminder"));
        }
        if self.assignment_marker == self.reminder_marker {
            return Err(ConfigError::IdenticalMarkers);
        }
        // Markers are found by substring, so neither may match the other's comment
        if self.assignment_marker.contains(&self.reminder_marker) {
            return Err(ConfigError::NestedMarkers("assignment"));
        }
        if self.reminder_marker.contains(&self.assignment_marker) {
            return Err(ConfigError::NestedMarkers("reminder"));
        }
        if !self.assignment_template.contains(MARKER_PLACEHOLDER) {
            return Err(ConfigError::TemplateWithoutMarker("assignment"));
        }
        if !self.reminder_template.contains(MARKER_PLACEHOLDER) {
            return Err(ConfigError::TemplateWithoutMarker("reminder"));
        }
        if self.days_threshold < 0 {
            return Err(ConfigError::NegativeThreshold {
                key: "days_threshold",
                value: self.days_threshold,
            });
        }
        if self.reminder_days_threshold < 0 {
            return Err(ConfigError::NegativeThreshold {
                key: "reminder_days_threshold",
                value: self.reminder_days_threshold,
            });
        }
        if self.poll_interval_secs == 0 || self.poll_interval_secs > self.poll_ceiling_secs {
            return Err(ConfigError::InvalidPolling {
                interval: self.poll_interval_secs,
                ceiling: self.poll_ceiling_secs,
            });
        }
        if let Some(project) = &self.project {
            if project.project_id.is_empty() {
                return Err(ConfigError::IncompleteProject("project_id"));
            }
            if project.status_field_id.is_empty() {
                return Err(ConfigError::IncompleteProject("status_field_id"));
            }
            if project.delayed_option_id.is_empty() {
                return Err(ConfigError::IncompleteProject("delayed_option_id"));
            }
        }
        Ok(())
    }

    /// Organization owning the teams
    pub fn org(&self) -> &str {
        self.org.as_deref().unwrap_or(&self.owner)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_ceiling(&self) -> Duration {
        Duration::from_secs(self.poll_ceiling_secs)
    }

    /// Policy link used in comments
    pub fn policy_url(&self) -> Cow<'_, str> {
        if self.policy_url.is_empty() {
            Cow::Owned(format!(
                "https://{}/{}/{}/blob/main/CONTRIBUTING.md#dependency-updates",
                self.host, self.owner, self.repo
            ))
        } else {
            Cow::Borrowed(&self.policy_url)
        }
    }
}

fn parse_days(key: &str, value: &str) -> Result<i64, ConfigError> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|days| *days >= 0)
        .ok_or_else(|| ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
