//! Candidate selection

use crate::markers::whole_days_between;
use chrono::{DateTime, Utc};
use dri_config::DriConfig;
use gh_client::PullRequest;

/// A pull request is handled once the bot opened it at least
/// `days_threshold` whole days ago.
pub fn is_eligible(pr: &PullRequest, config: &DriConfig, now: DateTime<Utc>) -> bool {
    pr.author == config.bot_login
        && whole_days_between(pr.created_at, now) >= config.days_threshold
}

/// Keep the eligible pull requests, preserving order
pub fn select_candidates(
    prs: Vec<PullRequest>,
    config: &DriConfig,
    now: DateTime<Utc>,
) -> Vec<PullRequest> {
    prs.into_iter()
        .filter(|pr| is_eligible(pr, config, now))
        .collect()
}
