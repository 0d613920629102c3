//! GitHub client trait and write mode definitions
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy, as well as the `WriteMode` enum for
//! controlling whether mutations reach GitHub.

use crate::types::{Comment, ProjectItem, PullRequest, RequestedReviewers, ReviewRequestOutcome};
use async_trait::async_trait;

/// Write behavior mode for GitHub API clients
///
/// Set at client construction time, not per-request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Mutations are sent to GitHub
    #[default]
    Live,

    /// Mutations are logged and replaced by placeholder results.
    /// Reads still hit the API.
    DryRun,
}

impl WriteMode {
    pub fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            WriteMode::DryRun
        } else {
            WriteMode::Live
        }
    }

    /// Should mutations be sent to GitHub?
    pub fn should_write(&self) -> bool {
        matches!(self, WriteMode::Live)
    }
}

/// GitHub API client trait
///
/// Defines the interface for interacting with the GitHub REST and GraphQL
/// APIs. Implementations can be direct (hitting the API) or decorated,
/// e.g. with [`DryRunClient`](crate::DryRunClient).
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
#[async_trait]
pub trait GitHubClient: Send + Sync {
    // === Reads ===

    /// Fetch all open pull requests of a repository
    ///
    /// Pages through the list endpoint (100 per page) until an empty page.
    async fn fetch_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<PullRequest>>;

    /// Fetch the currently requested reviewers of a pull request
    async fn fetch_requested_reviewers(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<RequestedReviewers>;

    /// Fetch the member logins of an organization team
    async fn fetch_team_members(&self, org: &str, team_slug: &str) -> anyhow::Result<Vec<String>>;

    /// Fetch all issue comments of a pull request, oldest first
    async fn fetch_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Comment>>;

    /// Find the project board item linked to a pull request
    ///
    /// # Arguments
    ///
    /// * `project_id` - Node id of the project (v2) board
    /// * `pr_node_id` - Node id of the pull request
    /// * `pr_number` - Pull request number, matched only for items without a node id
    ///
    /// # Returns
    ///
    /// `None` if the pull request is not on the board.
    async fn find_project_item(
        &self,
        project_id: &str,
        pr_node_id: &str,
        pr_number: u64,
    ) -> anyhow::Result<Option<ProjectItem>>;

    // === Writes ===

    /// Add labels to a pull request
    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()>;

    /// Request a review from an organization team
    ///
    /// Known refusals (team cannot review, already requested) are returned
    /// as [`ReviewRequestOutcome::Conflict`] rather than an error.
    async fn request_team_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        team_slug: &str,
    ) -> anyhow::Result<ReviewRequestOutcome>;

    /// Add assignees to a pull request (existing assignees are kept)
    async fn add_assignees(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        logins: &[String],
    ) -> anyhow::Result<()>;

    /// Create an issue comment on a pull request
    ///
    /// # Returns
    ///
    /// The created comment, including its creation timestamp.
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> anyhow::Result<Comment>;

    /// Set a single-select field of a project board item
    async fn set_project_item_status(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> anyhow::Result<()>;
}
