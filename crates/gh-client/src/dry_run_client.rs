//! Dry-run GitHub API client (decorator pattern)
//!
//! Wraps any `GitHubClient` implementation and gates every mutation behind
//! the configured `WriteMode`. Reads always go to the inner client so a dry
//! run still shows what the bot would act on.

use crate::client::{GitHubClient, WriteMode};
use crate::types::{Comment, ProjectItem, PullRequest, RequestedReviewers, ReviewRequestOutcome};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;

/// Comment id returned for comments that were never created
pub const DRY_RUN_COMMENT_ID: u64 = 0;

/// Author reported on comments that were never created
pub const DRY_RUN_AUTHOR: &str = "dry-run";

/// Creation time reported on comments that were never created
pub const DRY_RUN_CREATED_AT: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// Write-gating GitHub API client using the decorator pattern
///
/// # Write Modes
///
/// - `WriteMode::Live` - Pass every call through to the inner client
/// - `WriteMode::DryRun` - Pass reads through; log writes and return placeholders
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{DryRunClient, OctocrabClient, WriteMode};
/// use std::sync::Arc;
///
/// let octocrab = Arc::new(octocrab::Octocrab::builder().build()?);
/// let client = DryRunClient::new(OctocrabClient::new(octocrab), WriteMode::DryRun);
/// ```
#[derive(Debug, Clone)]
pub struct DryRunClient<C: GitHubClient> {
    inner: C,
    mode: WriteMode,
}

impl<C: GitHubClient> DryRunClient<C> {
    /// Create a new write-gating client
    pub fn new(inner: C, mode: WriteMode) -> Self {
        Self { inner, mode }
    }

    /// Get the current write mode
    pub fn write_mode(&self) -> WriteMode {
        self.mode
    }

    /// Get a reference to the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn is_dry_run(&self) -> bool {
        !self.mode.should_write()
    }
}

#[async_trait]
impl<C: GitHubClient> GitHubClient for DryRunClient<C> {
    async fn fetch_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<PullRequest>> {
        self.inner.fetch_open_pull_requests(owner, repo).await
    }

    async fn fetch_requested_reviewers(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<RequestedReviewers> {
        self.inner
            .fetch_requested_reviewers(owner, repo, pr_number)
            .await
    }

    async fn fetch_team_members(&self, org: &str, team_slug: &str) -> anyhow::Result<Vec<String>> {
        self.inner.fetch_team_members(org, team_slug).await
    }

    async fn fetch_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Comment>> {
        self.inner.fetch_comments(owner, repo, pr_number).await
    }

    async fn find_project_item(
        &self,
        project_id: &str,
        pr_node_id: &str,
        pr_number: u64,
    ) -> anyhow::Result<Option<ProjectItem>> {
        self.inner
            .find_project_item(project_id, pr_node_id, pr_number)
            .await
    }

    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()> {
        if self.is_dry_run() {
            info!("[dry-run] Would add labels {:?} to PR #{}", labels, pr_number);
            return Ok(());
        }
        self.inner.add_labels(owner, repo, pr_number, labels).await
    }

    async fn request_team_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        team_slug: &str,
    ) -> anyhow::Result<ReviewRequestOutcome> {
        if self.is_dry_run() {
            info!(
                "[dry-run] Would request review from team {} on PR #{}",
                team_slug, pr_number
            );
            return Ok(ReviewRequestOutcome::DryRun);
        }
        self.inner
            .request_team_review(owner, repo, pr_number, team_slug)
            .await
    }

    async fn add_assignees(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        logins: &[String],
    ) -> anyhow::Result<()> {
        if self.is_dry_run() {
            info!("[dry-run] Would assign {:?} to PR #{}", logins, pr_number);
            return Ok(());
        }
        self.inner
            .add_assignees(owner, repo, pr_number, logins)
            .await
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> anyhow::Result<Comment> {
        if self.is_dry_run() {
            info!("[dry-run] Would comment on PR #{}:\n{}", pr_number, body);
            return Ok(Comment {
                id: DRY_RUN_COMMENT_ID,
                author: DRY_RUN_AUTHOR.to_string(),
                body: body.to_string(),
                created_at: DRY_RUN_CREATED_AT,
            });
        }
        self.inner
            .create_comment(owner, repo, pr_number, body)
            .await
    }

    async fn set_project_item_status(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> anyhow::Result<()> {
        if self.is_dry_run() {
            info!(
                "[dry-run] Would set field {} of project item {} to option {}",
                field_id, item_id, option_id
            );
            return Ok(());
        }
        self.inner
            .set_project_item_status(project_id, item_id, field_id, option_id)
            .await
    }
}
