//! GitHub API data transfer objects
//!
//! These types represent the data returned from the GitHub API.
//! They are intentionally separate from the wire format so the workflow
//! never depends on octocrab models directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An open pull request from the GitHub API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number (e.g., 123)
    pub number: u64,

    /// Author's GitHub login (e.g., "renovate[bot]")
    pub author: String,

    /// When the PR was created
    pub created_at: DateTime<Utc>,

    /// Label names currently on the PR
    pub labels: Vec<String>,

    /// Logins of the current assignees
    pub assignees: Vec<String>,

    /// Logins of individually requested reviewers
    pub requested_reviewers: Vec<String>,

    /// Slugs of requested teams
    pub requested_teams: Vec<String>,

    /// Opaque GraphQL node id
    pub node_id: String,
}

impl PullRequest {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Whether any individual or team review has been requested
    pub fn has_review_requests(&self) -> bool {
        !self.requested_reviewers.is_empty() || !self.requested_teams.is_empty()
    }

    pub fn has_assignees(&self) -> bool {
        !self.assignees.is_empty()
    }
}

/// Current review requests of a pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedReviewers {
    /// Individually requested logins, in the order GitHub reports them
    pub users: Vec<String>,

    /// Requested team slugs
    pub teams: Vec<String>,
}

/// An issue comment on a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// GitHub comment ID
    pub id: u64,

    /// Login of the comment author
    pub author: String,

    /// Comment body (markdown)
    pub body: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,
}

/// An item on a GitHub project (v2) board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectItem {
    /// Project item node id
    pub id: String,

    /// Number of the linked pull request
    pub pr_number: u64,

    /// Node id of the linked pull request
    pub content_node_id: Option<String>,
}

impl ProjectItem {
    /// Whether this item is the given pull request
    ///
    /// The node id decides when the board reports one; the number is only
    /// compared for items without a node id, since numbers repeat across
    /// repositories on an organization board.
    pub fn links_to(&self, pr_node_id: &str, pr_number: u64) -> bool {
        match &self.content_node_id {
            Some(node_id) => node_id == pr_node_id,
            None => self.pr_number == pr_number,
        }
    }
}

/// Result of asking GitHub to request a team review
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewRequestOutcome {
    /// GitHub accepted the request
    Requested,

    /// GitHub refused with a known, recoverable reason
    Conflict(String),

    /// The request was not sent because writes are disabled
    DryRun,
}
