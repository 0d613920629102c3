//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! REST routes are called through octocrab's raw `get`/`post` helpers and
//! decoded into the wire structs below; project boards go through GraphQL.

use crate::client::GitHubClient;
use crate::types::{Comment, ProjectItem, PullRequest, RequestedReviewers, ReviewRequestOutcome};
use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const PER_PAGE: u8 = 100;

/// Messages GitHub returns (with 422) when a team review cannot be requested
const REVIEW_CONFLICT_MESSAGES: &[&str] = &[
    "reviews may only be requested from collaborators",
    "not a collaborator",
    "already requested",
    "review cannot be requested from pull request author",
];

const PROJECT_ITEMS_QUERY: &str = r#"
query($project: ID!, $cursor: String) {
  node(id: $project) {
    ... on ProjectV2 {
      items(first: 100, after: $cursor) {
        nodes {
          id
          content {
            ... on PullRequest { id number }
          }
        }
        pageInfo { hasNextPage endCursor }
      }
    }
  }
}"#;

const SET_ITEM_STATUS_MUTATION: &str = r#"
mutation($project: ID!, $item: ID!, $field: ID!, $option: String!) {
  updateProjectV2ItemFieldValue(
    input: {
      projectId: $project
      itemId: $item
      fieldId: $field
      value: { singleSelectOptionId: $option }
    }
  ) {
    projectV2Item { id }
  }
}"#;

/// Direct GitHub API client using octocrab
///
/// This is the base implementation that makes actual API calls.
/// It can be wrapped by `DryRunClient` to suppress writes.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }

    /// GET every page of a list endpoint until GitHub returns an empty page
    async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        route: &str,
        state: Option<&str>,
    ) -> anyhow::Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let params = PageParams {
                state,
                per_page: PER_PAGE,
                page,
            };
            let batch: Vec<T> = self
                .octocrab
                .get(route, Some(&params))
                .await
                .with_context(|| format!("GET {} (page {})", route, page))?;

            if batch.is_empty() {
                break;
            }

            items.extend(batch);
            page += 1;
        }

        Ok(items)
    }

    /// Run a GraphQL document and return its `data`, failing on GraphQL errors
    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> anyhow::Result<T> {
        let payload = json!({ "query": query, "variables": variables });
        let response: GraphQlResponse<T> = self.octocrab.graphql(&payload).await?;

        if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(anyhow::anyhow!("GraphQL error: {}", messages.join("; ")));
        }

        response
            .data
            .ok_or_else(|| anyhow::anyhow!("GraphQL response without data"))
    }
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn fetch_open_pull_requests(
        &self,
        owner: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<PullRequest>> {
        debug!("Fetching open PRs for {}/{}", owner, repo);

        let route = format!("/repos/{}/{}/pulls", owner, repo);
        let pulls: Vec<RawPullRequest> = self.fetch_all_pages(&route, Some("open")).await?;
        let prs: Vec<PullRequest> = pulls.into_iter().map(convert_pull_request).collect();

        debug!("Fetched {} open PRs for {}/{}", prs.len(), owner, repo);
        Ok(prs)
    }

    async fn fetch_requested_reviewers(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<RequestedReviewers> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/requested_reviewers",
            owner, repo, pr_number
        );
        let raw: RawRequestedReviewers = self
            .octocrab
            .get(&route, None::<&()>)
            .await
            .with_context(|| format!("GET {}", route))?;

        Ok(RequestedReviewers {
            users: raw.users.into_iter().map(|u| u.login).collect(),
            teams: raw.teams.into_iter().map(|t| t.slug).collect(),
        })
    }

    async fn fetch_team_members(&self, org: &str, team_slug: &str) -> anyhow::Result<Vec<String>> {
        debug!("Fetching members of team {}/{}", org, team_slug);

        let route = format!("/orgs/{}/teams/{}/members", org, team_slug);
        let members: Vec<RawUser> = self.fetch_all_pages(&route, None).await?;
        Ok(members.into_iter().map(|u| u.login).collect())
    }

    async fn fetch_comments(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Comment>> {
        let route = format!("/repos/{}/{}/issues/{}/comments", owner, repo, pr_number);
        let raw: Vec<RawComment> = self.fetch_all_pages(&route, None).await?;

        let mut comments: Vec<Comment> = raw.into_iter().map(convert_comment).collect();
        // GitHub already returns ascending order; keep it stable regardless
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn find_project_item(
        &self,
        project_id: &str,
        pr_node_id: &str,
        pr_number: u64,
    ) -> anyhow::Result<Option<ProjectItem>> {
        let mut cursor: Option<String> = None;

        loop {
            let data: ProjectItemsData = self
                .graphql(
                    PROJECT_ITEMS_QUERY,
                    json!({ "project": project_id, "cursor": cursor }),
                )
                .await
                .with_context(|| format!("Failed to list items of project {}", project_id))?;

            let Some(items) = data.node.and_then(|n| n.items) else {
                warn!("Project {} not found or not a project board", project_id);
                return Ok(None);
            };

            let found = items
                .nodes
                .into_iter()
                .flatten()
                .filter_map(convert_project_item)
                .find(|item| item.links_to(pr_node_id, pr_number));
            if found.is_some() {
                return Ok(found);
            }

            if !items.page_info.has_next_page {
                return Ok(None);
            }
            cursor = items.page_info.end_cursor;
        }
    }

    async fn add_labels(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()> {
        let route = format!("/repos/{}/{}/issues/{}/labels", owner, repo, pr_number);
        let _: serde_json::Value = self
            .octocrab
            .post(&route, Some(&json!({ "labels": labels })))
            .await
            .with_context(|| format!("Failed to label PR #{}", pr_number))?;
        Ok(())
    }

    async fn request_team_review(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        team_slug: &str,
    ) -> anyhow::Result<ReviewRequestOutcome> {
        let route = format!(
            "/repos/{}/{}/pulls/{}/requested_reviewers",
            owner, repo, pr_number
        );
        let body = json!({ "reviewers": [], "team_reviewers": [team_slug] });
        let result: Result<serde_json::Value, octocrab::Error> =
            self.octocrab.post(&route, Some(&body)).await;

        match result {
            Ok(_) => Ok(ReviewRequestOutcome::Requested),
            Err(octocrab::Error::GitHub { source, .. }) => {
                match classify_review_conflict(source.status_code.as_u16(), &source.message) {
                    Some(reason) => Ok(ReviewRequestOutcome::Conflict(reason)),
                    None => Err(anyhow::anyhow!(
                        "Failed to request review from team {} on PR #{}: {}",
                        team_slug,
                        pr_number,
                        source.message
                    )),
                }
            }
            Err(e) => Err(anyhow::Error::new(e).context(format!(
                "Failed to request review from team {} on PR #{}",
                team_slug, pr_number
            ))),
        }
    }

    async fn add_assignees(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        logins: &[String],
    ) -> anyhow::Result<()> {
        let route = format!("/repos/{}/{}/issues/{}/assignees", owner, repo, pr_number);
        let _: serde_json::Value = self
            .octocrab
            .post(&route, Some(&json!({ "assignees": logins })))
            .await
            .with_context(|| format!("Failed to assign PR #{}", pr_number))?;
        Ok(())
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        body: &str,
    ) -> anyhow::Result<Comment> {
        let route = format!("/repos/{}/{}/issues/{}/comments", owner, repo, pr_number);
        let raw: RawComment = self
            .octocrab
            .post(&route, Some(&json!({ "body": body })))
            .await
            .with_context(|| format!("Failed to comment on PR #{}", pr_number))?;
        Ok(convert_comment(raw))
    }

    async fn set_project_item_status(
        &self,
        project_id: &str,
        item_id: &str,
        field_id: &str,
        option_id: &str,
    ) -> anyhow::Result<()> {
        let _: serde_json::Value = self
            .graphql(
                SET_ITEM_STATUS_MUTATION,
                json!({
                    "project": project_id,
                    "item": item_id,
                    "field": field_id,
                    "option": option_id,
                }),
            )
            .await
            .with_context(|| format!("Failed to update status of project item {}", item_id))?;
        Ok(())
    }
}

/// Decide whether a failed review request is a known, recoverable refusal
///
/// Returns the GitHub message when the status is 422 and the message matches
/// one of the known refusals.
fn classify_review_conflict(status: u16, message: &str) -> Option<String> {
    if status != 422 {
        return None;
    }
    let lower = message.to_lowercase();
    REVIEW_CONFLICT_MESSAGES
        .iter()
        .any(|known| lower.contains(known))
        .then(|| message.to_string())
}

#[derive(Debug, Serialize)]
struct PageParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    per_page: u8,
    page: u32,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    slug: String,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    number: u64,
    user: Option<RawUser>,
    created_at: DateTime<Utc>,
    node_id: String,
    #[serde(default)]
    labels: Vec<RawLabel>,
    #[serde(default)]
    assignees: Vec<RawUser>,
    #[serde(default)]
    requested_reviewers: Vec<RawUser>,
    #[serde(default)]
    requested_teams: Vec<RawTeam>,
}

#[derive(Debug, Deserialize)]
struct RawRequestedReviewers {
    #[serde(default)]
    users: Vec<RawUser>,
    #[serde(default)]
    teams: Vec<RawTeam>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    id: u64,
    user: Option<RawUser>,
    body: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProjectItemsData {
    node: Option<ProjectNode>,
}

#[derive(Debug, Deserialize)]
struct ProjectNode {
    items: Option<ProjectItemConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectItemConnection {
    nodes: Vec<Option<RawProjectItem>>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawProjectItem {
    id: String,
    content: Option<RawProjectItemContent>,
}

#[derive(Debug, Deserialize)]
struct RawProjectItemContent {
    id: Option<String>,
    number: Option<u64>,
}

fn login_or_unknown(user: Option<RawUser>) -> String {
    user.map(|u| u.login)
        .unwrap_or_else(|| "unknown".to_string())
}

/// Convert the REST pull request payload to our PullRequest type
fn convert_pull_request(pr: RawPullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        author: login_or_unknown(pr.user),
        created_at: pr.created_at,
        labels: pr.labels.into_iter().map(|l| l.name).collect(),
        assignees: pr.assignees.into_iter().map(|u| u.login).collect(),
        requested_reviewers: pr.requested_reviewers.into_iter().map(|u| u.login).collect(),
        requested_teams: pr.requested_teams.into_iter().map(|t| t.slug).collect(),
        node_id: pr.node_id,
    }
}

fn convert_comment(comment: RawComment) -> Comment {
    Comment {
        id: comment.id,
        author: login_or_unknown(comment.user),
        body: comment.body.unwrap_or_default(),
        created_at: comment.created_at,
    }
}

/// Items linked to issues or drafts carry no pull request number and are skipped
fn convert_project_item(item: RawProjectItem) -> Option<ProjectItem> {
    let content = item.content?;
    Some(ProjectItem {
        id: item.id,
        pr_number: content.number?,
        content_node_id: content.id,
    })
}
