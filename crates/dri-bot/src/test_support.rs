//! In-memory GitHub for workflow tests
//!
//! Writes are recorded and applied to the in-memory state, so a second run
//! observes what the first one did.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use dri_config::{DriConfig, ProjectBoardConfig};
use gh_client::{
    Comment, GitHubClient, ProjectItem, PullRequest, RequestedReviewers, ReviewRequestOutcome,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

pub(crate) const BOT: &str = "renovate[bot]";
pub(crate) const PROJECT_ID: &str = "PVT_board";
pub(crate) const STATUS_FIELD: &str = "PVTSSF_status";
pub(crate) const DELAYED_OPTION: &str = "opt_delayed";

/// A mutation the bot sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Write {
    Label { pr: u64, labels: Vec<String> },
    ReviewRequest { pr: u64, team: String },
    Assign { pr: u64, logins: Vec<String> },
    Comment { pr: u64, body: String },
    BoardStatus { item: String, option: String },
}

pub(crate) fn test_config() -> DriConfig {
    DriConfig {
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        project: Some(ProjectBoardConfig {
            project_id: PROJECT_ID.to_string(),
            status_field_id: STATUS_FIELD.to_string(),
            delayed_option_id: DELAYED_OPTION.to_string(),
        }),
        ..DriConfig::default()
    }
}

#[derive(Debug)]
struct State {
    now: DateTime<Utc>,
    prs: BTreeMap<u64, PullRequest>,
    team_members: HashMap<String, Vec<String>>,
    /// Login GitHub picks when a team review is requested
    auto_assign: HashMap<String, String>,
    /// Reviewer polls before the picked login becomes visible
    assign_after_polls: usize,
    polls: HashMap<u64, usize>,
    pending_reviewer: HashMap<u64, String>,
    review_conflicts: HashMap<String, String>,
    comments: HashMap<u64, Vec<Comment>>,
    failing_comment_reads: HashSet<u64>,
    board: Vec<ProjectItem>,
    board_status: HashMap<String, String>,
    next_comment_id: u64,
    writes: Vec<Write>,
}

#[derive(Debug)]
pub(crate) struct MockGitHub {
    state: Mutex<State>,
}

impl MockGitHub {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                now: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
                prs: BTreeMap::new(),
                team_members: HashMap::new(),
                auto_assign: HashMap::new(),
                assign_after_polls: 1,
                polls: HashMap::new(),
                pending_reviewer: HashMap::new(),
                review_conflicts: HashMap::new(),
                comments: HashMap::new(),
                failing_comment_reads: HashSet::new(),
                board: Vec::new(),
                board_status: HashMap::new(),
                next_comment_id: 1,
                writes: Vec::new(),
            }),
        }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.state.lock().unwrap().now
    }

    /// Move the platform's clock (used for new comment timestamps)
    pub(crate) fn advance(&self, by: Duration) {
        self.state.lock().unwrap().now += by;
    }

    /// A bot pull request opened `age_days` ago, not yet stored
    pub(crate) fn bot_pr(&self, number: u64, age_days: i64, labels: &[&str]) -> PullRequest {
        PullRequest {
            number,
            author: BOT.to_string(),
            created_at: self.now() - Duration::days(age_days),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            assignees: vec![],
            requested_reviewers: vec![],
            requested_teams: vec![],
            node_id: format!("PR_node_{}", number),
        }
    }

    pub(crate) fn add_pr(&self, pr: PullRequest) {
        self.state.lock().unwrap().prs.insert(pr.number, pr);
    }

    pub(crate) fn pr(&self, number: u64) -> PullRequest {
        self.state.lock().unwrap().prs[&number].clone()
    }

    pub(crate) fn with_team(&self, slug: &str, members: &[&str]) {
        self.state.lock().unwrap().team_members.insert(
            slug.to_string(),
            members.iter().map(|m| m.to_string()).collect(),
        );
    }

    /// When `team` is requested, GitHub hands the review to `login`
    pub(crate) fn auto_assign(&self, team: &str, login: &str) {
        self.state
            .lock()
            .unwrap()
            .auto_assign
            .insert(team.to_string(), login.to_string());
    }

    pub(crate) fn assign_after_polls(&self, polls: usize) {
        self.state.lock().unwrap().assign_after_polls = polls;
    }

    pub(crate) fn reject_team(&self, team: &str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .review_conflicts
            .insert(team.to_string(), message.to_string());
    }

    pub(crate) fn add_comment(&self, pr: u64, body: &str, created_at: DateTime<Utc>) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_comment_id;
        state.next_comment_id += 1;
        state.comments.entry(pr).or_default().push(Comment {
            id,
            author: "someone".to_string(),
            body: body.to_string(),
            created_at,
        });
    }

    pub(crate) fn comments(&self, pr: u64) -> Vec<Comment> {
        self.state
            .lock()
            .unwrap()
            .comments
            .get(&pr)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn fail_comment_reads(&self, pr: u64) {
        self.state.lock().unwrap().failing_comment_reads.insert(pr);
    }

    pub(crate) fn add_board_item(&self, item_id: &str, pr: u64) {
        self.add_foreign_board_item(item_id, pr, &format!("PR_node_{}", pr));
    }

    /// Board item for a pull request with `node_id`, possibly from another repository
    pub(crate) fn add_foreign_board_item(&self, item_id: &str, pr: u64, node_id: &str) {
        self.state.lock().unwrap().board.push(ProjectItem {
            id: item_id.to_string(),
            pr_number: pr,
            content_node_id: Some(node_id.to_string()),
        });
    }

    pub(crate) fn board_status(&self, item_id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .board_status
            .get(item_id)
            .cloned()
    }

    pub(crate) fn writes(&self) -> Vec<Write> {
        self.state.lock().unwrap().writes.clone()
    }

    pub(crate) fn clear_writes(&self) {
        self.state.lock().unwrap().writes.clear();
    }

    pub(crate) fn polls(&self, pr: u64) -> usize {
        self.state
            .lock()
            .unwrap()
            .polls
            .get(&pr)
            .copied()
            .unwrap_or(0)
    }
}

fn missing_pr(pr: u64) -> anyhow::Error {
    anyhow::anyhow!("PR #{} not found", pr)
}

#[async_trait]
impl GitHubClient for MockGitHub {
    async fn fetch_open_pull_requests(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> anyhow::Result<Vec<PullRequest>> {
        Ok(self.state.lock().unwrap().prs.values().cloned().collect())
    }

    async fn fetch_requested_reviewers(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<RequestedReviewers> {
        let mut state = self.state.lock().unwrap();
        let polls = {
            let polls = state.polls.entry(pr_number).or_insert(0);
            *polls += 1;
            *polls
        };

        if polls >= state.assign_after_polls {
            if let Some(login) = state.pending_reviewer.remove(&pr_number) {
                let pr = state
                    .prs
                    .get_mut(&pr_number)
                    .ok_or_else(|| missing_pr(pr_number))?;
                pr.requested_reviewers.push(login);
            }
        }

        let pr = state.prs.get(&pr_number).ok_or_else(|| missing_pr(pr_number))?;
        Ok(RequestedReviewers {
            users: pr.requested_reviewers.clone(),
            teams: pr.requested_teams.clone(),
        })
    }

    async fn fetch_team_members(&self, _org: &str, team_slug: &str) -> anyhow::Result<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .team_members
            .get(team_slug)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("team {} not found", team_slug))
    }

    async fn fetch_comments(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
    ) -> anyhow::Result<Vec<Comment>> {
        let state = self.state.lock().unwrap();
        if state.failing_comment_reads.contains(&pr_number) {
            return Err(anyhow::anyhow!("502 Bad Gateway"));
        }
        let mut comments = state.comments.get(&pr_number).cloned().unwrap_or_default();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn find_project_item(
        &self,
        _project_id: &str,
        pr_node_id: &str,
        pr_number: u64,
    ) -> anyhow::Result<Option<ProjectItem>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .board
            .iter()
            .find(|item| item.links_to(pr_node_id, pr_number))
            .cloned())
    }

    async fn add_labels(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
        labels: &[String],
    ) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.writes.push(Write::Label {
            pr: pr_number,
            labels: labels.to_vec(),
        });
        let pr = state
            .prs
            .get_mut(&pr_number)
            .ok_or_else(|| missing_pr(pr_number))?;
        for label in labels {
            if !pr.labels.contains(label) {
                pr.labels.push(label.clone());
            }
        }
        Ok(())
    }

    async fn request_team_review(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
        team_slug: &str,
    ) -> anyhow::Result<ReviewRequestOutcome> {
        let mut state = self.state.lock().unwrap();
        state.writes.push(Write::ReviewRequest {
            pr: pr_number,
            team: team_slug.to_string(),
        });

        if let Some(message) = state.review_conflicts.get(team_slug) {
            return Ok(ReviewRequestOutcome::Conflict(message.clone()));
        }

        match state.auto_assign.get(team_slug).cloned() {
            Some(login) => {
                state.pending_reviewer.insert(pr_number, login);
            }
            None => {
                let pr = state
                    .prs
                    .get_mut(&pr_number)
                    .ok_or_else(|| missing_pr(pr_number))?;
                pr.requested_teams.push(team_slug.to_string());
            }
        }
        Ok(ReviewRequestOutcome::Requested)
    }

    async fn add_assignees(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
        logins: &[String],
    ) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.writes.push(Write::Assign {
            pr: pr_number,
            logins: logins.to_vec(),
        });
        let pr = state
            .prs
            .get_mut(&pr_number)
            .ok_or_else(|| missing_pr(pr_number))?;
        for login in logins {
            if !pr.assignees.contains(login) {
                pr.assignees.push(login.clone());
            }
        }
        Ok(())
    }

    async fn create_comment(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
        body: &str,
    ) -> anyhow::Result<Comment> {
        let mut state = self.state.lock().unwrap();
        state.writes.push(Write::Comment {
            pr: pr_number,
            body: body.to_string(),
        });
        let comment = Comment {
            id: state.next_comment_id,
            author: "dri-bot".to_string(),
            body: body.to_string(),
            created_at: state.now,
        };
        state.next_comment_id += 1;
        state
            .comments
            .entry(pr_number)
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn set_project_item_status(
        &self,
        _project_id: &str,
        item_id: &str,
        _field_id: &str,
        option_id: &str,
    ) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.writes.push(Write::BoardStatus {
            item: item_id.to_string(),
            option: option_id.to_string(),
        });
        state
            .board_status
            .insert(item_id.to_string(), option_id.to_string());
        Ok(())
    }
}
