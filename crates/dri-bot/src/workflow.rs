//! One bot run
//!
//! Lists the open pull requests once and handles the eligible ones in order:
//! stale label, team review dispatch and DRI assignment, then escalation.

use crate::assignment::assign_dri;
use crate::clock::Clock;
use crate::dispatcher::{dispatch, DispatchOutcome};
use crate::eligibility::select_candidates;
use crate::escalation::{escalate, BoardUpdate, EscalationOutcome};
use crate::report::RunReport;
use crate::stale::ensure_stale_label;
use anyhow::Context;
use dri_config::DriConfig;
use gh_client::{GitHubClient, PullRequest};
use log::{debug, error, info};

pub struct Workflow<'a> {
    client: &'a dyn GitHubClient,
    config: &'a DriConfig,
    clock: &'a dyn Clock,
}

impl<'a> Workflow<'a> {
    pub fn new(client: &'a dyn GitHubClient, config: &'a DriConfig, clock: &'a dyn Clock) -> Self {
        Self {
            client,
            config,
            clock,
        }
    }

    pub async fn run(&self) -> anyhow::Result<RunReport> {
        let config = self.config;
        let mut report = RunReport::default();

        let open = self
            .client
            .fetch_open_pull_requests(&config.owner, &config.repo)
            .await
            .with_context(|| {
                format!("Failed to list pull requests of {}/{}", config.owner, config.repo)
            })?;
        report.open = open.len();

        let candidates = select_candidates(open, config, self.clock.now());
        report.candidates = candidates.len();
        info!(
            "{} of {} open pull requests in {}/{} are eligible",
            report.candidates, report.open, config.owner, config.repo
        );

        for mut pr in candidates {
            self.process(&mut pr, &mut report).await?;
        }

        Ok(report)
    }

    async fn process(&self, pr: &mut PullRequest, report: &mut RunReport) -> anyhow::Result<()> {
        let (client, config, clock) = (self.client, self.config, self.clock);
        debug!("Processing PR #{}", pr.number);

        if ensure_stale_label(client, config, pr)
            .await
            .with_context(|| format!("Failed to label PR #{}", pr.number))?
        {
            report.labeled += 1;
        }

        let outcome = dispatch(client, config, clock, pr)
            .await
            .with_context(|| format!("Failed to dispatch PR #{}", pr.number))?;
        match outcome {
            DispatchOutcome::NoCategory | DispatchOutcome::AlreadyHandled => {}
            DispatchOutcome::DryRun { .. } => report.review_requests += 1,
            DispatchOutcome::Conflict { .. } => {
                report.review_requests += 1;
                report.conflicts += 1;
            }
            DispatchOutcome::Unresolved { .. } => {
                report.review_requests += 1;
                report.unresolved += 1;
            }
            DispatchOutcome::Discovered { login, .. } => {
                report.review_requests += 1;
                assign_dri(client, config, pr, &login)
                    .await
                    .with_context(|| format!("Failed to assign {} to PR #{}", login, pr.number))?;
                report.assigned += 1;
            }
        }

        if !pr.has_assignees() {
            return Ok(());
        }

        match escalate(client, config, clock, pr).await {
            Ok(EscalationOutcome::Reminded { board, .. }) => {
                report.reminders += 1;
                if matches!(board, BoardUpdate::Updated { .. }) {
                    report.board_updates += 1;
                }
            }
            Ok(_) => {}
            Err(e) => {
                error!("Failed to escalate PR #{}: {:#}", pr.number, e);
                report.escalation_failures += 1;
            }
        }

        Ok(())
    }
}
