use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::context::AppContext;
use crate::domain::summary::{AnalysisReport, HierarchySummary};
use crate::domain::ticket::Ticket;
use crate::error::{AppError, AppResult};
use crate::links::resolver::LinkResolver;
use crate::workflow::hierarchy::HierarchyBuilder;
use crate::workflow::summary::summarize;

/// Whether each collaborator has credentials, and where it points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationStatus {
    pub jira_configured: bool,
    pub gitlab_configured: bool,
    pub jira_url: String,
    pub gitlab_url: String,
}

pub fn configuration_status(ctx: &AppContext) -> ConfigurationStatus {
    ConfigurationStatus {
        jira_configured: ctx.issue_tracker.is_configured(),
        gitlab_configured: ctx.source_control.is_configured(),
        jira_url: ctx.issue_tracker.base_url().to_string(),
        gitlab_url: ctx.source_control.base_url().to_string(),
    }
}

/// Builds the hierarchy below `ticket_id` and summarises it.
///
/// Fails before any network call when a collaborator lacks credentials. Once
/// the root ticket is fetched, every later failure degrades the affected node
/// or link instead of failing the analysis.
pub async fn analyze_ticket(ctx: &AppContext, ticket_id: &str) -> AppResult<AnalysisReport> {
    let status = configuration_status(ctx);
    if !status.jira_configured {
        return Err(AppError::Configuration(
            "Jira credentials not configured; set JIRA_USERNAME and JIRA_API_TOKEN or run `ticket-trace config init`"
                .to_string(),
        ));
    }
    if !status.gitlab_configured {
        return Err(AppError::Configuration(
            "GitLab token not configured; set GITLAB_TOKEN or run `ticket-trace config init`"
                .to_string(),
        ));
    }

    let key = ticket_id.trim();
    if key.is_empty() {
        return Err(AppError::InvalidInput(
            "ticket id must not be empty".to_string(),
        ));
    }

    let builder = HierarchyBuilder::new(
        ctx.issue_tracker.clone(),
        LinkResolver::new(ctx.source_control.clone()),
    )
    .with_max_depth(ctx.config.max_depth)
    .with_concurrency(ctx.config.concurrency);

    info!(ticket = key, max_depth = ctx.config.max_depth, "analyzing ticket hierarchy");
    let build = builder.build_root(key);
    let root = match ctx.config.timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), build)
            .await
            .map_err(|_| AppError::Timeout(secs))??,
        None => build.await?,
    };

    let summary = summarize(&root);
    info!(
        ticket = key,
        tickets = summary.total_tickets,
        git_links = summary.total_git_links,
        max_depth = summary.max_depth,
        "analysis complete"
    );

    Ok(AnalysisReport { summary, root })
}

/// Wire shape of an analysis outcome, as consumed by the dashboard.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    Success {
        success: bool,
        summary: HierarchySummary,
        tickets: Vec<Ticket>,
    },
    Failure {
        error: String,
        #[serde(rename = "configurationRequired")]
        configuration_required: bool,
    },
}

impl From<AppResult<AnalysisReport>> for AnalysisPayload {
    fn from(result: AppResult<AnalysisReport>) -> Self {
        match result {
            Ok(report) => AnalysisPayload::Success {
                success: true,
                summary: report.summary,
                tickets: vec![report.root],
            },
            Err(err) => AnalysisPayload::Failure {
                configuration_required: err.is_configuration(),
                error: format!("Failed to analyze ticket: {err}"),
            },
        }
    }
}
