use std::sync::Arc;

use crate::config::AppConfig;
use crate::infra::gitlab::GitLabClient;
use crate::infra::jira::JiraClient;
use crate::services::{IssueTrackerService, SourceControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub source_control: Arc<dyn SourceControlService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        issue_tracker: Arc<dyn IssueTrackerService>,
        source_control: Arc<dyn SourceControlService>,
    ) -> Self {
        Self {
            config,
            issue_tracker,
            source_control,
        }
    }

    /// Wires the HTTP clients for Jira and GitLab from `config`.
    pub fn from_config(config: AppConfig) -> Self {
        let issue_tracker = Arc::new(JiraClient::new(
            config.jira_url.clone(),
            config.jira_username.clone(),
            config.jira_api_token.clone(),
            config.page_size,
        ));
        let source_control = Arc::new(GitLabClient::new(
            config.gitlab_url.clone(),
            config.gitlab_token.clone(),
        ));
        Self::new(config, issue_tracker, source_control)
    }
}
