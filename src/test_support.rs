//! Recording fakes for the service traits.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ticket::{Comment, TicketRecord};
use crate::error::{AppError, AppResult};
use crate::services::{
    CommitInfo, IssueTrackerService, MergeRequestInfo, ProjectHandle, SourceControlService,
};

pub(crate) fn record(key: &str, issue_type: &str) -> TicketRecord {
    TicketRecord {
        key: key.to_string(),
        issue_type: issue_type.to_string(),
        summary: format!("Summary of {key}"),
        status: "Open".to_string(),
        assignee: None,
        reporter: Some("Reporter".to_string()),
        description: None,
        url: format!("https://jira.example.com/browse/{key}"),
    }
}

/// In-memory issue tracker. Every trait call is counted.
pub(crate) struct FakeIssueTracker {
    tickets: HashMap<String, TicketRecord>,
    children: HashMap<String, Vec<String>>,
    comments: HashMap<String, Vec<Comment>>,
    failing_children: HashSet<String>,
    failing_comments: HashSet<String>,
    configured: bool,
    latency: Option<Duration>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    fetched_children_of: Mutex<Vec<String>>,
}

impl Default for FakeIssueTracker {
    fn default() -> Self {
        Self {
            tickets: HashMap::new(),
            children: HashMap::new(),
            comments: HashMap::new(),
            failing_children: HashSet::new(),
            failing_comments: HashSet::new(),
            configured: true,
            latency: None,
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            fetched_children_of: Mutex::new(Vec::new()),
        }
    }
}

impl FakeIssueTracker {
    pub(crate) fn with_ticket(mut self, record: TicketRecord) -> Self {
        self.tickets.insert(record.key.clone(), record);
        self
    }

    pub(crate) fn with_children(mut self, parent: &str, children: &[&str]) -> Self {
        self.children.insert(
            parent.to_string(),
            children.iter().map(|c| (*c).to_string()).collect(),
        );
        self
    }

    pub(crate) fn with_comment(mut self, key: &str, author: &str, body: &str) -> Self {
        self.comments
            .entry(key.to_string())
            .or_default()
            .push(Comment {
                author: author.to_string(),
                body: body.to_string(),
            });
        self
    }

    pub(crate) fn failing_children_of(mut self, key: &str) -> Self {
        self.failing_children.insert(key.to_string());
        self
    }

    pub(crate) fn failing_comments_of(mut self, key: &str) -> Self {
        self.failing_comments.insert(key.to_string());
        self
    }

    pub(crate) fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Every call sleeps for `latency` unless a per-ticket delay applies.
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub(crate) fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self, key: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(key).copied().or(self.latency) {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn children_requests(&self) -> Vec<String> {
        self.fetched_children_of
            .lock()
            .map(|keys| keys.clone())
            .unwrap_or_default()
    }

    fn lookup(&self, key: &str) -> AppResult<TicketRecord> {
        self.tickets
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::NotFound(key.to_string()))
    }
}

#[async_trait]
impl IssueTrackerService for FakeIssueTracker {
    async fn fetch_ticket(&self, key: &str) -> AppResult<TicketRecord> {
        self.enter(key).await;
        self.lookup(key)
    }

    async fn fetch_children(&self, key: &str) -> AppResult<Vec<TicketRecord>> {
        self.enter(key).await;
        if let Ok(mut requested) = self.fetched_children_of.lock() {
            requested.push(key.to_string());
        }
        if self.failing_children.contains(key) {
            return Err(AppError::IssueTracker(format!(
                "search for children of {key} failed"
            )));
        }
        self.children
            .get(key)
            .map(|keys| keys.iter().map(|k| self.lookup(k)).collect::<AppResult<Vec<_>>>())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_comments(&self, key: &str) -> AppResult<Vec<Comment>> {
        self.enter(key).await;
        if self.failing_comments.contains(key) {
            return Err(AppError::IssueTracker(format!(
                "comments of {key} unavailable"
            )));
        }
        Ok(self.comments.get(key).cloned().unwrap_or_default())
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn base_url(&self) -> &str {
        "https://jira.example.com"
    }
}

/// In-memory source control API keyed by project path.
pub(crate) struct FakeSourceControl {
    merge_requests: HashMap<(String, String), MergeRequestInfo>,
    commits: HashMap<(String, String), CommitInfo>,
    failure: Option<String>,
    configured: bool,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
}

impl Default for FakeSourceControl {
    fn default() -> Self {
        Self {
            merge_requests: HashMap::new(),
            commits: HashMap::new(),
            failure: None,
            configured: true,
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeSourceControl {
    pub(crate) fn with_merge_request(
        mut self,
        project: &str,
        iid: &str,
        state: &str,
        title: &str,
        author: &str,
    ) -> Self {
        self.merge_requests.insert(
            (project.to_string(), iid.to_string()),
            MergeRequestInfo {
                state: state.to_string(),
                title: title.to_string(),
                author_name: author.to_string(),
            },
        );
        self
    }

    pub(crate) fn with_commit(mut self, project: &str, sha: &str, title: &str, author: &str) -> Self {
        self.commits.insert(
            (project.to_string(), sha.to_string()),
            CommitInfo {
                title: title.to_string(),
                author_name: author.to_string(),
            },
        );
        self
    }

    /// Delays the project lookup for `project`.
    pub(crate) fn with_delay(mut self, project: &str, delay: Duration) -> Self {
        self.delays.insert(project.to_string(), delay);
        self
    }

    pub(crate) fn failing_with(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub(crate) fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> AppResult<()> {
        match &self.failure {
            Some(message) => Err(AppError::SourceControl(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SourceControlService for FakeSourceControl {
    async fn get_project(&self, path: &str) -> AppResult<ProjectHandle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        self.check_failure()?;
        Ok(ProjectHandle {
            id: 1,
            path: path.to_string(),
        })
    }

    async fn get_merge_request(
        &self,
        project: &ProjectHandle,
        iid: &str,
    ) -> AppResult<MergeRequestInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.merge_requests
            .get(&(project.path.clone(), iid.to_string()))
            .cloned()
            .ok_or_else(|| AppError::SourceControl(format!("404 merge request {iid}")))
    }

    async fn get_commit(&self, project: &ProjectHandle, sha: &str) -> AppResult<CommitInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.commits
            .get(&(project.path.clone(), sha.to_string()))
            .cloned()
            .ok_or_else(|| AppError::SourceControl(format!("404 commit {sha}")))
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn base_url(&self) -> &str {
        "https://gitlab.example.com"
    }
}
