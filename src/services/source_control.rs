use async_trait::async_trait;

use crate::error::AppResult;

/// Resolved project reference, passed back into the per-object lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHandle {
    pub id: u64,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestInfo {
    pub state: String,
    pub title: String,
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub title: String,
    pub author_name: String,
}

#[async_trait]
pub trait SourceControlService: Send + Sync {
    async fn get_project(&self, path: &str) -> AppResult<ProjectHandle>;

    async fn get_merge_request(
        &self,
        project: &ProjectHandle,
        iid: &str,
    ) -> AppResult<MergeRequestInfo>;

    async fn get_commit(&self, project: &ProjectHandle, sha: &str) -> AppResult<CommitInfo>;

    fn is_configured(&self) -> bool;

    fn base_url(&self) -> &str;
}
