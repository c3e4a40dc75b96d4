use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::form_urlencoded;

use crate::error::{AppError, AppResult};
use crate::services::{CommitInfo, MergeRequestInfo, ProjectHandle, SourceControlService};

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

pub struct GitLabClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GitLabClient {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn token(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::Configuration("GitLab token not configured".to_string()))
    }

    /// `group/project` becomes `group%2Fproject`, as the projects API expects.
    fn encode_path(path: &str) -> String {
        form_urlencoded::byte_serialize(path.as_bytes()).collect()
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let token = self.token()?;
        let url = format!("{}/api/v4/{}", self.base_url, path);
        debug!(%url, "calling GitLab");

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| AppError::SourceControl(format!("failed to call GitLab: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::SourceControl(format!(
                "GitLab responded with {status}: {body}"
            )));
        }

        response.json().await.map_err(|err| {
            AppError::SourceControl(format!("failed to parse GitLab response: {err}"))
        })
    }
}

#[async_trait]
impl SourceControlService for GitLabClient {
    async fn get_project(&self, path: &str) -> AppResult<ProjectHandle> {
        let project: GitLabProject = self
            .get_json(&format!("projects/{}", Self::encode_path(path)))
            .await?;
        Ok(ProjectHandle {
            id: project.id,
            path: project.path_with_namespace,
        })
    }

    async fn get_merge_request(
        &self,
        project: &ProjectHandle,
        iid: &str,
    ) -> AppResult<MergeRequestInfo> {
        let mr: GitLabMergeRequest = self
            .get_json(&format!("projects/{}/merge_requests/{}", project.id, iid))
            .await?;
        Ok(MergeRequestInfo {
            state: mr.state,
            title: mr.title,
            author_name: mr
                .author
                .and_then(|author| author.name)
                .unwrap_or_else(|| "Unknown".to_string()),
        })
    }

    async fn get_commit(&self, project: &ProjectHandle, sha: &str) -> AppResult<CommitInfo> {
        let commit: GitLabCommit = self
            .get_json(&format!(
                "projects/{}/repository/commits/{}",
                project.id, sha
            ))
            .await?;
        Ok(CommitInfo {
            title: commit.title,
            author_name: commit.author_name,
        })
    }

    fn is_configured(&self) -> bool {
        self.token().is_ok()
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Deserialize)]
struct GitLabProject {
    id: u64,
    path_with_namespace: String,
}

#[derive(Deserialize)]
struct GitLabMergeRequest {
    state: String,
    title: String,
    author: Option<GitLabUser>,
}

#[derive(Deserialize)]
struct GitLabUser {
    name: Option<String>,
}

#[derive(Deserialize)]
struct GitLabCommit {
    title: String,
    author_name: String,
}
