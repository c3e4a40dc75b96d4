use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::domain::git_link::{GitLink, LinkKind, STATUS_ACTIVE, STATUS_COMMITTED, STATUS_UNKNOWN};
use crate::error::AppResult;
use crate::services::SourceControlService;

/// What can be learned about a link from the URL alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub kind: LinkKind,
    pub project_path: Option<String>,
    pub object_id: Option<String>,
}

impl LinkTarget {
    fn unknown() -> Self {
        Self {
            kind: LinkKind::Unknown,
            project_path: None,
            object_id: None,
        }
    }
}

pub fn classify(url: &str) -> LinkTarget {
    let Ok(parsed) = Url::parse(url) else {
        return LinkTarget::unknown();
    };
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() < 2 {
        return LinkTarget::unknown();
    }

    // Markers only count after the project path; a group or project may itself
    // be named `commit` or `tree`.
    let path = format!("/{}/", segments[2..].join("/")).to_ascii_lowercase();
    let kind = if path.contains("/merge_requests/") {
        LinkKind::MergeRequest
    } else if path.contains("/commit/") {
        LinkKind::Commit
    } else if path.contains("/tree/") || path.contains("/blob/") {
        LinkKind::BranchOrFile
    } else {
        LinkKind::Repository
    };

    LinkTarget {
        kind,
        project_path: Some(segments[..2].join("/")),
        object_id: segments.last().map(|id| (*id).to_string()),
    }
}

/// Classifies git links and enriches merge requests and commits from the
/// source control API. Lookup failures degrade the link, they never fail it.
#[derive(Clone)]
pub struct LinkResolver {
    source_control: Arc<dyn SourceControlService>,
}

impl LinkResolver {
    pub fn new(source_control: Arc<dyn SourceControlService>) -> Self {
        Self { source_control }
    }

    pub async fn resolve(&self, url: &str) -> GitLink {
        let target = classify(url);
        let (Some(project_path), Some(object_id)) = (&target.project_path, &target.object_id)
        else {
            return GitLink::unresolved(url, LinkKind::Unknown, STATUS_UNKNOWN);
        };

        if !target.kind.needs_lookup() {
            return GitLink::unresolved(url, target.kind, STATUS_ACTIVE);
        }

        match self.lookup(target.kind, project_path, object_id).await {
            Ok((status, title, author)) => {
                debug!(url, kind = target.kind.as_str(), "resolved git link");
                GitLink {
                    url: url.to_string(),
                    kind: target.kind,
                    status,
                    title: Some(title),
                    author: Some(author),
                    commented_by: String::new(),
                }
            }
            Err(err) => {
                warn!(url, "failed to resolve git link: {err}");
                GitLink::unresolved(url, target.kind, STATUS_UNKNOWN)
            }
        }
    }

    async fn lookup(
        &self,
        kind: LinkKind,
        project_path: &str,
        object_id: &str,
    ) -> AppResult<(String, String, String)> {
        let project = self.source_control.get_project(project_path).await?;
        if kind == LinkKind::MergeRequest {
            let mr = self
                .source_control
                .get_merge_request(&project, object_id)
                .await?;
            Ok((capitalize(&mr.state), mr.title, mr.author_name))
        } else {
            let commit = self.source_control.get_commit(&project, object_id).await?;
            Ok((STATUS_COMMITTED.to_string(), commit.title, commit.author_name))
        }
    }
}

fn capitalize(state: &str) -> String {
    let mut chars = state.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => STATUS_UNKNOWN.to_string(),
    }
}
