use serde::{Serialize, Serializer};

pub const STATUS_UNKNOWN: &str = "Unknown";
pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_COMMITTED: &str = "Committed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    MergeRequest,
    Commit,
    BranchOrFile,
    Repository,
    Unknown,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::MergeRequest => "Merge Request",
            LinkKind::Commit => "Commit",
            LinkKind::BranchOrFile => "Branch/File",
            LinkKind::Repository => "Repository",
            LinkKind::Unknown => "Unknown",
        }
    }

    /// Whether this kind is enriched through a source control lookup.
    pub fn needs_lookup(&self) -> bool {
        matches!(self, LinkKind::MergeRequest | LinkKind::Commit)
    }
}

impl Serialize for LinkKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitLink {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub commented_by: String,
}

impl GitLink {
    /// A link carrying only what can be known without a remote call.
    pub fn unresolved(url: &str, kind: LinkKind, status: &str) -> Self {
        Self {
            url: url.to_string(),
            kind,
            status: status.to_string(),
            title: None,
            author: None,
            commented_by: String::new(),
        }
    }

    pub fn attributed_to(mut self, commented_by: &str) -> Self {
        self.commented_by = commented_by.to_string();
        self
    }
}
