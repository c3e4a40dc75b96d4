use serde::Serialize;

use crate::domain::git_link::GitLink;

/// A ticket as returned by the issue tracker, before any traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    pub key: String,
    pub issue_type: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<String>,
    pub reporter: Option<String>,
    pub description: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub body: String,
}

/// One node of an analysed hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub key: String,
    #[serde(rename = "type")]
    pub issue_type: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<String>,
    pub url: String,
    pub git_links: Vec<GitLink>,
    pub children: Vec<Ticket>,
}

impl Ticket {
    pub fn from_record(record: TicketRecord) -> Self {
        Self {
            key: record.key,
            issue_type: record.issue_type,
            summary: record.summary,
            status: record.status,
            assignee: record.assignee,
            url: record.url,
            git_links: Vec::new(),
            children: Vec::new(),
        }
    }
}
