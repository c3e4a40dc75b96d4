use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::ticket::Ticket;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchySummary {
    pub total_tickets: usize,
    pub total_git_links: usize,
    pub max_depth: usize,
    pub ticket_type_breakdown: BTreeMap<String, usize>,
}

/// Result of a successful analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub summary: HierarchySummary,
    pub root: Ticket,
}
