use crate::context::AppContext;
use crate::domain::git_link::GitLink;
use crate::domain::summary::{AnalysisReport, HierarchySummary};
use crate::domain::ticket::Ticket;
use crate::error::AppResult;
use crate::workflow::analysis::analyze_ticket;

#[derive(Debug, Clone)]
pub struct AnalyzeCommandArgs {
    pub ticket: String,
}

pub async fn run(ctx: &AppContext, args: AnalyzeCommandArgs) -> AppResult<AnalysisReport> {
    analyze_ticket(ctx, &args.ticket).await
}

pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();
    render_ticket(&report.root, 0, &mut out);
    out.push('\n');
    render_summary(&report.summary, &mut out);
    out
}

fn render_ticket(ticket: &Ticket, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!(
        "{indent}{} [{}] {} ({})",
        ticket.key, ticket.issue_type, ticket.summary, ticket.status
    ));
    if let Some(assignee) = &ticket.assignee {
        out.push_str(&format!(" @{assignee}"));
    }
    out.push('\n');

    for link in &ticket.git_links {
        out.push_str(&format!("{indent}  - {}\n", describe_link(link)));
    }
    for child in &ticket.children {
        render_ticket(child, depth + 1, out);
    }
}

fn describe_link(link: &GitLink) -> String {
    let mut line = format!("{} {}: {}", link.kind.as_str(), link.status, link.url);
    if let Some(title) = &link.title {
        line.push_str(&format!(" \"{title}\""));
    }
    if let Some(author) = &link.author {
        line.push_str(&format!(" by {author}"));
    }
    line.push_str(&format!(" (mentioned by {})", link.commented_by));
    line
}

fn render_summary(summary: &HierarchySummary, out: &mut String) {
    out.push_str(&format!(
        "{} tickets, {} git links, max depth {}\n",
        summary.total_tickets, summary.total_git_links, summary.max_depth
    ));
    for (issue_type, count) in &summary.ticket_type_breakdown {
        out.push_str(&format!("  {issue_type}: {count}\n"));
    }
}
