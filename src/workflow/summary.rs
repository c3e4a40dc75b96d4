use crate::domain::summary::HierarchySummary;
use crate::domain::ticket::Ticket;

pub fn summarize(root: &Ticket) -> HierarchySummary {
    let mut summary = HierarchySummary::default();
    let mut pending = vec![(root, 0usize)];

    while let Some((ticket, depth)) = pending.pop() {
        summary.total_tickets += 1;
        summary.total_git_links += ticket.git_links.len();
        summary.max_depth = summary.max_depth.max(depth);
        *summary
            .ticket_type_breakdown
            .entry(ticket.issue_type.clone())
            .or_insert(0) += 1;

        pending.extend(ticket.children.iter().map(|child| (child, depth + 1)));
    }

    summary
}
