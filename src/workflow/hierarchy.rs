use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, join_all};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::git_link::GitLink;
use crate::domain::ticket::{Ticket, TicketRecord};
use crate::error::AppResult;
use crate::links::resolver::LinkResolver;
use crate::links::scanner::extract_git_links;
use crate::services::IssueTrackerService;

pub const DEFAULT_MAX_DEPTH: usize = 10;
pub const DEFAULT_CONCURRENCY: usize = 8;
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Builds the ticket tree below a root, mining each ticket for git links.
///
/// Traversal is bounded by `max_depth` alone: parent and epic links can form
/// cycles upstream and nothing else stops the recursion. Sibling subtrees and
/// link lookups run concurrently; results keep the order the tracker returned.
/// Every tracker call and link lookup holds one permit, so at most
/// `concurrency` of them are in flight across the whole tree.
pub struct HierarchyBuilder {
    issue_tracker: Arc<dyn IssueTrackerService>,
    resolver: LinkResolver,
    max_depth: usize,
    permits: Arc<Semaphore>,
}

impl HierarchyBuilder {
    pub fn new(issue_tracker: Arc<dyn IssueTrackerService>, resolver: LinkResolver) -> Self {
        Self {
            issue_tracker,
            resolver,
            max_depth: DEFAULT_MAX_DEPTH,
            permits: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(concurrency.max(1)));
        self
    }

    /// Runs `call` once a permit is free. Permits are only held around leaf
    /// calls, never across recursion into children.
    async fn throttled<T>(&self, call: impl Future<Output = T>) -> T {
        let _permit = self.permits.acquire().await;
        call.await
    }

    /// Returns `Ok(None)` when `depth` is past the bound. Only the fetch of
    /// `key` itself can fail; everything below it degrades to empty results.
    pub async fn build(&self, key: &str, depth: usize) -> AppResult<Option<Ticket>> {
        if depth > self.max_depth {
            return Ok(None);
        }

        let record = self.throttled(self.issue_tracker.fetch_ticket(key)).await?;
        Ok(Some(self.build_node(record, depth).await))
    }

    pub async fn build_root(&self, key: &str) -> AppResult<Ticket> {
        let record = self.throttled(self.issue_tracker.fetch_ticket(key)).await?;
        Ok(self.build_node(record, 0).await)
    }

    fn build_node(&self, record: TicketRecord, depth: usize) -> BoxFuture<'_, Ticket> {
        async move {
            let key = record.key.clone();
            let description = record.description.clone();
            let reporter = record.reporter.clone();
            debug!(ticket = %key, depth, "building ticket node");

            let (children, git_links) = futures::join!(
                self.build_children(&key, depth),
                self.collect_git_links(&key, description.as_deref(), reporter.as_deref()),
            );

            let mut ticket = Ticket::from_record(record);
            ticket.children = children;
            ticket.git_links = git_links;
            ticket
        }
        .boxed()
    }

    async fn build_children(&self, key: &str, depth: usize) -> Vec<Ticket> {
        if depth >= self.max_depth {
            debug!(ticket = key, depth, "depth limit reached, not expanding children");
            return Vec::new();
        }

        let records = match self.throttled(self.issue_tracker.fetch_children(key)).await {
            Ok(records) => records,
            Err(err) => {
                warn!(ticket = key, "failed to fetch children: {err}");
                return Vec::new();
            }
        };

        join_all(
            records
                .into_iter()
                .map(|child| self.build_node(child, depth + 1)),
        )
        .await
    }

    /// Links from the description come first, then each comment in tracker
    /// order. A URL mentioned by two people yields two links.
    async fn collect_git_links(
        &self,
        key: &str,
        description: Option<&str>,
        reporter: Option<&str>,
    ) -> Vec<GitLink> {
        let comments = match self.throttled(self.issue_tracker.fetch_comments(key)).await {
            Ok(comments) => comments,
            Err(err) => {
                warn!(ticket = key, "failed to fetch comments: {err}");
                Vec::new()
            }
        };

        let reporter = reporter.unwrap_or(UNKNOWN_AUTHOR);
        let mut mentions: Vec<(String, &str)> = extract_git_links(description.unwrap_or_default())
            .into_iter()
            .map(|url| (url, reporter))
            .collect();
        for comment in &comments {
            mentions.extend(
                extract_git_links(&comment.body)
                    .into_iter()
                    .map(|url| (url, comment.author.as_str())),
            );
        }

        if mentions.is_empty() {
            return Vec::new();
        }

        let mut distinct: Vec<&str> = Vec::new();
        for (url, _) in &mentions {
            if !distinct.contains(&url.as_str()) {
                distinct.push(url);
            }
        }
        let resolved: HashMap<&str, GitLink> = distinct
            .iter()
            .copied()
            .zip(
                join_all(
                    distinct
                        .iter()
                        .map(|url| self.throttled(self.resolver.resolve(url))),
                )
                .await,
            )
            .collect();

        debug!(
            ticket = key,
            mentions = mentions.len(),
            distinct = resolved.len(),
            "resolved git links"
        );

        mentions
            .iter()
            .filter_map(|(url, author)| {
                resolved
                    .get(url.as_str())
                    .map(|link| link.clone().attributed_to(author))
            })
            .collect()
    }
}
