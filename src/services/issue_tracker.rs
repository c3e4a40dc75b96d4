use async_trait::async_trait;

use crate::domain::ticket::{Comment, TicketRecord};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Returns [`AppError::NotFound`](crate::error::AppError::NotFound) when the key does not exist.
    async fn fetch_ticket(&self, key: &str) -> AppResult<TicketRecord>;

    /// Tickets whose parent or epic link is `key`, in tracker order.
    async fn fetch_children(&self, key: &str) -> AppResult<Vec<TicketRecord>>;

    async fn fetch_comments(&self, key: &str) -> AppResult<Vec<Comment>>;

    fn is_configured(&self) -> bool;

    fn base_url(&self) -> &str;
}
