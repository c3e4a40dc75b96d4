//! Traverses a Jira ticket's parent/epic hierarchy, mines ticket text for
//! GitLab links and summarises what it found.

pub mod cmd;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod infra;
pub mod links;
pub mod services;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::context::AppContext;
pub use crate::error::{AppError, AppResult};
pub use crate::workflow::analysis::{AnalysisPayload, ConfigurationStatus, analyze_ticket};
