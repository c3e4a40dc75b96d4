pub mod gitlab;
pub mod jira;
