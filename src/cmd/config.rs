use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{AppConfig, StoredConfig, config_file_path};
use crate::context::AppContext;
use crate::error::AppResult;
use crate::workflow::analysis::{ConfigurationStatus, configuration_status};

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration (secrets masked).
    Show,
    /// Report whether Jira and GitLab credentials are in place.
    Check,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
        ConfigCommand::Check => run_check(),
    }
}

fn run_check() -> AppResult<()> {
    let ctx = AppContext::from_config(AppConfig::load()?);
    print!("{}", render_status(&configuration_status(&ctx)));
    Ok(())
}

pub fn render_status(status: &ConfigurationStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Jira ({}): {}\n",
        status.jira_url,
        configured_label(status.jira_configured)
    ));
    if !status.jira_configured {
        out.push_str("  Set JIRA_USERNAME and JIRA_API_TOKEN, or run `ticket-trace config init`.\n");
    }
    out.push_str(&format!(
        "GitLab ({}): {}\n",
        status.gitlab_url,
        configured_label(status.gitlab_configured)
    ));
    if !status.gitlab_configured {
        out.push_str("  Set GITLAB_TOKEN, or run `ticket-trace config init`.\n");
    }
    out
}

fn configured_label(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "not configured"
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring ticket-trace.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the local config file; protect your filesystem accordingly.");
    println!();

    apply_prompt(
        "Jira base URL (e.g., https://company.atlassian.net)",
        &mut cfg.jira_url,
        false,
    )?;
    apply_prompt("Jira username (email)", &mut cfg.jira_username, false)?;
    apply_prompt("Jira API token", &mut cfg.jira_api_token, true)?;
    apply_prompt(
        "GitLab base URL (e.g., https://gitlab.com)",
        &mut cfg.gitlab_url,
        false,
    )?;
    apply_prompt("GitLab access token", &mut cfg.gitlab_token, true)?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;

    println!("Configuration file: {}", path.display());
    println!("Jira base URL: {}", display_value(&cfg.jira_url));
    println!("Jira username: {}", display_value(&cfg.jira_username));
    println!("Jira API token: {}", mask_secret(&cfg.jira_api_token));
    println!("GitLab base URL: {}", display_value(&cfg.gitlab_url));
    println!("GitLab token: {}", mask_secret(&cfg.gitlab_token));
    println!("Max depth: {}", display_number(cfg.max_depth));
    println!("Search page size: {}", display_number(cfg.page_size));
    println!("Timeout (seconds): {}", display_number(cfg.timeout_secs));
    println!("Concurrent requests: {}", display_number(cfg.concurrency));

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim();

    if trimmed.is_empty() {
        Ok(PromptAction::Keep)
    } else if trimmed == "-" {
        Ok(PromptAction::Clear)
    } else {
        Ok(PromptAction::Set(trimmed.to_string()))
    }
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn display_number<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<default>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let prefix: String = token.chars().take(3).collect();
            let mut suffix: Vec<char> = token.chars().rev().take(3).collect();
            suffix.reverse();
            format!("{prefix}***{}", suffix.into_iter().collect::<String>())
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

enum PromptAction {
    Keep,
    Clear,
    Set(String),
}
