use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::workflow::hierarchy::{DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH};

const CONFIG_DIR_NAME: &str = "ticket-trace";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_JIRA_URL: &str = "https://your-company.atlassian.net";
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
pub const DEFAULT_PAGE_SIZE: usize = 100;

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| AppError::Configuration("unable to locate config directory".to_string()))
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// Values persisted by `config init`. Environment variables take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub jira_url: Option<String>,
    pub jira_username: Option<String>,
    pub jira_api_token: Option<String>,
    pub gitlab_url: Option<String>,
    pub gitlab_token: Option<String>,
    pub max_depth: Option<usize>,
    pub page_size: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub concurrency: Option<usize>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|err| {
                AppError::Configuration(format!("invalid config file {}: {err}", path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub jira_url: String,
    pub jira_username: Option<String>,
    pub jira_api_token: Option<String>,
    pub gitlab_url: String,
    pub gitlab_token: Option<String>,
    pub max_depth: usize,
    pub page_size: usize,
    pub timeout_secs: Option<u64>,
    /// Upper bound on tracker and source control calls in flight at once.
    pub concurrency: usize,
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::resolve(stored, |key| env::var(key).ok())
    }

    /// Merges `stored` with the variables visible through `lookup`.
    pub fn resolve(
        stored: StoredConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let stored_text = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let config = Self {
            jira_url: var("JIRA_URL")
                .or(stored_text(stored.jira_url))
                .unwrap_or_else(|| DEFAULT_JIRA_URL.to_string()),
            jira_username: var("JIRA_USERNAME").or(stored_text(stored.jira_username)),
            jira_api_token: var("JIRA_API_TOKEN").or(stored_text(stored.jira_api_token)),
            gitlab_url: var("GITLAB_URL")
                .or(stored_text(stored.gitlab_url))
                .unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string()),
            gitlab_token: var("GITLAB_TOKEN").or(stored_text(stored.gitlab_token)),
            max_depth: parse_var("TICKET_TRACE_MAX_DEPTH", var("TICKET_TRACE_MAX_DEPTH"))?
                .or(stored.max_depth)
                .unwrap_or(DEFAULT_MAX_DEPTH),
            page_size: parse_var("TICKET_TRACE_PAGE_SIZE", var("TICKET_TRACE_PAGE_SIZE"))?
                .or(stored.page_size)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            timeout_secs: parse_var("TICKET_TRACE_TIMEOUT_SECS", var("TICKET_TRACE_TIMEOUT_SECS"))?
                .or(stored.timeout_secs),
            concurrency: parse_var("TICKET_TRACE_CONCURRENCY", var("TICKET_TRACE_CONCURRENCY"))?
                .or(stored.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY),
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make every analysis fail or stall.
    pub fn validate(&self) -> AppResult<()> {
        if self.timeout_secs == Some(0) {
            return Err(AppError::Configuration(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(AppError::Configuration(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>) -> AppResult<Option<T>> {
    value
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                AppError::Configuration(format!("{key} must be a non-negative integer, got '{raw}'"))
            })
        })
        .transpose()
}
