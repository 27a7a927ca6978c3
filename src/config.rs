use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::UserAliasResolver;
use crate::model::Repository;

pub const DEFAULT_CONFIG_PATH: &str = "migrate-repo.toml";
const DEFAULT_API_URL: &str = "https://api.github.com";
const ENV_TOKEN_PREFIX: &str = "env:";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub source: EndpointConfig,
    pub target: EndpointConfig,
    #[serde(default)]
    pub skip_users: Vec<String>,
    #[serde(default)]
    pub user_aliases: HashMap<String, String>,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Deserialize)]
pub struct EndpointConfig {
    pub owner: String,
    pub name: String,
    /// Literal token, or `env:NAME` to read it from the environment.
    pub token: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub ignore_ssl_verification: bool,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_cool_down_ms")]
    pub cool_down_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

fn default_batch_size() -> usize {
    10
}

fn default_cool_down_ms() -> u64 {
    1000
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            cool_down_ms: default_cool_down_ms(),
        }
    }
}

impl RateLimitConfig {
    pub fn cool_down(&self) -> Duration {
        Duration::from_millis(self.cool_down_ms)
    }
}

impl EndpointConfig {
    pub fn repository(&self) -> Repository {
        Repository::new(&self.owner, &self.name)
    }

    pub fn resolve_token(&self) -> Result<String> {
        match self.token.strip_prefix(ENV_TOKEN_PREFIX) {
            Some(var) => std::env::var(var)
                .with_context(|| format!("Environment variable {var} is not set")),
            None => Ok(self.token.clone()),
        }
    }
}

impl AppConfig {
    pub fn alias_resolver(&self) -> UserAliasResolver {
        UserAliasResolver::new(self.user_aliases.clone(), self.skip_users.iter().cloned())
    }
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        bail!("Config file {} not found", path.display());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents)?;
    if config.rate_limit.batch_size == 0 {
        bail!("rate_limit.batch_size must be at least 1");
    }
    // Target snapshots must reflect the previous run's writes.
    if config.target.cache_dir.is_some() {
        bail!("target.cache_dir is not supported; only the source side can be cached");
    }
    Ok(config)
}
