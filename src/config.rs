use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// How a multi-area query treats failed branches
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failed branch fails the whole query
    #[default]
    FailFast,
    /// Failed branches are dropped; the query only fails when all of them do
    Partial,
}

/// Settings for talking to TheMealDB and aggregating results
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MealDbConfig {
    /// API root, without a trailing slash
    pub base_url: String,
    /// Keyword used when a keyword-only query is given none
    pub default_keyword: String,
    /// HTTP request timeout in seconds
    pub timeout: u64,
    /// Timeout for a single fan-out branch in seconds
    pub branch_timeout: u64,
    /// Upper bound on area requests in flight for one query
    pub max_concurrent_branches: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for MealDbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_keyword: default_keyword(),
            timeout: default_timeout(),
            branch_timeout: default_branch_timeout(),
            max_concurrent_branches: default_max_concurrent_branches(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_keyword() -> String {
    "chicken".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_branch_timeout() -> u64 {
    15
}

fn default_max_concurrent_branches() -> usize {
    8
}

impl MealDbConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with TASTORO__ prefix
    /// 2. tastoro.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: TASTORO__DEFAULT_KEYWORD
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn branch_timeout(&self) -> Duration {
        Duration::from_secs(self.branch_timeout)
    }
}

/// Load configuration from `tastoro.toml` and `TASTORO__*` environment variables
pub fn load_config() -> Result<MealDbConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("tastoro").required(false))
        .add_source(
            Environment::with_prefix("TASTORO")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
