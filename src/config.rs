use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analytics::{StoreConfig, DEFAULT_VARIANCE};
use crate::trends::AnalyzerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Built dashboard to serve at `/`.
    pub web_root: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            web_root: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub variance: f64,
    pub seed: Option<u64>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            variance: DEFAULT_VARIANCE,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Zero keeps snapshots until restart.
    pub ttl_secs: u64,
    pub max_users: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            max_users: 10_000,
        }
    }
}

impl StoreSettings {
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            ttl: non_zero_secs(self.ttl_secs),
            max_users: self.max_users,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendsConfig {
    /// Zero disables the trending-list cache.
    pub cache_ttl_secs: u64,
    pub items_per_category: usize,
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 900,
            items_per_category: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub api_base: String,
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_ms: u64,
    pub temperature: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_ms: 15_000,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub analytics: AnalyticsConfig,
    pub store: StoreSettings,
    pub trends: TrendsConfig,
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), String> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)
                    .map_err(|err| format!("failed to read config: {}", err))?;
                Self::from_toml(&contents)?
            } else {
                AppConfig::default()
            }
        } else {
            AppConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| format!("failed to parse config: {}", err))
    }

    pub fn write(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create config dir: {}", err))?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| format!("failed to serialize config: {}", err))?;
        std::fs::write(path, payload).map_err(|err| format!("failed to write config: {}", err))?;
        Ok(())
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            seed: self.analytics.seed,
            cache_ttl: non_zero_secs(self.trends.cache_ttl_secs),
            items_per_category: self.trends.items_per_category,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(host) = env_string("INSIGHTS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse::<u16>("INSIGHTS_PORT") {
            self.server.port = port;
        }
        if let Some(web_root) = env_string("INSIGHTS_WEB_ROOT") {
            self.server.web_root = Some(web_root);
        }
        if let Some(variance) = env_parse::<f64>("INSIGHTS_VARIANCE") {
            self.analytics.variance = variance;
        }
        if let Some(seed) = env_parse::<u64>("INSIGHTS_SEED") {
            self.analytics.seed = Some(seed);
        }
        if let Some(ttl) = env_parse::<u64>("INSIGHTS_STORE_TTL_SECS") {
            self.store.ttl_secs = ttl;
        }
        if let Some(max_users) = env_parse::<usize>("INSIGHTS_STORE_MAX_USERS") {
            self.store.max_users = max_users;
        }
        if let Some(ttl) = env_parse::<u64>("INSIGHTS_TRENDS_TTL_SECS") {
            self.trends.cache_ttl_secs = ttl;
        }
        if let Some(api_base) = env_string("AI_API_BASE") {
            self.ai.api_base = api_base;
        }
        if let Some(model) = env_string("AI_MODEL") {
            self.ai.model = model;
        }
        if let Some(timeout) = env_parse::<u64>("AI_TIMEOUT_MS") {
            self.ai.timeout_ms = timeout;
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("INSIGHTS_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/insights.toml")))
}

fn env_string(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_string(name).and_then(|value| value.trim().parse::<T>().ok())
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}
