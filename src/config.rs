use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::CachePolicy;
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.sankavollerei.com/anime/samehadaku";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub images: ImageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Freshness window for cached responses; 0 disables caching
    #[serde(default = "default_revalidate_secs")]
    pub revalidate_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_player_args")]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_revalidate_secs() -> u64 {
    3600
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_user_agent() -> String {
    "nonton/0.1".to_string()
}

fn default_player_args() -> Vec<String> {
    vec!["--fullscreen".to_string()]
}

fn default_accent_color() -> String {
    "magenta".to_string()
}

fn default_true() -> bool {
    true
}

fn default_allowed_hosts() -> Vec<String> {
    vec![
        "placehold.co".to_string(),
        "v1.samehadaku.how".to_string(),
        "www.sankavollerei.com".to_string(),
        "*.samehadaku.how".to_string(),
    ]
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            revalidate_secs: default_revalidate_secs(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            args: default_player_args(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            allowed_hosts: default_allowed_hosts(),
        }
    }
}

impl ApiConfig {
    pub fn cache_policy(&self) -> CachePolicy {
        if self.revalidate_secs == 0 {
            CachePolicy::NoStore
        } else {
            CachePolicy::Revalidate(Duration::from_secs(self.revalidate_secs))
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "nonton").ok_or(Error::NoConfigDir)
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

pub fn cache_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.cache_dir().to_path_buf())
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Read the config at `path`, writing the defaults there first if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Config::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
