use cr_core::{AliasTable, DEFAULT_RATINGS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for content rating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rating codes and their aliases, in redaction order
    #[serde(default = "default_ratings")]
    pub ratings: Vec<RatingConfig>,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingConfig {
    pub code: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// File shown in place of a single image the viewer may not see
    #[serde(default = "default_warning_image")]
    pub warning_image: String,

    /// Subtracted from a disallowed thumbnail candidate's score
    #[serde(default = "default_thumbnail_penalty")]
    pub thumbnail_penalty: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Surface store failures instead of reading them as unrated
    #[serde(default)]
    pub strict_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ratings: default_ratings(),
            media: MediaConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            warning_image: default_warning_image(),
            thumbnail_penalty: default_thumbnail_penalty(),
        }
    }
}

fn default_ratings() -> Vec<RatingConfig> {
    DEFAULT_RATINGS
        .iter()
        .map(|&(code, aliases)| RatingConfig {
            code: code.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        })
        .collect()
}

fn default_warning_image() -> String {
    "Content_rating_warning.png".to_string()
}

fn default_thumbnail_penalty() -> f64 {
    1000.0
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            Ok(config)
        }
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.alias_table()?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("org", "content-rating", "content-rating")
        {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from(".content-rating/config.toml")
        }
    }

    /// Build the alias table described by `ratings`
    pub fn alias_table(&self) -> anyhow::Result<AliasTable> {
        let table = AliasTable::new(
            self.ratings
                .iter()
                .map(|r| (r.code.as_str(), r.aliases.iter().map(String::as_str))),
        )?;
        Ok(table)
    }
}
