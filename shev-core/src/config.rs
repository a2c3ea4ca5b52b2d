//! Server configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then the
//! process environment. Environment keys carry no prefix so the historic
//! names (`PORT`, `MAPBOX_ACCESSTOKEN`, `GMAP_APIKEY`, ...) keep working.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::error::{ShevError, ShevResult};
use crate::geo;

pub const DEFAULT_PORT: u16 = 8080;

/// Config file looked up in the working directory (`shev.toml`, `shev.json`, ...).
static LOCAL_CONFIG_NAME: &str = "shev";

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("shev"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_mapbox_base_url() -> String {
    geo::mapbox::DEFAULT_BASE_URL.to_string()
}

fn default_gmap_base_url() -> String {
    geo::google::DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShevConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Where the event store keeps its documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base URL used in share and calendar links; defaults to localhost
    pub public_url: Option<String>,

    /// Static assets served alongside the pages
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    #[serde(alias = "mapbox_accesstoken")]
    pub mapbox_access_token: Option<String>,

    #[serde(alias = "gmap_apikey")]
    pub gmap_api_key: Option<String>,

    #[serde(default = "default_mapbox_base_url")]
    pub mapbox_base_url: String,

    #[serde(default = "default_gmap_base_url")]
    pub gmap_base_url: String,
}

impl ShevConfig {
    /// Load from `path` (required when given) or the optional default files,
    /// with the environment on top.
    pub fn load(path: Option<&Path>) -> ShevResult<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(global) = Self::global_config_path() {
                    builder = builder.add_source(File::from(global).required(false));
                }
                builder = builder.add_source(File::with_name(LOCAL_CONFIG_NAME).required(false));
            }
        }

        Self::build(builder.add_source(Environment::default()))
    }

    /// `~/.config/shev/config.toml` (platform equivalent)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shev").join("config.toml"))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> ShevResult<Self> {
        builder
            .build()
            .map_err(|e| ShevError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ShevError::Config(e.to_string()))
    }

    /// Data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    pub fn public_url(&self) -> String {
        match self.public_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://localhost:{}", self.port),
        }
    }

    /// Mapbox token, if set to something non-blank.
    pub fn mapbox_access_token(&self) -> Option<&str> {
        non_blank(self.mapbox_access_token.as_deref())
    }

    /// Google API key, if set to something non-blank.
    pub fn gmap_api_key(&self) -> Option<&str> {
        non_blank(self.gmap_api_key.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
