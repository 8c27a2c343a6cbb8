use serde::{Deserialize, Serialize};

pub mod client;
pub mod format;
pub mod gallery;
pub mod upload;
pub mod urls;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where the photo API lives. Relative photo paths returned by the list
/// endpoint are resolved against `base_url` as well.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_photos_path")]
    pub list_path: String,
    #[serde(default = "default_photos_path")]
    pub upload_path: String,
}

fn default_app_name() -> String {
    "Hirouen".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_photos_path() -> String {
    "/photos".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            list_path: default_photos_path(),
            upload_path: default_photos_path(),
        }
    }
}
