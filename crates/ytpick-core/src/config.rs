//! Configuration management for ytpick

use crate::error::ConfigError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub download: DownloadConfig,
    pub audio: AudioConfig,
    pub menu: MenuConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (yt-dlp finds its own if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Default download directory
    pub directory: PathBuf,
    /// Write the `.info.json` sidecar next to each download
    pub write_info_json: bool,
    /// Download uploaded subtitles
    pub write_subtitles: bool,
    /// Download automatically generated subtitles
    pub write_auto_subtitles: bool,
    /// Subtitle languages to fetch
    pub subtitle_langs: Vec<String>,
    /// Keep going when a playlist entry fails
    pub ignore_errors: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Target codec for audio-only downloads
    pub codec: String,
    /// Target bitrate in kbps
    pub quality: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuConfig {
    /// Maximum entries shown in each format section
    pub section_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                yt_dlp: None,
                ffmpeg: None,
            },
            download: DownloadConfig {
                directory: PathBuf::from("./downloads"),
                write_info_json: true,
                write_subtitles: true,
                write_auto_subtitles: true,
                subtitle_langs: vec!["es".to_string(), "en".to_string()],
                ignore_errors: true,
            },
            audio: AudioConfig {
                codec: "mp3".to_string(),
                quality: "320".to_string(),
            },
            menu: MenuConfig { section_limit: 5 },
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        // Load from default config directory
        if let Some(path) = Self::default_path() {
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
            }
        }

        // Load from specified config file
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment
        figment = figment.merge(Env::prefixed("YTPICK_").split("__"));

        figment.extract().map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Location of the per-user config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ytpick").join("config.toml"))
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp").map_err(|_| {
                ConfigError::InvalidValue(
                    "yt-dlp not found in PATH. Install it with: pip install yt-dlp".to_string(),
                )
            })
        }
    }

    /// Get FFmpeg path if configured or present in PATH
    pub fn ffmpeg_path(&self) -> Option<PathBuf> {
        self.paths
            .ffmpeg
            .clone()
            .or_else(|| which::which("ffmpeg").ok())
    }
}
