//! ytpick-core: quality detection and downloads for YouTube, driven by yt-dlp

pub mod config;
pub mod downloader;
pub mod error;
pub mod extractor;
pub mod formats;
pub mod menu;
pub mod probe;
pub mod progress;
pub mod url;

pub use config::Config;
pub use error::{ConfigError, DownloadError, ExtractError, UrlError};
