//! Metadata queries against yt-dlp

use crate::error::ExtractError;
use crate::formats::{Format, PlaylistInfo, ResolvedSelection, VideoInfo};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Extractor {
    yt_dlp_path: PathBuf,
}

/// Top-level `-J` output when a format selector was applied
#[derive(Debug, Deserialize)]
struct SelectionOutput {
    #[serde(default)]
    requested_formats: Option<Vec<Format>>,
    #[serde(flatten)]
    chosen: Format,
}

impl Extractor {
    pub fn new(yt_dlp_path: PathBuf) -> Self {
        Self { yt_dlp_path }
    }

    /// Fetch title, uploader and the full format list of a single video
    pub async fn fetch_info(&self, url: &str) -> Result<VideoInfo, ExtractError> {
        info!("Fetching video information: {}", url);
        self.query(&["-J", "--no-playlist", "--no-warnings", url]).await
    }

    /// Ask yt-dlp what `selector` would download, without downloading
    pub async fn resolve(&self, url: &str, selector: &str) -> Result<ResolvedSelection, ExtractError> {
        debug!("Resolving selector {}", selector);
        let output: SelectionOutput = self
            .query(&["-J", "--no-playlist", "--no-warnings", "-f", selector, url])
            .await?;

        Ok(match output.requested_formats {
            Some(formats) if !formats.is_empty() => ResolvedSelection::Separate(formats),
            _ => ResolvedSelection::Single(output.chosen),
        })
    }

    /// List playlist entries without resolving each video
    pub async fn fetch_playlist(&self, url: &str) -> Result<PlaylistInfo, ExtractError> {
        info!("Fetching playlist: {}", url);
        self.query(&["-J", "--flat-playlist", "--no-warnings", url]).await
    }

    async fn query<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T, ExtractError> {
        debug!("yt-dlp {}", args.join(" "));

        let output = Command::new(&self.yt_dlp_path)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            let url = args.last().copied().unwrap_or_default();
            return Err(classify_failure(url, output.status.code(), &stderr));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| ExtractError::Parse(e.to_string()))
    }
}

fn classify_failure(url: &str, code: Option<i32>, stderr: &str) -> ExtractError {
    if stderr.contains("Video unavailable") || stderr.contains("Private video") {
        ExtractError::VideoUnavailable(url.to_string())
    } else if stderr.contains("is not a valid URL") {
        ExtractError::InvalidUrl(url.to_string())
    } else {
        ExtractError::YtDlpFailed {
            code,
            stderr: stderr.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_failure() {
        let url = "https://youtu.be/x";
        assert!(matches!(
            classify_failure(url, Some(1), "ERROR: [youtube] x: Video unavailable"),
            ExtractError::VideoUnavailable(u) if u == url
        ));
        assert!(matches!(
            classify_failure(url, Some(1), "ERROR: Private video. Sign in"),
            ExtractError::VideoUnavailable(_)
        ));
        assert!(matches!(
            classify_failure(url, Some(2), "ERROR: 'x' is not a valid URL"),
            ExtractError::InvalidUrl(_)
        ));
        assert!(matches!(
            classify_failure(url, Some(1), "  ERROR: HTTP Error 429\n"),
            ExtractError::YtDlpFailed { code: Some(1), stderr } if stderr == "ERROR: HTTP Error 429"
        ));
    }

    #[test]
    fn test_selection_output_with_requested_formats() {
        let json = r#"{
            "format_id": "137+140",
            "height": 1080,
            "requested_formats": [
                {"format_id": "137", "height": 1080, "width": 1920, "vcodec": "avc1.640028", "acodec": "none"},
                {"format_id": "140", "vcodec": "none", "acodec": "mp4a.40.2"}
            ]
        }"#;

        let output: SelectionOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.requested_formats.unwrap().len(), 2);
        assert_eq!(output.chosen.format_id, "137+140");
    }

    #[test]
    fn test_selection_output_single_format() {
        let json = r#"{"format_id": "18", "height": 360, "width": 640, "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "title": "x"}"#;

        let output: SelectionOutput = serde_json::from_str(json).unwrap();
        assert!(output.requested_formats.is_none());
        assert_eq!(output.chosen.height, Some(360));
        assert!(output.chosen.has_audio());
    }
}
