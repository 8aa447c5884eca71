//! Input URL checks

use crate::error::UrlError;

/// Validate that a string looks like a YouTube URL, returning it trimmed
pub fn validate_video_url(url: &str) -> Result<&str, UrlError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlError::Empty);
    }

    if url.contains("youtube.com") || url.contains("youtu.be") {
        Ok(url)
    } else {
        Err(UrlError::UnsupportedSite(url.to_string()))
    }
}

/// Whether the URL should go through the playlist flow
pub fn is_playlist_url(url: &str) -> bool {
    url.contains("playlist")
}
