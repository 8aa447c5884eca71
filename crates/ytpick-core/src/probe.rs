//! Quality detection by trial selectors.
//!
//! YouTube's format list does not always advertise every resolution that a
//! selector can actually reach (2K/4K streams are the usual casualties), so
//! each selector below is resolved by yt-dlp and whatever it lands on is
//! recorded.

use crate::error::ExtractError;
use crate::extractor::Extractor;
use crate::formats::{ProbedQuality, VideoInfo};
use tracing::{debug, info};

/// Selectors tried in order, with their menu descriptions
pub const TRIAL_SELECTORS: [(&str, &str); 9] = [
    ("best", "Best automatic quality"),
    ("bestvideo+bestaudio/best", "Best video + audio"),
    ("worst", "Lowest quality"),
    ("bestvideo[height<=2160]+bestaudio/best", "Up to 4K (2160p)"),
    ("bestvideo[height<=1440]+bestaudio/best", "Up to 2K (1440p)"),
    ("bestvideo[height<=1080]+bestaudio/best", "Up to 1080p"),
    ("bestvideo[height<=720]+bestaudio/best", "Up to 720p"),
    ("bestvideo[height<=480]+bestaudio/best", "Up to 480p"),
    ("bestvideo[height<=360]+bestaudio/best", "Up to 360p"),
];

/// Fallback when nothing could be probed
pub const DEFAULT_SELECTOR: &str = "bestvideo+bestaudio/best";

#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub info: VideoInfo,
    /// Every selector that resolved, in trial order, duplicates included
    pub available: Vec<ProbedQuality>,
}

/// Fetch metadata, then resolve every trial selector. Only the metadata
/// fetch is fatal; selectors that fail are skipped.
pub async fn probe_qualities(extractor: &Extractor, url: &str) -> Result<ProbeReport, ExtractError> {
    info!("Detecting available qualities");

    let info = extractor.fetch_info(url).await?;
    let mut available = Vec::new();

    for (selector, description) in TRIAL_SELECTORS {
        match extractor.resolve(url, selector).await {
            Ok(resolved) => {
                if let Some(probed) = ProbedQuality::from_resolution(selector, description, &resolved) {
                    debug!("{} -> {}", selector, probed.display());
                    available.push(probed);
                }
            }
            Err(e) => debug!("Skipping {}: {}", selector, e),
        }
    }

    Ok(ProbeReport { info, available })
}
