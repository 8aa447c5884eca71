//! Format models parsed from yt-dlp JSON, and the helpers that turn them
//! into menu material.

use serde::Deserialize;
use std::collections::HashSet;

/// One encoded stream as reported by yt-dlp
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Format {
    #[serde(default)]
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub abr: Option<f64>,
    #[serde(default)]
    pub filesize: Option<f64>,
    #[serde(default)]
    pub filesize_approx: Option<f64>,
}

impl Format {
    pub fn has_video(&self) -> bool {
        codec_present(self.vcodec.as_deref())
    }

    pub fn has_audio(&self) -> bool {
        codec_present(self.acodec.as_deref())
    }

    /// Exact size if known, otherwise yt-dlp's estimate
    pub fn size(&self) -> Option<f64> {
        self.filesize.or(self.filesize_approx)
    }

    pub fn ext_upper(&self) -> String {
        self.ext.as_deref().unwrap_or("unknown").to_uppercase()
    }
}

fn codec_present(codec: Option<&str>) -> bool {
    matches!(codec, Some(c) if !c.is_empty() && c != "none")
}

/// Video metadata from `yt-dlp -J`
#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub formats: Vec<Format>,
}

/// Flat playlist listing from `yt-dlp -J --flat-playlist`
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub entries: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl PlaylistEntry {
    /// URL to query for this entry, falling back to the watch page
    pub fn watch_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", self.id))
    }
}

/// What a format selector resolves to for a given video
#[derive(Debug, Clone)]
pub enum ResolvedSelection {
    /// Separate streams that yt-dlp would merge
    Separate(Vec<Format>),
    /// A single stream
    Single(Format),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    CombinedSeparate,
    CombinedDirect,
    VideoOnly,
}

impl StreamKind {
    pub fn is_combined(&self) -> bool {
        matches!(self, StreamKind::CombinedSeparate | StreamKind::CombinedDirect)
    }
}

/// A trial selector that resolved to a concrete resolution
#[derive(Debug, Clone)]
pub struct ProbedQuality {
    pub selector: String,
    pub description: String,
    pub resolution: String,
    pub height: u32,
    pub fps: Option<f64>,
    pub codec: String,
    pub kind: StreamKind,
}

impl ProbedQuality {
    /// Describe what `selector` resolved to. `None` when nothing with a
    /// known video stream was chosen.
    pub fn from_resolution(
        selector: &str,
        description: &str,
        resolved: &ResolvedSelection,
    ) -> Option<Self> {
        match resolved {
            ResolvedSelection::Separate(formats) => {
                let video = formats.iter().filter(|f| f.has_video()).last()?;
                let resolution = match (video.width, video.height) {
                    (Some(w), Some(h)) if w > 0 && h > 0 => format!("{}x{}", w, h),
                    (_, Some(h)) if h > 0 => format!("{}p", h),
                    _ => "N/A".to_string(),
                };
                Some(Self {
                    selector: selector.to_string(),
                    description: description.to_string(),
                    resolution,
                    height: video.height.unwrap_or(0),
                    fps: video.fps,
                    codec: video.vcodec.clone().unwrap_or_default(),
                    kind: StreamKind::CombinedSeparate,
                })
            }
            ResolvedSelection::Single(format) => {
                let height = format.height.filter(|h| *h > 0)?;
                let resolution = match format.width {
                    Some(w) if w > 0 => format!("{}x{}", w, height),
                    _ => format!("{}p", height),
                };
                let kind = if format.has_audio() {
                    StreamKind::CombinedDirect
                } else {
                    StreamKind::VideoOnly
                };
                Some(Self {
                    selector: selector.to_string(),
                    description: description.to_string(),
                    resolution,
                    height,
                    fps: format.fps,
                    codec: format.vcodec.clone().unwrap_or_default(),
                    kind,
                })
            }
        }
    }

    /// Codec family without the profile suffix (`avc1.64001F` -> `avc1`)
    pub fn codec_family(&self) -> &str {
        self.codec.split('.').next().unwrap_or("")
    }

    pub fn display(&self) -> String {
        let mut out = self.resolution.clone();
        if let Some(fps) = self.fps {
            out.push_str(&format!(" @{}fps", fps));
        }
        let family = self.codec_family();
        if !family.is_empty() {
            out.push_str(&format!(" ({})", family));
        }
        out
    }
}

/// Keep one entry per known height, highest first
pub fn dedupe_by_height(probes: &[ProbedQuality]) -> Vec<ProbedQuality> {
    let mut seen = HashSet::new();
    let mut unique: Vec<ProbedQuality> = probes
        .iter()
        .filter(|p| p.height > 0 && seen.insert(p.height))
        .cloned()
        .collect();
    unique.sort_by(|a, b| b.height.cmp(&a.height));
    unique
}

/// Formats grouped the way the menu lists them
#[derive(Debug, Clone, Default)]
pub struct FormatCatalog {
    pub combined: Vec<Format>,
    pub video: Vec<Format>,
    pub audio: Vec<Format>,
}

impl FormatCatalog {
    pub fn classify(formats: &[Format]) -> Self {
        let mut catalog = FormatCatalog::default();

        for f in formats {
            let has_height = f.height.is_some_and(|h| h > 0);
            if f.has_video() && f.has_audio() && has_height {
                catalog.combined.push(f.clone());
            } else if f.has_video() && has_height {
                catalog.video.push(f.clone());
            } else if f.has_audio() {
                catalog.audio.push(f.clone());
            }
        }

        catalog.combined.sort_by(|a, b| b.height.cmp(&a.height));
        catalog.video.sort_by(|a, b| b.height.cmp(&a.height));
        catalog.audio.sort_by(|a, b| {
            let (x, y) = (a.abr.unwrap_or(0.0), b.abr.unwrap_or(0.0));
            y.total_cmp(&x)
        });

        catalog
    }
}

/// Human readable approximate size (`~1.5 MB`)
pub fn format_filesize(size: Option<f64>) -> String {
    let mut size = match size {
        Some(s) if s > 0.0 => s,
        _ => return "~N/A".to_string(),
    };

    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("~{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("~{:.1} TB", size)
}

/// `1080p (Full HD)` style label. `full_hd` enables the 1080p tag.
pub fn height_label(height: u32, full_hd: bool) -> String {
    let tag = if height >= 2160 {
        " (4K)"
    } else if height >= 1440 {
        " (2K)"
    } else if full_hd && height >= 1080 {
        " (Full HD)"
    } else {
        ""
    };
    format!("{}p{}", height, tag)
}

/// Group digits in thousands (`1234567` -> `1,234,567`)
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
