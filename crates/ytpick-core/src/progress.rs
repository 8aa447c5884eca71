//! Parsing of yt-dlp progress output

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Prefix that marks our own progress records among yt-dlp's output
pub const PROGRESS_PREFIX: &str = "ytpick|";

/// Value for `--progress-template`. Fields are `|`-separated so the
/// filename, which may contain anything, goes last.
pub const PROGRESS_TEMPLATE: &str = "download:ytpick|%(progress.status)s|%(progress._percent_str)s|%(progress._speed_str)s|%(progress._total_bytes_str)s|%(progress._total_bytes_estimate_str)s|%(progress.filename)s";

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadEvent {
    Progress {
        percent: f64,
        speed: String,
        size: String,
        filename: String,
    },
    Finished {
        filename: String,
    },
}

pub fn parse_progress_line(line: &str) -> Option<DownloadEvent> {
    let line = strip_ansi(line.trim());

    if let Some(record) = line.strip_prefix(PROGRESS_PREFIX) {
        return parse_record(record);
    }

    parse_default_line(&line)
}

fn parse_record(record: &str) -> Option<DownloadEvent> {
    let fields: Vec<&str> = record.splitn(6, '|').collect();
    let [status, percent, speed, total, estimate, path] = fields.as_slice() else {
        return None;
    };

    let filename = base_name(path);
    match *status {
        "downloading" => Some(DownloadEvent::Progress {
            percent: parse_percent(percent).unwrap_or(0.0),
            speed: field_or_na(speed),
            size: available(total)
                .or_else(|| available(estimate))
                .unwrap_or("N/A")
                .to_string(),
            filename,
        }),
        "finished" => Some(DownloadEvent::Finished { filename }),
        _ => None,
    }
}

/// yt-dlp's stock `[download]  12.5% of ~ 10.00MiB at 1.00MiB/s ETA 00:08`
fn parse_default_line(line: &str) -> Option<DownloadEvent> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = RE
        .get_or_init(|| {
            Regex::new(r"^\[download\]\s+(\d+(?:\.\d+)?)%\s+of\s+~?\s*(\S+)(?:\s+at\s+(\S+))?").ok()
        })
        .as_ref()?;

    let caps = re.captures(line)?;
    let percent: f64 = caps.get(1)?.as_str().parse().ok()?;
    Some(DownloadEvent::Progress {
        percent,
        size: caps.get(2).map_or("N/A", |m| m.as_str()).to_string(),
        speed: caps.get(3).map_or("N/A", |m| m.as_str()).to_string(),
        filename: String::new(),
    })
}

fn strip_ansi(s: &str) -> String {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    match RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").ok()) {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// yt-dlp prints `NA` for fields it does not know
fn available(field: &str) -> Option<&str> {
    let field = field.trim();
    (!field.is_empty() && field != "NA" && field != "N/A").then_some(field)
}

fn field_or_na(field: &str) -> String {
    available(field).unwrap_or("N/A").to_string()
}

fn parse_percent(field: &str) -> Option<f64> {
    available(field)?.trim_end_matches('%').trim().parse().ok()
}

fn base_name(path: &str) -> String {
    let path = path.trim();
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Shorten to `max_len` characters, ending in `...` when cut
pub fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else {
        let kept: String = name.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
