//! Video, playlist and audio downloads through yt-dlp

use crate::config::Config;
use crate::error::DownloadError;
use crate::progress::{parse_progress_line, DownloadEvent, PROGRESS_TEMPLATE};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadMode {
    Video { selector: String },
    Playlist { selector: String },
    AudioOnly,
}

/// Everything that shapes the yt-dlp command line apart from the mode
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub directory: PathBuf,
    pub write_info_json: bool,
    pub write_subtitles: bool,
    pub write_auto_subtitles: bool,
    pub subtitle_langs: Vec<String>,
    pub ignore_errors: bool,
    pub audio_codec: String,
    pub audio_quality: String,
}

impl DownloadOptions {
    pub fn from_config(config: &Config, directory: PathBuf) -> Self {
        Self {
            directory,
            write_info_json: config.download.write_info_json,
            write_subtitles: config.download.write_subtitles,
            write_auto_subtitles: config.download.write_auto_subtitles,
            subtitle_langs: config.download.subtitle_langs.clone(),
            ignore_errors: config.download.ignore_errors,
            audio_codec: config.audio.codec.clone(),
            audio_quality: config.audio.quality.clone(),
        }
    }
}

#[derive(Debug)]
pub struct Downloader {
    yt_dlp_path: PathBuf,
    ffmpeg_path: Option<PathBuf>,
    options: DownloadOptions,
}

impl Downloader {
    pub fn new(yt_dlp_path: PathBuf, ffmpeg_path: Option<PathBuf>, options: DownloadOptions) -> Self {
        Self {
            yt_dlp_path,
            ffmpeg_path,
            options,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.options.directory
    }

    /// Create the download directory if needed
    pub async fn prepare(&self) -> Result<(), DownloadError> {
        tokio::fs::create_dir_all(&self.options.directory).await?;
        Ok(())
    }

    pub fn build_args(&self, mode: &DownloadMode, url: &str) -> Vec<String> {
        let opts = &self.options;
        let template = match mode {
            DownloadMode::Playlist { .. } => "%(playlist)s/%(playlist_index)s - %(title)s.%(ext)s",
            _ => "%(title)s.%(ext)s",
        };

        let mut args = vec![
            "-o".to_string(),
            opts.directory.join(template).to_string_lossy().into_owned(),
        ];

        match mode {
            DownloadMode::Video { selector } => {
                args.extend(["-f".to_string(), selector.clone(), "--no-playlist".to_string()]);
            }
            DownloadMode::Playlist { selector } => {
                args.extend(["-f".to_string(), selector.clone()]);
            }
            DownloadMode::AudioOnly => {
                args.extend([
                    "-f".to_string(),
                    "bestaudio/best".to_string(),
                    "--no-playlist".to_string(),
                    "-x".to_string(),
                    "--audio-format".to_string(),
                    opts.audio_codec.clone(),
                    "--audio-quality".to_string(),
                    format!("{}K", opts.audio_quality),
                ]);
            }
        }

        if opts.write_info_json {
            args.push("--write-info-json".to_string());
        }
        if opts.write_subtitles {
            args.push("--write-subs".to_string());
        }
        if opts.write_auto_subtitles {
            args.push("--write-auto-subs".to_string());
        }
        if (opts.write_subtitles || opts.write_auto_subtitles) && !opts.subtitle_langs.is_empty() {
            args.push("--sub-langs".to_string());
            args.push(opts.subtitle_langs.join(","));
        }
        if opts.ignore_errors {
            args.push("--ignore-errors".to_string());
        }
        if let Some(ref ffmpeg) = self.ffmpeg_path {
            args.push("--ffmpeg-location".to_string());
            args.push(ffmpeg.to_string_lossy().into_owned());
        }

        args.extend([
            "--no-warnings".to_string(),
            "--newline".to_string(),
            "--progress-template".to_string(),
            PROGRESS_TEMPLATE.to_string(),
            url.to_string(),
        ]);

        args
    }

    /// Run yt-dlp and forward progress events until it exits
    pub async fn download(
        &self,
        mode: &DownloadMode,
        url: &str,
        events: mpsc::Sender<DownloadEvent>,
    ) -> Result<(), DownloadError> {
        self.prepare().await?;

        let args = self.build_args(mode, url);
        info!("Downloading {} into {}", url, self.options.directory.display());
        debug!("yt-dlp {}", args.join(" "));

        let mut child = Command::new(&self.yt_dlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(DownloadError::Spawn)?;

        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf).await;
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        if let Some(stdout) = child.stdout.take() {
            // Titles and paths are not always valid UTF-8 on every console
            let mut reader = BufReader::new(stdout);
            let mut raw = Vec::new();
            loop {
                raw.clear();
                if reader.read_until(b'\n', &mut raw).await? == 0 {
                    break;
                }
                let text = String::from_utf8_lossy(&raw);
                let line = text.trim_end_matches(['\n', '\r']);
                match parse_progress_line(line) {
                    Some(event) => {
                        let _ = events.send(event).await;
                    }
                    None => debug!("yt-dlp: {}", line),
                }
            }
        }

        let status = child.wait().await?;
        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if !status.success() {
            debug!("yt-dlp stderr: {}", stderr);
            return Err(DownloadError::Failed {
                code: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(())
    }
}
