// OneHand YouTube Downloader
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Thin, friendly wrapper around yt-dlp:
// 1. settings file with download defaults
// 2. playlist / audio-only modes and quality caps
// 3. live progress bar from yt-dlp's output
// 4. an interactive question-and-answer session

pub mod args;
pub mod progress;
pub mod session;
pub mod settings;
pub mod ytdlp;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use tracing::info;

use args::build_download_args;
use progress::ProgressPrinter;
use settings::DownloaderSettings;
use ytdlp::YtDlp;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("'yt-dlp' command not found.")]
    YtDlpNotFound,

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Refusing argument that looks like an option: {0}")]
    UnsafeArgument(String),

    #[error("Download failed. yt-dlp exited with error code {}.", exit_code_label(.code))]
    ProcessFailed { code: Option<i32> },

    #[error("Download interrupted by user. Run the same command again to resume.")]
    Interrupted,

    #[error("yt-dlp output pipe was not available")]
    MissingPipe,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "unknown (killed by signal)".to_string(),
    }
}

/// How playlists (and audio) are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaylistMode {
    #[default]
    DownloadAll,
    Single,
    FirstN,
    AudioOnly,
    DownloadAllAudio,
}

impl PlaylistMode {
    pub const ALL: [PlaylistMode; 5] = [
        PlaylistMode::DownloadAll,
        PlaylistMode::Single,
        PlaylistMode::FirstN,
        PlaylistMode::AudioOnly,
        PlaylistMode::DownloadAllAudio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaylistMode::DownloadAll => "download_all",
            PlaylistMode::Single => "single",
            PlaylistMode::FirstN => "first_n",
            PlaylistMode::AudioOnly => "audio_only",
            PlaylistMode::DownloadAllAudio => "download_all_audio",
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, PlaylistMode::AudioOnly | PlaylistMode::DownloadAllAudio)
    }
}

impl fmt::Display for PlaylistMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlaylistMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PlaylistMode::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = PlaylistMode::ALL.iter().map(|m| m.as_str()).collect();
                format!("unknown playlist mode '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Video quality target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    Best,
    /// Cap on video height in pixels.
    MaxHeight(u32),
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Best => f.write_str("best"),
            Quality::MaxHeight(h) => write!(f, "{}p", h),
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    /// Accepts `best`, `720`, or `720p`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("best") {
            return Ok(Quality::Best);
        }
        let digits = s.strip_suffix(['p', 'P']).unwrap_or(s);
        match digits.parse::<u32>() {
            Ok(h) if h > 0 => Ok(Quality::MaxHeight(h)),
            _ => Err(format!("invalid quality '{}' (use best, 720p, 1080p, ...)", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadRequest {
    pub url: String,
    pub output_name: Option<String>,
    pub quality: Quality,
    pub mode: PlaylistMode,
    pub playlist_items: Option<String>,
}

impl DownloadRequest {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            output_name: None,
            quality: Quality::Best,
            mode: PlaylistMode::DownloadAll,
            playlist_items: None,
        }
    }

    pub fn with_mode(mut self, mode: PlaylistMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_output_name(mut self, name: &str) -> Self {
        self.output_name = Some(name.to_string());
        self
    }

    pub fn with_playlist_items(mut self, items: &str) -> Self {
        self.playlist_items = Some(items.to_string());
        self
    }
}

/// Validate, build the command, and run yt-dlp, reporting to `out`.
pub async fn download<W: Write>(
    ytdlp: &YtDlp,
    settings: &DownloaderSettings,
    request: &DownloadRequest,
    mut out: W,
) -> Result<(), DownloadError> {
    let plan = build_download_args(settings, request)?;

    writeln!(out, "🔄 Starting download for URL: {}", request.url)?;
    writeln!(out, "🎬 Quality target: {}", plan.quality)?;
    writeln!(out, "📋 Playlist mode: {}", request.mode)?;
    if let Some(items) = request.playlist_items.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
        writeln!(out, "🎯 Targeting specific playlist items: {}", items)?;
    }

    if let Some(parent) = plan.output_path.parent() {
        std::fs::create_dir_all(parent)?;
        writeln!(out, "📁 Saving to: {}", parent.display())?;
    }

    let argv = ytdlp.argv(&plan.args);
    let head: Vec<&str> = std::iter::once(ytdlp.program())
        .chain(argv.iter().map(String::as_str))
        .take(3)
        .collect();
    writeln!(out, "▶️  Executing command: {}...", head.join(" "))?;
    info!("[YTDLP] {} {:?}", ytdlp.program(), argv);

    let mut printer = ProgressPrinter::new(&mut out);
    ytdlp.run(&plan.args, &mut printer).await?;

    writeln!(out, "✅ Download complete!")?;
    Ok(())
}
