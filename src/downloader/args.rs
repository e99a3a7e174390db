// OneHand yt-dlp Argument Builder
// Copyright (c) 2026 Xing_The_Creator | OneHand

use std::path::{Path, PathBuf};

use tracing::warn;

use super::settings::DownloaderSettings;
use super::{DownloadError, DownloadRequest, PlaylistMode, Quality};

/// Number of entries fetched in `first_n` mode.
pub const FIRST_N_ENTRIES: u32 = 5;

const AUDIO_ARGS: [&str; 5] = ["-f", "bestaudio/best", "--extract-audio", "--audio-format", "mp3"];

/// Everything needed to launch one download.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadPlan {
    /// Arguments after the yt-dlp program (and any `-m yt_dlp` prefix).
    pub args: Vec<String>,
    pub output_path: PathBuf,
    pub quality: Quality,
}

/// Scheme and host must both be present.
pub fn is_valid_url(url: &str) -> bool {
    match url::Url::parse(url.trim()) {
        Ok(parsed) => !parsed.scheme().is_empty() && parsed.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// Request quality wins unless it is `best`, in which case the configured default applies.
pub fn effective_quality(settings: &DownloaderSettings, requested: Quality) -> Quality {
    if requested != Quality::Best {
        return requested;
    }
    settings.default_quality.parse().unwrap_or_else(|_| {
        warn!(
            "[YTDLP] Ignoring unrecognized default quality '{}'",
            settings.default_quality
        );
        Quality::Best
    })
}

/// Where yt-dlp should write: absolute names as-is, relative names under the output dir,
/// otherwise a title template. Bare custom names get `.mp3`/`.mp4`.
pub fn resolve_output_path(output_dir: &Path, output_name: Option<&str>, mode: PlaylistMode) -> PathBuf {
    let Some(name) = output_name.map(str::trim).filter(|n| !n.is_empty()) else {
        return output_dir.join("%(title)s.%(ext)s");
    };

    let custom = Path::new(name);
    let path = if custom.is_absolute() {
        custom.to_path_buf()
    } else {
        output_dir.join(custom)
    };

    if custom.extension().is_some() {
        path
    } else if mode.is_audio() {
        path.with_extension("mp3")
    } else {
        path.with_extension("mp4")
    }
}

fn push_playlist_options(args: &mut Vec<String>, mode: PlaylistMode, items: Option<&str>) {
    if let Some(items) = items {
        args.extend(["--playlist-items".to_string(), items.to_string()]);
    }

    match mode {
        PlaylistMode::DownloadAll => {}
        PlaylistMode::Single => args.push("--no-playlist".to_string()),
        PlaylistMode::FirstN => {
            if items.is_none() {
                args.extend(["--playlist-end".to_string(), FIRST_N_ENTRIES.to_string()]);
            }
        }
        PlaylistMode::AudioOnly => {
            args.push("--no-playlist".to_string());
            args.extend(AUDIO_ARGS.iter().map(|a| a.to_string()));
        }
        PlaylistMode::DownloadAllAudio => {
            args.extend(AUDIO_ARGS.iter().map(|a| a.to_string()));
        }
    }
}

fn push_format(args: &mut Vec<String>, quality: Quality) {
    match quality {
        Quality::Best => args.extend(["-S".to_string(), "res,vbr,abr".to_string()]),
        Quality::MaxHeight(h) => args.extend([
            "-f".to_string(),
            format!("bestvideo[height<=?{h}]+bestaudio/best[height<=?{h}]/best"),
        ]),
    }
}

/// Build the yt-dlp argument list for a request.
///
/// The URL always comes last, after `--`, so it can never be parsed as an option.
pub fn build_download_args(
    settings: &DownloaderSettings,
    request: &DownloadRequest,
) -> Result<DownloadPlan, DownloadError> {
    if !is_valid_url(&request.url) {
        return Err(DownloadError::InvalidUrl(request.url.clone()));
    }

    let items = request
        .playlist_items
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty());
    if let Some(items) = items {
        if items.starts_with('-') {
            return Err(DownloadError::UnsafeArgument(items.to_string()));
        }
    }

    let quality = effective_quality(settings, request.quality);
    let output_path = resolve_output_path(
        &settings.default_output_dir,
        request.output_name.as_deref(),
        request.mode,
    );

    let mut args = vec!["--embed-thumbnail".to_string()];

    if !settings.user_agent.trim().is_empty() {
        args.extend(["--user-agent".to_string(), settings.user_agent.clone()]);
    }
    if settings.continue_downloads {
        args.push("--continue".to_string());
    }
    if settings.no_overwrites {
        args.push("--no-overwrites".to_string());
    }
    if settings.progress {
        // One progress update per line when stdout is a pipe.
        args.extend(["--progress".to_string(), "--newline".to_string()]);
    }

    args.extend(["-o".to_string(), output_path.to_string_lossy().to_string()]);

    push_playlist_options(&mut args, request.mode, items);

    if !request.mode.is_audio() {
        push_format(&mut args, quality);
    }

    args.push("--".to_string());
    args.push(request.url.trim().to_string());

    Ok(DownloadPlan {
        args,
        output_path,
        quality,
    })
}
