// OneHand Downloader Session
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Question-and-answer front-end for the downloader: URL, playlist mode,
// quality and file name, then one yt-dlp run per round.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::args::is_valid_url;
use super::settings::DownloaderSettings;
use super::ytdlp::{is_playlist_url, YtDlp};
use super::{download, DownloadError, DownloadRequest, PlaylistMode, Quality};
use crate::explorer::QUIT_WORDS;
use crate::stage::input::{Answer, PromptInput};
use crate::stage::Stage;

const BANNER_WIDTH: usize = 60;

const PLAYLIST_MENU: [(PlaylistMode, &str); 5] = [
    (PlaylistMode::DownloadAll, "Download all videos"),
    (PlaylistMode::FirstN, "Download first 5 videos only"),
    (PlaylistMode::Single, "Single video only (ignore playlist)"),
    (PlaylistMode::AudioOnly, "Audio only (single video)"),
    (PlaylistMode::DownloadAllAudio, "Audio only (all in playlist)"),
];

const VIDEO_MENU: [(PlaylistMode, &str); 2] = [
    (PlaylistMode::DownloadAll, "Download as video"),
    (PlaylistMode::AudioOnly, "Download audio only"),
];

/// What happened to one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Downloaded,
    Failed,
    /// Input ended or Ctrl-C was pressed mid-questions.
    Abandoned,
    Interrupted,
}

pub struct DownloaderSession<W: Write> {
    stage: Stage<W>,
    input: PromptInput,
    config_path: PathBuf,
    ytdlp: Option<YtDlp>,
}

impl<W: Write> DownloaderSession<W> {
    pub fn new(stage: Stage<W>, input: PromptInput, config_path: PathBuf) -> Self {
        Self {
            stage,
            input,
            config_path,
            ytdlp: None,
        }
    }

    /// Use a specific yt-dlp instead of searching for one.
    pub fn with_ytdlp(mut self, ytdlp: YtDlp) -> Self {
        self.ytdlp = Some(ytdlp);
        self
    }

    pub fn into_stage(self) -> Stage<W> {
        self.stage
    }

    /// Prompt and read one trimmed line. `None` means end of input or Ctrl-C.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        self.stage.typewriter_inline(prompt)?;
        self.stage.writer().flush()?;

        match self.input.next_line().await.context("Failed to read answer")? {
            Answer::Line(line) => Ok(Some(line)),
            Answer::Eof | Answer::Interrupted => {
                self.stage.line("")?;
                Ok(None)
            }
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.stage.banner("📥 YOUTUBE VIDEO DOWNLOADER", BANNER_WIDTH)?;
        self.stage.dramatic_pause(1.0)?;

        self.offer_default_config().await?;

        loop {
            let Some(url) = self.ask("\n📋 Enter YouTube URL (or 'quit' to exit): ").await? else {
                break;
            };

            if QUIT_WORDS.contains(&url.to_lowercase().as_str()) {
                break;
            }
            if url.is_empty() {
                self.stage.typewriter("⚠️  No URL provided. Please enter a valid URL.")?;
                continue;
            }
            if !is_valid_url(&url) {
                self.stage.typewriter(&format!("❌ Invalid URL: {}", url))?;
                continue;
            }

            match self.download_round(&url).await? {
                RoundOutcome::Interrupted | RoundOutcome::Abandoned => break,
                RoundOutcome::Downloaded | RoundOutcome::Failed => {}
            }

            let again = self
                .ask("\n🔄 Would you like to download another video? (y/n) [y]: ")
                .await?;
            match again.as_deref().map(str::to_lowercase).as_deref() {
                None | Some("n") | Some("no") => break,
                _ => {}
            }
        }

        self.stage.typewriter("\n👋 Thank you for using YouTube Downloader!")?;
        Ok(())
    }

    async fn offer_default_config(&mut self) -> Result<()> {
        if self.config_path.exists() {
            return Ok(());
        }

        let path = self.config_path.clone();
        self.stage.typewriter(&format!(
            "\n⚠️  Configuration file not found at {}",
            path.display()
        ))?;

        let answer = self
            .ask("🔧 Would you like to create a default configuration? (y/n) [y]: ")
            .await?
            .unwrap_or_else(|| "n".to_string())
            .to_lowercase();

        if matches!(answer.as_str(), "" | "y" | "yes") {
            match DownloaderSettings::create_default(&path) {
                Ok(_) => {
                    self.stage
                        .typewriter(&format!("✅ Configuration saved to {}", path.display()))?;
                    self.stage.typewriter(&format!(
                        "✅ Default configuration created at {}",
                        path.display()
                    ))?;
                    self.stage
                        .typewriter("📝 You can edit this file to customize default settings.")?;
                }
                Err(e) => {
                    warn!("[CONFIG] {:#}", e);
                    self.stage
                        .typewriter(&format!("❌ Could not save config file: {:#}", e))?;
                }
            }
            self.stage.dramatic_pause(1.0)?;
        }
        Ok(())
    }

    /// The yt-dlp to use, located on first need and kept for the session.
    async fn ensure_ytdlp(&mut self) -> Result<YtDlp, DownloadError> {
        if let Some(ytdlp) = &self.ytdlp {
            return Ok(ytdlp.clone());
        }
        let found = YtDlp::locate().await?;
        self.ytdlp = Some(found.clone());
        Ok(found)
    }

    /// Ask the per-URL questions and run the download.
    async fn download_round(&mut self, url: &str) -> Result<RoundOutcome> {
        let ytdlp = match self.ensure_ytdlp().await {
            Ok(ytdlp) => ytdlp,
            Err(e) => return self.report_failure(&e),
        };

        let playlist = is_playlist_url(url, Some(&ytdlp)).await;

        let Some(mode) = self.choose_mode(playlist).await? else {
            return Ok(RoundOutcome::Abandoned);
        };
        let mut request = DownloadRequest::new(url).with_mode(mode);

        if playlist && mode == PlaylistMode::DownloadAll {
            let items = self
                .ask("\n🔢 Do you want to download specific items? (e.g., '1,3,5' or '1-10') [skip]: ")
                .await?;
            match items {
                None => return Ok(RoundOutcome::Abandoned),
                Some(items) if !items.is_empty() && !items.eq_ignore_ascii_case("skip") => {
                    request = request.with_playlist_items(&items);
                }
                Some(_) => {}
            }
        }

        if mode.is_audio() {
            self.stage
                .typewriter("\n🎵 Audio-only mode selected. Quality setting will be ignored.")?;
        } else {
            let Some(answer) = self
                .ask("\n🎬 Enter video quality (best, 720p, 1080p, etc.) [default: best]: ")
                .await?
            else {
                return Ok(RoundOutcome::Abandoned);
            };
            let quality = match answer.parse::<Quality>() {
                Ok(quality) => quality,
                Err(e) => {
                    warn!("[DOWNLOADER] {}", e);
                    self.stage
                        .typewriter(&format!("⚠️  Unknown quality '{}', using best.", answer))?;
                    Quality::Best
                }
            };
            request = request.with_quality(quality);
        }

        let Some(name) = self
            .ask("\n📝 Enter custom filename (optional, press Enter to use video title): ")
            .await?
        else {
            return Ok(RoundOutcome::Abandoned);
        };
        if !name.is_empty() {
            request = request.with_output_name(&name);
        }

        let settings = DownloaderSettings::load_or_default(&self.config_path);
        self.stage.typewriter(&format!(
            "📁 Using download directory: {}",
            settings.default_output_dir.display()
        ))?;
        self.stage.dramatic_pause(1.0)?;

        info!("[DOWNLOADER] {} ({})", request.url, request.mode);
        match download(&ytdlp, &settings, &request, self.stage.writer()).await {
            Ok(()) => {
                self.stage
                    .typewriter("\n🎉 YouTube video downloaded successfully!")?;
                Ok(RoundOutcome::Downloaded)
            }
            Err(DownloadError::Interrupted) => {
                self.stage
                    .typewriter(&format!("\n🛑 {}", DownloadError::Interrupted))?;
                Ok(RoundOutcome::Interrupted)
            }
            Err(e) => self.report_failure(&e),
        }
    }

    fn report_failure(&mut self, error: &DownloadError) -> Result<RoundOutcome> {
        warn!("[DOWNLOADER] {}", error);
        self.stage.typewriter(&format!("❌ {}", error))?;
        if matches!(error, DownloadError::YtDlpNotFound) {
            self.stage.typewriter(
                "💡 Install it with 'pip install yt-dlp' or from https://github.com/yt-dlp/yt-dlp",
            )?;
        }
        self.stage.typewriter("\n💥 Failed to download YouTube video.")?;
        Ok(RoundOutcome::Failed)
    }

    /// Numbered menu; anything unrecognised picks option 1.
    async fn choose_mode(&mut self, playlist: bool) -> Result<Option<PlaylistMode>> {
        let menu: &[(PlaylistMode, &str)] = if playlist {
            self.stage.typewriter(
                "\n📋 It looks like this is a playlist! How would you like to handle it?",
            )?;
            &PLAYLIST_MENU
        } else {
            self.stage
                .typewriter("\n📋 How would you like to handle this video?")?;
            &VIDEO_MENU
        };

        for (i, (_, label)) in menu.iter().enumerate() {
            self.stage.typewriter(&format!("   {} - {}", i + 1, label))?;
        }

        let Some(choice) = self.ask("   Enter choice [1]: ").await? else {
            return Ok(None);
        };

        let picked = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| menu.get(i))
            .map(|(mode, _)| *mode)
            .unwrap_or(menu[0].0);
        Ok(Some(picked))
    }
}
