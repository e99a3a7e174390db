// OneHand Main Entry Point
// Copyright (c) 2026 Xing_The_Creator | OneHand

use onehand_core::config::{env_flag, AppPaths};
use onehand_core::downloader::settings::{default_config_path, DownloaderSettings};
use onehand_core::downloader::session::DownloaderSession;
use onehand_core::downloader::ytdlp::YtDlp;
use onehand_core::downloader::{download, DownloadError, DownloadRequest, PlaylistMode, Quality};
use onehand_core::explorer::NameMeaningExplorer;
use onehand_core::geotag::extractor::GeotagExtractor;
use onehand_core::geotag::geocode::ReverseGeocoder;
use onehand_core::names::cache::NameCache;
use onehand_core::names::NameMeaningProvider;
use onehand_core::stage::input::PromptInput;
use onehand_core::stage::sounds::{SoundBoard, SoundEffect};
use onehand_core::stage::{Pace, Stage};

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const NO_SOUND_ENV: &str = "ONEHAND_NO_SOUND";

#[derive(Parser)]
#[command(name = "onehand")]
#[command(about = "OneHand Coding content tools", long_about = None)]
struct Cli {
    /// Disable sound effects
    #[arg(long, global = true)]
    mute: bool,

    /// Skip all typing and pause delays
    #[arg(long, global = true)]
    fast: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Explore name meanings (interactive, or one name and exit)
    Names {
        /// Name to analyze once
        name: Option<String>,
    },

    /// Interactive YouTube downloader
    Youtube,

    /// Download a video or playlist without prompts
    Download {
        /// Video or playlist URL
        #[arg(short, long)]
        url: String,

        /// Custom output file name or path
        #[arg(short, long)]
        output: Option<String>,

        /// Quality cap: best, 720p, 1080p, ...
        #[arg(short, long, default_value = "best")]
        quality: Quality,

        /// download_all, single, first_n, audio_only or download_all_audio
        #[arg(short, long, default_value = "download_all")]
        mode: PlaylistMode,

        /// Playlist items to fetch, e.g. "1,3,5" or "1-10"
        #[arg(long)]
        items: Option<String>,

        /// Ignore the settings file
        #[arg(long)]
        no_config: bool,
    },

    /// Pull camera, date and GPS location out of photo metadata
    Exif {
        /// Image file or folder (interactive menu when omitted)
        path: Option<PathBuf>,

        /// Skip reverse geocoding of GPS positions
        #[arg(long)]
        no_geocode: bool,
    },

    /// Manage the downloader settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Narrate a line with the typewriter effect
    Say {
        text: String,

        /// Hold longer after punctuation
        #[arg(long)]
        pauses: bool,

        /// Delay per character in milliseconds
        #[arg(long, default_value_t = 50)]
        delay_ms: u64,

        /// Play a sound effect first (burn, savage, wit, ...)
        #[arg(long)]
        sound: Option<SoundEffect>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default settings file
    Init,
    /// Print the current settings
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn,onehand_core=info");
    }

    // stdout carries the narration, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("🚨 [ONEHAND PANIC] at {}: {}", location, message);
    }));

    let args = Cli::parse();
    let pace = if args.fast { Pace::instant() } else { Pace::default() };

    match args.command {
        Commands::Names { name } => {
            let paths = AppPaths::resolve()?;
            let cache = match NameCache::open(&paths.name_cache_db()) {
                Ok(cache) => Some(Arc::new(cache)),
                Err(e) => {
                    warn!("[NAMES] Name cache unavailable, continuing without it: {:#}", e);
                    None
                }
            };
            let provider = Arc::new(NameMeaningProvider::from_env(cache));
            let stage = Stage::stdout(sound_board(args.mute, &paths), pace);
            let mut explorer = NameMeaningExplorer::new(stage, provider);

            match name {
                Some(name) => {
                    explorer.analyze_entry(&name).await?;
                }
                None => {
                    explorer.intro()?;
                    explorer.run(PromptInput::stdin()).await?;
                }
            }
        }
        Commands::Youtube => {
            let paths = AppPaths::resolve()?;
            let stage = Stage::stdout(sound_board(args.mute, &paths), pace);
            let mut session = DownloaderSession::new(stage, PromptInput::stdin(), default_config_path());
            session.run().await?;
        }
        Commands::Download {
            url,
            output,
            quality,
            mode,
            items,
            no_config,
        } => {
            let settings = if no_config {
                DownloaderSettings::bare()
            } else {
                DownloaderSettings::load_or_default(&default_config_path())
            };

            let mut request = DownloadRequest::new(&url).with_mode(mode).with_quality(quality);
            if let Some(output) = output.as_deref() {
                request = request.with_output_name(output);
            }
            if let Some(items) = items.as_deref() {
                request = request.with_playlist_items(items);
            }

            let result = match YtDlp::locate().await {
                Ok(ytdlp) => download(&ytdlp, &settings, &request, io::stdout()).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => info!("[DOWNLOADER] ✅ Finished {}", url),
                Err(DownloadError::Interrupted) => {
                    println!("\n🛑 {}", DownloadError::Interrupted);
                }
                Err(e) => {
                    error!("[DOWNLOADER] {}", e);
                    eprintln!("❌ {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Exif { path, no_geocode } => {
            let paths = AppPaths::resolve()?;
            let stage = Stage::stdout(sound_board(args.mute, &paths), pace);
            let geocoder = (!no_geocode).then(ReverseGeocoder::new);
            let mut extractor =
                GeotagExtractor::new(stage, PromptInput::stdin(), geocoder, paths.maps_dir.clone());

            match path {
                Some(path) => extractor.run_path(&path).await?,
                None => {
                    extractor.intro()?;
                    extractor.run().await?;
                }
            }
        }
        Commands::Config { action } => {
            let path = default_config_path();
            match action {
                ConfigAction::Init => {
                    DownloaderSettings::create_default(&path)?;
                    println!("✅ Default configuration created at {}", path.display());
                }
                ConfigAction::Show => {
                    if !path.exists() {
                        println!("⚠️  No configuration file at {} (showing defaults)", path.display());
                    } else {
                        println!("📄 {}", path.display());
                    }
                    let settings = DownloaderSettings::load(&path)?;
                    print_settings(&settings)?;
                }
            }
        }
        Commands::Say {
            text,
            pauses,
            delay_ms,
            sound,
        } => {
            let paths = AppPaths::resolve()?;
            let pace = pace.with_char_delay(if args.fast {
                Duration::ZERO
            } else {
                Duration::from_millis(delay_ms)
            });
            let mut stage = Stage::stdout(sound_board(args.mute, &paths), pace);

            if let Some(effect) = sound {
                stage.play(effect);
            }
            if pauses {
                stage.typing_with_pauses(&text)?;
            } else {
                stage.typewriter(&text)?;
            }
        }
    }

    Ok(())
}

fn sound_board(mute: bool, paths: &AppPaths) -> SoundBoard {
    if mute || env_flag(NO_SOUND_ENV) {
        SoundBoard::silent()
    } else {
        SoundBoard::open(&paths.sound_dir)
    }
}

fn print_settings(settings: &DownloaderSettings) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "   default_quality    = {}", settings.default_quality)?;
    writeln!(out, "   default_output_dir = {}", settings.default_output_dir.display())?;
    writeln!(out, "   continue_downloads = {}", settings.continue_downloads)?;
    writeln!(out, "   no_overwrites      = {}", settings.no_overwrites)?;
    writeln!(out, "   progress           = {}", settings.progress)?;
    writeln!(out, "   user_agent         = {}", settings.user_agent)?;
    Ok(())
}
