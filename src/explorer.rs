// OneHand Name Meaning Explorer
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Interactive front-end for the name provider. The lookup runs as a
// background task while the loading lines are narrated, so slow APIs hide
// behind the animation.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::LINE_LENGTH;
use crate::names::{normalize_name, NameAnalysis, NameMeaningProvider};
use crate::stage::input::{Answer, PromptInput};
use crate::stage::Stage;

/// Inputs that end the session.
pub const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

/// Narrated while the lookup runs, each followed by a wait in milliseconds.
const LOADING_STEPS: [(&str, u64); 3] = [
    ("🌍 Fetching etymology data...", 1000),
    ("📚 Consulting name databases...", 1000),
    ("🔍 Processing meaning information...", 2000),
];

pub struct NameMeaningExplorer<W: Write> {
    stage: Stage<W>,
    provider: Arc<NameMeaningProvider>,
}

impl<W: Write> NameMeaningExplorer<W> {
    pub fn new(stage: Stage<W>, provider: Arc<NameMeaningProvider>) -> Self {
        Self { stage, provider }
    }

    pub fn into_stage(self) -> Stage<W> {
        self.stage
    }

    /// Title card shown once at start-up.
    pub fn intro(&mut self) -> Result<()> {
        self.stage.banner("🔍 NAME MEANING EXPLORER", LINE_LENGTH)?;
        self.stage.dramatic_pause(2.0)?;
        self.stage.typewriter("Discover the hidden meanings behind names!")?;
        self.stage.dramatic_pause(2.0)?;
        Ok(())
    }

    /// Prompt loop until a quit word, Ctrl-C or end of input.
    pub async fn run(&mut self, mut input: PromptInput) -> Result<()> {
        self.stage.dramatic_pause(1.0)?;

        loop {
            self.stage
                .typewriter_inline("\n📋 Enter a name to analyze (or 'quit' to exit): ")?;

            let entry = match input.next_line().await.context("Failed to read name")? {
                Answer::Line(line) => line,
                Answer::Eof | Answer::Interrupted => {
                    self.stage.line("")?;
                    break;
                }
            };

            if QUIT_WORDS.contains(&entry.to_lowercase().as_str()) {
                break;
            }

            self.analyze_entry(&entry).await?;
        }

        self.stage.typewriter("\n👋 Thank you for exploring name meanings!")?;
        Ok(())
    }

    /// Analyze one typed name. Blank input only gets a warning.
    pub async fn analyze_entry(&mut self, raw: &str) -> Result<Option<NameAnalysis>> {
        if normalize_name(raw).is_empty() {
            self.stage.typewriter("⚠️  Please enter a valid name.")?;
            return Ok(None);
        }
        self.analyze_concurrently(raw).await.map(Some)
    }

    /// Look a name up in the background while narrating, then show the result.
    pub async fn analyze_concurrently(&mut self, raw: &str) -> Result<NameAnalysis> {
        let name = normalize_name(raw);
        let provider = self.provider.clone();
        let lookup_name = name.clone();
        let task = tokio::spawn(async move { provider.analyze_name(&lookup_name).await });

        self.show_loading(&name).await?;

        let analysis = task.await.context("Name analysis task failed")?;
        info!("[NAMES] '{}' answered from {:?}", name, analysis.source);

        self.display(&analysis.formatted_description())?;
        Ok(analysis)
    }

    async fn show_loading(&mut self, name: &str) -> Result<()> {
        let pace = self.stage.pace();

        self.stage
            .typing_with_pauses(&format!("\n🔄 Analyzing name: '{}'", name))?;
        tokio::time::sleep(pace.scaled(Duration::from_secs(1))).await;

        for (text, wait_ms) in LOADING_STEPS {
            self.stage.typing_with_pauses(text)?;
            tokio::time::sleep(pace.scaled(Duration::from_millis(wait_ms))).await;
        }
        Ok(())
    }

    fn display(&mut self, description: &str) -> Result<()> {
        if description.trim().is_empty() {
            self.stage.typewriter("❌ No information found for this name.")?;
            return Ok(());
        }

        self.stage.banner("📊 NAME ANALYSIS RESULTS", LINE_LENGTH)?;
        self.stage.line("")?;

        for line in description.lines().map(str::trim).filter(|l| !l.is_empty()) {
            self.stage.typing_with_pauses(&format!("  {}", line))?;
            self.stage.hold(Duration::from_millis(500));
        }

        self.stage.line("")?;
        self.stage.rule(terminal_width())?;
        self.stage.line("")?;
        self.stage.line("")?;
        Ok(())
    }
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(terminal_size::Width(w), _)| w as usize)
        .unwrap_or(LINE_LENGTH)
}
