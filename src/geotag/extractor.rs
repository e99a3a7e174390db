// OneHand Geotag Session
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// "Saan Ka Talaga?": narrated walk through a photo's metadata, from camera
// and capture time down to the street address it was taken at.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::geocode::{describe_location, ReverseGeocoder};
use super::map::{google_maps_url, write_map, MapPin, MASTER_MAP_FILE, SINGLE_MAP_FILE};
use super::{is_image_file, read_fields, scan_folder};
use crate::config::LINE_LENGTH;
use crate::stage::input::{Answer, PromptInput};
use crate::stage::Stage;

/// Folders bigger than this get a "this will take a while" warning.
const LARGE_BATCH: usize = 20;

/// Batches up to this size list every location in the summary.
const LISTED_LOCATIONS: usize = 10;

const PRIVACY_TIPS: [&str; 5] = [
    "📱 iPhone: Settings → Privacy → Location Services → Camera → Never",
    "🤖 Android: Camera app → Settings → Location tags → Off",
    "💻 DSLR: Menu → GPS/Location → Disable",
    "✂️ Remove existing data: Use EXIF removal tools",
    "🔒 Before sharing: Check metadata first!",
];

const RISKS: [&str; 5] = [
    "Stalkers can track your location",
    "Burglars know when you're not home",
    "Exes can find where you live now 😱",
    "Your boss knows you're not really 'sick' 🏖️",
    "Internet never forgets",
];

pub struct GeotagExtractor<W: Write> {
    stage: Stage<W>,
    input: PromptInput,
    geocoder: Option<ReverseGeocoder>,
    maps_dir: PathBuf,
}

impl<W: Write> GeotagExtractor<W> {
    /// `geocoder: None` skips address lookups.
    pub fn new(
        stage: Stage<W>,
        input: PromptInput,
        geocoder: Option<ReverseGeocoder>,
        maps_dir: PathBuf,
    ) -> Self {
        Self {
            stage,
            input,
            geocoder,
            maps_dir,
        }
    }

    pub fn into_stage(self) -> Stage<W> {
        self.stage
    }

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

    async fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self
            .ask(prompt)
            .await?
            .is_some_and(|answer| answer.eq_ignore_ascii_case("y")))
    }

    fn section(&mut self, title: &str) -> Result<()> {
        self.stage.line("")?;
        self.stage.rule(LINE_LENGTH)?;
        self.stage.typing_with_pauses(title)?;
        self.stage.rule(LINE_LENGTH)?;
        Ok(())
    }

    fn say_all(&mut self, lines: &[&str]) -> Result<()> {
        for line in lines {
            self.stage.typing_with_pauses(line)?;
        }
        Ok(())
    }

    pub fn intro(&mut self) -> Result<()> {
        self.section("🔍 EXIF DATA EXTRACTOR: 'Saan Ka Talaga?' Edition")?;
        self.stage.dramatic_pause(1.0)?;
        self.stage
            .typing_with_pauses("Para sa mga feeling private pero naka-auto geotagging 😏")?;
        self.stage.dramatic_pause(1.0)?;

        self.stage.line("\n⚠️  DISCLAIMER ⚠️")?;
        self.stage.line(&"-".repeat(LINE_LENGTH))?;
        self.say_all(&[
            "❌ FB/IG/Social Media downloads: WALANG DATA (stripped na)",
            "✅ Original camera photos: MAY DATA (jackpot!)",
            "✅ Screenshots with metadata: PWEDE",
            "📁 Folder processing: SUPPORTED (batch mode!)",
        ])?;
        self.stage.line(&"-".repeat(LINE_LENGTH))?;
        self.stage.dramatic_pause(2.0)?;
        Ok(())
    }

    /// Menu-driven session: pick a file or folder, then offer the privacy tips.
    pub async fn run(&mut self) -> Result<()> {
        self.section("📁 INPUT OPTIONS:")?;
        self.stage.typewriter("   1. Single image file")?;
        self.stage.typewriter("   2. Folder (batch processing)")?;

        let Some(choice) = self.ask("\n👉 Choice (1/2): ").await? else {
            return Ok(());
        };

        match choice.as_str() {
            "1" => {
                let Some(path) = self.ask("\n📸 Enter image file path: ").await? else {
                    return Ok(());
                };
                if !self.check_image(Path::new(&path))? {
                    return Ok(());
                }
                self.process_image(Path::new(&path)).await?;
            }
            "2" => {
                let Some(path) = self.ask("\n📁 Enter folder path: ").await? else {
                    return Ok(());
                };
                if !self.check_folder(Path::new(&path))? {
                    return Ok(());
                }
                self.process_folder(Path::new(&path), true).await?;
            }
            _ => {
                self.stage.typing_with_pauses("\n❌ Invalid choice!")?;
                return Ok(());
            }
        }

        self.finish().await
    }

    /// Process `path` directly, file or folder, without the menu.
    pub async fn run_path(&mut self, path: &Path) -> Result<()> {
        if path.is_dir() {
            self.process_folder(path, false).await?;
        } else if self.check_image(path)? {
            self.process_image(path).await?;
        }
        Ok(())
    }

    fn check_image(&mut self, path: &Path) -> Result<bool> {
        if !path.exists() {
            self.stage.typing_with_pauses("\n❌ File not found!")?;
            return Ok(false);
        }
        if !is_image_file(path) {
            self.stage.typing_with_pauses("\n❌ Not a valid image file!")?;
            return Ok(false);
        }
        Ok(true)
    }

    fn check_folder(&mut self, path: &Path) -> Result<bool> {
        if !path.exists() {
            self.stage.typing_with_pauses("\n❌ Folder not found!")?;
            return Ok(false);
        }
        if !path.is_dir() {
            self.stage.typing_with_pauses("\n❌ Not a valid folder!")?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Report on one photo and return its map pin when it carries GPS data.
    pub async fn process_image(&mut self, path: &Path) -> Result<Option<MapPin>> {
        let pin = self.inspect_image(path).await?;

        if let Some(pin) = &pin {
            self.stage.typewriter("\n🗺️  Generating interactive map...")?;
            self.stage.dramatic_pause(1.0)?;
            match write_map(&self.maps_dir, SINGLE_MAP_FILE, std::slice::from_ref(pin)) {
                Ok(Some(map)) => {
                    self.stage
                        .typing_with_pauses(&format!("✅ Map saved: {}", map.display()))?;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("[GEOTAG] {:#}", e);
                    self.stage
                        .typing_with_pauses(&format!("⚠️  Could not save map: {:#}", e))?;
                }
            }
            self.stage.typewriter(&format!(
                "🌐 Google Maps: {}",
                google_maps_url(pin.latitude, pin.longitude)
            ))?;

            self.section("👀 REALITY CHECK:")?;
            self.stage.typing_with_pauses(&format!(
                "   'Nag-absent ka pero may picture ka sa {}?'",
                pin.address
            ))?;
            self.stage.typing_with_pauses(&format!(
                "   'Overtime daw pero nasa beach ka nung {}?'",
                pin.date
            ))?;
            self.stage
                .typing_with_pauses("   'Saan ka talaga nung araw na yan? 🤔'")?;
            self.stage.dramatic_pause(2.0)?;
        }

        Ok(pin)
    }

    async fn inspect_image(&mut self, path: &Path) -> Result<Option<MapPin>> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        self.section(&format!("📸 Processing: {}", filename))?;
        self.stage.dramatic_pause(1.0)?;
        self.stage.typewriter("🔬 Extracting EXIF data...")?;
        self.stage.dramatic_pause(1.0)?;

        let Some(fields) = read_fields(path) else {
            self.stage.typing_with_pauses("\n❌ Walang EXIF data!")?;
            self.say_all(&[
                "   Possible reasons:",
                "   • Galing FB/IG (stripped metadata)",
                "   • Manually edited/cleaned",
                "   • Screenshot without metadata",
            ])?;
            self.stage
                .typing_with_pauses("\n😏 Privacy win... or di ka lang ma-stalk ng ex?")?;
            return Ok(None);
        };

        let camera = fields.camera();
        let (date, time) = fields.date_and_time();

        self.stage.line("\n📊 EXIF DATA FOUND:")?;
        self.stage.line(&"-".repeat(LINE_LENGTH))?;
        self.stage.typing_with_pauses(&format!("   📷 Camera: {}", camera))?;
        self.stage.typing_with_pauses(&format!("   📅 Date: {}", date))?;
        self.stage.typing_with_pauses(&format!("   ⏰ Time: {}", time))?;
        self.stage.dramatic_pause(1.0)?;

        self.stage.typewriter("\n🔍 Checking for GPS data...")?;
        self.stage.dramatic_pause(2.0)?;

        let Some(fix) = fields.gps else {
            self.stage.typing_with_pauses("\n❌ Walang GPS coordinates!")?;
            self.say_all(&[
                "   Either:",
                "   • Naka-disable ang geotagging (smart!)",
                "   • Old camera/phone walang GPS",
                "   • Deliberately removed (may alam ka ah! 😏)",
            ])?;
            self.stage
                .typing_with_pauses("\n👍 May privacy awareness ka pala!")?;
            return Ok(None);
        };

        info!("[GEOTAG] {} has GPS {}, {}", filename, fix.latitude, fix.longitude);
        self.stage.line(&format!("\n{}", "🎰".repeat(20)))?;
        self.stage.typing_with_pauses("🎰 JACKPOT! GPS DATA FOUND! 🎰")?;
        self.stage.line(&"🎰".repeat(20))?;
        self.stage.dramatic_pause(2.0)?;

        self.stage.typing_with_pauses(&format!(
            "\n📍 Coordinates: {:.6}, {:.6}",
            fix.latitude, fix.longitude
        ))?;

        if self.geocoder.is_some() {
            self.stage.typewriter("   🌐 Looking up address...")?;
        }
        let address = describe_location(self.geocoder.as_ref(), fix).await;
        self.stage.typing_with_pauses(&format!("📍 Address: {}", address))?;
        self.stage.dramatic_pause(2.0)?;

        Ok(Some(MapPin {
            filename,
            camera,
            date,
            time,
            address,
            latitude: fix.latitude,
            longitude: fix.longitude,
        }))
    }

    /// Batch mode. Returns the pins of every located photo.
    pub async fn process_folder(&mut self, folder: &Path, confirm: bool) -> Result<Vec<MapPin>> {
        self.section("📁 BATCH PROCESSING MODE ACTIVATED")?;
        self.stage.dramatic_pause(1.0)?;
        self.stage
            .typewriter(&format!("\n📁 Scanning folder: {}", folder.display()))?;
        self.stage.dramatic_pause(1.0)?;

        let images = scan_folder(folder);
        if images.is_empty() {
            self.stage.typing_with_pauses("\n❌ No images found in folder!")?;
            return Ok(Vec::new());
        }

        let total = images.len();
        self.stage
            .typing_with_pauses(&format!("\n✅ Found {} image(s)", total))?;
        self.stage.dramatic_pause(1.0)?;
        self.stage
            .typing_with_pauses(&format!("\n⚠️  Processing {} images...", total))?;
        if total > LARGE_BATCH {
            self.stage
                .typing_with_pauses("   This might take a while. Kape muna? ☕")?;
        }

        if confirm && !self.confirm("\n👉 Continue? (y/n): ").await? {
            self.stage
                .typing_with_pauses("\n👋 Cancelled. Takot ka na ba? 😏")?;
            return Ok(Vec::new());
        }

        let mut located = Vec::new();
        for (i, image) in images.iter().enumerate() {
            self.stage
                .typing_with_pauses(&format!("\nProgress: [{}/{}]", i + 1, total))?;
            if let Some(pin) = self.inspect_image(image).await? {
                located.push(pin);
            }
        }

        self.batch_summary(total, &located)?;

        if !located.is_empty() {
            self.master_map(&located)?;
        }
        Ok(located)
    }

    fn batch_summary(&mut self, total: usize, located: &[MapPin]) -> Result<()> {
        self.stage.line("")?;
        self.section("📊 BATCH PROCESSING COMPLETE!")?;
        self.stage.dramatic_pause(2.0)?;

        let with_gps = located.len();
        let without_gps = total - with_gps;
        let share = |n: usize| n as f64 / total as f64 * 100.0;

        self.stage.typewriter("\n📈 Results:")?;
        self.stage
            .typing_with_pauses(&format!("   Total images processed: {}", total))?;
        self.stage.typing_with_pauses(&format!(
            "   With GPS data: {} ({:.1}%)",
            with_gps,
            share(with_gps)
        ))?;
        self.stage.typing_with_pauses(&format!(
            "   Without GPS: {} ({:.1}%)",
            without_gps,
            share(without_gps)
        ))?;
        self.stage.dramatic_pause(2.0)?;

        if located.is_empty() {
            self.stage.typing_with_pauses("\n❌ Walang GPS data sa lahat!")?;
            self.say_all(&[
                "   Possible reasons:",
                "   • Lahat galing social media (stripped na)",
                "   • Naka-disable geotagging (matino!)",
                "   • Professional stalker ka, nag-edit lahat 😂",
            ])?;
            return Ok(());
        }

        self.stage.typewriter("\n📍 Location Analysis:")?;
        let mut addresses: Vec<&str> = located.iter().map(|p| p.address.as_str()).collect();
        addresses.sort_unstable();
        addresses.dedup();
        self.stage
            .typing_with_pauses(&format!("   Unique locations: {}", addresses.len()))?;

        if located.len() <= LISTED_LOCATIONS {
            self.stage.typewriter("\n📌 Locations found:")?;
            for (i, pin) in located.iter().enumerate() {
                self.stage
                    .typing_with_pauses(&format!("   {}. {}", i + 1, pin.address))?;
                self.stage
                    .typing_with_pauses(&format!("      📅 {} @ {}", pin.date, pin.time))?;
            }
        }
        self.stage.dramatic_pause(2.0)?;

        self.section("🤔 PATTERN ANALYSIS:")?;
        self.say_all(&[
            "   'Ang daming beach photos ah? 🏖️'",
            "   'Medical certificate valid pa ba talaga? 😏'",
            "   'Overtime daw pero wala sa office? 🤔'",
        ])?;
        self.stage.dramatic_pause(2.0)?;
        Ok(())
    }

    fn master_map(&mut self, located: &[MapPin]) -> Result<()> {
        self.section("🗺️  GENERATING MASTER MAP...")?;
        self.stage.dramatic_pause(2.0)?;
        self.stage.typewriter("📍 Plotting all locations on one map...")?;

        match write_map(&self.maps_dir, MASTER_MAP_FILE, located) {
            Ok(Some(map)) => {
                self.stage
                    .typing_with_pauses(&format!("✅ Master map saved: {}", map.display()))?;
                self.say_all(&[
                    "\n🎨 Map features:",
                    "   • Color-coded markers per photo",
                    "   • Click markers for details",
                    "   • Zoom in/out to see patterns",
                ])?;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("[GEOTAG] {:#}", e);
                self.stage
                    .typing_with_pauses(&format!("⚠️  Could not save map: {:#}", e))?;
            }
        }
        Ok(())
    }

    pub fn privacy_tips(&mut self) -> Result<()> {
        self.stage.line("")?;
        self.section("🎓 PRIVACY EDUCATION 101")?;
        self.stage.dramatic_pause(2.0)?;

        self.stage.typing_with_pauses("\n💡 How to disable geotagging:")?;
        for tip in PRIVACY_TIPS {
            self.stage.typing_with_pauses(&format!("   • {}", tip))?;
        }
        self.stage.dramatic_pause(2.0)?;

        self.stage.typewriter("\n🤔 Why you should care:")?;
        for risk in RISKS {
            self.stage.typing_with_pauses(&format!("   • {}", risk))?;
        }
        self.stage.dramatic_pause(2.0)?;

        self.stage.typewriter("\n✅ Good news:")?;
        self.say_all(&[
            "   Social media platforms strip metadata automatically",
            "   (Kaya nga walang data sa FB/IG downloads)",
            "\n   But original photos? Still dangerous! 📸",
        ])?;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        if self.confirm("\n\n👉 Want to see privacy tips? (y/n): ").await? {
            self.privacy_tips()?;
        }

        self.stage.line("")?;
        self.section("👋 THANK YOU FOR USING 'Saan Ka Talaga?'")?;
        self.say_all(&[
            "\n💭 Remember:",
            "   'Privacy is not about hiding.'",
            "   'It's about controlling what you share.'",
            "   'Kasi ang totoo... may GPS coordinates ka pa rin.' 📍",
        ])?;
        self.stage
            .typewriter("\n\n# Stay safe online, Pilipinas! 🇵🇭")?;
        Ok(())
    }
}
