// OneHand Sound Effects
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Fire-and-forget playback of short WAV clips. When no audio device is
// available the board goes silent instead of failing the narration.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rodio::{OutputStream, OutputStreamHandle};
use tracing::{debug, info, warn};

/// Volume used when a caller doesn't pick one.
pub const DEFAULT_VOLUME: f32 = 0.3;

/// The clips shipped in `data/sounds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Keypress,
    Burn,
    Savage,
    Wit,
    Charm,
    Politics,
    Pickup,
    NeverBackdown,
    Education,
    Personal,
    Relationship,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 11] = [
        SoundEffect::Keypress,
        SoundEffect::Burn,
        SoundEffect::Savage,
        SoundEffect::Wit,
        SoundEffect::Charm,
        SoundEffect::Politics,
        SoundEffect::Pickup,
        SoundEffect::NeverBackdown,
        SoundEffect::Education,
        SoundEffect::Personal,
        SoundEffect::Relationship,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Keypress => "keypress.wav",
            SoundEffect::Burn => "burn.wav",
            SoundEffect::Savage => "savage.wav",
            SoundEffect::Wit => "wit.wav",
            SoundEffect::Charm => "charm.wav",
            SoundEffect::Politics => "politics.wav",
            SoundEffect::Pickup => "pickup.wav",
            SoundEffect::NeverBackdown => "never-backdown.wav",
            SoundEffect::Education => "education.wav",
            SoundEffect::Personal => "personal.wav",
            SoundEffect::Relationship => "relationship.wav",
        }
    }

    /// Short name used on the command line (`never-backdown`, `burn`, ...).
    pub fn name(&self) -> &'static str {
        self.file_name().trim_end_matches(".wav")
    }
}

impl std::str::FromStr for SoundEffect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        SoundEffect::ALL
            .into_iter()
            .find(|e| e.name() == wanted)
            .ok_or_else(|| format!("unknown sound effect '{}'", s))
    }
}

/// An open audio output device.
struct Output {
    // Dropping the stream stops all playback, so it lives as long as the board.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// Plays sound effects from a directory of clips.
pub struct SoundBoard {
    sound_dir: PathBuf,
    output: Option<Output>,
    // `None` marks a clip that is missing or unreadable so we don't retry it per keystroke.
    clips: HashMap<SoundEffect, Option<Arc<[u8]>>>,
}

impl SoundBoard {
    /// Open the default audio device. Falls back to a silent board if that fails.
    pub fn open(sound_dir: &Path) -> Self {
        let output = match OutputStream::try_default() {
            Ok((stream, handle)) => {
                info!("[SOUND] 🔊 Audio output ready");
                Some(Output {
                    _stream: stream,
                    handle,
                })
            }
            Err(e) => {
                warn!("[SOUND] Audio output unavailable, continuing without sound: {}", e);
                None
            }
        };

        Self {
            sound_dir: sound_dir.to_path_buf(),
            output,
            clips: HashMap::new(),
        }
    }

    /// A board that never plays anything.
    pub fn silent() -> Self {
        Self {
            sound_dir: PathBuf::new(),
            output: None,
            clips: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    /// Play a clip at the given volume without waiting for it to finish.
    pub fn play(&mut self, effect: SoundEffect, volume: f32) {
        let Some(output) = &self.output else {
            return;
        };

        let sound_dir = &self.sound_dir;
        let clip = self
            .clips
            .entry(effect)
            .or_insert_with(|| load_clip(&sound_dir.join(effect.file_name())));

        let Some(bytes) = clip.clone() else {
            return;
        };

        match output.handle.play_once(Cursor::new(bytes)) {
            Ok(sink) => {
                sink.set_volume(volume);
                sink.detach();
            }
            Err(e) => debug!("[SOUND] Could not play {:?}: {}", effect, e),
        }
    }
}

fn load_clip(path: &Path) -> Option<Arc<[u8]>> {
    if !path.exists() {
        debug!("[SOUND] Clip not found: {:?}", path);
        return None;
    }
    match std::fs::read(path) {
        Ok(bytes) => Some(Arc::from(bytes)),
        Err(e) => {
            debug!("[SOUND] Failed to read clip {:?}: {}", path, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_effect_has_a_wav_file() {
        for effect in SoundEffect::ALL {
            assert!(effect.file_name().ends_with(".wav"), "{:?}", effect);
        }
        assert_eq!(SoundEffect::NeverBackdown.file_name(), "never-backdown.wav");
    }

    #[test]
    fn test_effect_names_parse_back() {
        for effect in SoundEffect::ALL {
            assert_eq!(effect.name().parse::<SoundEffect>(), Ok(effect));
        }
        assert_eq!("never_backdown".parse::<SoundEffect>(), Ok(SoundEffect::NeverBackdown));
        assert!("airhorn".parse::<SoundEffect>().is_err());
    }

    #[test]
    fn test_silent_board_ignores_play() {
        let mut board = SoundBoard::silent();
        assert!(!board.is_enabled());
        board.play(SoundEffect::Keypress, DEFAULT_VOLUME);
        assert!(board.clips.is_empty());
    }

    #[test]
    fn test_load_clip_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(load_clip(&tmp.path().join("burn.wav")).is_none());
    }
}
