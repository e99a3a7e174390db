// OneHand Stage - Narration Effects
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Typewriter-style output for the interactive tools: characters appear one
// at a time with a keypress click, punctuation gets a dramatic hold, and
// pauses are drawn as a row of dots.

pub mod input;
pub mod sounds;

use std::io::{self, Write};
use std::time::Duration;

use sounds::{SoundBoard, SoundEffect, DEFAULT_VOLUME};

/// Characters that get the long dramatic hold in `typing_with_pauses`.
pub const PAUSE_CHARS: &str = ",.?!;:'";

/// Timing for the narration effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pace {
    /// Delay after each printed character.
    pub char_delay: Duration,
    /// Multiplier applied to `char_delay` after a pause character.
    pub pause_multiplier: u32,
    /// Length of one dot in `dramatic_pause`.
    pub beat: Duration,
}

impl Default for Pace {
    fn default() -> Self {
        Self {
            char_delay: Duration::from_millis(50),
            pause_multiplier: 10,
            beat: Duration::from_secs(1),
        }
    }
}

impl Pace {
    /// No delays at all. Used by `--fast` and tests.
    pub fn instant() -> Self {
        Self {
            char_delay: Duration::ZERO,
            pause_multiplier: 10,
            beat: Duration::ZERO,
        }
    }

    pub fn with_char_delay(mut self, delay: Duration) -> Self {
        self.char_delay = delay;
        self
    }

    /// Scale a nominal wait (e.g. "1 second between steps") to this pace.
    pub fn scaled(&self, nominal: Duration) -> Duration {
        if self.beat.is_zero() {
            Duration::ZERO
        } else {
            nominal
        }
    }
}

/// Narrator that writes effects to `out` and clicks through a `SoundBoard`.
pub struct Stage<W: Write> {
    out: W,
    sounds: SoundBoard,
    pace: Pace,
}

impl Stage<io::Stdout> {
    /// Narrate to the terminal.
    pub fn stdout(sounds: SoundBoard, pace: Pace) -> Self {
        Self::new(io::stdout(), sounds, pace)
    }
}

impl<W: Write> Stage<W> {
    pub fn new(out: W, sounds: SoundBoard, pace: Pace) -> Self {
        Self { out, sounds, pace }
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    /// Raw access for output that shouldn't be typewritten (progress bars).
    pub fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    /// Give the writer back (tests read the captured narration from it).
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print `text` one character at a time, then a newline.
    pub fn typewriter(&mut self, text: &str) -> io::Result<()> {
        self.typewrite_chars(text, false)?;
        writeln!(self.out)
    }

    /// Same as `typewriter` but leaves the cursor on the line (prompts).
    pub fn typewriter_inline(&mut self, text: &str) -> io::Result<()> {
        self.typewrite_chars(text, false)
    }

    /// Typewriter with a long hold after punctuation. Always ends the line.
    pub fn typing_with_pauses(&mut self, text: &str) -> io::Result<()> {
        self.typewrite_chars(text, true)?;
        writeln!(self.out)
    }

    /// One dot per whole second, then a newline.
    pub fn dramatic_pause(&mut self, seconds: f64) -> io::Result<()> {
        let beats = seconds.max(0.0).trunc() as u64;
        for _ in 0..beats {
            write!(self.out, ".")?;
            self.out.flush()?;
            sleep(self.pace.beat);
        }
        writeln!(self.out)
    }

    /// Plain line, no effect.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    /// A row of `=` characters.
    pub fn rule(&mut self, width: usize) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(width))
    }

    /// Rule, typewritten title, rule.
    pub fn banner(&mut self, title: &str, width: usize) -> io::Result<()> {
        writeln!(self.out)?;
        self.rule(width)?;
        self.typewriter(title)?;
        self.rule(width)
    }

    /// Sleep for a nominal duration, scaled by the pace.
    pub fn hold(&self, nominal: Duration) {
        sleep(self.pace.scaled(nominal));
    }

    pub fn play(&mut self, effect: SoundEffect) {
        self.sounds.play(effect, DEFAULT_VOLUME);
    }

    fn typewrite_chars(&mut self, text: &str, dramatic: bool) -> io::Result<()> {
        for ch in text.chars() {
            write!(self.out, "{}", ch)?;
            self.out.flush()?;
            self.sounds.play(SoundEffect::Keypress, DEFAULT_VOLUME);

            if dramatic && PAUSE_CHARS.contains(ch) {
                sleep(self.pace.char_delay * self.pace.pause_multiplier);
            } else {
                sleep(self.pace.char_delay);
            }
        }
        Ok(())
    }
}

fn sleep(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}
