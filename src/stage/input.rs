// OneHand Prompt Input
// Copyright (c) 2026 Xing_The_Creator | OneHand
//
// Line input for the interactive tools. Lines are read on a background
// thread so a prompt can be raced against Ctrl-C; an interrupt while
// waiting for an answer ends the session like a quit word would.

use std::io::{self, BufRead, BufReader};

use tokio::sync::mpsc;
use tracing::debug;

/// What came back from a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// A trimmed line of input.
    Line(String),
    /// Input was closed.
    Eof,
    /// Ctrl-C while waiting.
    Interrupted,
}

pub struct PromptInput {
    lines: mpsc::UnboundedReceiver<io::Result<String>>,
    interrupts: Option<mpsc::UnboundedReceiver<()>>,
}

impl PromptInput {
    /// Terminal input with Ctrl-C treated as quit. Needs a running tokio runtime.
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(io::stdin())).watch_ctrl_c()
    }

    /// Read lines from any reader (scripted sessions, tests).
    pub fn from_reader<R: BufRead + Send + 'static>(mut reader: R) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.send(Ok(line)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        });

        Self {
            lines: rx,
            interrupts: None,
        }
    }

    /// Deliver interrupts from `rx` to whoever is waiting on a prompt.
    pub fn with_interrupts(mut self, rx: mpsc::UnboundedReceiver<()>) -> Self {
        self.interrupts = Some(rx);
        self
    }

    /// Forward every Ctrl-C to this input for the rest of the process.
    pub fn watch_ctrl_c(self) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                debug!("[INPUT] Ctrl-C received");
                if tx.send(()).is_err() {
                    break;
                }
            }
        });
        self.with_interrupts(rx)
    }

    /// Wait for the next answer. A pending interrupt wins over buffered input.
    pub async fn next_line(&mut self) -> io::Result<Answer> {
        let Self { lines, interrupts } = self;

        let line = match interrupts {
            Some(interrupts) => tokio::select! {
                biased;
                Some(()) = interrupts.recv() => return Ok(Answer::Interrupted),
                line = lines.recv() => line,
            },
            None => lines.recv().await,
        };

        match line {
            Some(Ok(line)) => Ok(Answer::Line(line.trim().to_string())),
            Some(Err(e)) => Err(e),
            None => Ok(Answer::Eof),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scripted(text: &str) -> PromptInput {
        PromptInput::from_reader(Cursor::new(text.as_bytes().to_vec()))
    }

    #[tokio::test]
    async fn test_lines_are_trimmed_then_eof() {
        let mut input = scripted("  first \n\nlast");
        assert_eq!(input.next_line().await.unwrap(), Answer::Line("first".to_string()));
        assert_eq!(input.next_line().await.unwrap(), Answer::Line(String::new()));
        assert_eq!(input.next_line().await.unwrap(), Answer::Line("last".to_string()));
        assert_eq!(input.next_line().await.unwrap(), Answer::Eof);
        assert_eq!(input.next_line().await.unwrap(), Answer::Eof);
    }

    #[tokio::test]
    async fn test_interrupt_beats_buffered_input() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut input = scripted("typed\n").with_interrupts(rx);

        tx.send(()).unwrap();
        assert_eq!(input.next_line().await.unwrap(), Answer::Interrupted);
        assert_eq!(input.next_line().await.unwrap(), Answer::Line("typed".to_string()));
    }

    #[tokio::test]
    async fn test_every_interrupt_is_delivered() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut input = scripted("").with_interrupts(rx);

        tx.send(()).unwrap();
        assert_eq!(input.next_line().await.unwrap(), Answer::Interrupted);
        tx.send(()).unwrap();
        assert_eq!(input.next_line().await.unwrap(), Answer::Interrupted);
    }
}
