use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use std::thread;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("interrupted by user")]
    Interrupted,

    #[error("input closed")]
    Closed,

    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Line-oriented user interaction.
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Show `message` and read one trimmed line of input.
    async fn prompt(&mut self, message: &str) -> Result<String, PromptError>;

    fn write_line(&mut self, line: &str);

    /// Resolves when the user asks to interrupt the current operation.
    async fn interrupted(&self);
}

/// Terminal over the process stdin/stdout with Ctrl-C as the interrupt.
///
/// Stdin is read on a detached thread, so an abandoned read never keeps the
/// runtime from shutting down.
pub struct StdTerminal {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl StdTerminal {
    pub fn new() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel(16);
        thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                for line in io::stdin().lock().lines() {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self { lines: rx })
    }
}

#[async_trait]
impl Terminal for StdTerminal {
    async fn prompt(&mut self, message: &str) -> Result<String, PromptError> {
        print!("{message}");
        io::stdout().flush()?;

        tokio::select! {
            line = self.lines.recv() => match line {
                Some(line) => Ok(line?.trim().to_string()),
                None => Err(PromptError::Closed),
            },
            _ = tokio::signal::ctrl_c() => {
                println!();
                Err(PromptError::Interrupted)
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        println!("{line}");
    }

    async fn interrupted(&self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}

/// Interpret a yes/no answer; `None` when it is neither.
pub fn parse_confirmation(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" | "s" | "si" | "sí" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// Ask until the user answers yes or no.
pub async fn confirm<T: Terminal + ?Sized>(
    terminal: &mut T,
    question: &str,
) -> Result<bool, PromptError> {
    loop {
        let answer = terminal.prompt(&format!("{question} (y/n): ")).await?;
        match parse_confirmation(&answer) {
            Some(decision) => return Ok(decision),
            None => terminal.write_line("Please answer 'y' (yes) or 'n' (no)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_confirmation() {
        for yes in ["y", "Y", "yes", " YES ", "si", "sí"] {
            assert_eq!(parse_confirmation(yes), Some(true), "{yes}");
        }
        for no in ["n", "No", "NO"] {
            assert_eq!(parse_confirmation(no), Some(false), "{no}");
        }
        for neither in ["", "maybe", "yep", "1"] {
            assert_eq!(parse_confirmation(neither), None, "{neither}");
        }
    }
}
