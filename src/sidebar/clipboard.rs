//! Clipboard access for the copy button
//!
//! [`SystemClipboard`] hands the text to the first platform clipboard tool it
//! finds. When there is none, [`WithFallback`] switches to a
//! [`ManualSelection`] clipboard that prints the text on its own line for the
//! user to select and copy.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::Mutex;

#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{program} exited with {status}")]
    CommandFailed { program: String, status: String },

    #[error("No clipboard available")]
    Unavailable,
}

#[cfg_attr(test, automock)]
pub trait Clipboard: Send + Sync {
    /// Places `text` on the clipboard
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// External program able to read clipboard contents from stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardTool {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

/// Tools tried in order by [`SystemClipboard::default`]
pub const DEFAULT_TOOLS: &[ClipboardTool] = &[
    ClipboardTool {
        program: "pbcopy",
        args: &[],
    },
    ClipboardTool {
        program: "wl-copy",
        args: &[],
    },
    ClipboardTool {
        program: "xclip",
        args: &["-selection", "clipboard"],
    },
    ClipboardTool {
        program: "xsel",
        args: &["--clipboard", "--input"],
    },
    ClipboardTool {
        program: "clip",
        args: &[],
    },
];

/// Clipboard backed by platform tools
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    tools: Vec<ClipboardTool>,
}

impl SystemClipboard {
    pub fn new(tools: Vec<ClipboardTool>) -> Self {
        Self { tools }
    }

    /// Runs one tool; `Ok(false)` means the program is not installed.
    fn try_tool(tool: &ClipboardTool, text: &str) -> Result<bool, ClipboardError> {
        let mut child = match Command::new(tool.program)
            .args(tool.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(ClipboardError::CommandFailed {
                program: tool.program.to_string(),
                status: status.to_string(),
            });
        }

        Ok(true)
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new(DEFAULT_TOOLS.to_vec())
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        for tool in &self.tools {
            if Self::try_tool(tool, text)? {
                debug!("Copied {} bytes with {}", text.len(), tool.program);
                return Ok(());
            }
        }

        Err(ClipboardError::Unavailable)
    }
}

/// Prints the text so it can be selected by hand
pub struct ManualSelection<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ManualSelection<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Clipboard for ManualSelection<W> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("output lock poisoned"))?;
        writeln!(out, "{text}")?;
        out.flush()?;
        Ok(())
    }
}

/// Uses `fallback` when `primary` reports that no clipboard is available
pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
}

impl<P: Clipboard, F: Clipboard> WithFallback<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: Clipboard, F: Clipboard> Clipboard for WithFallback<P, F> {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        match self.primary.write_text(text) {
            Err(ClipboardError::Unavailable) => {
                debug!("System clipboard unavailable, using manual selection");
                self.fallback.write_text(text)
            }
            result => result,
        }
    }
}
