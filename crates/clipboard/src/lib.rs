//! Clipboard operations for milo.
//!
//! Cross-platform clipboard access through arboard. On Linux the copy goes
//! to both the CLIPBOARD and PRIMARY selections; paste prefers CLIPBOARD.

use anyhow::{anyhow, Context, Result};
use arboard::Clipboard;
use std::sync::{Mutex, OnceLock};

#[cfg(target_os = "linux")]
use arboard::{GetExtLinux, LinuxClipboardKind, SetExtLinux};

/// Global clipboard instance kept alive for the program lifetime; some
/// platforms drop the selection when the owning handle goes away.
static CLIPBOARD: OnceLock<Mutex<Clipboard>> = OnceLock::new();

fn clipboard() -> Result<&'static Mutex<Clipboard>> {
    if CLIPBOARD.get().is_none() {
        let handle = Clipboard::new().context("Failed to initialize clipboard")?;
        let _ = CLIPBOARD.set(Mutex::new(handle));
    }
    CLIPBOARD
        .get()
        .ok_or_else(|| anyhow!("Clipboard unavailable"))
}

/// Copy text to the system clipboard.
pub fn copy(text: &str) -> Result<()> {
    let mut clipboard = clipboard()?
        .lock()
        .map_err(|e| anyhow!("Failed to lock clipboard: {e}"))?;

    #[cfg(target_os = "linux")]
    {
        clipboard
            .set()
            .clipboard(LinuxClipboardKind::Clipboard)
            .text(text.to_string())
            .context("Failed to set clipboard text")?;
        // Middle-click selection; best effort.
        let _ = clipboard
            .set()
            .clipboard(LinuxClipboardKind::Primary)
            .text(text.to_string());
    }

    #[cfg(not(target_os = "linux"))]
    clipboard
        .set_text(text)
        .context("Failed to set clipboard text")?;

    Ok(())
}

/// Paste text from the system clipboard. `None` when empty or inaccessible.
pub fn paste() -> Option<String> {
    let mut clipboard = clipboard().ok()?.lock().ok()?;

    #[cfg(target_os = "linux")]
    {
        if let Ok(text) = clipboard
            .get()
            .clipboard(LinuxClipboardKind::Clipboard)
            .text()
        {
            if !text.is_empty() {
                return Some(text);
            }
        }
        clipboard
            .get()
            .clipboard(LinuxClipboardKind::Primary)
            .text()
            .ok()
    }

    #[cfg(not(target_os = "linux"))]
    clipboard.get_text().ok()
}
