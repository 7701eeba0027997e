//! Raw-mode terminal lifecycle and byte-level input.

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use std::io::{self, Read};
use std::os::fd::AsFd;

/// How long a single input read waits before giving the caller a chance
/// to notice a resize, in milliseconds.
const INPUT_POLL_MS: u16 = 100;

/// Puts the terminal into raw mode on the alternate screen and restores
/// it on drop, so a panic or early return never leaves the shell broken.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        Ok(Self)
    }

    /// Current terminal size as (columns, rows).
    pub fn size(&self) -> Result<(u16, u16)> {
        crossterm::terminal::size().context("Failed to query terminal size")
    }

    /// Read one burst of input bytes into `buf`.
    ///
    /// Waits up to [`INPUT_POLL_MS`] for input; returns `Ok(0)` on
    /// timeout so the caller can re-check the terminal size and redraw.
    pub fn read_input(&self, buf: &mut [u8]) -> Result<usize> {
        let stdin = io::stdin();
        let fd = stdin.as_fd();
        let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
        let ready = poll(&mut fds, PollTimeout::from(INPUT_POLL_MS))
            .context("Failed to poll stdin")?;
        if ready == 0 {
            return Ok(0);
        }
        let n = stdin
            .lock()
            .read(buf)
            .context("Failed to read from stdin")?;
        Ok(n)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}
