//! Terminal size and resize signaling.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use libc::c_int;
use signal_hook::iterator::Signals;

/// Nominal pixel width of one terminal column, used to map columns onto the
/// breakpoint table.
pub const COLUMN_PX: u32 = 8;

pub fn read_winsize(fd: c_int) -> Option<(u16, u16)> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &mut size) };
    if result == 0 && size.ws_col > 0 && size.ws_row > 0 {
        Some((size.ws_col, size.ws_row))
    } else {
        None
    }
}

/// Current nominal viewport width in pixels, or `None` without a terminal.
#[must_use]
pub fn viewport_width_px() -> Option<u32> {
    read_winsize(libc::STDOUT_FILENO).map(|(cols, _)| u32::from(cols) * COLUMN_PX)
}

/// Watches SIGWINCH and latches a resize flag for the console loop.
pub struct ResizeWatcher {
    resized: Arc<AtomicBool>,
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

impl ResizeWatcher {
    pub fn start() -> io::Result<Self> {
        let mut signals = Signals::new([libc::SIGWINCH])?;
        let handle = signals.handle();
        let resized = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&resized);

        let thread = thread::Builder::new()
            .name("samarth-resize".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    flag.store(true, Ordering::SeqCst);
                }
            })?;

        Ok(Self {
            resized,
            handle,
            thread: Some(thread),
        })
    }

    /// Returns and clears the latched resize flag.
    pub fn take_resized(&self) -> bool {
        self.resized.swap(false, Ordering::SeqCst)
    }
}

impl Drop for ResizeWatcher {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
