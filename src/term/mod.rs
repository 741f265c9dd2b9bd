//! Terminal I/O layer (§4.1): the only place that reads from or writes to
//! the controlling TTY.
//!
//! The raw-mode guard is lifted directly from the teacher's
//! `editor::RawModeGuard` (enable on construction, restore on `Drop`, even
//! on panic) together with the `EDITOR_ACTIVE` sentinel a `ctrlc` handler
//! outside the loop consults. `window_size()` caches `(cols, rows)` and is
//! invalidated by a `SIGWINCH` handler, generalizing the teacher's Unix
//! `libc` signal handling in `job_control.rs` to a single `AtomicBool` the
//! main loop polls once per tick (§5).

pub mod key;

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::{cursor, execute, queue, terminal};

pub use key::KeyEvent;

/// `true` while the terminal layer holds raw mode (teacher's
/// `editor::EDITOR_ACTIVE`).
pub static EDITOR_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Set by the `SIGWINCH` handler; cleared the next time `window_size()` is
/// queried, per §5's "refreshing the cached window size... on the next
/// tick".
static WINCH_PENDING: AtomicBool = AtomicBool::new(false);

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        EDITOR_ACTIVE.store(true, Ordering::Relaxed);
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        EDITOR_ACTIVE.store(false, Ordering::Relaxed);
    }
}

/// Distinguished result of a failed `read_key`: the loop must terminate
/// (§4.1: "Failure to read... terminates the loop").
#[derive(Debug)]
pub struct EndOfInput;

pub struct Terminal {
    _guard: RawModeGuard,
    cached_size: (u16, u16),
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let guard = RawModeGuard::enter()?;
        install_winch_handler();
        let cached_size = terminal::size().unwrap_or((80, 24));
        Ok(Terminal {
            _guard: guard,
            cached_size,
        })
    }

    /// Blocks until a key event is available; resize/mouse/paste events are
    /// folded into `KeyEvent::Resize`/`Ignored` rather than surfaced to the
    /// editor (§4.1).
    pub fn read_key(&mut self) -> Result<KeyEvent, EndOfInput> {
        loop {
            let ev = event::read().map_err(|_| EndOfInput)?;
            match ev {
                Event::Key(k) => {
                    if k.kind != KeyEventKind::Press && k.kind != KeyEventKind::Repeat {
                        continue;
                    }
                    return Ok(key::from_crossterm(k));
                }
                Event::Resize(cols, rows) => {
                    self.cached_size = (cols, rows);
                    return Ok(KeyEvent::Resize);
                }
                _ => continue,
            }
        }
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(io::stdout(), cursor::Hide)
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        execute!(io::stdout(), cursor::Show)
    }

    /// Move the cursor by `(dx, dy)` columns/rows; a zero delta is a no-op
    /// (§4.1: "Must be idempotent on no-op").
    pub fn move_rel(&mut self, dx: i32, dy: i32) -> io::Result<()> {
        let mut out = io::stdout();
        if dx > 0 {
            queue!(out, cursor::MoveRight(dx as u16))?;
        } else if dx < 0 {
            queue!(out, cursor::MoveLeft((-dx) as u16))?;
        }
        if dy > 0 {
            queue!(out, cursor::MoveDown(dy as u16))?;
        } else if dy < 0 {
            queue!(out, cursor::MoveUp((-dy) as u16))?;
        }
        out.flush()
    }

    pub fn move_col(&mut self, col: u16) -> io::Result<()> {
        execute!(io::stdout(), cursor::MoveToColumn(col))
    }

    pub fn erase_to_right(&mut self) -> io::Result<()> {
        execute!(io::stdout(), terminal::Clear(terminal::ClearType::UntilNewLine))
    }

    pub fn erase_below(&mut self) -> io::Result<()> {
        execute!(io::stdout(), terminal::Clear(terminal::ClearType::FromCursorDown))
    }

    pub fn write_str(&mut self, s: &str) -> io::Result<()> {
        let mut out = io::stdout();
        out.write_all(s.as_bytes())?;
        out.flush()
    }

    /// Current `(cols, rows)`, refreshed if `SIGWINCH` fired since the last
    /// call (§4.1, §5).
    pub fn window_size(&mut self) -> (u16, u16) {
        if WINCH_PENDING.swap(false, Ordering::Relaxed) {
            if let Ok(size) = terminal::size() {
                self.cached_size = size;
            }
        }
        self.cached_size
    }
}

#[cfg(unix)]
fn install_winch_handler() {
    use std::sync::Once;
    static ONCE: Once = Once::new();
    ONCE.call_once(|| unsafe {
        extern "C" fn handler(_: i32) {
            WINCH_PENDING.store(true, Ordering::Relaxed);
        }
        libc::signal(libc::SIGWINCH, handler as libc::sighandler_t);
    });
}

#[cfg(not(unix))]
fn install_winch_handler() {}
