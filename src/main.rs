//! Entry point: owns the event loop, grounded in the teacher's `main.rs`
//! loop shape (prompt, read, dispatch, execute) but routed through the
//! terminal layer and suggestion engine instead of `io::stdin().read_line`.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::Ordering;

use clap::Parser;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use fman::classifier::Color;
use fman::config::{Cli, Config};
use fman::executor;
use fman::logging;
use fman::session::Session;
use fman::suggest::RenderMode;
use fman::term::key::{Direction, KeyEvent};
use fman::term::{self, Terminal};

fn main() {
    logging::init();

    let cli = Cli::parse();
    if cli.version {
        println!(env!("CARGO_PKG_VERSION"));
        return;
    }

    let profile_dir = profile_dir();
    let _ = std::fs::create_dir_all(&profile_dir);
    let config_path = cli.config_file.clone().unwrap_or_else(|| profile_dir.join("fman.toml"));
    let cfg = Config::load(Some(&config_path), &cli);

    let cwd = cli
        .start_dir
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut session = match Session::new(cfg, cwd, &profile_dir) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("fman: failed to start session: {e}");
            std::process::exit(1);
        }
    };

    ctrlc::set_handler(|| {
        if !term::EDITOR_ACTIVE.load(Ordering::Relaxed) {
            println!();
            let _ = io::stdout().flush();
        }
    })
    .ok();

    let mut terminal = match Terminal::new() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("fman: failed to initialize terminal: {e}");
            std::process::exit(1);
        }
    };

    session.reclassify();
    session.recompute_suggestion();
    let _ = render(&mut terminal, &mut session);

    loop {
        let key = match terminal.read_key() {
            Ok(key) => key,
            Err(_) => {
                let _ = terminal.write_str("\r\n");
                break;
            }
        };

        match key {
            KeyEvent::Grapheme(c) => session.insert(c),
            KeyEvent::Backspace => session.backspace(),
            KeyEvent::Delete => session.delete(),
            KeyEvent::Home => session.home(),
            KeyEvent::End => session.end(),
            KeyEvent::Tab => session.accept_suggestion(),
            KeyEvent::Esc => session.clear_suggestion(),
            KeyEvent::Arrow(Direction::Left) => session.move_left(),
            KeyEvent::Arrow(Direction::Right) => {
                if session.buffer.cursor() == session.buffer.end() && session.suggestion.is_some() {
                    session.accept_suggestion_word();
                } else {
                    session.move_right();
                }
            }
            KeyEvent::Arrow(Direction::Up) => session.history_prev(),
            KeyEvent::Arrow(Direction::Down) => session.history_next(),
            KeyEvent::Ctrl('a') => session.home(),
            KeyEvent::Ctrl('e') => session.end(),
            KeyEvent::Ctrl('k') => session.kill_to_end(),
            KeyEvent::Ctrl('u') => session.kill_to_start(),
            KeyEvent::Ctrl('w') => session.kill_word(),
            KeyEvent::Ctrl('y') => session.yank(),
            KeyEvent::Ctrl('l') => {
                let _ = terminal.erase_below();
                session.clear_screen_requested();
            }
            KeyEvent::Ctrl('c') => {
                session.buffer.clear();
                session.clear_suggestion();
            }
            KeyEvent::Ctrl('d') => {
                if session.buffer.is_empty() {
                    let _ = terminal.write_str("\r\n");
                    session.persist();
                    std::process::exit(session.last_exit_code().unwrap_or(0));
                }
                session.delete();
            }
            KeyEvent::Alt('f') => session.word_right(),
            KeyEvent::Alt('b') => session.word_left(),
            KeyEvent::Enter => {
                let _ = terminal.write_str("\r\n");
                let line = session.accept_line();
                if !line.trim().is_empty() {
                    let category = session.classifier.command_category;
                    if let Err(e) = executor::execute(&line, category, &mut session) {
                        tracing::warn!(error = %e, "command exited with an error");
                    }
                }
                session.reclassify();
                session.recompute_suggestion();
                let _ = render(&mut terminal, &mut session);
                continue;
            }
            KeyEvent::Resize | KeyEvent::Ignored | KeyEvent::Ctrl(_) | KeyEvent::Alt(_) => {}
        }

        session.reclassify();
        session.recompute_suggestion();
        let _ = render(&mut terminal, &mut session);
    }

    session.persist();
    std::process::exit(session.last_exit_code().unwrap_or(0));
}

/// `$XDG_CONFIG_HOME/fman`, falling back to `~/.config/fman`.
fn profile_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("fman"))
        .unwrap_or_else(|| PathBuf::from(".fman"))
}

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_DIM: &str = "\x1b[2m";

fn ansi_for(color: Color) -> &'static str {
    match color {
        Color::Command => "\x1b[32m",
        Color::CommandWrong => "\x1b[31m",
        Color::Argument => "\x1b[0m",
        Color::String => "\x1b[33m",
        Color::Variable => "\x1b[36m",
        Color::Operator => "\x1b[35m",
        Color::Comment => "\x1b[90m",
        Color::Default => "\x1b[0m",
    }
}

/// Full single-tick redraw: erase the line, repaint prompt + classified
/// buffer + suggestion, then reposition the cursor (§4.1, §4.5). A Baej-mode
/// suggestion prints on the row below, since it replaces the last word in
/// place rather than trailing the cursor.
///
/// Colors are repainted either in full or as a targeted per-grapheme patch
/// depending on `Highlighter::diff` (§9's "Highlighter reuse across ticks"):
/// a diff touching every position means the grapheme count changed since
/// last tick (or this is the first tick), so nothing already on screen can
/// be trusted and a full line rewrite is cheaper than reasoning about it.
fn render(terminal: &mut Terminal, session: &mut Session) -> io::Result<()> {
    terminal.hide_cursor()?;

    let prompt = session.highlighter.prompt_for(
        session.classifier.wrong_cmd,
        &session.cfg.prompt_str,
        &session.cfg.warning_prompt_str,
    );

    let diffs = session.highlighter.diff(&session.classifier.colors);
    let grapheme_count = session.buffer.as_str().graphemes(true).count();
    let full_repaint = !session.cfg.highlight
        || diffs.len() >= session.classifier.colors.len()
        || grapheme_count != session.classifier.colors.len();

    let inline_tail = match &session.suggestion {
        Some(s) if session.cfg.suggestions && s.mode == RenderMode::Inline => {
            Some(s.text[s.offset..].to_string())
        }
        _ => None,
    };

    if full_repaint {
        let mut line = String::new();
        line.push_str(&prompt);
        if session.cfg.highlight {
            let mut colors = session.classifier.colors.iter();
            for grapheme in session.buffer.as_str().graphemes(true) {
                let color = colors.next().copied().unwrap_or(Color::Default);
                line.push_str(ansi_for(color));
                line.push_str(grapheme);
            }
            line.push_str(ANSI_RESET);
        } else {
            line.push_str(session.buffer.as_str());
        }
        if let Some(tail) = &inline_tail {
            line.push_str(ANSI_DIM);
            line.push_str(tail);
            line.push_str(ANSI_RESET);
        }
        terminal.move_col(0)?;
        terminal.erase_to_right()?;
        terminal.write_str(&line)?;
    } else {
        // Same grapheme count as last tick: only the positions `diffs`
        // flags need a touch, the rest of the row is already correct.
        let mut col = prompt.width() as u16;
        for (i, grapheme) in session.buffer.as_str().graphemes(true).enumerate() {
            let width = grapheme.width() as u16;
            if let Some(d) = diffs.iter().find(|d| d.grapheme_index == i) {
                terminal.move_col(col)?;
                terminal.write_str(ansi_for(d.color))?;
                terminal.write_str(grapheme)?;
                terminal.write_str(ANSI_RESET)?;
            }
            col += width;
        }
        terminal.move_col(col)?;
        terminal.erase_to_right()?;
        if let Some(tail) = &inline_tail {
            terminal.write_str(ANSI_DIM)?;
            terminal.write_str(tail)?;
            terminal.write_str(ANSI_RESET)?;
        }
    }

    // Baej row: size it against the real window, suppress it if it would
    // overflow the rows left below the prompt, and erase whatever the
    // previous tick left behind either way (§4.4's rendering contract).
    let (cols, win_rows) = terminal.window_size();
    let available_rows = win_rows.saturating_sub(1) as usize;
    let below = match &mut session.suggestion {
        Some(s) if session.cfg.suggestions && s.mode == RenderMode::Baej => {
            let width = s.text.width().max(1);
            let needed = width.div_ceil(cols.max(1) as usize);
            if needed > available_rows {
                s.rows = 0;
                None
            } else {
                s.rows = needed;
                Some((s.text.clone(), needed))
            }
        }
        _ => None,
    };

    if session.suggestion_rows > 0 {
        terminal.erase_below()?;
    }

    if let Some((text, rows)) = &below {
        terminal.write_str("\r\n")?;
        terminal.erase_to_right()?;
        terminal.write_str(ANSI_DIM)?;
        terminal.write_str(text)?;
        terminal.write_str(ANSI_RESET)?;
        terminal.move_rel(0, -(*rows as i32))?;
        session.suggestion_rows = *rows;
    } else {
        session.suggestion_rows = 0;
    }

    let col = prompt.width() + session.buffer.display_width_to_cursor();
    terminal.move_col(col as u16)?;
    terminal.show_cursor()?;
    Ok(())
}
