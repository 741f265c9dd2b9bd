//! The `Session` struct (§9 design note: "bundle pervasive global state into
//! a single `Session` value owned by the main loop; subsystems receive it by
//! exclusive reference on each tick"). Generalizes the teacher's scattered
//! module-level state (history in `LineEditor`, job table in `jobs.rs`,
//! etc.) into one struct.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::binindex::BinaryIndex;
use crate::buffer::InputBuffer;
use crate::classifier::{self, ClassifierContext, ClassifierState};
use crate::config::Config;
use crate::error::CoreResult;
use crate::highlight::Highlighter;
use crate::listing::ListingCache;
use crate::stores::actions::ActionStore;
use crate::stores::aliases::AliasStore;
use crate::stores::bookmarks::BookmarkStore;
use crate::stores::dirhist::DirHistory;
use crate::stores::history::HistoryStore;
use crate::stores::jump::{self, JumpStore};
use crate::stores::pin::PinStore;
use crate::stores::prompts::PromptThemeTable;
use crate::stores::remotes::RemoteTable;
use crate::stores::tags::TagStore;
use crate::stores::workspaces::WorkspaceTable;
use crate::suggest::{self, Suggestion, SuggestContext};
use crate::word::Word;

/// Paths of every persisted file under the profile configuration directory
/// (§6's "Persisted state layout").
pub struct ProfilePaths {
    pub history: PathBuf,
    pub jump: PathBuf,
    pub bookmarks: PathBuf,
    pub dirhist: PathBuf,
    pub last: PathBuf,
    pub pin: PathBuf,
    pub actions: PathBuf,
    pub nets: PathBuf,
    pub aliases: PathBuf,
    pub tags: PathBuf,
    pub prompts: PathBuf,
}

impl ProfilePaths {
    pub fn under(dir: &Path) -> Self {
        ProfilePaths {
            history: dir.join("history.cfm"),
            jump: dir.join("jump.cfm"),
            bookmarks: dir.join("bookmarks.cfm"),
            dirhist: dir.join("dirhist.cfm"),
            last: dir.join(".last"),
            pin: dir.join(".pin"),
            actions: dir.join("actions.cfm"),
            nets: dir.join("nets.cfm"),
            aliases: dir.join("aliases.cfm"),
            tags: dir.join("tags.cfm"),
            prompts: dir.join("prompts.cfm"),
        }
    }
}

pub struct Session {
    pub cfg: Config,
    pub cwd: PathBuf,

    pub buffer: InputBuffer,
    yank_register: String,

    pub history: HistoryStore,
    pub bookmarks: BookmarkStore,
    pub jump: JumpStore,
    pub aliases: AliasStore,
    pub workspaces: WorkspaceTable,
    pub remotes: RemoteTable,
    pub tags: TagStore,
    pub actions: ActionStore,
    pub prompts: PromptThemeTable,
    pub dirhist: DirHistory,
    pub pin: PinStore,

    pub listing: ListingCache,
    pub binaries: BinaryIndex,

    pub classifier: ClassifierState,
    pub suggestion: Option<Suggestion>,
    pub highlighter: Highlighter,

    /// Index into `history` while recalling with `history_prev`/`history_next`;
    /// `None` when not currently recalling.
    history_cursor: Option<usize>,
    /// Buffer snapshot taken the first time the user recalls history, restored
    /// when recalling past the newest entry (mirrors the teacher's
    /// `saved_buffer`).
    saved_buffer: String,

    last_exit_code: Option<i32>,

    /// Row count the BAEJ suggestion occupied on the last frame drawn, so
    /// the next render can erase exactly that area once the suggestion is
    /// gone or shrinks (mirrors the original's `suggestion.nlines`).
    pub suggestion_rows: usize,
}

impl Session {
    /// Load every external store, disabling (not failing) any that error —
    /// per §7's policy, a `StoreLoadError` is reported once via the
    /// diagnostic sink and the source is dropped for the session.
    pub fn new(cfg: Config, cwd: PathBuf, profile_dir: &Path) -> CoreResult<Self> {
        let paths = ProfilePaths::under(profile_dir);

        let history = HistoryStore::load(&paths.history, cfg.max_hist as usize).unwrap_or_else(|e| {
            warn!(store = "history", error = %e, "failed to load; disabling for this session");
            HistoryStore::default()
        });
        let bookmarks = BookmarkStore::load(&paths.bookmarks).unwrap_or_else(|e| {
            warn!(store = "bookmarks", error = %e, "failed to load; disabling for this session");
            BookmarkStore::default()
        });
        let jump = JumpStore::load(&paths.jump).unwrap_or_else(|e| {
            warn!(store = "jump", error = %e, "failed to load; disabling for this session");
            JumpStore::default()
        });
        let aliases = AliasStore::load(&paths.aliases).unwrap_or_else(|e| {
            warn!(store = "aliases", error = %e, "failed to load; disabling for this session");
            AliasStore::default()
        });
        let workspaces = WorkspaceTable::load(&paths.last, &cwd.to_string_lossy()).unwrap_or_else(|e| {
            warn!(store = "workspaces", error = %e, "failed to load; disabling for this session");
            WorkspaceTable::default()
        });
        let remotes = RemoteTable::load(&paths.nets).unwrap_or_else(|e| {
            warn!(store = "remotes", error = %e, "failed to load; disabling for this session");
            RemoteTable::default()
        });
        let tags = TagStore::load(&paths.tags).unwrap_or_else(|e| {
            warn!(store = "tags", error = %e, "failed to load; disabling for this session");
            TagStore::default()
        });
        let actions = ActionStore::load(&paths.actions).unwrap_or_else(|e| {
            warn!(store = "actions", error = %e, "failed to load; disabling for this session");
            ActionStore::default()
        });
        let prompts = PromptThemeTable::load(&paths.prompts).unwrap_or_else(|e| {
            warn!(store = "prompts", error = %e, "failed to load; disabling for this session");
            PromptThemeTable::default()
        });
        let dirhist = DirHistory::load(&paths.dirhist, cfg.max_dirhist as usize).unwrap_or_else(|e| {
            warn!(store = "dirhist", error = %e, "failed to load; disabling for this session");
            DirHistory::default()
        });
        let pin = PinStore::load(&paths.pin).unwrap_or_else(|e| {
            warn!(store = "pin", error = %e, "failed to load; disabling for this session");
            PinStore::default()
        });

        let extra_names = actions.names().map(str::to_string).chain(
            aliases.entries().iter().map(|a| a.name.clone()),
        );
        let binaries = BinaryIndex::build(extra_names);

        let mut listing = ListingCache::new();
        if let Err(e) = listing.force_refresh(&cwd, &cfg) {
            warn!(error = %e, "failed to list starting directory");
        }

        Ok(Session {
            cfg,
            cwd,
            buffer: InputBuffer::new(),
            yank_register: String::new(),
            history,
            bookmarks,
            jump,
            aliases,
            workspaces,
            remotes,
            tags,
            actions,
            prompts,
            dirhist,
            pin,
            listing,
            binaries,
            classifier: ClassifierState {
                words: Vec::new(),
                command_category: None,
                wrong_cmd: false,
                colors: Vec::new(),
            },
            suggestion: None,
            highlighter: Highlighter::new(),
            history_cursor: None,
            saved_buffer: String::new(),
            last_exit_code: None,
            suggestion_rows: 0,
        })
    }

    // ---- per-tick pipeline (§2, §5 ordering guarantees) ----

    pub fn reclassify(&mut self) {
        let ctx = ClassifierContext {
            cfg: &self.cfg,
            aliases: self.aliases.entries(),
            binaries: &self.binaries,
            listing: &self.listing,
        };
        self.classifier = classifier::classify(self.buffer.as_str(), &ctx);
    }

    pub fn recompute_suggestion(&mut self) {
        if self.classifier.wrong_cmd {
            // Warning prompt takes precedence unless an inline completion
            // still resolves (§4.4 suppression rule); `suggest::compute`
            // already encodes that fallback.
        }
        let ctx = SuggestContext {
            cfg: &self.cfg,
            cwd: &self.cwd,
            now: jump::unix_now(),
            aliases: &self.aliases,
            bookmarks: &self.bookmarks,
            jump: &self.jump,
            history: &self.history,
            listing: &self.listing,
            workspaces: &self.workspaces,
            remotes: &self.remotes,
            tags: &self.tags,
            prompts: &self.prompts,
            dirhist: &self.dirhist,
            binaries: &self.binaries,
        };
        let cursor_byte = self.buffer.cursor_byte_offset();
        self.suggestion = suggest::compute(self.buffer.as_str(), cursor_byte, &self.classifier, &ctx);
    }

    // ---- line editor operations (§4.2) ----

    pub fn insert(&mut self, grapheme: char) {
        let mut buf = [0u8; 4];
        self.buffer.insert(grapheme.encode_utf8(&mut buf));
        self.history_cursor = None;
    }

    pub fn backspace(&mut self) {
        self.buffer.backspace();
    }

    pub fn delete(&mut self) {
        self.buffer.delete();
    }

    pub fn move_left(&mut self) {
        self.buffer.move_left();
    }

    pub fn move_right(&mut self) {
        self.buffer.move_right();
    }

    pub fn word_left(&mut self) {
        self.buffer.word_left();
    }

    pub fn word_right(&mut self) {
        self.buffer.word_right();
    }

    pub fn home(&mut self) {
        self.buffer.home();
    }

    pub fn end(&mut self) {
        self.buffer.end_of_line();
    }

    pub fn kill_to_end(&mut self) {
        self.yank_register = self.buffer.kill_to_end();
    }

    pub fn kill_to_start(&mut self) {
        self.yank_register = self.buffer.kill_to_start();
    }

    pub fn kill_word(&mut self) {
        self.yank_register = self.buffer.kill_word_before();
    }

    pub fn yank(&mut self) {
        let register = self.yank_register.clone();
        self.buffer.yank(&register);
    }

    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.history_cursor {
            None => {
                self.saved_buffer = self.buffer.as_str().to_string();
                self.history.len() - 1
            }
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.history_cursor = Some(idx);
        if let Some(entry) = self.history.get(idx) {
            self.buffer.replace(entry);
        }
    }

    pub fn history_next(&mut self) {
        let Some(idx) = self.history_cursor else { return };
        if idx + 1 >= self.history.len() {
            self.history_cursor = None;
            let saved = self.saved_buffer.clone();
            self.buffer.replace(&saved);
            return;
        }
        let next = idx + 1;
        self.history_cursor = Some(next);
        if let Some(entry) = self.history.get(next) {
            self.buffer.replace(entry);
        }
    }

    /// Emit the current buffer as a completed line and reset for the next
    /// prompt iteration (§3 lifecycle: buffer is destroyed after Enter).
    pub fn accept_line(&mut self) -> String {
        let line = self.buffer.as_str().to_string();
        self.history.add(&line);
        self.buffer.clear();
        self.suggestion = None;
        self.history_cursor = None;
        self.highlighter.invalidate();
        self.suggestion_rows = 0;
        line
    }

    pub fn set_last_exit_code(&mut self, code: i32) {
        self.last_exit_code = Some(code);
    }

    pub fn last_exit_code(&self) -> Option<i32> {
        self.last_exit_code
    }

    fn last_word_start_byte(&self) -> usize {
        self.classifier
            .words
            .last()
            .map(|w: &Word| w.start)
            .unwrap_or(0)
    }

    /// Append the suggestion tail to the buffer (inline) or replace the
    /// last word with it (BAEJ), then clear the suggestion (§4.4
    /// acceptance).
    pub fn accept_suggestion(&mut self) {
        let Some(suggestion) = self.suggestion.take() else { return };
        match suggestion.mode {
            crate::suggest::RenderMode::Inline => {
                let tail = &suggestion.text[suggestion.offset..];
                let end_byte = self.buffer.as_str().len();
                self.buffer.append_at(end_byte, tail);
            }
            crate::suggest::RenderMode::Baej => {
                let word_start = self.last_word_start_byte();
                self.buffer.replace_last_word(word_start, &suggestion.text);
            }
        }
    }

    /// Append only up to the first unescaped word boundary of the
    /// suggestion's tail (§4.2).
    pub fn accept_suggestion_word(&mut self) {
        let Some(suggestion) = self.suggestion.take() else { return };
        let tail = match suggestion.mode {
            crate::suggest::RenderMode::Inline => &suggestion.text[suggestion.offset..],
            crate::suggest::RenderMode::Baej => suggestion.text.as_str(),
        };
        let first_word_end = tail.find(char::is_whitespace).unwrap_or(tail.len());
        let first_word = &tail[..first_word_end];
        match suggestion.mode {
            crate::suggest::RenderMode::Inline => {
                let end_byte = self.buffer.as_str().len();
                self.buffer.append_at(end_byte, first_word);
            }
            crate::suggest::RenderMode::Baej => {
                let word_start = self.last_word_start_byte();
                self.buffer.replace_last_word(word_start, first_word);
            }
        }
    }

    pub fn clear_suggestion(&mut self) {
        self.suggestion = None;
    }

    /// Ctrl-L: request redisplay at row 0 and clear the highlighter's diff
    /// cache so the next frame repaints everything.
    pub fn clear_screen_requested(&mut self) {
        self.highlighter.invalidate();
        self.suggestion_rows = 0;
    }

    /// Re-scan the working directory's listing if it's changed or gone
    /// stale; called after any operation that may have changed `cwd`
    /// (`cd`, workspace switch, jump acceptance).
    pub fn refresh_listing(&mut self) {
        if let Err(e) = self.listing.refresh_if_stale(&self.cwd, &self.cfg) {
            warn!(error = %e, "failed to refresh directory listing");
        }
    }

    /// Best-effort flush of every store to its file, called on shutdown.
    /// A save failure is logged and otherwise ignored — nothing the session
    /// is doing justifies blocking exit on a write error.
    pub fn persist(&self) {
        let results = [
            ("history", self.history.save()),
            ("bookmarks", self.bookmarks.save()),
            ("jump", self.jump.save()),
            ("aliases", self.aliases.save()),
            ("workspaces", self.workspaces.save()),
            ("remotes", self.remotes.save()),
            ("tags", self.tags.save()),
            ("actions", self.actions.save()),
            ("prompts", self.prompts.save()),
            ("dirhist", self.dirhist.save()),
            ("pin", self.pin.save()),
        ];
        for (store, result) in results {
            if let Err(e) = result {
                warn!(store, error = %e, "failed to save on shutdown");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::{RenderMode, Suggestion, SuggestionSource};
    use crate::word::{OpenQuote, Word};

    fn fresh_session() -> Session {
        let profile = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        let mut session = Session::new(Config::default(), cwd.path().to_path_buf(), profile.path()).unwrap();
        session.binaries = BinaryIndex::default();
        session
    }

    /// Inline acceptance stops at the first unescaped separator in the
    /// suggestion's already-typed-aware tail, rather than swallowing the
    /// whole remaining line.
    #[test]
    fn accept_suggestion_word_inline_stops_before_next_word() {
        let mut session = fresh_session();
        session.buffer = InputBuffer::from_str("gi");
        session.suggestion = Some(Suggestion {
            text: "git status -s".to_string(),
            source: SuggestionSource::History,
            offset: 2,
            mode: RenderMode::Inline,
            rows: 0,
        });

        session.accept_suggestion_word();

        assert_eq!(session.buffer.as_str(), "git");
        assert!(session.suggestion.is_none());
    }

    /// BAEJ acceptance replaces only the last word with the first word of
    /// the suggestion text, leaving the rest of a multi-word target for a
    /// later keystroke.
    #[test]
    fn accept_suggestion_word_baej_replaces_last_word_only() {
        let mut session = fresh_session();
        session.buffer = InputBuffer::from_str("j fo");
        session.classifier.words = vec![Word {
            start: 2,
            end: 4,
            quote: OpenQuote::None,
            quoted: false,
            is_command_word: false,
        }];
        session.suggestion = Some(Suggestion {
            text: "/home/u/foo bar".to_string(),
            source: SuggestionSource::JumpTarget,
            offset: 0,
            mode: RenderMode::Baej,
            rows: 0,
        });

        session.accept_suggestion_word();

        assert_eq!(session.buffer.as_str(), "j /home/u/foo");
        assert!(session.suggestion.is_none());
    }
}
