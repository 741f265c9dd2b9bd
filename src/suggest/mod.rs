//! The suggestion engine (§4.4): computes at most one ghost completion for
//! the word under the cursor, selecting its source by the configured
//! strategy. One file per source, each grounded on the matching `check_*`
//! function in `original_source/src/suggestions.c`.

pub mod alias;
pub mod bookmark;
pub mod completion;
pub mod eln;
pub mod file_cwd;
pub mod history;
pub mod jump;

use std::path::Path;

use crate::binindex::BinaryIndex;
use crate::classifier::ClassifierState;
use crate::config::Config;
use crate::listing::ListingCache;
use crate::stores::aliases::AliasStore;
use crate::stores::bookmarks::BookmarkStore;
use crate::stores::dirhist::DirHistory;
use crate::stores::history::HistoryStore;
use crate::stores::jump::JumpStore;
use crate::stores::prompts::PromptThemeTable;
use crate::stores::remotes::RemoteTable;
use crate::stores::tags::TagStore;
use crate::stores::workspaces::WorkspaceTable;
use crate::word::Word;

/// A suggestion's source, a closed tagged variant (§9: "model BAEJ as a
/// tagged variant", generalized here to every source so renderer/acceptance
/// matches stay exhaustive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    History,
    Path,
    FileInCwd,
    CommandName,
    Alias,
    Bookmark,
    BackDir,
    JumpTarget,
    Eln,
    Workspace,
    Tag,
    SortMethod,
    PromptTheme,
    EnvVar,
    HomeUser,
    InternalParameter,
    HelpFlag,
}

/// Inline overlays the tail of the word under edit; BAEJ is rendered after
/// the cursor with a `" > "` separator because it does not share a prefix
/// with what was typed (§3, §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Inline,
    Baej,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub text: String,
    pub source: SuggestionSource,
    /// Byte offset into `text` already typed by the user; renders from here
    /// onward. Zero for BAEJ (GLOSSARY: "Suggestion offset").
    pub offset: usize,
    pub mode: RenderMode,
    /// Filled in by the render layer once window size is known; zero here.
    pub rows: usize,
}

impl Suggestion {
    fn inline(text: String, source: SuggestionSource, offset: usize) -> Self {
        Suggestion {
            text,
            source,
            offset,
            mode: RenderMode::Inline,
            rows: 0,
        }
    }

    fn baej(text: String, source: SuggestionSource) -> Self {
        Suggestion {
            text,
            source,
            offset: 0,
            mode: RenderMode::Baej,
            rows: 0,
        }
    }
}

/// Every read-only collaborator the suggestion engine may consult (§1's
/// external lookup tables plus the directory listing cache).
pub struct SuggestContext<'a> {
    pub cfg: &'a Config,
    pub cwd: &'a Path,
    pub now: u64,
    pub aliases: &'a AliasStore,
    pub bookmarks: &'a BookmarkStore,
    pub jump: &'a JumpStore,
    pub history: &'a HistoryStore,
    pub listing: &'a ListingCache,
    pub workspaces: &'a WorkspaceTable,
    pub remotes: &'a RemoteTable,
    pub tags: &'a TagStore,
    pub prompts: &'a PromptThemeTable,
    pub dirhist: &'a DirHistory,
    pub binaries: &'a BinaryIndex,
}

/// Entry point: invoked after each edit with the full line, cursor, and
/// classifier output (§4.4 contract).
pub fn compute(line: &str, cursor_byte: usize, classifier: &ClassifierState, ctx: &SuggestContext) -> Option<Suggestion> {
    if !ctx.cfg.suggestions {
        return None;
    }
    if line.trim_start().starts_with('#') {
        return None;
    }

    let word_idx = crate::word::word_at_cursor(&classifier.words, cursor_byte)?;
    let word = &classifier.words[word_idx];

    // Suppression: cursor must be at the end of the last word (§4.4).
    if cursor_byte != word.end || word_idx + 1 != classifier.words.len() {
        return None;
    }

    let word_text = word.text(line);
    let is_command_word = word.is_command_word;

    if word_text.is_empty() && !context_allows_empty_word(classifier, line) {
        return None;
    }

    // `--help` after any internal command always wins.
    if word_text == "--help" || word_text == "-help" {
        return Some(Suggestion::baej("--help".to_string(), SuggestionSource::HelpFlag));
    }

    if let Some(s) = context_sensitive(line, classifier, word, word_text, is_command_word, ctx) {
        return Some(s);
    }

    // wrong_cmd with no inline completion defers to the warning prompt.
    if classifier.wrong_cmd {
        let inline = try_strategy(word_text, ctx, line, word).filter(|s| s.mode == RenderMode::Inline);
        return inline;
    }

    try_strategy(word_text, ctx, line, word)
}

fn context_allows_empty_word(classifier: &ClassifierState, _line: &str) -> bool {
    // Only context-sensitive command words may suggest on an empty
    // argument (e.g. "j " before any fragment is typed); strategy sources
    // all require a non-empty word to match against.
    classifier
        .command_word()
        .map(|w| crate::classifier::INTERNAL_COMMANDS.contains(&w.text(_line)))
        .unwrap_or(false)
}

fn context_sensitive(
    line: &str,
    classifier: &ClassifierState,
    word: &Word,
    word_text: &str,
    is_command_word: bool,
    ctx: &SuggestContext,
) -> Option<Suggestion> {
    if is_command_word {
        return None;
    }
    let cmd = classifier.command_word()?.text(line);

    match cmd {
        "bm" | "bookmark" => ctx
            .bookmarks
            .find_by_prefix(word_text)
            .map(|b| Suggestion::baej(bookmark_text(b), SuggestionSource::Bookmark)),
        "cd" => completion::suggest_dirs_only(word_text, ctx.cwd, ctx.cfg)
            .map(|(tail, off)| Suggestion::inline(tail, SuggestionSource::Path, off)),
        "j" | "jump" => jump::suggest(word_text, ctx.jump, ctx.now, ctx.cfg.case_sensitive_dirjump),
        "ws" | "workspace" => workspace_match(word_text, ctx),
        "st" | "sort" => sort_method_match(word_text)
            .map(|name| Suggestion::baej(name.to_string(), SuggestionSource::SortMethod)),
        "prompt" => ctx
            .prompts
            .matching_prefix(word_text)
            .next()
            .map(|name| Suggestion::baej(name.to_string(), SuggestionSource::PromptTheme)),
        "net" => ctx
            .remotes
            .find_by_prefix(word_text)
            .map(|r| Suggestion::baej(r.name.clone(), SuggestionSource::InternalParameter)),
        "t:" | "ta" | "tu" | "tl" | "tg" => ctx
            .tags
            .find_by_prefix(word_text)
            .map(|name| Suggestion::baej(name.to_string(), SuggestionSource::Tag)),
        "bd" => DirHistory::nearest_ancestor_containing(ctx.cwd, word_text, ctx.cfg.case_sensitive_dirjump)
            .map(|p| Suggestion::baej(p.to_string_lossy().into_owned(), SuggestionSource::BackDir)),
        _ => None,
    }
}

fn bookmark_text(b: &crate::stores::bookmarks::Bookmark) -> String {
    if Path::new(&b.path).is_dir() && !b.path.ends_with('/') {
        format!("{}/", b.path)
    } else {
        b.path.clone()
    }
}

fn workspace_match(word_text: &str, ctx: &SuggestContext) -> Option<Suggestion> {
    if let Ok(idx) = word_text.parse::<u32>() {
        if ctx.workspaces.all().iter().any(|w| w.index == idx) {
            return Some(Suggestion::baej(idx.to_string(), SuggestionSource::Workspace));
        }
    }
    ctx.workspaces
        .all()
        .iter()
        .find_map(|w| w.name.as_deref())
        .filter(|n| n.starts_with(word_text))
        .map(|n| Suggestion::baej(n.to_string(), SuggestionSource::Workspace))
}

/// Command-name completion for the word in command position, grounded in
/// `check_cmds`'s binary-index scan (the same source the classifier
/// consults for category resolution).
fn command_name_match(word_text: &str, binaries: &BinaryIndex) -> Option<Suggestion> {
    if word_text.is_empty() {
        return None;
    }
    let name = binaries.iter_with_prefix(word_text).next()?;
    let tail = name[word_text.len()..].to_string();
    if tail.is_empty() {
        return None;
    }
    Some(Suggestion::inline(name.to_string(), SuggestionSource::CommandName, word_text.len()))
}

fn sort_method_match(word_text: &str) -> Option<&'static str> {
    let code: u8 = word_text.parse().ok()?;
    crate::config::SortMethod::ALL
        .get(code as usize)
        .map(|m| m.name())
}

/// Iterate the configured strategy codes in order, stopping at the first
/// source that produces a match (§4.4: "the first source that produces a
/// match wins... not retried once it yields a result").
fn try_strategy(word_text: &str, ctx: &SuggestContext, line: &str, word: &Word) -> Option<Suggestion> {
    for code in ctx.cfg.strategy().iter_unique() {
        let result = match code {
            'a' => alias::suggest(word_text, ctx.aliases),
            'b' => bookmark::suggest(word_text, ctx.bookmarks),
            'c' if word.is_command_word => command_name_match(word_text, ctx.binaries)
                .or_else(|| completion::suggest(word_text, ctx.cwd, ctx.cfg)),
            'c' => completion::suggest(word_text, ctx.cwd, ctx.cfg),
            'e' => eln::suggest(word_text, ctx.listing),
            'f' => file_cwd::suggest(word_text, ctx.listing, ctx.cfg),
            'h' => history::suggest(line, ctx.history, ctx.cfg.case_sensitive_search),
            'j' => jump::suggest(word_text, ctx.jump, ctx.now, ctx.cfg.case_sensitive_dirjump),
            '-' => None,
            _ => None,
        };
        if result.is_some() {
            return result;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{self, ClassifierContext};

    fn fresh_ctx<'a>(
        cfg: &'a Config,
        cwd: &'a Path,
        aliases: &'a AliasStore,
        bookmarks: &'a BookmarkStore,
        jump: &'a JumpStore,
        history: &'a HistoryStore,
        listing: &'a ListingCache,
        workspaces: &'a WorkspaceTable,
        remotes: &'a RemoteTable,
        tags: &'a TagStore,
        prompts: &'a PromptThemeTable,
        dirhist: &'a DirHistory,
        binaries: &'a BinaryIndex,
    ) -> SuggestContext<'a> {
        SuggestContext {
            cfg,
            cwd,
            now: 1_000,
            aliases,
            bookmarks,
            jump,
            history,
            listing,
            workspaces,
            remotes,
            tags,
            prompts,
            dirhist,
            binaries,
        }
    }

    #[test]
    fn comment_line_suppresses_suggestion() {
        let cfg = Config::default();
        let cwd = std::env::temp_dir();
        let aliases = AliasStore::default();
        let bookmarks = BookmarkStore::default();
        let jump = JumpStore::default();
        let history = HistoryStore::default();
        let listing = ListingCache::default();
        let workspaces = WorkspaceTable::default();
        let remotes = RemoteTable::default();
        let tags = TagStore::default();
        let prompts = PromptThemeTable::default();
        let dirhist = DirHistory::default();
        let binaries = BinaryIndex::default();
        let ctx = fresh_ctx(
            &cfg, &cwd, &aliases, &bookmarks, &jump, &history, &listing, &workspaces, &remotes,
            &tags, &prompts, &dirhist, &binaries,
        );
        let binaries2 = BinaryIndex::default();
        let classifier_ctx = ClassifierContext {
            cfg: &cfg,
            aliases: &[],
            binaries: &binaries2,
            listing: &listing,
        };
        let state = classifier::classify("# note", &classifier_ctx);
        assert!(compute("# note", 6, &state, &ctx).is_none());
    }

    #[test]
    fn help_flag_always_wins() {
        let cfg = Config::default();
        let cwd = std::env::temp_dir();
        let aliases = AliasStore::default();
        let bookmarks = BookmarkStore::default();
        let jump = JumpStore::default();
        let history = HistoryStore::default();
        let listing = ListingCache::default();
        let workspaces = WorkspaceTable::default();
        let remotes = RemoteTable::default();
        let tags = TagStore::default();
        let prompts = PromptThemeTable::default();
        let dirhist = DirHistory::default();
        let binaries = BinaryIndex::default();
        let ctx = fresh_ctx(
            &cfg, &cwd, &aliases, &bookmarks, &jump, &history, &listing, &workspaces, &remotes,
            &tags, &prompts, &dirhist, &binaries,
        );
        let binaries2 = BinaryIndex::default();
        let classifier_ctx = ClassifierContext {
            cfg: &cfg,
            aliases: &[],
            binaries: &binaries2,
            listing: &listing,
        };
        let line = "ls --help";
        let state = classifier::classify(line, &classifier_ctx);
        let suggestion = compute(line, line.len(), &state, &ctx).unwrap();
        assert_eq!(suggestion.text, "--help");
        assert_eq!(suggestion.mode, RenderMode::Baej);
    }

    /// History completion must fire from any word position, not just while
    /// the cursor sits in the command word (`check_history` in
    /// `original_source/src/suggestions.c` has no such restriction).
    #[test]
    fn history_suggestion_fires_past_the_command_word() {
        let cfg = Config::default();
        let tmp = tempfile::tempdir().unwrap();
        let cwd = tmp.path();
        let aliases = AliasStore::default();
        let bookmarks = BookmarkStore::default();
        let jump = JumpStore::default();
        let mut history = HistoryStore::default();
        history.add("git status -s");
        let listing = ListingCache::default();
        let workspaces = WorkspaceTable::default();
        let remotes = RemoteTable::default();
        let tags = TagStore::default();
        let prompts = PromptThemeTable::default();
        let dirhist = DirHistory::default();
        let binaries = BinaryIndex::default();
        let ctx = fresh_ctx(
            &cfg, cwd, &aliases, &bookmarks, &jump, &history, &listing, &workspaces, &remotes,
            &tags, &prompts, &dirhist, &binaries,
        );
        let binaries2 = BinaryIndex::default();
        let classifier_ctx = ClassifierContext {
            cfg: &cfg,
            aliases: &[],
            binaries: &binaries2,
            listing: &listing,
        };
        let line = "git st";
        let state = classifier::classify(line, &classifier_ctx);
        assert!(!state.words.last().unwrap().is_command_word);
        let suggestion = compute(line, line.len(), &state, &ctx).unwrap();
        assert_eq!(suggestion.text, "git status -s");
        assert_eq!(suggestion.offset, line.len());
    }
}
