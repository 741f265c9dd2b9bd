//! End-to-end coverage of the six suggestion walkthroughs: classify a typed
//! line, compute a suggestion against it, and (where the scenario presses a
//! key) accept it through `Session`. Each source already has a focused unit
//! test next to its implementation; these exercise the same scenarios
//! through the full `classify` -> `compute` -> accept pipeline instead.

use std::fs;

use fman::binindex::BinaryIndex;
use fman::classifier::{self, ClassifierContext};
use fman::config::Config;
use fman::listing::ListingCache;
use fman::session::Session;
use fman::stores::aliases::AliasStore;
use fman::stores::bookmarks::BookmarkStore;
use fman::stores::dirhist::DirHistory;
use fman::stores::history::HistoryStore;
use fman::stores::jump::{self, JumpStore};
use fman::stores::prompts::PromptThemeTable;
use fman::stores::remotes::RemoteTable;
use fman::stores::tags::TagStore;
use fman::stores::workspaces::WorkspaceTable;
use fman::suggest::{self, RenderMode, SuggestContext};

/// Bundles every store `SuggestContext` borrows, all empty except where a
/// scenario overrides one field directly.
struct Stores {
    aliases: AliasStore,
    bookmarks: BookmarkStore,
    jump: JumpStore,
    history: HistoryStore,
    workspaces: WorkspaceTable,
    remotes: RemoteTable,
    tags: TagStore,
    prompts: PromptThemeTable,
    dirhist: DirHistory,
}

impl Stores {
    fn empty() -> Self {
        Stores {
            aliases: AliasStore::default(),
            bookmarks: BookmarkStore::default(),
            jump: JumpStore::default(),
            history: HistoryStore::default(),
            workspaces: WorkspaceTable::default(),
            remotes: RemoteTable::default(),
            tags: TagStore::default(),
            prompts: PromptThemeTable::default(),
            dirhist: DirHistory::default(),
        }
    }
}

fn ctx<'a>(
    cfg: &'a Config,
    cwd: &'a std::path::Path,
    listing: &'a ListingCache,
    binaries: &'a BinaryIndex,
    stores: &'a Stores,
    now: u64,
) -> SuggestContext<'a> {
    SuggestContext {
        cfg,
        cwd,
        now,
        aliases: &stores.aliases,
        bookmarks: &stores.bookmarks,
        jump: &stores.jump,
        history: &stores.history,
        listing,
        workspaces: &stores.workspaces,
        remotes: &stores.remotes,
        tags: &stores.tags,
        prompts: &stores.prompts,
        dirhist: &stores.dirhist,
        binaries,
    }
}

// 1. Typing "s" at a fresh prompt in a directory holding README.md, src/,
// tests/ suggests the remaining "rc/" of "src/" inline. An empty binary
// index keeps command-name completion (strategy source 'c') out of the way
// of the filesystem scan it falls back to, so the match stays deterministic
// regardless of what's on the test machine's real PATH.
#[test]
fn scenario_1_startup_file_completion() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("README.md"), "").unwrap();
    fs::create_dir(tmp.path().join("src")).unwrap();
    fs::create_dir(tmp.path().join("tests")).unwrap();

    let cfg = Config::default();
    let mut listing = ListingCache::new();
    listing.force_refresh(tmp.path(), &cfg).unwrap();
    let binaries = BinaryIndex::default();
    let stores = Stores::empty();

    let line = "s";
    let classifier_ctx = ClassifierContext {
        cfg: &cfg,
        aliases: &[],
        binaries: &binaries,
        listing: &listing,
    };
    let state = classifier::classify(line, &classifier_ctx);
    let suggest_ctx = ctx(&cfg, tmp.path(), &listing, &binaries, &stores, 1_000);
    let suggestion = suggest::compute(line, line.len(), &state, &suggest_ctx).unwrap();

    assert_eq!(suggestion.mode, RenderMode::Inline);
    assert_eq!(&suggestion.text[suggestion.offset..], "rc/");
}

// 2. Typing "rm 3" where the third listing entry is a directory named
// "tests" offers that entry as a BAEJ suggestion via its entry-list number.
// "rm" is forced into the binary index directly (not assumed present on the
// real PATH) so the command resolves and the BAEJ suggestion survives the
// wrong_cmd filter.
#[test]
fn scenario_2_eln_baej_suggestion() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir(tmp.path().join("alpha")).unwrap();
    fs::create_dir(tmp.path().join("beta")).unwrap();
    fs::create_dir(tmp.path().join("tests")).unwrap();

    let cfg = Config::default();
    let mut listing = ListingCache::new();
    listing.force_refresh(tmp.path(), &cfg).unwrap();
    assert_eq!(listing.get_eln(3).unwrap().name, "tests");

    let binaries = BinaryIndex::build(["rm".to_string()]);
    let stores = Stores::empty();

    let line = "rm 3";
    let classifier_ctx = ClassifierContext {
        cfg: &cfg,
        aliases: &[],
        binaries: &binaries,
        listing: &listing,
    };
    let state = classifier::classify(line, &classifier_ctx);
    assert!(!state.wrong_cmd);

    let suggest_ctx = ctx(&cfg, tmp.path(), &listing, &binaries, &stores, 1_000);
    let suggestion = suggest::compute(line, line.len(), &state, &suggest_ctx).unwrap();

    assert_eq!(suggestion.mode, RenderMode::Baej);
    assert_eq!(suggestion.text, "tests/");
}

// 3. An unresolvable command word sets wrong_cmd, swaps in the warning
// prompt, and suppresses every suggestion source (none of them share a
// prefix with "xyzzy").
#[test]
fn scenario_3_unknown_command_warns_and_suppresses() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = Config::default();
    let mut listing = ListingCache::new();
    listing.force_refresh(tmp.path(), &cfg).unwrap();
    let binaries = BinaryIndex::default();
    let stores = Stores::empty();

    let line = "xyzzy";
    let classifier_ctx = ClassifierContext {
        cfg: &cfg,
        aliases: &[],
        binaries: &binaries,
        listing: &listing,
    };
    let state = classifier::classify(line, &classifier_ctx);
    assert!(state.wrong_cmd);

    let mut highlighter = fman::highlight::Highlighter::new();
    let prompt = highlighter.prompt_for(state.wrong_cmd, "> ", "!> ");
    assert_eq!(prompt, "!> ");
    assert!(highlighter.is_warning_active());

    let suggest_ctx = ctx(&cfg, tmp.path(), &listing, &binaries, &stores, 1_000);
    assert!(suggest::compute(line, line.len(), &state, &suggest_ctx).is_none());
}

// 4. "j fo" offers the more recently and frequently visited of two
// candidates sharing the "fo" prefix (frecency, not raw visit count or
// recency alone).
#[test]
fn scenario_4_jump_frecency_breaks_the_tie() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = Config::default();
    let mut listing = ListingCache::new();
    listing.force_refresh(tmp.path(), &cfg).unwrap();
    let binaries = BinaryIndex::default();
    let mut stores = Stores::empty();
    stores.jump.record_visit("/home/u/foo", 0);
    for _ in 0..9 {
        stores.jump.record_visit("/home/u/foo", 1_000_000);
    }
    stores.jump.record_visit("/tmp/fool", 0);

    let line = "j fo";
    let classifier_ctx = ClassifierContext {
        cfg: &cfg,
        aliases: &[],
        binaries: &binaries,
        listing: &listing,
    };
    let state = classifier::classify(line, &classifier_ctx);
    let suggest_ctx = ctx(&cfg, tmp.path(), &listing, &binaries, &stores, 1_000_100);
    let suggestion = suggest::compute(line, line.len(), &state, &suggest_ctx).unwrap();

    assert_eq!(suggestion.mode, RenderMode::Baej);
    assert_eq!(suggestion.text, "/home/u/foo");
}

// 5. "cd <dir>/et" completes to the only matching subdirectory; pressing Tab
// (`Session::accept_suggestion`) appends the rest of the path.
#[test]
fn scenario_5_cd_completion_accepts_in_full() {
    let profile = tempfile::tempdir().unwrap();
    let base = tempfile::tempdir().unwrap();
    fs::create_dir(base.path().join("etcetera")).unwrap();

    let cfg = Config::default();
    let mut session = Session::new(cfg, base.path().to_path_buf(), profile.path()).unwrap();
    session.binaries = BinaryIndex::default();

    let line = format!("cd {}/et", base.path().display());
    session.buffer = fman::buffer::InputBuffer::from_str(&line);
    session.reclassify();
    session.recompute_suggestion();
    assert!(!session.classifier.wrong_cmd);

    session.accept_suggestion();
    let expected = format!("cd {}/etcetera/", base.path().display());
    assert_eq!(session.buffer.as_str(), expected);
}

// 6. Typing "gi" after "git status -s" is in history suggests the rest of
// the line inline; accepting it replaces the buffer with the full command.
#[test]
fn scenario_6_history_prefix_accepts_full_line() {
    let profile = tempfile::tempdir().unwrap();
    let cwd = tempfile::tempdir().unwrap();

    let cfg = Config::default();
    let mut session = Session::new(cfg, cwd.path().to_path_buf(), profile.path()).unwrap();
    session.binaries = BinaryIndex::default();
    session.history.add("git status -s");

    session.buffer = fman::buffer::InputBuffer::from_str("gi");
    session.reclassify();
    session.recompute_suggestion();

    let suggestion = session.suggestion.clone().unwrap();
    assert_eq!(suggestion.mode, RenderMode::Inline);
    assert_eq!(&suggestion.text[suggestion.offset..], "t status -s");

    session.accept_suggestion();
    assert_eq!(session.buffer.as_str(), "git status -s");
}

#[test]
fn jump_now_helper_is_monotonic_enough_for_frecency() {
    // Sanity check that the real clock source used outside tests doesn't
    // regress to zero; scenario 4 above pins `now` explicitly instead of
    // relying on it.
    assert!(jump::unix_now() > 0);
}
