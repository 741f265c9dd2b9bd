use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

/// Detected login shell, consulted by the classifier to resolve the builtin
/// list for "is this word a shell builtin" (§4.3 step 3c).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    None,
    Bash,
    Dash,
    Fish,
    Ksh,
    Tcsh,
    Zsh,
}

impl Shell {
    /// Detect via `readlink("/bin/sh")`, the mechanism named in §6.
    pub fn detect() -> Self {
        #[cfg(unix)]
        {
            if let Ok(target) = std::fs::read_link("/bin/sh") {
                let name = target
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default();
                return match name {
                    "bash" => Shell::Bash,
                    "dash" => Shell::Dash,
                    "fish" => Shell::Fish,
                    "ksh" => Shell::Ksh,
                    "tcsh" => Shell::Tcsh,
                    "zsh" => Shell::Zsh,
                    _ => Shell::None,
                };
            }
        }
        Shell::None
    }

    /// Builtin names for the detected shell, used by classifier step 3c.
    pub fn builtins(self) -> &'static [&'static str] {
        match self {
            Shell::None => &[],
            Shell::Bash | Shell::Dash | Shell::Ksh => {
                &["cd", "pwd", "exit", "echo", "export", "unset", "alias", "type", "jobs", "fg", "bg"]
            }
            Shell::Fish => &["cd", "pwd", "exit", "echo", "set", "functions", "type", "jobs"],
            Shell::Tcsh => &["cd", "pwd", "exit", "echo", "setenv", "unsetenv", "alias"],
            Shell::Zsh => &["cd", "pwd", "exit", "echo", "export", "unset", "alias", "type", "jobs", "fg", "bg", "setopt"],
        }
    }
}

/// Sort methods, numeric codes 0..11 as listed in §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMethod {
    None,
    Name,
    Size,
    Atime,
    Btime,
    Ctime,
    Mtime,
    Version,
    Extension,
    Inode,
    Owner,
    Group,
}

impl SortMethod {
    pub const ALL: &'static [SortMethod] = &[
        SortMethod::None,
        SortMethod::Name,
        SortMethod::Size,
        SortMethod::Atime,
        SortMethod::Btime,
        SortMethod::Ctime,
        SortMethod::Mtime,
        SortMethod::Version,
        SortMethod::Extension,
        SortMethod::Inode,
        SortMethod::Owner,
        SortMethod::Group,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            SortMethod::None => "none",
            SortMethod::Name => "name",
            SortMethod::Size => "size",
            SortMethod::Atime => "atime",
            SortMethod::Btime => "btime",
            SortMethod::Ctime => "ctime",
            SortMethod::Mtime => "mtime",
            SortMethod::Version => "version",
            SortMethod::Extension => "extension",
            SortMethod::Inode => "inode",
            SortMethod::Owner => "owner",
            SortMethod::Group => "group",
        }
    }
}

/// The suggestion-source strategy: an ordered list of single-character
/// codes drawn from `{a, b, c, e, f, h, j, -}` (§4.4), length <= 7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionStrategy(pub Vec<char>);

impl Default for SuggestionStrategy {
    fn default() -> Self {
        // clifm's default order: file/path completion first, then history,
        // then the BAEJ sources. Grounded in check_completions being tried
        // before check_history in rl_suggestions.
        SuggestionStrategy(vec!['c', 'f', 'h', 'b', 'a', 'j', 'e'])
    }
}

impl SuggestionStrategy {
    pub fn parse(s: &str) -> Self {
        let codes: Vec<char> = s.chars().take(7).collect();
        if codes.is_empty() {
            SuggestionStrategy::default()
        } else {
            SuggestionStrategy(codes)
        }
    }

    /// Iterate codes, treating a second occurrence of any code as a no-op
    /// (§9 open question (c)).
    pub fn iter_unique(&self) -> impl Iterator<Item = char> + '_ {
        let mut seen = std::collections::HashSet::new();
        self.0.iter().copied().filter(move |c| seen.insert(*c))
    }
}

/// The startup configuration record, produced by the external CLI parser /
/// config-file loader and consumed throughout the core (§6).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub suggestion_strategy: String,

    pub case_sensitive_list: bool,
    pub case_sensitive_search: bool,
    pub case_sensitive_dirjump: bool,
    pub case_sensitive_path_comp: bool,
    pub fuzzy_match: bool,

    pub autocd: bool,
    pub auto_open: bool,
    pub autojump: bool,

    pub show_hidden: bool,
    pub folders_first: bool,
    pub long_view: bool,
    pub pager: bool,
    pub columns: bool,

    pub highlight: bool,
    pub suggestions: bool,
    pub warning_prompt: bool,
    pub icons: bool,
    pub tips: bool,
    pub classify: bool,
    pub files_counter: bool,

    pub max_hist: u32,
    pub max_log: u32,
    pub max_dirhist: u32,
    pub max_path: u32,
    pub max_files: u32,
    pub min_name_trim: u32,
    pub min_jump_rank: u32,
    pub max_jump_total_rank: u32,

    pub sort: SortMethod,
    pub sort_reverse: bool,

    #[serde(skip)]
    pub shell: Shell,

    pub opener: String,
    pub prompt_str: String,
    pub warning_prompt_str: String,
    pub divider_char: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            suggestion_strategy: "cfhbaje".to_string(),
            case_sensitive_list: false,
            case_sensitive_search: false,
            case_sensitive_dirjump: false,
            case_sensitive_path_comp: false,
            fuzzy_match: false,
            autocd: true,
            auto_open: true,
            autojump: false,
            show_hidden: false,
            folders_first: true,
            long_view: false,
            pager: true,
            columns: true,
            highlight: true,
            suggestions: true,
            warning_prompt: true,
            icons: false,
            tips: true,
            classify: true,
            files_counter: true,
            max_hist: 10_000,
            max_log: 2_000,
            max_dirhist: 100,
            max_path: 4_096,
            max_files: 0,
            min_name_trim: 20,
            min_jump_rank: 1,
            max_jump_total_rank: 0,
            sort: SortMethod::Name,
            sort_reverse: false,
            shell: Shell::None,
            opener: String::new(),
            prompt_str: "> ".to_string(),
            warning_prompt_str: "! > ".to_string(),
            divider_char: "-".to_string(),
        }
    }
}

impl Config {
    pub fn strategy(&self) -> SuggestionStrategy {
        SuggestionStrategy::parse(&self.suggestion_strategy)
    }

    /// Layer: hardcoded defaults, then an on-disk TOML file, then CLI flags.
    pub fn load(config_path: Option<&std::path::Path>, cli: &Cli) -> Self {
        let mut cfg = config_path
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|text| toml::from_str::<Config>(&text).ok())
            .unwrap_or_default();

        cfg.shell = Shell::detect();
        cli.apply(&mut cfg);
        cfg
    }
}

/// Command-line flags, mirroring the short-flag surface of §6.
#[derive(Debug, Parser)]
#[command(name = "fman", about = "Interactive terminal file manager")]
pub struct Cli {
    /// -a: show hidden files
    #[arg(short = 'a')]
    pub show_hidden: bool,

    /// -A: do NOT show hidden files
    #[arg(short = 'A')]
    pub no_show_hidden: bool,

    /// -b FILE: alternative bookmarks file
    #[arg(short = 'b', value_name = "FILE")]
    pub bookmarks_file: Option<PathBuf>,

    /// -c FILE: alternative config file
    #[arg(short = 'c', value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// -D DIR: start in DIR
    #[arg(short = 'D', value_name = "DIR")]
    pub start_dir: Option<PathBuf>,

    /// -e: no icons
    #[arg(short = 'e')]
    pub no_icons: bool,

    /// -f: folders first
    #[arg(short = 'f')]
    pub folders_first: bool,

    /// -F: do NOT put folders first
    #[arg(short = 'F')]
    pub no_folders_first: bool,

    /// -g: pager on
    #[arg(short = 'g')]
    pub pager: bool,

    /// -G: pager off
    #[arg(short = 'G')]
    pub no_pager: bool,

    /// -h: print help and exit
    #[arg(short = 'H', long = "long-help")]
    pub long_help: bool,

    /// -i: case-insensitive everything
    #[arg(short = 'i')]
    pub case_insensitive: bool,

    /// -I: case-sensitive everything
    #[arg(short = 'I')]
    pub case_sensitive: bool,

    /// -k FILE: alternative keybindings file (parsed upstream; not used by core)
    #[arg(short = 'k', value_name = "FILE")]
    pub keybindings_file: Option<PathBuf>,

    /// -l: long view on
    #[arg(short = 'l')]
    pub long_view: bool,

    /// -L: long view off
    #[arg(short = 'L')]
    pub no_long_view: bool,

    /// -m: classify on
    #[arg(short = 'm')]
    pub classify: bool,

    /// -o: autocd on
    #[arg(short = 'o')]
    pub autocd: bool,

    /// -O: autocd off
    #[arg(short = 'O')]
    pub no_autocd: bool,

    /// -p PATH: opener path
    #[arg(short = 'p', value_name = "PATH")]
    pub opener: Option<String>,

    /// -P NAME: named profile (parsed upstream; not used by core)
    #[arg(short = 'P', value_name = "NAME")]
    pub profile: Option<String>,

    /// -s: suggestions on
    #[arg(short = 's')]
    pub suggestions: bool,

    /// -S: suggestions off
    #[arg(short = 'S')]
    pub no_suggestions: bool,

    /// -t: tips on
    #[arg(short = 't')]
    pub tips: bool,

    /// -u: fuzzy matching on
    #[arg(short = 'u')]
    pub fuzzy: bool,

    /// -U: fuzzy matching off
    #[arg(short = 'U')]
    pub no_fuzzy: bool,

    /// -v: print version and exit
    #[arg(short = 'v')]
    pub version: bool,

    /// -w N: start in workspace N
    #[arg(short = 'w', value_name = "N")]
    pub workspace: Option<u32>,

    /// -x: auto-open on
    #[arg(short = 'x')]
    pub auto_open: bool,

    /// -y: auto-open off
    #[arg(short = 'y')]
    pub no_auto_open: bool,

    /// -z SORT: sort method (numeric code 0..11)
    #[arg(short = 'z', value_name = "SORT")]
    pub sort: Option<u8>,
}

impl Cli {
    fn apply(&self, cfg: &mut Config) {
        if self.show_hidden {
            cfg.show_hidden = true;
        }
        if self.no_show_hidden {
            cfg.show_hidden = false;
        }
        if self.no_icons {
            cfg.icons = false;
        }
        if self.folders_first {
            cfg.folders_first = true;
        }
        if self.no_folders_first {
            cfg.folders_first = false;
        }
        if self.pager {
            cfg.pager = true;
        }
        if self.no_pager {
            cfg.pager = false;
        }
        if self.case_insensitive {
            cfg.case_sensitive_list = false;
            cfg.case_sensitive_search = false;
            cfg.case_sensitive_dirjump = false;
            cfg.case_sensitive_path_comp = false;
        }
        if self.case_sensitive {
            cfg.case_sensitive_list = true;
            cfg.case_sensitive_search = true;
            cfg.case_sensitive_dirjump = true;
            cfg.case_sensitive_path_comp = true;
        }
        if self.long_view {
            cfg.long_view = true;
        }
        if self.no_long_view {
            cfg.long_view = false;
        }
        if self.classify {
            cfg.classify = true;
        }
        if self.autocd {
            cfg.autocd = true;
        }
        if self.no_autocd {
            cfg.autocd = false;
        }
        if let Some(opener) = &self.opener {
            cfg.opener = opener.clone();
        }
        if self.suggestions {
            cfg.suggestions = true;
        }
        if self.no_suggestions {
            cfg.suggestions = false;
        }
        if self.tips {
            cfg.tips = true;
        }
        if self.fuzzy {
            cfg.fuzzy_match = true;
        }
        if self.no_fuzzy {
            cfg.fuzzy_match = false;
        }
        if self.auto_open {
            cfg.auto_open = true;
        }
        if self.no_auto_open {
            cfg.auto_open = false;
        }
        if let Some(code) = self.sort {
            if let Some(method) = SortMethod::ALL.get(code as usize) {
                cfg.sort = *method;
            }
        }
    }
}
