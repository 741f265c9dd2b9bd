//! The external executor/file-opener collaborator (§4: "a file-opener and
//! shell executor" sits behind `accept_line`, opaque to the rest of the
//! core). Generalizes the teacher's builtin dispatch and exit-code mapping
//! (`builtins.rs`, `status.rs`) shed of the pipeline/job-control machinery
//! those modules were built around — `parser.rs`, `ast.rs`, `job_control.rs`,
//! `jobs.rs`, `script_parser.rs`, `redirect.rs`, and `expander.rs` have no
//! counterpart here, since pipelines and job control are out of scope.

use std::process::{Command, ExitStatus, Stdio};

use crate::classifier::CommandCategory;
use crate::error::{CoreError, CoreResult};
use crate::session::Session;
use crate::stores::jump;
use crate::word::decompose;

/// Builtins the classifier itself resolves (`cd`, `pwd`, `exit`) — the rest
/// of the teacher's builtin table (`echo`, `export`, `unset`, `type`) has no
/// role here since there is no expander/environment layer to back it.
const BUILTINS: &[&str] = &["cd", "pwd", "exit"];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// Run an accepted line to completion. Returns `Ok(())` on a zero exit code,
/// `Err(CoreError::ExecutorError)` otherwise — the one error variant §7
/// reserves for the executor collaborator reporting a nonzero exit status.
///
/// The only state this mutates beyond spawning a child is `session.cwd` (via
/// `cd`/ELN auto-cd) and the jump/dirhist records a directory change feeds;
/// every other internal command's side effects (bookmark add, workspace
/// rename, tag edits...) are out of scope — only their suggestion support is
/// implemented elsewhere.
pub fn execute(line: &str, category: Option<CommandCategory>, session: &mut Session) -> CoreResult<()> {
    let words = decompose(line);
    let Some(cmd_word) = words.iter().find(|w| w.is_command_word) else {
        return Ok(());
    };
    let name = cmd_word.text(line);
    let args: Vec<&str> = words
        .iter()
        .filter(|w| !w.is_command_word)
        .map(|w| w.text(line))
        .collect();

    let code = match name {
        "cd" => run_cd(args.first().copied(), session),
        "pwd" => {
            println!("{}", session.cwd.display());
            0
        }
        "exit" | "quit" | "q" => {
            let code = args.first().and_then(|a| a.parse().ok()).unwrap_or(0);
            session.persist();
            std::process::exit(code);
        }
        _ => match category {
            Some(CommandCategory::Eln) => run_eln(name, session),
            Some(CommandCategory::Alias) => {
                if let Some(alias) = session.aliases.find_exact(name) {
                    let expansion = alias.expansion.clone();
                    return execute(&expansion, None, session);
                }
                127
            }
            Some(CommandCategory::Internal) => 0,
            Some(CommandCategory::Path) | Some(CommandCategory::BinaryIndex) | Some(CommandCategory::Builtin) => {
                spawn(name, &args, session)
            }
            None => 127,
        },
    };

    session.set_last_exit_code(code);
    if code == 0 {
        Ok(())
    } else {
        Err(CoreError::ExecutorError { code })
    }
}

fn run_cd(target: Option<&str>, session: &mut Session) -> i32 {
    let target = match target {
        Some(t) => session.cwd.join(t),
        None => dirs::home_dir().unwrap_or_else(|| session.cwd.clone()),
    };
    if !target.is_dir() {
        return 1;
    }
    session.cwd = target.canonicalize().unwrap_or(target);
    let cwd_str = session.cwd.to_string_lossy().into_owned();
    session.dirhist.record(&cwd_str);
    session.jump.record_visit(&cwd_str, jump::unix_now());
    session.workspaces.set_current_path(cwd_str);
    session.refresh_listing();
    0
}

fn run_eln(text: &str, session: &mut Session) -> i32 {
    let Ok(eln) = text.parse::<usize>() else {
        return 127;
    };
    let Some(entry) = session.listing.get_eln(eln) else {
        return 1;
    };
    if entry.is_dir() {
        let name = entry.name.clone();
        return run_cd(Some(&name), session);
    }
    if session.cfg.auto_open && !session.cfg.opener.is_empty() {
        let path = session.cwd.join(&entry.name);
        let opener = session.cfg.opener.clone();
        return match Command::new(opener).arg(path).status() {
            Ok(status) => exit_code(status),
            Err(_) => 127,
        };
    }
    0
}

fn spawn(name: &str, args: &[&str], session: &Session) -> i32 {
    let status = Command::new(name)
        .args(args)
        .current_dir(&session.cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status();
    match status {
        Ok(status) => exit_code(status),
        Err(_) => 127,
    }
}

/// Same signal-aware mapping as the teacher's `status::exit_code`.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
