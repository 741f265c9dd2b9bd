use std::io;
use std::path::{Path, PathBuf};

use super::{read_lines_or_empty, write_atomic};

pub const MAX_WORKSPACES: u32 = 8;

/// One workspace: index (1..MAX), optional name, current path (§3).
///
/// `.last` persists index + current-marker + path, one per line
/// (`[*]N:/path`); names are a runtime-only annotation (set via the `ws`
/// command) since §6 does not give `.last` a name field — recorded in
/// DESIGN.md.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub index: u32,
    pub name: Option<String>,
    pub path: String,
}

fn parse_line(line: &str) -> Option<(bool, u32, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (current, rest) = if let Some(r) = line.strip_prefix("[*]") {
        (true, r)
    } else {
        (false, line)
    };
    let (idx_str, path) = rest.split_once(':')?;
    let idx: u32 = idx_str.parse().ok()?;
    Some((current, idx, path.to_string()))
}

#[derive(Debug)]
pub struct WorkspaceTable {
    workspaces: Vec<Workspace>,
    current: usize,
    path: Option<PathBuf>,
}

impl Default for WorkspaceTable {
    fn default() -> Self {
        let workspaces = (1..=MAX_WORKSPACES)
            .map(|i| Workspace {
                index: i,
                name: None,
                path: String::new(),
            })
            .collect();
        WorkspaceTable {
            workspaces,
            current: 0,
            path: None,
        }
    }
}

impl WorkspaceTable {
    pub fn load(path: &Path, default_cwd: &str) -> io::Result<Self> {
        let mut table = WorkspaceTable::default();
        table.path = Some(path.to_path_buf());
        let mut any = false;
        for line in read_lines_or_empty(path)? {
            if let Some((is_current, idx, p)) = parse_line(&line) {
                any = true;
                if let Some(ws) = table.workspaces.get_mut((idx as usize).saturating_sub(1)) {
                    ws.path = p;
                    if is_current {
                        table.current = (idx as usize).saturating_sub(1);
                    }
                }
            }
        }
        if !any {
            table.workspaces[0].path = default_cwd.to_string();
        }
        Ok(table)
    }

    pub fn current(&self) -> &Workspace {
        &self.workspaces[self.current]
    }

    pub fn all(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn switch_to(&mut self, index: u32) -> bool {
        if index == 0 || index as usize > self.workspaces.len() {
            return false;
        }
        self.current = (index - 1) as usize;
        true
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Workspace> {
        self.workspaces
            .iter()
            .find(|w| w.name.as_deref() == Some(name))
    }

    pub fn set_name(&mut self, index: u32, name: String) {
        if let Some(ws) = self.workspaces.get_mut((index as usize).saturating_sub(1)) {
            ws.name = Some(name);
        }
    }

    pub fn set_current_path(&mut self, path: String) {
        self.workspaces[self.current].path = path;
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let mut contents = String::new();
            for (i, ws) in self.workspaces.iter().enumerate() {
                if ws.path.is_empty() {
                    continue;
                }
                let marker = if i == self.current { "[*]" } else { "" };
                contents.push_str(&format!("{marker}{}:{}\n", ws.index, ws.path));
            }
            write_atomic(path, &contents)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_current_marker() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".last");
        let mut table = WorkspaceTable::load(&path, "/home/u").unwrap();
        table.switch_to(2);
        table.set_current_path("/projects".into());
        table.save().unwrap();

        let reloaded = WorkspaceTable::load(&path, "/home/u").unwrap();
        assert_eq!(reloaded.current().index, 2);
        assert_eq!(reloaded.current().path, "/projects");
    }

    #[test]
    fn fresh_table_defaults_workspace_one_to_cwd() {
        let tmp = tempfile::tempdir().unwrap();
        let table = WorkspaceTable::load(&tmp.path().join(".last"), "/home/u").unwrap();
        assert_eq!(table.current().path, "/home/u");
        assert_eq!(table.current().index, 1);
    }

    #[test]
    fn switch_to_out_of_range_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let mut table = WorkspaceTable::load(&tmp.path().join(".last"), "/").unwrap();
        assert!(!table.switch_to(0));
        assert!(!table.switch_to(99));
    }
}
