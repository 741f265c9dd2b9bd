use std::io;
use std::path::{Path, PathBuf};

use super::{read_lines_or_empty, write_atomic};

/// One alias: a unique name and its expansion text.
///
/// spec.md's persisted-state layout (§6) does not name an explicit file
/// format for aliases; `aliases.cfm` is given the same `name=expansion`
/// shape as `actions.cfm` since both are "name -> replacement text" tables
/// (decision recorded in DESIGN.md).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub expansion: String,
}

fn parse_line(line: &str) -> Option<Alias> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (name, expansion) = line.split_once('=')?;
    Some(Alias {
        name: name.trim().to_string(),
        expansion: expansion.trim().to_string(),
    })
}

#[derive(Debug, Default)]
pub struct AliasStore {
    entries: Vec<Alias>,
    path: Option<PathBuf>,
}

impl AliasStore {
    pub fn load(path: &Path) -> io::Result<Self> {
        let entries = read_lines_or_empty(path)?
            .iter()
            .filter_map(|l| parse_line(l))
            .collect();
        Ok(AliasStore {
            entries,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn entries(&self) -> &[Alias] {
        &self.entries
    }

    pub fn set(&mut self, name: &str, expansion: &str) {
        if let Some(existing) = self.entries.iter_mut().find(|a| a.name == name) {
            existing.expansion = expansion.to_string();
        } else {
            self.entries.push(Alias {
                name: name.to_string(),
                expansion: expansion.to_string(),
            });
        }
    }

    pub fn find_exact(&self, name: &str) -> Option<&Alias> {
        self.entries.iter().find(|a| a.name == name)
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Alias> {
        self.entries.iter().find(|a| a.name.starts_with(prefix))
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let contents: String = self
                .entries
                .iter()
                .map(|a| format!("{}={}\n", a.name, a.expansion))
                .collect();
            write_atomic(path, &contents)?;
        }
        Ok(())
    }
}
