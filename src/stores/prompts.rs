use std::io;
use std::path::{Path, PathBuf};

use super::{read_lines_or_empty, write_atomic};

/// The prompt/theme name table consulted by the `prompt` command's
/// suggestion source (§4.4). Not named in spec.md's persisted-state list;
/// given the same one-name-per-line shape as [`super::tags::TagStore`]
/// since both are flat name tables (decision recorded in DESIGN.md).
#[derive(Debug, Default)]
pub struct PromptThemeTable {
    names: Vec<String>,
    path: Option<PathBuf>,
}

impl PromptThemeTable {
    pub fn load(path: &Path) -> io::Result<Self> {
        let names = read_lines_or_empty(path)?
            .into_iter()
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        Ok(PromptThemeTable {
            names,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn add(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    pub fn matching_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.names
            .iter()
            .filter(move |n| n.starts_with(prefix))
            .map(String::as_str)
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let contents = self.names.join("\n") + if self.names.is_empty() { "" } else { "\n" };
            write_atomic(path, &contents)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prompts.cfm");
        let mut table = PromptThemeTable::load(&path).unwrap();
        table.add("default");
        table.add("minimal");
        table.save().unwrap();

        let reloaded = PromptThemeTable::load(&path).unwrap();
        assert_eq!(reloaded.names(), table.names());
    }

    #[test]
    fn matching_prefix_filters() {
        let mut table = PromptThemeTable::default();
        table.add("default");
        table.add("dim");
        table.add("minimal");
        let matches: Vec<&str> = table.matching_prefix("di").collect();
        assert_eq!(matches, vec!["dim"]);
    }
}
