use std::io;
use std::path::{Path, PathBuf};

use super::write_atomic;

/// One `nets.cfm` `[name]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub comment: String,
    pub mountpoint: String,
    pub mount_cmd: String,
    pub unmount_cmd: String,
    pub auto_mount: bool,
    pub auto_unmount: bool,
}

fn parse_ini(text: &str) -> Vec<Remote> {
    let mut remotes = Vec::new();
    let mut current: Option<Remote> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            if let Some(r) = current.take() {
                remotes.push(r);
            }
            current = Some(Remote {
                name: name.to_string(),
                ..Default::default()
            });
            continue;
        }
        let Some(r) = current.as_mut() else { continue };
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "Comment" => r.comment = value.trim().to_string(),
            "Mountpoint" => r.mountpoint = value.trim().to_string(),
            "MountCmd" => r.mount_cmd = value.trim().to_string(),
            "UnmountCmd" => r.unmount_cmd = value.trim().to_string(),
            "AutoMount" => r.auto_mount = value.trim().eq_ignore_ascii_case("true"),
            "AutoUnmount" => r.auto_unmount = value.trim().eq_ignore_ascii_case("true"),
            _ => {}
        }
    }
    if let Some(r) = current.take() {
        remotes.push(r);
    }
    remotes
}

fn format_ini(remotes: &[Remote]) -> String {
    let mut out = String::new();
    for r in remotes {
        out.push_str(&format!("[{}]\n", r.name));
        out.push_str(&format!("Comment={}\n", r.comment));
        out.push_str(&format!("Mountpoint={}\n", r.mountpoint));
        out.push_str(&format!("MountCmd={}\n", r.mount_cmd));
        out.push_str(&format!("UnmountCmd={}\n", r.unmount_cmd));
        out.push_str(&format!("AutoMount={}\n", r.auto_mount));
        out.push_str(&format!("AutoUnmount={}\n", r.auto_unmount));
        out.push('\n');
    }
    out
}

#[derive(Debug, Default)]
pub struct RemoteTable {
    entries: Vec<Remote>,
    path: Option<PathBuf>,
}

impl RemoteTable {
    pub fn load(path: &Path) -> io::Result<Self> {
        let entries = match std::fs::read_to_string(path) {
            Ok(text) => parse_ini(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(RemoteTable {
            entries,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn entries(&self) -> &[Remote] {
        &self.entries
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Option<&Remote> {
        self.entries.iter().find(|r| r.name.starts_with(prefix))
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            write_atomic(path, &format_ini(&self.entries))?;
        }
        Ok(())
    }
}
