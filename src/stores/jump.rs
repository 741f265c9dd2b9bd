use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{read_lines_or_empty, write_atomic};

/// One `jump.cfm` record: `visits:first_visit:last_visit:path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpEntry {
    pub visits: u32,
    pub first_visit: u64,
    pub last_visit: u64,
    pub path: String,
}

fn parse_line(line: &str) -> Option<JumpEntry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('@') {
        return None;
    }
    let mut parts = line.splitn(4, ':');
    let visits: u32 = parts.next()?.parse().ok()?;
    let first_visit: u64 = parts.next()?.parse().ok()?;
    let last_visit: u64 = parts.next()?.parse().ok()?;
    let path = parts.next()?.to_string();
    Some(JumpEntry {
        visits,
        first_visit,
        last_visit,
        path,
    })
}

fn format_line(e: &JumpEntry) -> String {
    format!("{}:{}:{}:{}", e.visits, e.first_visit, e.last_visit, e.path)
}

/// The jump database: frecency-ranked directory history (§4.4, §6).
#[derive(Debug, Default)]
pub struct JumpStore {
    entries: Vec<JumpEntry>,
    path: Option<PathBuf>,
}

impl JumpStore {
    /// Load, pruning entries whose path no longer exists (§6).
    pub fn load(path: &Path) -> io::Result<Self> {
        let entries = read_lines_or_empty(path)?
            .iter()
            .filter_map(|l| parse_line(l))
            .filter(|e| Path::new(&e.path).exists())
            .collect();
        Ok(JumpStore {
            entries,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn entries(&self) -> &[JumpEntry] {
        &self.entries
    }

    pub fn rank_sum(&self) -> u64 {
        self.entries.iter().map(|e| e.visits as u64).sum()
    }

    pub fn record_visit(&mut self, dir: &str, now: u64) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.path == dir) {
            existing.visits += 1;
            existing.last_visit = now;
        } else {
            self.entries.push(JumpEntry {
                visits: 1,
                first_visit: now,
                last_visit: now,
                path: dir.to_string(),
            });
        }
    }

    pub fn save(&self) -> io::Result<()> {
        if let Some(path) = &self.path {
            let mut contents = format!("@RANK_SUM:{}\n", self.rank_sum());
            for e in &self.entries {
                contents.push_str(&format_line(e));
                contents.push('\n');
            }
            write_atomic(path, &contents)?;
        }
        Ok(())
    }

    /// Frecency = visits * recency_weight(age), halving every `half_life`
    /// seconds (§4.4's jump-ranking formula).
    pub fn frecency(entry: &JumpEntry, now: u64, half_life: u64) -> f64 {
        let age = now.saturating_sub(entry.last_visit) as f64;
        let half_life = half_life.max(1) as f64;
        let weight = 0.5f64.powf(age / half_life);
        entry.visits as f64 * weight
    }

    /// Best match for `fragment` (§4.4): prefer entries whose last path
    /// component starts with the fragment; otherwise any whose full path
    /// contains it. Ties broken by highest frecency, then most recent visit.
    pub fn best_match(
        &self,
        fragment: &str,
        now: u64,
        half_life: u64,
        case_sensitive: bool,
    ) -> Option<&JumpEntry> {
        let eq = |hay: &str, needle: &str| {
            if case_sensitive {
                hay.contains(needle)
            } else {
                hay.to_lowercase().contains(&needle.to_lowercase())
            }
        };
        let last_component_starts_with = |p: &str, needle: &str| {
            let last = Path::new(p)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if case_sensitive {
                last.starts_with(needle)
            } else {
                last.to_lowercase().starts_with(&needle.to_lowercase())
            }
        };

        let mut candidates: Vec<&JumpEntry> = self
            .entries
            .iter()
            .filter(|e| last_component_starts_with(&e.path, fragment))
            .collect();

        if candidates.is_empty() {
            candidates = self
                .entries
                .iter()
                .filter(|e| eq(&e.path, fragment))
                .collect();
        }

        candidates.into_iter().max_by(|a, b| {
            let fa = Self::frecency(a, now, half_life);
            let fb = Self::frecency(b, now, half_life);
            fa.partial_cmp(&fb)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.last_visit.cmp(&b.last_visit))
        })
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
