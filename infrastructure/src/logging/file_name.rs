//! Process-wide file name allocation.
//!
//! Stems come from millisecond timestamps, so concurrent captures in the
//! same process routinely share one. Every writer draws names from one
//! shared allocator keyed by `(root, stem)`, which hands out
//! `{stem}.json`, `{stem}_1.json`, `{stem}_2.json`, ... in order. At most
//! [`MAX_TRACKED_STEMS`] keys are remembered; a forgotten key restarts at
//! `{stem}.json`, and the writer re-syncs it from the directory listing on
//! the first collision.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

pub(crate) const MAX_TRACKED_STEMS: usize = 1024;

type Key = (PathBuf, String);

static NAMES: LazyLock<Mutex<FileNameAllocator>> =
    LazyLock::new(|| Mutex::new(FileNameAllocator::default()));

/// The allocator shared by every writer in the process.
pub(crate) fn names() -> MutexGuard<'static, FileNameAllocator> {
    match NAMES.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Debug)]
pub(crate) struct FileNameAllocator {
    next_suffix: HashMap<Key, u64>,
    order: VecDeque<Key>,
    capacity: usize,
}

impl Default for FileNameAllocator {
    fn default() -> Self {
        Self::with_capacity(MAX_TRACKED_STEMS)
    }
}

impl FileNameAllocator {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            next_suffix: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Next file name for `stem` under `root`.
    pub(crate) fn allocate(&mut self, root: &Path, stem: &str) -> String {
        let key = (root.to_path_buf(), stem.to_string());
        if let Some(next) = self.next_suffix.get_mut(&key) {
            let name = suffixed(stem, *next);
            *next += 1;
            return name;
        }

        self.track(key, 1);
        format!("{}.json", stem)
    }

    /// Make the next name for `stem` use at least suffix `next`.
    pub(crate) fn resume_at(&mut self, root: &Path, stem: &str, next: u64) {
        let key = (root.to_path_buf(), stem.to_string());
        match self.next_suffix.get_mut(&key) {
            Some(current) => *current = (*current).max(next),
            None => self.track(key, next),
        }
    }

    fn track(&mut self, key: Key, next: u64) {
        if self.order.len() >= self.capacity
            && let Some(oldest) = self.order.pop_front()
        {
            self.next_suffix.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.next_suffix.insert(key, next);
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.next_suffix.len()
    }
}

fn suffixed(stem: &str, suffix: u64) -> String {
    format!("{}_{}.json", stem, suffix)
}

/// First unused suffix for `stem` among `file_names`.
///
/// `{stem}.json` counts as suffix 0.
pub(crate) fn next_free_suffix<'a>(
    stem: &str,
    file_names: impl Iterator<Item = &'a str>,
) -> u64 {
    let bare = format!("{}.json", stem);
    let prefix = format!("{}_", stem);

    file_names
        .filter_map(|name| {
            if name == bare {
                return Some(0);
            }
            name.strip_prefix(&prefix)?
                .strip_suffix(".json")?
                .parse::<u64>()
                .ok()
        })
        .max()
        .map_or(0, |highest| highest + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes_are_monotonic_per_stem() {
        let root = Path::new("/logs");
        let mut names = FileNameAllocator::default();
        assert_eq!(names.allocate(root, "real_messages_x"), "real_messages_x.json");
        assert_eq!(names.allocate(root, "real_messages_x"), "real_messages_x_1.json");
        assert_eq!(names.allocate(root, "llm_interaction_x"), "llm_interaction_x.json");
        assert_eq!(names.allocate(root, "real_messages_x"), "real_messages_x_2.json");
    }

    #[test]
    fn test_roots_are_independent() {
        let mut names = FileNameAllocator::default();
        assert_eq!(names.allocate(Path::new("/a"), "s"), "s.json");
        assert_eq!(names.allocate(Path::new("/b"), "s"), "s.json");
        assert_eq!(names.allocate(Path::new("/a"), "s"), "s_1.json");
    }

    #[test]
    fn test_oldest_stem_is_forgotten() {
        let root = Path::new("/logs");
        let mut names = FileNameAllocator::with_capacity(2);
        names.allocate(root, "a");
        names.allocate(root, "a");
        names.allocate(root, "b");
        names.allocate(root, "c");
        assert_eq!(names.tracked(), 2);
        assert_eq!(names.allocate(root, "a"), "a.json");
        assert_eq!(names.allocate(root, "c"), "c_1.json");
    }

    #[test]
    fn test_resume_at_only_moves_forward() {
        let root = Path::new("/logs");
        let mut names = FileNameAllocator::default();
        names.resume_at(root, "s", 70);
        assert_eq!(names.allocate(root, "s"), "s_70.json");
        names.resume_at(root, "s", 3);
        assert_eq!(names.allocate(root, "s"), "s_71.json");
    }

    #[test]
    fn test_next_free_suffix() {
        let listing = [
            "s.json",
            "s_1.json",
            "s_12.json",
            "s_x.json",
            "other_99.json",
            ".capture-abc.tmp",
        ];
        assert_eq!(next_free_suffix("s", listing.iter().copied()), 13);
        assert_eq!(next_free_suffix("s", ["s.json"].iter().copied()), 1);
        assert_eq!(next_free_suffix("s", std::iter::empty()), 0);
    }
}
