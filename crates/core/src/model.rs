use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sum over every record of a [`ResultSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct DirStats {
    pub bytes: u64,
    pub files: u64,
    pub dirs: u64,
}

/// Aggregate size and file count for one directory.
///
/// For the root this covers only the files sitting directly in it. For an
/// immediate subdirectory it covers the whole subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRecord {
    pub path: PathBuf,
    pub bytes: u64,
    pub files: u64,
}

impl DirectoryRecord {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            bytes: 0,
            files: 0,
        }
    }

    pub fn add_file(&mut self, len: u64) {
        self.bytes = self.bytes.saturating_add(len);
        self.files = self.files.saturating_add(1);
    }
}

/// An entry the walk could not read. It contributed nothing to the totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

impl SkippedEntry {
    pub fn new(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Every record produced by one aggregation run, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    root: PathBuf,
    records: HashMap<PathBuf, DirectoryRecord>,
    skipped: Vec<SkippedEntry>,
    elapsed: Duration,
}

impl ResultSet {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    pub(crate) fn insert(&mut self, record: DirectoryRecord) -> Option<DirectoryRecord> {
        self.records.insert(record.path.clone(), record)
    }

    pub(crate) fn extend_skipped(&mut self, skipped: impl IntoIterator<Item = SkippedEntry>) {
        self.skipped.extend(skipped);
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&DirectoryRecord> {
        self.records.get(path.as_ref())
    }

    /// The record for the root's own loose files.
    pub fn root_record(&self) -> Option<&DirectoryRecord> {
        self.records.get(&self.root)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records by descending size. Equal sizes fall back to path order so
    /// repeated runs print identically.
    pub fn sorted(&self) -> Vec<&DirectoryRecord> {
        let mut out: Vec<&DirectoryRecord> = self.records.values().collect();
        out.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.path.cmp(&b.path)));
        out
    }

    /// Root and subdirectory records never overlap, so this is the size of
    /// the whole tree.
    pub fn totals(&self) -> DirStats {
        self.records.values().fold(DirStats::default(), |mut acc, r| {
            acc.bytes = acc.bytes.saturating_add(r.bytes);
            acc.files = acc.files.saturating_add(r.files);
            if r.path != self.root {
                acc.dirs += 1;
            }
            acc
        })
    }

    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Record contents only; elapsed time and skipped entries are ignored.
    pub fn same_records(&self, other: &ResultSet) -> bool {
        self.records == other.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(records: &[(&str, u64, u64)]) -> ResultSet {
        let mut rs = ResultSet::new(PathBuf::from("/data"));
        for (path, bytes, files) in records {
            rs.insert(DirectoryRecord {
                path: PathBuf::from(path),
                bytes: *bytes,
                files: *files,
            });
        }
        rs
    }

    #[test]
    fn sorted_is_descending_by_size_then_path() {
        let rs = set(&[
            ("/data", 10, 1),
            ("/data/b", 30, 3),
            ("/data/a", 30, 2),
            ("/data/c", 0, 0),
        ]);
        let order: Vec<&str> = rs
            .sorted()
            .iter()
            .map(|r| r.path.to_str().unwrap())
            .collect();
        assert_eq!(order, vec!["/data/a", "/data/b", "/data", "/data/c"]);
    }

    #[test]
    fn totals_cover_every_record() {
        let rs = set(&[("/data", 10, 1), ("/data/logs", 30, 3), ("/data/empty", 0, 0)]);
        assert_eq!(
            rs.totals(),
            DirStats {
                bytes: 40,
                files: 4,
                dirs: 2
            }
        );
    }

    #[test]
    fn add_file_accumulates() {
        let mut r = DirectoryRecord::empty("/x");
        r.add_file(5);
        r.add_file(7);
        assert_eq!((r.bytes, r.files), (12, 2));
    }

    #[test]
    fn byte_counts_saturate_instead_of_wrapping() {
        let mut r = DirectoryRecord::empty("/x");
        r.add_file(u64::MAX);
        r.add_file(10);
        assert_eq!((r.bytes, r.files), (u64::MAX, 2));

        let rs = set(&[("/data", u64::MAX, 1), ("/data/logs", 1, 1)]);
        assert_eq!(rs.totals().bytes, u64::MAX);
    }
}
