use crossbeam_channel::Sender;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::AggregateError;
use crate::model::*;
use crate::progress::AggregateMsg;

/// Computes per-subdirectory disk usage below a root directory.
///
/// The root is listed once. Loose files count toward the root's own record,
/// and every immediate subdirectory is walked recursively on its own thread.
#[derive(Debug, Clone)]
pub struct DirectoryAggregator {
    root: PathBuf,
}

struct WalkOutcome {
    record: DirectoryRecord,
    skipped: Vec<SkippedEntry>,
}

#[derive(Default)]
struct RootListing {
    bytes: u64,
    files: u64,
    subdirectories: Vec<PathBuf>,
    skipped: Vec<SkippedEntry>,
}

impl DirectoryAggregator {
    /// Fails if `root` cannot be stat'ed or is not a directory.
    pub fn initialize(root: impl Into<PathBuf>) -> Result<Self, AggregateError> {
        let root = root.into();
        let md = fs::metadata(&root).map_err(|source| AggregateError::Path {
            path: root.clone(),
            source,
        })?;
        if !md.is_dir() {
            return Err(AggregateError::NotADirectory { path: root });
        }
        Ok(Self { root })
    }

    /// Blocks until every subdirectory walk has reported. Read errors never
    /// fail the run; they are collected in [`ResultSet::skipped`].
    pub fn run(&self) -> ResultSet {
        self.aggregate(None)
    }

    /// Same as [`run`](Self::run) but streams progress into `tx` and finishes
    /// with [`AggregateMsg::Done`].
    pub fn run_reporting(&self, tx: Sender<AggregateMsg>) {
        let results = self.aggregate(Some(&tx));
        let _ = tx.send(AggregateMsg::Done(results));
    }

    fn aggregate(&self, progress: Option<&Sender<AggregateMsg>>) -> ResultSet {
        let start = Instant::now();
        let listing = list_root(&self.root);
        let launched = listing.subdirectories.len();

        let mut results = ResultSet::new(self.root.clone());
        results.insert(DirectoryRecord {
            path: self.root.clone(),
            bytes: listing.bytes,
            files: listing.files,
        });
        results.extend_skipped(listing.skipped);

        if let Some(tx) = progress {
            let _ = tx.send(AggregateMsg::Started {
                subdirectories: launched as u64,
            });
        }

        let (tx, rx) = crossbeam_channel::unbounded::<WalkOutcome>();
        thread::scope(|scope| {
            for (i, dir) in listing.subdirectories.into_iter().enumerate() {
                let worker_tx = tx.clone();
                let worker_dir = dir.clone();
                let spawned = thread::Builder::new()
                    .name(format!("dirsize-walk-{i}"))
                    .spawn_scoped(scope, move || {
                        let _ = worker_tx.send(walk_subtree(&worker_dir));
                    });
                if let Err(e) = spawned {
                    warn!(path = %dir.display(), error = %e, "thread spawn failed, walking inline");
                    let _ = tx.send(walk_subtree(&dir));
                }
            }
            drop(tx);

            for _ in 0..launched {
                let Ok(outcome) = rx.recv() else { break };
                debug!(
                    path = %outcome.record.path.display(),
                    bytes = outcome.record.bytes,
                    files = outcome.record.files,
                    "subdirectory done"
                );
                if let Some(tx) = progress {
                    let _ = tx.send(AggregateMsg::DirDone(outcome.record.clone()));
                }
                results.insert(outcome.record);
                results.extend_skipped(outcome.skipped);
            }
        });

        results.set_elapsed(start.elapsed());
        info!(
            root = %self.root.display(),
            records = results.len(),
            skipped = results.skipped().len(),
            elapsed_ms = u64::try_from(results.elapsed().as_millis()).unwrap_or(u64::MAX),
            "aggregation finished"
        );
        results
    }
}

/// Shallow read of the root: sums loose files and collects subdirectories.
fn list_root(root: &Path) -> RootListing {
    let mut listing = RootListing::default();
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %root.display(), error = %e, "root listing failed");
            listing.skipped.push(SkippedEntry::new(root, e));
            return listing;
        }
    };

    let mut seen: HashMap<String, Vec<PathBuf>> = HashMap::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                listing.skipped.push(SkippedEntry::new(root, e));
                continue;
            }
        };
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping entry");
                listing.skipped.push(SkippedEntry::new(path, e));
                continue;
            }
        };

        if file_type.is_file() {
            match entry.metadata() {
                Ok(md) => {
                    listing.bytes = listing.bytes.saturating_add(md.len());
                    listing.files += 1;
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "skipping entry");
                    listing.skipped.push(SkippedEntry::new(path, e));
                }
            }
        } else if file_type.is_dir() {
            let key = fold_name(&entry.file_name().to_string_lossy());
            let same = seen.entry(key).or_default();
            if same.iter().any(|other| same_directory(other, &path)) {
                debug!(path = %path.display(), "duplicate directory under another casing");
                continue;
            }
            same.push(path.clone());
            listing.subdirectories.push(path);
        }
    }

    listing.subdirectories.sort();
    listing
}

/// Full recursive walk of one subdirectory. Symlinks are not followed.
fn walk_subtree(dir: &Path) -> WalkOutcome {
    let mut record = DirectoryRecord::empty(dir);
    let mut skipped = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false) {
        match entry {
            Ok(ent) => {
                if !ent.file_type().is_file() {
                    continue;
                }
                match ent.metadata() {
                    Ok(md) => record.add_file(md.len()),
                    Err(e) => {
                        debug!(path = %ent.path().display(), error = %e, "skipping entry");
                        skipped.push(SkippedEntry::new(ent.path(), e));
                    }
                }
            }
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                debug!(path = %path.display(), error = %e, "skipping entry");
                skipped.push(SkippedEntry::new(path, e));
            }
        }
    }

    WalkOutcome { record, skipped }
}

/// Case-folded directory name, used only to spot duplicates.
fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Device and file id comparison. Unreadable paths never match, so both
/// entries are kept.
fn same_directory(a: &Path, b: &Path) -> bool {
    same_file::is_same_file(a, b).unwrap_or(false)
}
