use crate::model::{DirectoryRecord, ResultSet};

/// Messages sent while [`DirectoryAggregator::run_reporting`] is working.
///
/// [`DirectoryAggregator::run_reporting`]: crate::aggregator::DirectoryAggregator::run_reporting
#[derive(Debug, Clone)]
pub enum AggregateMsg {
    /// Root listing finished; this many subdirectory walks were launched.
    Started { subdirectories: u64 },
    /// One subdirectory walk finished. Arrives in completion order.
    DirDone(DirectoryRecord),
    Done(ResultSet),
}
