//! Prompt history: a small deduplicated JSONL log on disk plus an in-memory
//! up/down navigation cursor over a snapshot of it.

use std::{io, path::PathBuf};

use thiserror::Error;

mod cursor;
mod store;

pub use cursor::{CursorState, HistoryCursor};
pub use store::HistoryStore;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("corrupt history record at {}:{line}: {source}", .path.display())]
    CorruptRecord {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("empty history record at {}:{line}", .path.display())]
    EmptyRecord { path: PathBuf, line: usize },
}
