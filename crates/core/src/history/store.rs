use std::{
    ffi::OsString,
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::HistoryError;
use crate::config::HistoryConfig;

#[derive(Serialize)]
struct RecordRef<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct Record {
    prompt: String,
}

/// Durable, deduplicated, size-bounded log of prompts, oldest first.
///
/// Single writer per file: `append` rewrites the whole file, so two processes
/// appending at the same time can lose each other's entries.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    path: PathBuf,
    max_records: usize,
}

impl HistoryStore {
    pub fn new(cfg: HistoryConfig) -> Self {
        Self {
            path: cfg.path,
            max_records: cfg.max_records.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    /// All stored prompts in insertion order. A missing file is created empty.
    /// Bytes that are not UTF-8 count as a corrupt record, not an I/O failure.
    pub fn load(&self) -> Result<Vec<String>, HistoryError> {
        let data = match fs::read(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.create_empty()?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_err(e)),
        };
        parse_records(&self.path, &data)
    }

    /// The last `min(n, count)` prompts, oldest of them first.
    pub fn last_n(&self, n: usize) -> Result<Vec<String>, HistoryError> {
        let mut prompts = self.load()?;
        let start = prompts.len().saturating_sub(n);
        Ok(prompts.split_off(start))
    }

    /// Stores `prompt` at the end unless it is empty or already present.
    /// Existing entries keep their position; the oldest are evicted past the limit.
    pub fn append(&self, prompt: &str) -> Result<(), HistoryError> {
        if prompt.is_empty() {
            return Ok(());
        }
        let mut prompts = self.load()?;
        if prompts.iter().any(|p| p == prompt) {
            debug!(target: "history", "skip duplicate prompt len={}", prompt.len());
            return Ok(());
        }
        prompts.push(prompt.to_string());
        if prompts.len() > self.max_records {
            let excess = prompts.len() - self.max_records;
            prompts.drain(..excess);
            debug!(target: "history", "evicted {} oldest prompt(s)", excess);
        }
        self.rewrite(&prompts)?;
        info!(target: "history", "stored prompt, {} record(s) in {}", prompts.len(), self.path.display());
        Ok(())
    }

    fn rewrite(&self, prompts: &[String]) -> Result<(), HistoryError> {
        self.ensure_parent()?;
        let tmp = tmp_path(&self.path);
        let write = || -> io::Result<()> {
            let mut f = BufWriter::new(fs::File::create(&tmp)?);
            for p in prompts {
                serde_json::to_writer(&mut f, &RecordRef { prompt: p }).map_err(io::Error::from)?;
                f.write_all(b"\n")?;
            }
            f.flush()?;
            Ok(())
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_err(e));
        }
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))
    }

    fn create_empty(&self) -> Result<(), HistoryError> {
        self.ensure_parent()?;
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        info!(target: "history", "created empty history at {}", self.path.display());
        Ok(())
    }

    fn ensure_parent(&self) -> Result<(), HistoryError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))
            }
            _ => Ok(()),
        }
    }

    fn io_err(&self, source: io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn parse_records(path: &Path, data: &[u8]) -> Result<Vec<String>, HistoryError> {
    let mut out = Vec::new();
    for (idx, line) in data.split(|b| *b == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let rec: Record = serde_json::from_slice(line).map_err(|e| HistoryError::CorruptRecord {
            path: path.to_path_buf(),
            line: idx + 1,
            source: e,
        })?;
        if rec.prompt.is_empty() {
            return Err(HistoryError::EmptyRecord {
                path: path.to_path_buf(),
                line: idx + 1,
            });
        }
        out.push(rec.prompt);
    }
    Ok(out)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("history"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> HistoryStore {
        HistoryStore::new(HistoryConfig::new(dir.path().join("history.jsonl")))
    }

    fn seeded(dir: &TempDir, prompts: &[&str]) -> HistoryStore {
        let store = store_in(dir);
        for p in prompts {
            store.append(p).unwrap();
        }
        store
    }

    #[test]
    fn load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(HistoryConfig::new(dir.path().join("nested/kk/history.jsonl")));
        assert!(store.load().unwrap().is_empty());
        assert!(store.path().exists());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
    }

    #[test]
    fn append_to_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append("list files").unwrap();
        assert_eq!(store.load().unwrap(), vec!["list files"]);
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "{\"prompt\":\"list files\"}\n"
        );
    }

    #[test]
    fn duplicate_is_not_reordered() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(&dir, &["a", "b", "c"]);
        store.append("b").unwrap();
        assert_eq!(store.load().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn repeated_append_matches_single_append() {
        let dir = tempfile::tempdir().unwrap();
        let once = seeded(&dir, &["x"]);
        let expected = once.load().unwrap();
        once.append("x").unwrap();
        assert_eq!(once.load().unwrap(), expected);
    }

    #[test]
    fn empty_prompt_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(&dir, &["a"]);
        let before = fs::read_to_string(store.path()).unwrap();
        store.append("").unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn eleventh_prompt_evicts_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let names: Vec<String> = (1..=10).map(|i| format!("p{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let store = seeded(&dir, &refs);
        assert_eq!(store.load().unwrap().len(), 10);

        store.append("p11").unwrap();
        let expected: Vec<String> = (2..=11).map(|i| format!("p{i}")).collect();
        assert_eq!(store.load().unwrap(), expected);
    }

    #[test]
    fn many_appends_stay_bounded_and_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        for i in 0..40 {
            store.append(&format!("cmd {}", i % 13)).unwrap();
            let all = store.load().unwrap();
            assert!(all.len() <= 10);
            let mut sorted = all.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), all.len());
        }
    }

    #[test]
    fn custom_limit_is_respected() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(
            HistoryConfig::new(dir.path().join("h.jsonl")).with_max_records(2),
        );
        for p in ["a", "b", "c"] {
            store.append(p).unwrap();
        }
        assert_eq!(store.load().unwrap(), vec!["b", "c"]);
    }

    #[test]
    fn last_n_returns_tail_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(&dir, &["a", "b", "c", "d"]);
        assert_eq!(store.last_n(2).unwrap(), vec!["c", "d"]);
        assert_eq!(store.last_n(10).unwrap(), vec!["a", "b", "c", "d"]);
        assert!(store.last_n(0).unwrap().is_empty());
    }

    #[test]
    fn order_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        seeded(&dir, &["one", "two", "three"]);
        let reopened = store_in(&dir);
        assert_eq!(reopened.load().unwrap(), vec!["one", "two", "three"]);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{\"prompt\":\"a\"}\n\n   \n{\"prompt\":\"b\"}\n").unwrap();
        assert_eq!(store.load().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn corrupt_line_fails_whole_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{\"prompt\":\"a\"}\nnot json\n{\"prompt\":\"b\"}\n").unwrap();
        match store.load() {
            Err(HistoryError::CorruptRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected corrupt record, got {other:?}"),
        }
        assert!(matches!(store.last_n(5), Err(HistoryError::CorruptRecord { .. })));
    }

    #[test]
    fn corrupt_file_blocks_append() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{\"text\":\"a\"}\n").unwrap();
        assert!(store.append("b").is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{\"text\":\"a\"}\n");
    }

    #[test]
    fn empty_stored_prompt_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{\"prompt\":\"\"}\n").unwrap();
        assert!(matches!(
            store.load(),
            Err(HistoryError::EmptyRecord { line: 1, .. })
        ));
    }

    #[test]
    fn special_characters_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        let prompt = "find \"*.rs\" files\twith ünïcode\\";
        store.append(prompt).unwrap();
        assert_eq!(store.load().unwrap(), vec![prompt]);
        assert_eq!(fs::read_to_string(store.path()).unwrap().lines().count(), 1);
    }

    #[test]
    fn rewrite_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(&dir, &["a", "b"]);
        assert!(!tmp_path(store.path()).exists());
    }

    #[test]
    fn invalid_utf8_is_a_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), b"{\"prompt\":\"a\"}\n\xff\xfe\n").unwrap();
        match store.load() {
            Err(HistoryError::CorruptRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected corrupt record, got {other:?}"),
        }

        fs::write(store.path(), b"{\"prompt\":\"caf\xe9\"}\n").unwrap();
        assert!(matches!(
            store.load(),
            Err(HistoryError::CorruptRecord { line: 1, .. })
        ));
    }

    #[test]
    fn crlf_lines_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{\"prompt\":\"a\"}\r\n{\"prompt\":\"b\"}\r\n").unwrap();
        assert_eq!(store.load().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn failed_rewrite_keeps_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = seeded(&dir, &["a"]);
        let before = fs::read_to_string(store.path()).unwrap();
        // A directory in the temp file's place makes the write fail.
        let tmp = tmp_path(store.path());
        fs::create_dir(&tmp).unwrap();

        assert!(matches!(store.append("b"), Err(HistoryError::Io { .. })));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(store.load().unwrap(), vec!["a"]);
        assert!(tmp.is_dir());

        fs::remove_dir(&tmp).unwrap();
        store.append("b").unwrap();
        assert_eq!(store.load().unwrap(), vec!["a", "b"]);
        assert!(!tmp.exists());
    }

    #[test]
    fn unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be.
        let store = HistoryStore::new(HistoryConfig::new(dir.path()));
        assert!(matches!(store.load(), Err(HistoryError::Io { .. })));
    }
}
