//! JSON-lines feedback store.
//!
//! One record per line, appended and flushed under an exclusive lock on the
//! file itself, so separate handles (and separate processes) see a single
//! id sequence. Each locked operation first picks up lines other handles
//! wrote since this one last looked. An unterminated last line is the
//! remnant of an interrupted append and is cut off.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{MoodlensError, Result};
use crate::feedback::record::{FeedbackRecord, NewFeedback};
use crate::feedback::store::FeedbackStore;

#[derive(Debug)]
struct FileState {
    file: File,
    records: Vec<FeedbackRecord>,
    next_id: u64,
    /// Bytes of the file already read into `records`.
    consumed: u64,
    /// Lines already read, for error messages.
    line_count: usize,
}

/// Durable store backed by a JSON-lines file.
#[derive(Debug)]
pub struct FileFeedbackStore {
    path: PathBuf,
    state: Mutex<FileState>,
}

impl FileFeedbackStore {
    /// Open `path`, creating it if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                MoodlensError::storage(format!("cannot open {}: {e}", path.display()))
            })?;

        let store = FileFeedbackStore {
            path,
            state: Mutex::new(FileState {
                file,
                records: Vec::new(),
                next_id: 1,
                consumed: 0,
                line_count: 0,
            }),
        };
        let records = store.locked(|state| Ok(state.records.len()))?;
        debug!(path = %store.path.display(), records, "opened feedback store");
        Ok(store)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` holding both the in-process mutex and the exclusive file lock,
    /// after catching up with the file.
    fn locked<T>(&self, f: impl FnOnce(&mut FileState) -> Result<T>) -> Result<T> {
        let mut state = self.state.lock();
        state.file.lock().map_err(|e| {
            MoodlensError::storage(format!("cannot lock {}: {e}", self.path.display()))
        })?;

        let result = self.catch_up(&mut state).and_then(|_| f(&mut *state));

        if let Err(e) = state.file.unlock() {
            warn!(path = %self.path.display(), error = %e, "failed to unlock feedback store");
        }
        result
    }

    /// Read lines appended since the last call. Must hold the file lock.
    fn catch_up(&self, state: &mut FileState) -> Result<()> {
        let end = state.file.metadata()?.len();
        if end < state.consumed {
            return Err(MoodlensError::storage(format!(
                "{} shrank from {} to {end} bytes",
                self.path.display(),
                state.consumed
            )));
        }
        if end == state.consumed {
            return Ok(());
        }

        let mut buf = Vec::new();
        state.file.seek(SeekFrom::Start(state.consumed))?;
        (&state.file).take(end - state.consumed).read_to_end(&mut buf)?;

        let complete = buf.iter().rposition(|&b| b == b'\n').map_or(0, |p| p + 1);
        for line in buf[..complete].split_inclusive(|&b| b == b'\n') {
            state.line_count += 1;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let record: FeedbackRecord = serde_json::from_slice(line).map_err(|e| {
                MoodlensError::storage(format!(
                    "{}:{}: malformed record: {e}",
                    self.path.display(),
                    state.line_count
                ))
            })?;
            state.next_id = state.next_id.max(record.id + 1);
            state.records.push(record);
        }

        let kept = state.consumed + complete as u64;
        if complete < buf.len() {
            warn!(
                path = %self.path.display(),
                bytes = buf.len() - complete,
                "discarding unterminated trailing line"
            );
            state.file.set_len(kept).map_err(|e| {
                MoodlensError::storage(format!("cannot truncate {}: {e}", self.path.display()))
            })?;
        }
        state.consumed = kept;
        Ok(())
    }
}

impl FeedbackStore for FileFeedbackStore {
    fn append(&self, feedback: NewFeedback) -> Result<FeedbackRecord> {
        self.locked(|state| {
            let record = FeedbackRecord::from_new(state.next_id, feedback);
            let mut line = serde_json::to_string(&record)?;
            line.push('\n');

            let written = state
                .file
                .write_all(line.as_bytes())
                .and_then(|_| state.file.flush());
            if let Err(e) = written {
                // Drop any partial line so the next append starts clean.
                if let Err(truncate) = state.file.set_len(state.consumed) {
                    warn!(
                        path = %self.path.display(),
                        error = %truncate,
                        "failed to roll back partial append"
                    );
                }
                return Err(MoodlensError::storage(format!(
                    "cannot append to {}: {e}",
                    self.path.display()
                )));
            }

            state.consumed += line.len() as u64;
            state.line_count += 1;
            state.next_id += 1;
            state.records.push(record.clone());
            Ok(record)
        })
    }

    fn snapshot(&self) -> Result<Vec<FeedbackRecord>> {
        self.locked(|state| Ok(state.records.clone()))
    }

    fn len(&self) -> Result<usize> {
        self.locked(|state| Ok(state.records.len()))
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn feedback(comment: &str, sentiment: &str) -> NewFeedback {
        NewFeedback {
            username: "tester".to_string(),
            comment: comment.to_string(),
            rating: 4,
            sentiment: sentiment.to_string(),
        }
    }

    #[test]
    fn test_reopen_preserves_order_and_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.jsonl");

        {
            let store = FileFeedbackStore::open(&path).unwrap();
            store.append(feedback("first", "Joy")).unwrap();
            store.append(feedback("second", "Sad")).unwrap();
        }

        let store = FileFeedbackStore::open(&path).unwrap();
        let third = store.append(feedback("third", "Joy")).unwrap();
        assert_eq!(third.id, 3);

        let comments: Vec<String> = store
            .snapshot()
            .unwrap()
            .into_iter()
            .map(|r| r.comment)
            .collect();
        assert_eq!(comments, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_malformed_line_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.jsonl");
        std::fs::write(&path, "{not json}\n").unwrap();

        let result = FileFeedbackStore::open(&path);
        assert!(matches!(result, Err(MoodlensError::Storage(_))));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.jsonl");
        {
            let store = FileFeedbackStore::open(&path).unwrap();
            store.append(feedback("only", "Joy")).unwrap();
        }
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str("\n\n");
        std::fs::write(&path, content).unwrap();

        let store = FileFeedbackStore::open(&path).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_two_handles_continue_each_others_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.jsonl");

        let a = FileFeedbackStore::open(&path).unwrap();
        let b = FileFeedbackStore::open(&path).unwrap();
        assert_eq!(a.append(feedback("from a", "Joy")).unwrap().id, 1);
        assert_eq!(b.append(feedback("from b", "Sad")).unwrap().id, 2);
        assert_eq!(a.append(feedback("from a again", "Joy")).unwrap().id, 3);

        let comments: Vec<String> = b
            .snapshot()
            .unwrap()
            .into_iter()
            .map(|r| r.comment)
            .collect();
        assert_eq!(comments, vec!["from a", "from b", "from a again"]);
        assert_eq!(a.len().unwrap(), 3);
    }

    #[test]
    fn test_unterminated_tail_is_discarded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.jsonl");
        {
            let store = FileFeedbackStore::open(&path).unwrap();
            store.append(feedback("kept", "Joy")).unwrap();
        }
        let mut content = std::fs::read_to_string(&path).unwrap();
        content.push_str(r#"{"id":2,"username":"u","comm"#);
        std::fs::write(&path, content).unwrap();

        let store = FileFeedbackStore::open(&path).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        let next = store.append(feedback("after crash", "Sad")).unwrap();
        assert_eq!(next.id, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        let reopened = FileFeedbackStore::open(&path).unwrap();
        let comments: Vec<String> = reopened
            .snapshot()
            .unwrap()
            .into_iter()
            .map(|r| r.comment)
            .collect();
        assert_eq!(comments, vec!["kept", "after crash"]);
    }

    #[test]
    fn test_malformed_complete_line_before_tail_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.jsonl");
        std::fs::write(&path, "{not json}\n{\"id\":2").unwrap();

        let result = FileFeedbackStore::open(&path);
        assert!(matches!(result, Err(MoodlensError::Storage(_))));
    }
}
