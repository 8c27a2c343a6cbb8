// Upload module - selection queue and the sequential batch sender
mod types;

pub use types::{BatchOutcome, BatchState, PendingFile};

use tracing::{info, warn};

use crate::client::ApiClient;

/// The files a guest has lined up for upload. Additions merge with what is
/// already there; only a fully successful batch (or an explicit clear)
/// empties it.
#[derive(Debug, Default)]
pub struct UploadQueue {
    files: Vec<PendingFile>,
    last_selection_key: String,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Summed size of the selection, for the size meter.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|file| file.size).sum()
    }

    pub fn add_files(&mut self, incoming: Vec<PendingFile>) {
        self.files.extend(incoming);
    }

    /// Apply one picker selection. Some mobile pickers fire the same
    /// selection twice back to back; an event identical to the previous one
    /// (same names, sizes, and modification times, in order) is dropped.
    /// Returns whether the selection was applied.
    pub fn add_selection(&mut self, picked: Vec<PendingFile>) -> bool {
        if picked.is_empty() {
            return false;
        }
        let key = picked
            .iter()
            .map(PendingFile::selection_key)
            .collect::<Vec<_>>()
            .join("|");
        if key == self.last_selection_key {
            return false;
        }
        self.last_selection_key = key;
        self.add_files(picked);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<PendingFile> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}

/// Drives a whole selection through the upload endpoint, one file at a
/// time. Sequential on purpose: one request in flight keeps server load
/// bounded and progress reporting exact.
pub struct Uploader {
    client: ApiClient,
    queue: UploadQueue,
}

impl Uploader {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            queue: UploadQueue::new(),
        }
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut UploadQueue {
        &mut self.queue
    }

    /// Send every selected file, in order, awaiting each request before
    /// the next goes out. Failures are counted rather than retried. A fully
    /// successful batch clears the selection; any failure leaves the whole
    /// selection in place, already-uploaded files included, so the guest
    /// decides what to resubmit.
    pub async fn upload_all(&mut self) -> BatchOutcome {
        if self.queue.is_empty() {
            return BatchOutcome::NothingSelected;
        }

        let mut batch = BatchState::new(self.queue.len());
        for file in self.queue.files() {
            info!(
                "Uploading {} of {}: {}",
                batch.current + 1,
                batch.total,
                file.name
            );
            match self.client.upload_file(file).await {
                Ok(()) => batch.record_success(),
                Err(error) => {
                    warn!("Upload of {} failed: {}", file.name, error);
                    batch.record_failure();
                }
            }
        }

        let outcome = batch.outcome();
        if outcome.is_success() {
            self.queue.clear();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn pending(name: &str, size: u64, modified_ms: u64) -> PendingFile {
        PendingFile {
            path: PathBuf::from(name),
            name: name.to_string(),
            size,
            mime: "image/jpeg".to_string(),
            modified: Some(SystemTime::UNIX_EPOCH + Duration::from_millis(modified_ms)),
        }
    }

    #[test]
    fn additions_merge_with_the_existing_selection() {
        let mut queue = UploadQueue::new();
        queue.add_files(vec![pending("a.jpg", 10, 1)]);
        queue.add_files(vec![pending("b.jpg", 20, 2), pending("c.jpg", 30, 3)]);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.total_size(), 60);
    }

    #[test]
    fn remove_deletes_exactly_the_indexed_item() {
        let mut queue = UploadQueue::new();
        queue.add_files(vec![
            pending("a.jpg", 10, 1),
            pending("b.jpg", 20, 2),
            pending("c.jpg", 30, 3),
        ]);
        let removed = queue.remove(1).unwrap();
        assert_eq!(removed.name, "b.jpg");
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.files()[1].name, "c.jpg");
        assert!(queue.remove(5).is_none());
    }

    #[test]
    fn clear_empties_the_selection() {
        let mut queue = UploadQueue::new();
        queue.add_files(vec![pending("a.jpg", 10, 1)]);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.total_size(), 0);
    }

    #[test]
    fn a_repeated_selection_event_is_dropped() {
        let mut queue = UploadQueue::new();
        let picked = vec![pending("a.jpg", 10, 1), pending("b.jpg", 20, 2)];

        assert!(queue.add_selection(picked.clone()));
        assert!(!queue.add_selection(picked));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn a_changed_selection_event_passes_the_guard() {
        let mut queue = UploadQueue::new();
        assert!(queue.add_selection(vec![pending("a.jpg", 10, 1)]));
        assert!(queue.add_selection(vec![pending("a.jpg", 10, 9)]));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn an_empty_selection_event_is_ignored() {
        let mut queue = UploadQueue::new();
        assert!(!queue.add_selection(Vec::new()));
        assert!(queue.is_empty());
    }
}
