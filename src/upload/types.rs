use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A file the guest picked for upload. The bytes stay on disk; this only
/// carries what the upload form and the request need to know about them.
#[derive(Debug, Clone)]
pub struct PendingFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub modified: Option<SystemTime>,
}

impl PendingFile {
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = tokio::fs::metadata(&path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            path,
            name,
            size: metadata.len(),
            mime,
            modified: metadata.modified().ok(),
        })
    }

    /// Identity of one picked file for the duplicate-selection guard.
    pub(crate) fn selection_key(&self) -> String {
        let modified = self
            .modified
            .and_then(|time| time.duration_since(SystemTime::UNIX_EPOCH).ok())
            .map(|since| since.as_millis())
            .unwrap_or(0);
        format!("{}:{}:{}", self.name, self.size, modified)
    }
}

/// Progress of one submit: how far through the selection the sender is and
/// how each finished item fared. Created when a batch starts and thrown
/// away when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchState {
    pub total: usize,
    pub current: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchState {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            current: 0,
            succeeded: 0,
            failed: 0,
        }
    }

    /// The cursor only moves once a request has resolved, one way or the
    /// other.
    pub fn record_success(&mut self) {
        self.succeeded += 1;
        self.current += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
        self.current += 1;
    }

    pub fn is_complete(&self) -> bool {
        self.current == self.total
    }

    pub fn outcome(&self) -> BatchOutcome {
        if self.failed == 0 {
            BatchOutcome::AllUploaded {
                count: self.succeeded,
            }
        } else if self.succeeded > 0 {
            BatchOutcome::Partial {
                succeeded: self.succeeded,
                failed: self.failed,
            }
        } else {
            BatchOutcome::AllFailed
        }
    }
}

/// How a submit ended, with the message guests see for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Submit was rejected before any request went out.
    NothingSelected,
    AllUploaded {
        count: usize,
    },
    /// Some items made it, some did not; the selection is kept so the guest
    /// can retry.
    Partial {
        succeeded: usize,
        failed: usize,
    },
    AllFailed,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::AllUploaded { .. })
    }

    pub fn message(&self) -> String {
        match self {
            BatchOutcome::NothingSelected => {
                "Select at least one file before uploading.".to_string()
            }
            BatchOutcome::AllUploaded { count } => {
                let plural = if *count > 1 { "s" } else { "" };
                format!("All {} file{} uploaded successfully!", count, plural)
            }
            BatchOutcome::Partial { succeeded, failed } => {
                format!(
                    "{} uploaded, {} failed. Please retry the failed files.",
                    succeeded, failed
                )
            }
            BatchOutcome::AllFailed => "Upload failed. Please try again in a moment.".to_string(),
        }
    }
}
