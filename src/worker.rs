//! Queue-job orchestration around the frame detector
//!
//! The detection core is a pure function of bytes; this module supplies the
//! glue a queue consumer needs: the job message shape, narrow async seams
//! for the object store and the artwork record store, bounded retries on
//! transient fetches, and the completed/failed status mapping.
//!
//! Jobs are independent and embarrassingly parallel: one worker instance
//! can be shared across tasks, each processing one job at a time, with no
//! internal locking.

use crate::{
    detector::FrameDetector,
    error::{FrameRemovalError, Result},
    services::SourceFormat,
};
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Maximum attempts for fetching source bytes before the job fails
const MAX_FETCH_ATTEMPTS: u32 = 3;

/// Upstream job message: one artwork image to examine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameJob {
    /// Artwork record identifier
    pub artwork_id: String,
    /// Storage location of the source image
    pub image_url: String,
    /// Gallery the artwork belongs to
    pub gallery_id: String,
}

/// Terminal processing status persisted on the artwork record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Processing finished; a frame may or may not have been found
    Completed,
    /// Processing failed; the job is eligible for retry by the queue
    Failed,
}

/// Outcome persisted on the artwork record after a job
///
/// "Processed, no frame found" keeps `status=Completed` with a `None`
/// processed URL: it is a valid, deterministic outcome and must stay
/// distinguishable from failure all the way to the persisted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    /// Storage URL of the cropped image, when a frame was removed
    pub processed_image_url: Option<String>,
    /// Detection confidence, reported even for rejected candidates
    pub confidence: f64,
    /// Terminal status
    pub status: JobStatus,
    /// Failure message when `status` is `Failed`
    pub processing_error: Option<String>,
}

/// Object storage collaborator: image bytes in and out by key
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Fetch the bytes stored at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// Store bytes under `key`, returning the resulting URL
    async fn store(&self, key: &str, bytes: &[u8]) -> Result<String>;

    /// Delete the object stored under `key`
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Relational-store collaborator: persists per-artwork outcomes
#[async_trait]
pub trait ArtworkRepository: Send + Sync {
    /// Persist the outcome for `artwork_id`
    async fn record(&self, artwork_id: &str, outcome: &JobOutcome) -> Result<()>;
}

/// Queue worker that runs frame removal for one job at a time
pub struct FrameJobWorker {
    detector: FrameDetector,
    store: Arc<dyn ImageStore>,
    repository: Arc<dyn ArtworkRepository>,
}

impl FrameJobWorker {
    /// Create a worker over the given collaborators
    #[must_use]
    pub fn new(
        detector: FrameDetector,
        store: Arc<dyn ImageStore>,
        repository: Arc<dyn ArtworkRepository>,
    ) -> Self {
        Self {
            detector,
            store,
            repository,
        }
    }

    /// Process one job end to end and persist its outcome
    ///
    /// Fetch errors are retried a bounded number of times (transient I/O);
    /// a deterministic "no frame found" is never retried. The outcome is
    /// recorded before returning, for success and failure alike.
    ///
    /// # Errors
    /// Returns an error only when the outcome itself cannot be persisted.
    #[instrument(skip(self), fields(artwork_id = %job.artwork_id, gallery_id = %job.gallery_id))]
    pub async fn process(&self, job: &FrameJob) -> Result<JobOutcome> {
        let image_bytes = match self.fetch_with_retry(&job.image_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let outcome = JobOutcome {
                    processed_image_url: None,
                    confidence: 0.0,
                    status: JobStatus::Failed,
                    processing_error: Some(format!("fetch failed: {}", e)),
                };
                self.repository.record(&job.artwork_id, &outcome).await?;
                return Ok(outcome);
            },
        };

        let removal = self.detector.remove_frame(&image_bytes);

        let outcome = if !removal.success {
            JobOutcome {
                processed_image_url: None,
                confidence: removal.detection.confidence,
                status: JobStatus::Failed,
                processing_error: removal.error.clone(),
            }
        } else if let Some(processed) = removal.processed_image.as_deref() {
            match self.store_processed(job, &image_bytes, processed).await {
                Ok(url) => JobOutcome {
                    processed_image_url: Some(url),
                    confidence: removal.detection.confidence,
                    status: JobStatus::Completed,
                    processing_error: None,
                },
                Err(e) => JobOutcome {
                    processed_image_url: None,
                    confidence: removal.detection.confidence,
                    status: JobStatus::Failed,
                    processing_error: Some(format!("store failed: {}", e)),
                },
            }
        } else {
            debug!(
                "Artwork {}: no frame found (confidence {:.3}), nothing to store",
                job.artwork_id, removal.detection.confidence
            );
            JobOutcome {
                processed_image_url: None,
                confidence: removal.detection.confidence,
                status: JobStatus::Completed,
                processing_error: None,
            }
        };

        self.repository.record(&job.artwork_id, &outcome).await?;
        Ok(outcome)
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<Vec<u8>> {
        let mut last_error = None;
        for attempt in 1..=MAX_FETCH_ATTEMPTS {
            match self.store.fetch(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    warn!(
                        "Fetch attempt {}/{} for '{}' failed: {}",
                        attempt, MAX_FETCH_ATTEMPTS, url, e
                    );
                    last_error = Some(e);
                },
            }
        }
        Err(last_error
            .unwrap_or_else(|| FrameRemovalError::internal("fetch retry loop yielded no error")))
    }

    async fn store_processed(
        &self,
        job: &FrameJob,
        original_bytes: &[u8],
        processed: &[u8],
    ) -> Result<String> {
        let extension = SourceFormat::detect(original_bytes).map_or("png", |f| f.extension());
        let key = format!(
            "processed/{}/{}.{}",
            job.gallery_id, job.artwork_id, extension
        );
        self.store.store(&key, processed).await
    }
}

/// In-memory [`ImageStore`] for tests and examples
#[derive(Default)]
pub struct MemoryImageStore {
    objects: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
    fail_fetches: std::sync::atomic::AtomicU32,
}

impl MemoryImageStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an object
    pub fn insert(&self, key: &str, bytes: Vec<u8>) {
        self.objects
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), bytes);
    }

    /// Make the next `count` fetches fail with an I/O error
    pub fn fail_next_fetches(&self, count: u32) {
        self.fail_fetches
            .store(count, std::sync::atomic::Ordering::SeqCst);
    }

    /// Retrieve a stored object, if present
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let remaining = self.fail_fetches.load(std::sync::atomic::Ordering::SeqCst);
        if remaining > 0 {
            self.fail_fetches
                .store(remaining - 1, std::sync::atomic::Ordering::SeqCst);
            return Err(FrameRemovalError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "injected transient fetch failure",
            )));
        }

        self.get(url)
            .ok_or_else(|| FrameRemovalError::internal(format!("object not found: {}", url)))
    }

    async fn store(&self, key: &str, bytes: &[u8]) -> Result<String> {
        self.insert(key, bytes.to_vec());
        Ok(format!("memory://{}", key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.objects
            .lock()
            .expect("store mutex poisoned")
            .remove(key);
        Ok(())
    }
}

/// In-memory [`ArtworkRepository`] for tests and examples
#[derive(Default)]
pub struct MemoryArtworkRepository {
    outcomes: std::sync::Mutex<std::collections::HashMap<String, JobOutcome>>,
}

impl MemoryArtworkRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve the recorded outcome for an artwork, if any
    #[must_use]
    pub fn outcome(&self, artwork_id: &str) -> Option<JobOutcome> {
        self.outcomes
            .lock()
            .expect("repository mutex poisoned")
            .get(artwork_id)
            .cloned()
    }
}

#[async_trait]
impl ArtworkRepository for MemoryArtworkRepository {
    async fn record(&self, artwork_id: &str, outcome: &JobOutcome) -> Result<()> {
        self.outcomes
            .lock()
            .expect("repository mutex poisoned")
            .insert(artwork_id.to_string(), outcome.clone());
        Ok(())
    }
}
