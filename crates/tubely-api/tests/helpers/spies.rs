//! In-process stand-ins for the metadata store and the object store that record what
//! the upload pipeline did to them.

use async_trait::async_trait;
use chrono::Utc;
use object_store::memory::InMemory;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncRead;
use tubely_core::models::Video;
use tubely_core::{AppError, UploadKind};
use tubely_db::VideoStore;
use tubely_storage::{S3Storage, Storage, StorageBackend, StorageError, StorageResult};
use uuid::Uuid;

#[derive(Default)]
pub struct SpyVideoStore {
    videos: Mutex<HashMap<Uuid, Video>>,
    updates: AtomicUsize,
    fail_updates: AtomicBool,
    fail_ping: AtomicBool,
    stale_reads: AtomicBool,
}

impl SpyVideoStore {
    /// Insert a fresh record owned by `owner` and return it.
    pub fn insert_video(&self, owner: Uuid) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            title: "Boots".to_string(),
            description: "A video about boots".to_string(),
            user_id: owner,
            thumbnail_url: None,
            video_url: None,
        };
        self.videos
            .lock()
            .unwrap()
            .insert(video.id, video.clone());
        video
    }

    pub fn stored(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    /// Make `get_video` return records as they were before any upload, the way a
    /// request that read the row before a concurrent upload committed would see it.
    pub fn serve_stale_reads(&self) {
        self.stale_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }

    pub fn fail_ping(&self) {
        self.fail_ping.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoStore for SpyVideoStore {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = self.stored(id);
        if !self.stale_reads.load(Ordering::SeqCst) {
            return Ok(video);
        }
        Ok(video.map(|v| Video {
            thumbnail_url: None,
            video_url: None,
            ..v
        }))
    }

    async fn update_video(&self, video: &Video, kind: UploadKind) -> Result<Video, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut videos = self.videos.lock().unwrap();
        let existing = videos
            .get_mut(&video.id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))?;
        match kind {
            UploadKind::Thumbnail => existing.thumbnail_url = video.thumbnail_url.clone(),
            UploadKind::Video => existing.video_url = video.video_url.clone(),
        }
        existing.updated_at = Utc::now();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(existing.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

/// S3 backend over an in-memory object store, counting calls.
pub struct SpyStorage {
    pub memory: Arc<InMemory>,
    inner: S3Storage,
    calls: AtomicUsize,
    fail: AtomicBool,
}

impl SpyStorage {
    pub fn new(bucket: &str, region: &str) -> Self {
        let memory = Arc::new(InMemory::new());
        let inner = S3Storage::with_store(
            memory.clone(),
            bucket.to_string(),
            region.to_string(),
            None,
        );
        Self {
            memory,
            inner,
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_uploads(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for SpyStorage {
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "simulated object store outage".to_string(),
            ));
        }
        self.inner
            .upload_stream(storage_key, content_type, content_length, reader)
            .await
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.inner.public_url(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
