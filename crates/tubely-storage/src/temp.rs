//! Request-scoped scratch files.
//!
//! A [`ScratchFile`] is created empty, filled once from an upload stream, rewound, and
//! read by exactly one consumer. The file is removed when the value is dropped, which
//! covers early returns, `?`, panics and cancelled request futures alike.

use std::io::SeekFrom;
use std::path::Path;

use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

use crate::traits::{StorageError, StorageResult};

/// Name prefix of every scratch file.
pub const SCRATCH_PREFIX: &str = "tubely-upload";

const COPY_BUFFER_SIZE: usize = 64 * 1024;

pub struct ScratchFile {
    file: File,
    path: TempPath,
}

impl ScratchFile {
    /// Create a uniquely named empty file in `dir`.
    pub fn create_in(dir: &Path) -> StorageResult<Self> {
        let named = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempfile_in(dir)
            .map_err(|e| {
                StorageError::BackendError(format!(
                    "Failed to create scratch file in {}: {}",
                    dir.display(),
                    e
                ))
            })?;

        let (file, path) = named.into_parts();

        Ok(ScratchFile {
            file: File::from_std(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy `reader` into the file until EOF, failing with `TooLarge` as soon as more
    /// than `limit` bytes have been read. Returns the number of bytes written.
    pub async fn fill_from<R>(&mut self, reader: &mut R, limit: u64) -> StorageResult<u64>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut limited = reader.take(limit.saturating_add(1));
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut written: u64 = 0;

        loop {
            let n = limited
                .read(&mut buf)
                .await
                .map_err(StorageError::SourceRead)?;
            if n == 0 {
                break;
            }

            written += n as u64;
            if written > limit {
                return Err(StorageError::TooLarge { limit });
            }

            self.file.write_all(&buf[..n]).await?;
        }

        self.file.flush().await?;
        Ok(written)
    }

    /// Seek back to byte 0 so the whole content can be read again.
    pub async fn rewind(&mut self) -> StorageResult<()> {
        self.file.flush().await?;
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(())
    }

    /// Read handle for the single consumer.
    pub fn reader(&mut self) -> &mut (dyn AsyncRead + Send + Unpin) {
        &mut self.file
    }

    /// Flush to disk and atomically move the file to `dest`, replacing any file there.
    ///
    /// `dest` must be on the same filesystem as the scratch directory.
    pub async fn persist(self, dest: &Path) -> StorageResult<()> {
        self.file.sync_all().await?;

        let ScratchFile { file, path } = self;
        drop(file);

        path.persist(dest).map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to move scratch file to {}: {}",
                dest.display(),
                e.error
            ))
        })
    }
}
