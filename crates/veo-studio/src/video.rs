use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// A downloaded video backed by a file in the temp directory.
///
/// The backing file is removed exactly once: by [`VideoResource::release`],
/// or on drop if the handle was never released.
#[derive(Debug)]
pub struct VideoResource {
    path: PathBuf,
    len: usize,
    released: bool,
}

impl VideoResource {
    /// Writes `bytes` to a fresh file under [`std::env::temp_dir`].
    pub async fn store(bytes: &[u8]) -> io::Result<Self> {
        Self::store_in(&std::env::temp_dir(), bytes).await
    }

    pub async fn store_in(dir: &Path, bytes: &[u8]) -> io::Result<Self> {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let path = dir.join(format!("veo-{}-{}.mp4", std::process::id(), id));
        tokio::fs::write(&path, bytes).await?;
        log::debug!("Stored {} bytes of video at {}", bytes.len(), path.display());
        Ok(Self {
            path,
            len: bytes.len(),
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copies the video to `destination`, leaving this handle usable.
    pub async fn persist_to(&self, destination: &Path) -> io::Result<u64> {
        tokio::fs::copy(&self.path, destination).await
    }

    /// Frees the backing file.
    pub fn release(mut self) -> io::Result<()> {
        self.remove()
    }

    fn remove(&mut self) -> io::Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        log::debug!("Releasing video {}", self.path.display());
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

impl Drop for VideoResource {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            log::warn!("Failed to release video {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn release_removes_backing_file() {
        let dir = tempfile::tempdir().unwrap();
        let video = VideoResource::store_in(dir.path(), b"mp4").await.unwrap();
        let path = video.path().to_path_buf();
        assert_eq!(video.len(), 3);
        assert!(path.exists());

        video.release().unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn drop_releases_unreleased_video() {
        let dir = tempfile::tempdir().unwrap();
        let video = VideoResource::store_in(dir.path(), b"mp4").await.unwrap();
        let path = video.path().to_path_buf();
        drop(video);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn each_store_gets_its_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = VideoResource::store_in(dir.path(), b"a").await.unwrap();
        let b = VideoResource::store_in(dir.path(), b"b").await.unwrap();
        assert_ne!(a.path(), b.path());

        a.release().unwrap();
        assert!(b.path().exists());
    }

    #[tokio::test]
    async fn persist_copies_without_releasing() {
        let dir = tempfile::tempdir().unwrap();
        let video = VideoResource::store_in(dir.path(), b"frames").await.unwrap();
        let destination = dir.path().join("saved.mp4");
        let written = video.persist_to(&destination).await.unwrap();
        assert_eq!(written, 6);
        assert!(video.path().exists());
        assert_eq!(std::fs::read(&destination).unwrap(), b"frames");
    }
}
