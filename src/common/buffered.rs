use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, warn};

const TEMP_PREFIX: &str = "tubely-upload-";

/// Local staging copy of an upload.
///
/// Each asset gets a unique name inside the configured directory, so concurrent
/// requests never share a file. The file is removed when the asset is dropped,
/// whichever way the owning request ends.
pub struct BufferedAsset {
    file: File,
    path: PathBuf,
    len: u64,
}

impl BufferedAsset {
    pub fn create(dir: &Path, extension: &str) -> io::Result<Self> {
        let named = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&format!(".{}", extension))
            .tempfile_in(dir)?;
        let (file, temp_path) = named.into_parts();
        // Removal is handled by our own Drop so failures get logged.
        let path = temp_path.keep().map_err(|e| e.error)?;
        debug!("Created buffered asset {}", path.display());

        Ok(Self {
            file: File::from_std(file),
            path,
            len: 0,
        })
    }

    /// Creates an asset, writes `bytes`, syncs it and rewinds it.
    pub async fn from_bytes(dir: &Path, extension: &str, bytes: &[u8]) -> io::Result<Self> {
        let mut asset = Self::create(dir, extension)?;
        asset.write_all(bytes).await?;
        asset.finish().await?;
        asset.rewind().await?;
        Ok(asset)
    }

    pub async fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes).await?;
        self.len += bytes.len() as u64;
        Ok(())
    }

    /// Flushes and syncs. Anything that reads the file by path (the prober)
    /// must only run after this.
    pub async fn finish(&mut self) -> io::Result<()> {
        self.file.flush().await?;
        self.file.sync_all().await
    }

    pub async fn rewind(&mut self) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(())
    }

    /// A second handle sharing this asset's cursor.
    pub async fn reader(&self) -> io::Result<File> {
        self.file.try_clone().await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for BufferedAsset {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed buffered asset {}", self.path.display()),
            Err(e) => warn!("Couldn't remove temp file {}: {}", self.path.display(), e),
        }
    }
}
