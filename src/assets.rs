//! Idempotent image cache
//!
//! Each item gets one cached image at a path derived solely from its
//! identifier (the trailing segment of the detail link). An image that is
//! already on disk is never fetched again, so re-harvests cost no image
//! bandwidth.

use reqwest::Client;
use std::path::{Path, PathBuf};

/// Local store for item images
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    /// Opens the asset directory, creating it if absent
    pub fn new(dir: &Path) -> std::io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Deterministic cache path for an item identifier
    pub fn path_for(&self, item_id: &str) -> PathBuf {
        self.dir.join(format!("{}.png", item_id))
    }

    /// Display label for the spreadsheet hyperlink cell
    pub fn label_for(&self, item_id: &str) -> String {
        format!("{}.png", item_id)
    }

    /// Ensures a cached image exists for the item and returns its path
    ///
    /// If the file already exists no fetch occurs. Fetch and write failures
    /// propagate so the caller can soft-fail the image field; they never
    /// block record emission.
    pub async fn ensure(
        &self,
        client: &Client,
        image_url: &str,
        item_id: &str,
    ) -> crate::Result<PathBuf> {
        let path = self.path_for(item_id);
        if path.exists() {
            tracing::debug!("Image for {} already cached, skipping fetch", item_id);
            return Ok(path);
        }

        let response = client.get(image_url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        tokio::fs::write(&path, &bytes).await?;

        tracing::debug!("Cached image for {} ({} bytes)", item_id, bytes.len());
        Ok(path)
    }
}
