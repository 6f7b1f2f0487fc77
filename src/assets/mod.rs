//! Client for the external asset CDN hosting workspace images.
//!
//! The CDN addresses assets by a folder-qualified public id; the service only
//! persists the public URL on the workspace record and re-derives the public
//! id from that URL when an asset has to be deleted.

use anyhow::Result;
use async_trait::async_trait;
use url::Url;

pub mod http;
pub mod memory;

pub use http::HttpAssetStore;
pub use memory::MemoryAssetStore;

/// CDN folder holding workspace images.
pub const WORKSPACE_IMAGE_FOLDER: &str = "workspaces";

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload `bytes` into `folder` and return the public URL of the asset.
    async fn upload(&self, folder: &str, filename: &str, bytes: Vec<u8>) -> Result<String>;

    /// Delete an asset by its folder-qualified public id.
    async fn delete(&self, public_id: &str) -> Result<()>;
}

/// Derive the folder-qualified public id from a stored asset URL.
///
/// The public id is the last path segment without its extension, prefixed
/// with the folder the asset was uploaded into. Returns `None` for URLs that
/// do not parse or carry no usable segment.
#[must_use]
pub fn public_id_from_url(folder: &str, url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last_segment = parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .next_back()?;
    let stem = last_segment.split('.').next()?;
    if stem.is_empty() {
        return None;
    }
    Some(format!("{folder}/{stem}"))
}
