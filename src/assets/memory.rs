//! In-memory asset store for tests and the standalone server.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ulid::Ulid;

use super::AssetStore;

#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    assets: Mutex<HashMap<String, Vec<u8>>>,
    fail_uploads: AtomicBool,
}

impl MemoryAssetStore {
    /// Make every subsequent upload fail, to exercise failure paths.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::Relaxed);
    }

    pub fn contains(&self, public_id: &str) -> bool {
        self.assets
            .lock()
            .map(|assets| assets.contains_key(public_id))
            .unwrap_or(false)
    }

    pub fn stored(&self) -> usize {
        self.assets.lock().map(|assets| assets.len()).unwrap_or(0)
    }

    fn locked(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.assets
            .lock()
            .map_err(|_| anyhow!("asset store lock poisoned"))
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn upload(&self, folder: &str, filename: &str, bytes: Vec<u8>) -> Result<String> {
        if self.fail_uploads.load(Ordering::Relaxed) {
            return Err(anyhow!("asset upload failed: simulated outage"));
        }
        let extension = filename.rsplit_once('.').map_or("bin", |(_, ext)| ext);
        let id = Ulid::new().to_string().to_lowercase();
        let mut assets = self.locked()?;
        assets.insert(format!("{folder}/{id}"), bytes);
        Ok(format!("https://assets.invalid/{folder}/{id}.{extension}"))
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        let mut assets = self.locked()?;
        assets.remove(public_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{public_id_from_url, WORKSPACE_IMAGE_FOLDER};

    #[tokio::test]
    async fn upload_url_round_trips_to_public_id() -> Result<()> {
        let store = MemoryAssetStore::default();
        let url = store
            .upload(WORKSPACE_IMAGE_FOLDER, "logo.png", vec![1, 2, 3])
            .await?;

        let public_id =
            public_id_from_url(WORKSPACE_IMAGE_FOLDER, &url).expect("derivable public id");
        assert!(store.contains(&public_id));

        store.delete(&public_id).await?;
        assert!(!store.contains(&public_id));
        Ok(())
    }

    #[tokio::test]
    async fn simulated_outage_fails_uploads() {
        let store = MemoryAssetStore::default();
        store.set_fail_uploads(true);
        let result = store
            .upload(WORKSPACE_IMAGE_FOLDER, "logo.png", vec![1])
            .await;
        assert!(result.is_err());
        assert_eq!(store.stored(), 0);
    }
}
