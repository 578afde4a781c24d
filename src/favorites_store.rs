use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::fs;

use crate::model::{CatalogItem, FavoritesCollection};

/// Fixed name of the single record holding every favorite.
pub const FAVORITES_NAMESPACE: &str = "bookNookFavorites";

#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Never fails: an absent or unreadable record loads as an empty collection.
    async fn load(&self) -> FavoritesCollection;

    /// Replaces the whole record.
    async fn save(&self, collection: &[CatalogItem]) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct LocalFsFavoritesStore {
    base_dir: PathBuf,
}

impl LocalFsFavoritesStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn record_path(&self) -> PathBuf {
        self.base_dir.join(format!("{FAVORITES_NAMESPACE}.json"))
    }
}

#[async_trait]
impl FavoritesStore for LocalFsFavoritesStore {
    async fn load(&self) -> FavoritesCollection {
        let path = self.record_path();
        match read_json::<FavoritesCollection>(&path).await {
            Ok(Some(items)) => dedupe_by_key(items),
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no favorites record yet");
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), ?err, "ignoring unreadable favorites record");
                Vec::new()
            }
        }
    }

    async fn save(&self, collection: &[CatalogItem]) -> anyhow::Result<()> {
        let path = self.record_path();
        write_json_atomic(&path, &collection)
            .await
            .with_context(|| format!("write favorites record: {}", path.display()))
    }
}

/// Keeps the serialized record in memory, like a browser's local storage slot.
#[derive(Debug, Default)]
pub struct MemoryFavoritesStore {
    record: Mutex<Option<String>>,
}

impl MemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with raw text, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            record: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.record.lock().ok().and_then(|record| record.clone())
    }
}

#[async_trait]
impl FavoritesStore for MemoryFavoritesStore {
    async fn load(&self) -> FavoritesCollection {
        let Some(raw) = self.raw() else {
            return Vec::new();
        };
        match serde_json::from_str::<FavoritesCollection>(&raw) {
            Ok(items) => dedupe_by_key(items),
            Err(err) => {
                tracing::warn!(?err, "ignoring unreadable favorites record");
                Vec::new()
            }
        }
    }

    async fn save(&self, collection: &[CatalogItem]) -> anyhow::Result<()> {
        let raw = serde_json::to_string(collection).context("serialize favorites")?;
        let mut record = self
            .record
            .lock()
            .map_err(|_| anyhow::anyhow!("favorites slot lock is poisoned"))?;
        *record = Some(raw);
        Ok(())
    }
}

fn dedupe_by_key(items: FavoritesCollection) -> FavoritesCollection {
    let mut seen = HashSet::new();
    let before = items.len();
    let items = items
        .into_iter()
        .filter(|item| seen.insert(item.key.clone()))
        .collect::<Vec<_>>();
    if items.len() != before {
        tracing::warn!(
            dropped = before - items.len(),
            "dropped duplicate keys from favorites record"
        );
    }
    items
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let value = serde_json::from_slice(&bytes).context("parse json")?;
    Ok(Some(value))
}

async fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    fs::create_dir_all(parent)
        .await
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    let data = serde_json::to_vec_pretty(value).context("serialize json")?;
    fs::write(&tmp_path, &data)
        .await
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}
