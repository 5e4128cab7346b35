//! Plugin settings kept in the host's shared key-value store.
//!
//! Every value lives under a scope so plugins sharing one store never see
//! each other's keys. Values are plain strings; callers parse them.

use crate::constants::{DEFAULT_MAX_MEME_SIZE, MAX_MEME_SIZE_KEY};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get(&self, key: &str, scope: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, scope: &str) -> Result<()>;
}

/// Store that lives only as long as the process
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn get(&self, key: &str, scope: &str) -> Result<Option<String>> {
        let values = self.values.read().await;
        Ok(values.get(&(scope.to_string(), key.to_string())).cloned())
    }

    async fn set(&self, key: &str, value: &str, scope: &str) -> Result<()> {
        let mut values = self.values.write().await;
        values.insert((scope.to_string(), key.to_string()), value.to_string());
        Ok(())
    }
}

/// Read `key`, persisting `default` first if the store has no value yet
pub async fn get_or_init(
    store: &dyn ConfigStore,
    key: &str,
    scope: &str,
    default: &str,
) -> Result<String> {
    if let Some(value) = store.get(key, scope).await? {
        return Ok(value);
    }

    store.set(key, default, scope).await?;
    tracing::info!("Initialized setting {}/{} = {}", scope, key, default);
    Ok(default.to_string())
}

/// Image size budget in bytes, initialized to 5 MiB on first access
pub async fn max_meme_size(store: &dyn ConfigStore, scope: &str) -> Result<usize> {
    let raw = get_or_init(
        store,
        MAX_MEME_SIZE_KEY,
        scope,
        &DEFAULT_MAX_MEME_SIZE.to_string(),
    )
    .await?;

    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(AppError::InvalidConfig {
            key: MAX_MEME_SIZE_KEY.to_string(),
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn max_meme_size_defaults_and_persists() {
        let store = MemoryStore::new();
        assert_eq!(store.get(MAX_MEME_SIZE_KEY, "memes").await.unwrap(), None);

        let size = max_meme_size(&store, "memes").await.unwrap();
        assert_eq!(size, 5_242_880);
        assert_eq!(
            store.get(MAX_MEME_SIZE_KEY, "memes").await.unwrap().as_deref(),
            Some("5242880")
        );
    }

    #[tokio::test]
    async fn get_or_init_keeps_existing_value() {
        let store = MemoryStore::new();
        store.set(MAX_MEME_SIZE_KEY, "1000", "memes").await.unwrap();

        let value = get_or_init(&store, MAX_MEME_SIZE_KEY, "memes", "5242880")
            .await
            .unwrap();
        assert_eq!(value, "1000");
        assert_eq!(max_meme_size(&store, "memes").await.unwrap(), 1000);
    }

    #[tokio::test]
    async fn scopes_are_isolated() {
        let store = MemoryStore::new();
        store.set(MAX_MEME_SIZE_KEY, "1", "other_plugin").await.unwrap();

        assert_eq!(store.get(MAX_MEME_SIZE_KEY, "memes").await.unwrap(), None);
        assert_eq!(max_meme_size(&store, "memes").await.unwrap(), 5_242_880);
        assert_eq!(
            store.get(MAX_MEME_SIZE_KEY, "other_plugin").await.unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn rejects_non_positive_size() {
        let store = MemoryStore::new();
        store.set(MAX_MEME_SIZE_KEY, "0", "memes").await.unwrap();
        assert!(matches!(
            max_meme_size(&store, "memes").await,
            Err(AppError::InvalidConfig { .. })
        ));

        store.set(MAX_MEME_SIZE_KEY, "lots", "memes").await.unwrap();
        assert!(matches!(
            max_meme_size(&store, "memes").await,
            Err(AppError::InvalidConfig { .. })
        ));
    }
}
