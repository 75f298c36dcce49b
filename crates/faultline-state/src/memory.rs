use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::repository::{Repository, RepositoryError, RepositoryItem};

/// A [`Repository`] that keeps items in process memory.
///
/// Nothing survives a restart, which makes it a suitable default for short-lived processes and
/// for tests.
pub struct MemoryRepository<V> {
    items: RwLock<HashMap<String, V>>,
}

impl<V> MemoryRepository<V> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for MemoryRepository<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for MemoryRepository<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryRepository").finish()
    }
}

#[async_trait::async_trait]
impl<V: RepositoryItem + Clone> Repository<V> for MemoryRepository<V> {
    async fn get(&self, key: String) -> Result<Option<V>, RepositoryError> {
        Ok(self.items.read().await.get(&key).cloned())
    }

    async fn list(&self) -> Result<Vec<V>, RepositoryError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn set(&self, key: String, value: V) -> Result<(), RepositoryError> {
        self.items.write().await.insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: String) -> Result<(), RepositoryError> {
        self.items.write().await.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::register_repository_item;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        version: i64,
    }
    register_repository_item!(Snapshot, "Snapshot");

    #[tokio::test]
    async fn get_returns_none_when_empty() {
        let repo = MemoryRepository::<Snapshot>::new();
        assert!(repo.get("snapshot".to_string()).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let repo = MemoryRepository::<Snapshot>::new();
        repo.set("snapshot".to_string(), Snapshot { version: 1 })
            .await
            .unwrap();
        repo.set("snapshot".to_string(), Snapshot { version: 2 })
            .await
            .unwrap();

        assert_eq!(
            repo.get("snapshot".to_string()).await.unwrap(),
            Some(Snapshot { version: 2 })
        );
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remove_deletes_value() {
        let repo = MemoryRepository::<Snapshot>::new();
        repo.set("snapshot".to_string(), Snapshot { version: 3 })
            .await
            .unwrap();
        repo.remove("snapshot".to_string()).await.unwrap();

        assert!(repo.get("snapshot".to_string()).await.unwrap().is_none());
    }
}
