use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::{Arc, RwLock},
};

use thiserror::Error;

use crate::repository::{Repository, RepositoryItem};

/// A registry that contains repositories for different types of items.
///
/// Repositories are keyed by the item type they store, so at most one repository per type can be
/// registered. Registering a second repository for the same type replaces the first one.
pub struct StateRegistry {
    repositories: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl std::fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateRegistry").finish()
    }
}

/// No repository has been registered for the requested item type.
#[derive(Debug, Error)]
#[error("Repository for type {0} is not registered")]
pub struct RepositoryNotFoundError(pub &'static str);

impl StateRegistry {
    /// Creates a new empty `StateRegistry`.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        StateRegistry {
            repositories: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a repository into the map, associating it with its item type.
    pub fn register<T: RepositoryItem>(&self, value: Arc<dyn Repository<T>>) {
        tracing::debug!(item = T::NAME, "Registering repository");
        self.repositories
            .write()
            .expect("RwLock should not be poisoned")
            .insert(<T as RepositoryItem>::type_id(), Box::new(value));
    }

    /// Retrieves a repository from the map given its item type.
    pub fn get<T: RepositoryItem>(
        &self,
    ) -> Result<Arc<dyn Repository<T>>, RepositoryNotFoundError> {
        self.repositories
            .read()
            .expect("RwLock should not be poisoned")
            .get(&<T as RepositoryItem>::type_id())
            .and_then(|boxed| boxed.downcast_ref::<Arc<dyn Repository<T>>>())
            .map(Arc::clone)
            .ok_or(RepositoryNotFoundError(T::NAME))
    }

    /// Retrieves the repository for `T`, registering the one built by `init` if none exists yet.
    ///
    /// The check and the insertion happen under the same write lock, so concurrent callers
    /// always observe a single repository.
    pub fn get_or_register_with<T, F>(&self, init: F) -> Arc<dyn Repository<T>>
    where
        T: RepositoryItem,
        F: FnOnce() -> Arc<dyn Repository<T>>,
    {
        let mut repositories = self
            .repositories
            .write()
            .expect("RwLock should not be poisoned");

        if let Some(existing) = repositories
            .get(&<T as RepositoryItem>::type_id())
            .and_then(|boxed| boxed.downcast_ref::<Arc<dyn Repository<T>>>())
        {
            return Arc::clone(existing);
        }

        tracing::debug!(item = T::NAME, "Registering fallback repository");
        let repository = init();
        repositories.insert(
            <T as RepositoryItem>::type_id(),
            Box::new(Arc::clone(&repository)),
        );
        repository
    }
}
