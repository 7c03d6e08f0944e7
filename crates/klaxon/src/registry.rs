//! Concurrency-safe storage of registered definitions.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use thiserror::Error;

use crate::definition::Definition;

/// Error returned when a definition cannot be registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The definition's key is empty.
    #[error("definition key must not be empty")]
    EmptyKey,

    /// The definition's code is empty.
    #[error("definition `{key}` has an empty code")]
    EmptyCode {
        /// Key of the rejected definition.
        key: String,
    },

    /// A definition with the same key is already registered.
    #[error("definition `{key}` is already registered")]
    DuplicateKey {
        /// Key of the rejected definition.
        key: String,
    },
}

/// A concurrency-safe store of [`Definition`]s keyed by their identifier.
///
/// The registry is the single source of truth for localization and
/// formatting lookups. It is built once at startup, typically by the
/// generated `register_all` routine, and then serves concurrent readers for
/// the life of the process. Registration never overwrites: a duplicate key
/// is rejected and the first definition stays in place.
///
/// # Example
///
/// ```
/// use klaxon::{Definition, Registry};
///
/// let registry = Registry::new();
/// registry
///     .register(Definition::new("NotFound", "E404").with_message("en", "Not Found"))
///     .unwrap();
///
/// let def = registry.get("NotFound").unwrap();
/// assert_eq!(def.code(), "E404");
/// assert_eq!(def.category(), "general");
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    inner: RwLock<HashMap<String, Arc<Definition>>>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition.
    ///
    /// An empty category defaults to `"general"` before the definition is
    /// stored. Fails without touching the store when the key or code is
    /// empty or the key is already registered.
    pub fn register(&self, mut def: Definition) -> Result<(), RegistryError> {
        if def.key().is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        if def.code().is_empty() {
            return Err(RegistryError::EmptyCode {
                key: def.key().to_string(),
            });
        }
        def.fill_defaults();

        let mut inner = self.write();
        if inner.contains_key(def.key()) {
            return Err(RegistryError::DuplicateKey {
                key: def.key().to_string(),
            });
        }
        debug!(key = def.key(), code = def.code(); "Registered definition");
        inner.insert(def.key().to_string(), Arc::new(def));
        Ok(())
    }

    /// Looks up a definition by key.
    pub fn get(&self, key: &str) -> Option<Arc<Definition>> {
        self.read().get(key).cloned()
    }

    /// Returns every registered definition, sorted by key.
    ///
    /// The result is a snapshot; mutating it never affects the store.
    pub fn list(&self) -> Vec<Arc<Definition>> {
        let mut defs: Vec<_> = self.read().values().cloned().collect();
        defs.sort_by(|a, b| a.key().cmp(b.key()));
        defs
    }

    /// Removes a definition, returning whether one existed.
    pub fn remove(&self, key: &str) -> bool {
        let removed = self.write().remove(key).is_some();
        if removed {
            debug!(key = key; "Removed definition");
        }
        removed
    }

    /// Empties the store.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` when no definitions are registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A poisoned lock means a writer panicked mid-update; the store has no
    // consistent state left to offer.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Definition>>> {
        self.inner.read().expect("registry lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Definition>>> {
        self.inner.write().expect("registry lock poisoned")
    }
}
