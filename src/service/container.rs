//! Keyed registry of shared services.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

type SharedService = Arc<dyn Any + Send + Sync>;

/// Error type for container lookups and registration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("no service registered for key `{key}`")]
    Missing { key: String },

    #[error("service `{key}` is not of type `{expected}`")]
    TypeMismatch { key: String, expected: &'static str },

    #[error("a service is already registered for key `{key}`")]
    Duplicate { key: String },
}

/// A failed injection of one field of an initializer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to inject field `{field}`: {source}")]
pub struct InjectionError {
    pub field: &'static str,
    #[source]
    pub source: ServiceError,
}

/// Services shared between the host process and the components it runs.
#[derive(Default)]
pub struct ServiceContainer {
    services: RwLock<HashMap<String, SharedService>>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service` under `key`. Keys are never overwritten.
    pub fn set<T>(&self, key: impl Into<String>, service: T) -> Result<(), ServiceError>
    where
        T: Any + Send + Sync,
    {
        self.set_shared(key, Arc::new(service))
    }

    /// Register an already shared service under `key`.
    pub fn set_shared<T>(&self, key: impl Into<String>, service: Arc<T>) -> Result<(), ServiceError>
    where
        T: Any + Send + Sync,
    {
        let key = key.into();
        let mut services = self.services.write();
        if services.contains_key(&key) {
            return Err(ServiceError::Duplicate { key });
        }

        tracing::debug!(key = %key, ty = type_name::<T>(), "Service registered");
        services.insert(key, service);
        Ok(())
    }

    /// Fetch the service registered under `key` as a `T`.
    pub fn get<T>(&self, key: &str) -> Result<Arc<T>, ServiceError>
    where
        T: Any + Send + Sync,
    {
        let service = self
            .services
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::Missing {
                key: key.to_string(),
            })?;

        service
            .downcast::<T>()
            .map_err(|_| ServiceError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Fetch the service for `field`, attributing any failure to that field.
    pub fn inject<T>(&self, field: &'static str, key: &str) -> Result<Arc<T>, InjectionError>
    where
        T: Any + Send + Sync,
    {
        self.get(key).map_err(|source| InjectionError { field, source })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.services.read().contains_key(key)
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let services = self.services.read();
        let mut keys: Vec<&String> = services.keys().collect();
        keys.sort();
        f.debug_struct("ServiceContainer").field("keys", &keys).finish()
    }
}
