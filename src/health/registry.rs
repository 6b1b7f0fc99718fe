//! Health registry.
//!
//! # Responsibilities
//! - Hand out one status handle per registered token
//! - Answer "is the whole process ready?"
//! - Produce a serializable snapshot for probes
//!
//! # Design Decisions
//! - Tokens are never unregistered
//! - Lock-free reads via DashMap, since probes may poll frequently

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;

use crate::health::state::ComponentStatus;
use crate::health::token::HealthToken;

/// Error type for registry operations.
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("health token {0} is already registered")]
    AlreadyRegistered(HealthToken),
}

/// Keyed store of component health statuses.
#[derive(Debug, Default)]
pub struct Health {
    components: DashMap<HealthToken, Arc<ComponentStatus>>,
}

impl Health {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `token`. The returned handle starts unhealthy.
    pub fn register(&self, token: HealthToken) -> Result<Arc<ComponentStatus>, HealthError> {
        match self.components.entry(token) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(HealthError::AlreadyRegistered(token)),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let status = Arc::new(ComponentStatus::new(token));
                slot.insert(Arc::clone(&status));
                tracing::debug!(token = %token, "Health token registered");
                Ok(status)
            }
        }
    }

    /// Look up the status handle for `token`.
    pub fn get(&self, token: &HealthToken) -> Option<Arc<ComponentStatus>> {
        self.components.get(token).map(|entry| Arc::clone(entry.value()))
    }

    /// True when at least one component is registered and all of them are healthy.
    pub fn is_healthy(&self) -> bool {
        !self.components.is_empty() && self.components.iter().all(|entry| entry.is_healthy())
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Snapshot of every component's status.
    pub fn report(&self) -> HealthReport {
        let mut components: Vec<ComponentReport> = self
            .components
            .iter()
            .map(|entry| ComponentReport {
                token: *entry.key(),
                healthy: entry.is_healthy(),
            })
            .collect();
        components.sort_by_key(|c| *c.token.as_uuid());

        HealthReport {
            healthy: self.is_healthy(),
            components,
        }
    }
}

/// Serializable registry snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub components: Vec<ComponentReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentReport {
    pub token: HealthToken,
    pub healthy: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_is_not_healthy() {
        let health = Health::new();
        assert!(health.is_empty());
        assert!(!health.is_healthy());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let health = Health::new();
        let token = HealthToken::new();

        health.register(token).unwrap();
        assert!(matches!(
            health.register(token),
            Err(HealthError::AlreadyRegistered(t)) if t == token
        ));
    }

    #[test]
    fn healthy_only_when_every_component_is() {
        let health = Health::new();
        let a = health.register(HealthToken::new()).unwrap();
        let b = health.register(HealthToken::new()).unwrap();

        a.update(true);
        assert!(!health.is_healthy());

        b.update(true);
        assert!(health.is_healthy());

        let report = health.report();
        assert!(report.healthy);
        assert_eq!(report.components.len(), 2);
    }

    #[test]
    fn get_returns_shared_handle() {
        let health = Health::new();
        let token = HealthToken::new();
        let status = health.register(token).unwrap();

        status.update(true);
        let fetched = health.get(&token).unwrap();
        assert_eq!(fetched.token(), token);
        assert!(fetched.is_healthy());
        assert!(health.get(&HealthToken::new()).is_none());
        assert_eq!(health.len(), 1);
    }
}
