//! Per-component health status.
//!
//! # States
//! - Unhealthy: registered, not (or no longer) serving
//! - Healthy: serving traffic
//!
//! # State Transitions
//! ```text
//! register → Unhealthy
//! Unhealthy → Healthy: component is about to accept traffic
//! Healthy → Unhealthy: component stopped serving
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use crate::health::token::HealthToken;

/// Status handle returned by [`Health::register`](crate::health::Health::register).
#[derive(Debug)]
pub struct ComponentStatus {
    token: HealthToken,
    healthy: AtomicBool,
}

impl ComponentStatus {
    pub(crate) fn new(token: HealthToken) -> Self {
        Self {
            token,
            healthy: AtomicBool::new(false),
        }
    }

    /// Report the component healthy or unhealthy.
    pub fn update(&self, healthy: bool) {
        let previous = self.healthy.swap(healthy, Ordering::SeqCst);
        if previous != healthy {
            tracing::debug!(token = %self.token, healthy, "Health status changed");
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    pub fn token(&self) -> HealthToken {
        self.token
    }
}
