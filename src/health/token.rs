//! Opaque health tokens.

use serde::Serialize;
use uuid::Uuid;

/// Identifies one component in the health registry.
///
/// Carries no meaning beyond uniqueness; generated once per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HealthToken(Uuid);

impl HealthToken {
    /// Generate a fresh random token.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HealthToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HealthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        assert_ne!(HealthToken::new(), HealthToken::new());
    }
}
