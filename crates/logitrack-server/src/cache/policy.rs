//! Expiration policies for cache entries.

use std::time::Duration;

use crate::cache::keys::KeyClass;

/// Two independent expiration clocks for one entry.
///
/// `absolute_ttl` runs from the moment the entry is written and is never
/// extended. `sliding` resets on every successful read. When both are set
/// the absolute deadline is a hard upper bound on the sliding extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpirationPolicy {
    /// Lifetime from creation.
    pub absolute_ttl: Option<Duration>,
    /// Idle window reset on each read.
    pub sliding: Option<Duration>,
}

impl ExpirationPolicy {
    /// Creates a policy from both clocks.
    pub const fn new(absolute_ttl: Option<Duration>, sliding: Option<Duration>) -> Self {
        Self {
            absolute_ttl,
            sliding,
        }
    }

    /// A policy that never expires.
    pub const fn persistent() -> Self {
        Self::new(None, None)
    }

    /// Only a sliding window.
    pub const fn sliding(window: Duration) -> Self {
        Self::new(None, Some(window))
    }

    /// Only an absolute lifetime.
    pub const fn absolute(ttl: Duration) -> Self {
        Self::new(Some(ttl), None)
    }

    /// Adds an absolute cap to this policy.
    pub const fn with_absolute(mut self, ttl: Duration) -> Self {
        self.absolute_ttl = Some(ttl);
        self
    }

    /// Returns true if neither clock is set.
    pub fn is_persistent(&self) -> bool {
        self.absolute_ttl.is_none() && self.sliding.is_none()
    }

    /// Time to live of a freshly written entry.
    pub fn ttl_on_write(&self) -> Option<Duration> {
        match (self.absolute_ttl, self.sliding) {
            (None, None) => None,
            (Some(ttl), None) => Some(ttl),
            (None, Some(window)) => Some(window),
            (Some(ttl), Some(window)) => Some(ttl.min(window)),
        }
    }

    /// Time to live after a read, given the entry's age since it was written.
    ///
    /// Reads extend the sliding window but never past the absolute deadline.
    /// Without a sliding window a read does not change the deadline.
    pub fn ttl_after_read(&self, age: Duration) -> Option<Duration> {
        let remaining = self.absolute_ttl.map(|ttl| ttl.saturating_sub(age));
        match (remaining, self.sliding) {
            (None, None) => None,
            (Some(remaining), None) => Some(remaining),
            (None, Some(window)) => Some(window),
            (Some(remaining), Some(window)) => Some(remaining.min(window)),
        }
    }
}

/// Policy per key class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicies {
    /// Whole-collection keys.
    pub collection: ExpirationPolicy,
    /// Single-entity keys and link sets.
    pub entity: ExpirationPolicy,
    /// Search results.
    pub query: ExpirationPolicy,
}

impl CachePolicies {
    /// Returns the policy for a key class.
    pub fn for_class(&self, class: KeyClass) -> ExpirationPolicy {
        match class {
            KeyClass::Collection => self.collection,
            KeyClass::Entity => self.entity,
            KeyClass::Query => self.query,
        }
    }
}

impl Default for CachePolicies {
    fn default() -> Self {
        // Colecciones: ventana corta. Entidades y busquedas se invalidan
        // explicitamente, asi que toleran ventanas largas.
        let long = ExpirationPolicy::sliding(Duration::from_secs(600))
            .with_absolute(Duration::from_secs(1800));
        Self {
            collection: ExpirationPolicy::sliding(Duration::from_secs(60))
                .with_absolute(Duration::from_secs(300)),
            entity: long,
            query: long,
        }
    }
}
