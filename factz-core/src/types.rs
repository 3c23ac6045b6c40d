//! Core type definitions for the FACTZ cell system.
//!
//! All types are serializable and cheap to copy.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Wall-clock timestamp at one-second resolution (seconds since the Unix
/// epoch).
///
/// The zero value is the [`Timestamp::NEVER`] sentinel: a cell whose last
/// check time is `NEVER` has not been computed yet. Recompute and
/// change-detection cadences built on this type are subject to up to ~1
/// second of jitter, which is an accepted approximation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Sentinel for "never computed".
    pub const NEVER: Self = Self(0);

    /// Whether this is the never-computed sentinel.
    #[must_use]
    pub fn is_never(self) -> bool {
        self.0 == 0
    }

    /// Whole seconds elapsed since `earlier`.
    ///
    /// Saturates to zero if `earlier` is in the future (clock skew guard).
    #[must_use]
    pub fn seconds_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Opaque reference to a live entity (NPC, player, creature) in the game
/// world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a spawned entity as a (template, instance) pair.
///
/// The template identifies the static definition the spawn came from; the
/// instance distinguishes individual spawns of the same template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnRef {
    /// Static template id.
    pub template: u32,
    /// Spawn instance id.
    pub instance: u64,
}

impl fmt::Display for SpawnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.template, self.instance)
    }
}
