//! The cell variants and their uniform surfaces.
//!
//! Every derived fact an agent tracks lives in one of four temporal
//! variants plus the manually-set kind:
//!
//! - [`ComputedValue`] — time-windowed recompute cache
//! - [`OnceValue`] — computes exactly once, caches forever
//! - [`TrackedValue`] — adds change-detection hysteresis
//! - [`HistoryValue`] — adds a bounded change log
//! - [`ManualValue`] — externally pushed, never computed
//!
//! All of them implement [`Value<T>`] for typed access and, when the value
//! kind has a [`ValueCodec`](crate::codec::ValueCodec), the object-safe
//! [`UntypedValue`] so a registry can enumerate, format, and persist mixed
//! cells through one interface.

pub mod computed;
pub mod history;
pub mod manual;
pub mod tracked;

pub use computed::{ComputedValue, OnceValue};
pub use history::HistoryValue;
pub use manual::ManualValue;
pub use tracked::TrackedValue;

use crate::codec::PLACEHOLDER;
use crate::context::{AgentContext, SharedContext};
use crate::error::{FactzError, Result};
use crate::probe::{ProbeCategory, ProbeSpan};

// ---------------------------------------------------------------------------
// Uniform surfaces
// ---------------------------------------------------------------------------

/// The untyped, enumerable surface of a cell.
///
/// A higher-level engine iterates `Box<dyn UntypedValue>` collections to
/// drive lifecycle hooks and to render or persist cells without knowing
/// their value kinds. Every hook has a safe default so the scheduler may
/// call any of them unconditionally.
pub trait UntypedValue {
    /// Stable identifier of this cell within its owning agent.
    fn name(&self) -> &str;

    /// Per-tick side-effect hook; a no-op for every current variant.
    fn update(&mut self) {}

    /// Clear temporal/change bookkeeping, as defined per variant.
    fn reset(&mut self) {}

    /// Human-readable rendering of the cached value.
    fn format(&self) -> String {
        PLACEHOLDER.to_string()
    }

    /// Persistence rendering of the cached value.
    fn save(&self) -> String {
        PLACEHOLDER.to_string()
    }

    /// Restore the cell from a previously saved rendering.
    ///
    /// # Errors
    /// Fails for cell kinds without a load encoding and for malformed
    /// payloads; the cell's value is untouched on failure.
    fn load(&mut self, _raw: &str) -> Result<()> {
        Err(FactzError::LoadUnsupported(self.name().to_string()))
    }
}

/// The typed surface of a cell over value kind `T`.
///
/// `get` may recompute as a side effect; `lazy_get` never forces a fresh
/// recompute except on first-ever access; no operation can fail — `T` is
/// total and clonable.
pub trait Value<T: Clone> {
    /// Current value, recomputing first if the variant's policy says so.
    fn get(&mut self) -> T;

    /// Cached value without forcing a fresh recompute.
    fn lazy_get(&mut self) -> T;

    /// Overwrite the cached value.
    fn set(&mut self, value: T);

    /// Clear temporal bookkeeping so the next `get` is first-ever.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Named cell core
// ---------------------------------------------------------------------------

/// The name-and-owner record every variant embeds.
pub struct NamedCell {
    name: String,
    owner: SharedContext,
}

impl NamedCell {
    /// New cell core owned by `owner`.
    #[must_use]
    pub fn new(owner: SharedContext, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner,
        }
    }

    /// The cell's stable identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning context.
    #[must_use]
    pub fn owner(&self) -> &SharedContext {
        &self.owner
    }

    /// Open an instrumentation span for this cell's computation.
    ///
    /// Returns `None` when the owner runs without a probe; the computation
    /// proceeds unmeasured.
    pub(crate) fn probe_span(&self) -> Option<ProbeSpan> {
        self.owner
            .probe()
            .map(|probe| probe.start(ProbeCategory::Value, &self.name))
    }
}

impl std::fmt::Debug for NamedCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedCell")
            .field("name", &self.name)
            .field("scope", &self.owner.scope())
            .finish()
    }
}
