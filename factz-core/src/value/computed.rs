//! Computed cells — derived facts with a time-windowed recompute cache.

use crate::clock::{Clock, SharedClock, SystemClock};
use crate::codec::ValueCodec;
use crate::config::CellConfig;
use crate::context::{AgentContext, SharedContext};
use crate::policy::RecomputeWindow;
use crate::types::Timestamp;
use crate::value::{NamedCell, UntypedValue, Value};
use std::sync::Arc;

/// A derived fact recomputed at most every `check_interval` seconds.
///
/// The derivation is the `calculate` closure supplied at construction: a
/// pure, bounded-time function of whatever world state it captures. `get`
/// runs it only when the recompute window says the cached value is stale;
/// interval values of 0 or 1 disable caching so every `get` recomputes.
///
/// Cells are single-owner and tick-driven; every mutating operation takes
/// `&mut self` and nothing here locks.
pub struct ComputedValue<T> {
    cell: NamedCell,
    clock: SharedClock,
    window: RecomputeWindow,
    value: T,
    calculate: Box<dyn FnMut() -> T>,
}

impl<T: Clone + Default> ComputedValue<T> {
    /// New computed cell with the default one-second interval (uncached).
    #[must_use]
    pub fn new(
        owner: SharedContext,
        name: impl Into<String>,
        calculate: impl FnMut() -> T + 'static,
    ) -> Self {
        Self {
            cell: NamedCell::new(owner, name),
            clock: Arc::new(SystemClock),
            window: RecomputeWindow::new(CellConfig::default().check_interval),
            value: T::default(),
            calculate: Box::new(calculate),
        }
    }

    /// Set the recompute interval in seconds.
    #[must_use]
    pub fn with_check_interval(mut self, seconds: u32) -> Self {
        self.window = RecomputeWindow::new(seconds);
        self
    }

    /// Pick the interval up from configuration.
    #[must_use]
    pub fn with_config(self, config: &CellConfig) -> Self {
        self.with_check_interval(config.check_interval)
    }

    /// Replace the time source (deterministic clocks for tests/replays).
    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// The cell's stable identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        self.cell.name()
    }

    /// Whether this cell has never run its derivation.
    #[must_use]
    pub fn never_computed(&self) -> bool {
        self.window.never_checked()
    }

    /// Borrow the cached value without any side effects.
    #[must_use]
    pub fn peek(&self) -> &T {
        &self.value
    }

    /// Current value, recomputing first when the window says it is due.
    pub fn get(&mut self) -> T {
        let now = self.clock.now();
        if self.window.is_due(now) {
            self.recompute(now);
        }
        self.value.clone()
    }

    /// Cached value; only a first-ever access forces a computation.
    pub fn lazy_get(&mut self) -> T {
        if self.window.never_checked() {
            return self.get();
        }
        self.value.clone()
    }

    /// Unconditionally overwrite the cached value. No timer interaction.
    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Forget the last check time; the next `get` recomputes.
    pub fn reset(&mut self) {
        self.window.reset();
    }

    pub(crate) fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Run the derivation under an instrumentation span and cache the
    /// result. The span closes on every exit path via its guard.
    pub(crate) fn recompute(&mut self, now: Timestamp) {
        self.window.mark_checked(now);
        let _span = self.cell.probe_span();
        self.value = (self.calculate)();
        tracing::trace!(
            target: "factz::value",
            cell = self.cell.name(),
            scope = self.cell.owner().scope(),
            "recomputed"
        );
    }
}

impl<T: Clone + Default> Value<T> for ComputedValue<T> {
    fn get(&mut self) -> T {
        Self::get(self)
    }

    fn lazy_get(&mut self) -> T {
        Self::lazy_get(self)
    }

    fn set(&mut self, value: T) {
        Self::set(self, value);
    }

    fn reset(&mut self) {
        Self::reset(self);
    }
}

impl<T: Clone + Default + ValueCodec> UntypedValue for ComputedValue<T> {
    fn name(&self) -> &str {
        self.cell.name()
    }

    fn reset(&mut self) {
        Self::reset(self);
    }

    fn format(&self) -> String {
        self.value.format()
    }
}

// ---------------------------------------------------------------------------
// Compute-once cells
// ---------------------------------------------------------------------------

/// A derived fact computed exactly once and cached forever.
///
/// Elapsed time never re-triggers the derivation; only [`OnceValue::reset`]
/// re-arms exactly one more computation. The recompute interval of the
/// underlying machinery is ignored.
pub struct OnceValue<T> {
    inner: ComputedValue<T>,
}

impl<T: Clone + Default> OnceValue<T> {
    /// New compute-once cell.
    #[must_use]
    pub fn new(
        owner: SharedContext,
        name: impl Into<String>,
        calculate: impl FnMut() -> T + 'static,
    ) -> Self {
        Self {
            inner: ComputedValue::new(owner, name, calculate),
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.inner = self.inner.with_clock(clock);
        self
    }

    /// The cell's stable identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Borrow the cached value without any side effects.
    #[must_use]
    pub fn peek(&self) -> &T {
        self.inner.peek()
    }

    /// Current value; computes on first-ever access only.
    pub fn get(&mut self) -> T {
        if self.inner.never_computed() {
            let now = self.inner.clock().now();
            self.inner.recompute(now);
        }
        self.inner.peek().clone()
    }

    /// Identical to `get` for this variant: the only forced computation is
    /// the first one.
    pub fn lazy_get(&mut self) -> T {
        self.get()
    }

    /// Unconditionally overwrite the cached value.
    pub fn set(&mut self, value: T) {
        self.inner.set(value);
    }

    /// Re-arm the cell; the next `get` computes exactly once more.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl<T: Clone + Default> Value<T> for OnceValue<T> {
    fn get(&mut self) -> T {
        Self::get(self)
    }

    fn lazy_get(&mut self) -> T {
        Self::lazy_get(self)
    }

    fn set(&mut self, value: T) {
        Self::set(self, value);
    }

    fn reset(&mut self) {
        Self::reset(self);
    }
}

impl<T: Clone + Default + ValueCodec> UntypedValue for OnceValue<T> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn reset(&mut self) {
        Self::reset(self);
    }

    fn format(&self) -> String {
        self.inner.peek().format()
    }
}
