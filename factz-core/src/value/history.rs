//! History cells — tracked cells that retain a bounded change log.

use crate::clock::{Clock, SharedClock};
use crate::codec::ValueCodec;
use crate::config::CellConfig;
use crate::context::SharedContext;
use crate::policy::ChangeLog;
use crate::types::Timestamp;
use crate::value::tracked::TrackedValue;
use crate::value::{UntypedValue, Value};

/// A tracked cell that additionally keeps the last `capacity`
/// `(value, timestamp)` entries for trend-based reasoning.
///
/// The append contract is inverted relative to what one might expect, and
/// is preserved deliberately: an entry is appended precisely when the
/// underlying change detector reports **no** new change (and
/// `update_change` then returns `true`); when a change *is* recognized,
/// nothing is appended and `update_change` returns `false`. One consequence
/// is that every stable read appends a sample. Consumers were built against
/// this contract; see DESIGN.md before "fixing" it.
pub struct HistoryValue<T> {
    inner: TrackedValue<T>,
    log: ChangeLog<T>,
}

impl<T: Clone + Default + PartialEq + 'static> HistoryValue<T> {
    /// New history cell with the default capacity of 10 entries.
    #[must_use]
    pub fn new(
        owner: SharedContext,
        name: impl Into<String>,
        calculate: impl FnMut() -> T + 'static,
    ) -> Self {
        Self {
            inner: TrackedValue::new(owner, name, calculate),
            log: ChangeLog::new(CellConfig::default().log_length),
        }
    }
}

impl<T: Clone + Default> HistoryValue<T> {
    /// Replace the equality capability of the underlying tracked cell.
    #[must_use]
    pub fn with_equality(mut self, equal: impl Fn(&T, &T) -> bool + 'static) -> Self {
        self.inner = self.inner.with_equality(equal);
        self
    }

    /// Set the recompute interval in seconds.
    #[must_use]
    pub fn with_check_interval(mut self, seconds: u32) -> Self {
        self.inner = self.inner.with_check_interval(seconds);
        self
    }

    /// Set the minimum seconds between recognized changes.
    #[must_use]
    pub fn with_min_change_interval(mut self, seconds: u32) -> Self {
        self.inner = self.inner.with_min_change_interval(seconds);
        self
    }

    /// Set the log capacity.
    #[must_use]
    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log = ChangeLog::new(capacity);
        self
    }

    /// Pick intervals and log capacity up from configuration.
    #[must_use]
    pub fn with_config(self, config: &CellConfig) -> Self {
        self.with_check_interval(config.check_interval)
            .with_min_change_interval(config.min_change_interval)
            .with_log_capacity(config.log_length)
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

    /// Change detection plus logging.
    ///
    /// A freshly recognized change returns `false` with nothing appended;
    /// a no-change verdict appends `(value, now)`, evicting the oldest
    /// entry if the log is over capacity, and returns `true`.
    pub fn update_change(&mut self) -> bool {
        if self.inner.update_change() {
            return false;
        }
        let now = self.inner.clock().now();
        self.log.record(self.inner.peek().clone(), now);
        true
    }

    /// Current value via the windowed recompute, then this variant's
    /// change-detection-plus-logging pass.
    pub fn get(&mut self) -> T {
        let value = self.inner.refresh();
        self.update_change();
        value
    }

    /// Cached value, unconditionally (tracked-cell lazy semantics).
    pub fn lazy_get(&mut self) -> T {
        self.inner.lazy_get()
    }

    /// Argument-discarding `set` (tracked-cell semantics), routed through
    /// this variant's change detection.
    pub fn set(&mut self, _value: T) {
        self.inner.reassert_cached();
        self.update_change();
    }

    /// Timestamp of the most recently recognized change, refreshing first.
    pub fn last_change_on(&mut self) -> Timestamp {
        self.get();
        self.update_change();
        self.inner.recorded_change_at()
    }

    /// Seconds since the most recently recognized change.
    pub fn last_change_delay(&mut self) -> u64 {
        let at = self.last_change_on();
        self.inner.clock().now().seconds_since(at)
    }

    /// Snapshot of the retained `(value, timestamp)` entries, oldest first.
    #[must_use]
    pub fn value_log(&self) -> Vec<(T, Timestamp)> {
        self.log.snapshot()
    }

    /// Clear temporal state and empty the log.
    pub fn reset(&mut self) {
        self.inner.reset();
        self.log.clear();
    }
}

impl<T: Clone + Default> Value<T> for HistoryValue<T> {
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

impl<T: Clone + Default + ValueCodec> UntypedValue for HistoryValue<T> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::context::BasicContext;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn recognized_change_appends_nothing() {
        let source = Rc::new(Cell::new(0_u32));
        let feed = Rc::clone(&source);
        let clock = ManualClock::shared();
        let mut enemies = HistoryValue::new(BasicContext::new("npc").shared(), "enemy count", move || {
            feed.get()
        })
        .with_clock(clock.clone());

        source.set(3);
        enemies.get(); // change recognized: 0 -> 3
        assert!(enemies.value_log().is_empty());

        clock.advance(1);
        enemies.get(); // stable read: appended
        assert_eq!(enemies.value_log().len(), 1);
        assert_eq!(enemies.value_log()[0].0, 3);
    }

    #[test]
    fn reset_empties_the_log() {
        let clock = ManualClock::shared();
        let mut cell = HistoryValue::new(BasicContext::new("npc").shared(), "count", || 5_u32)
            .with_clock(clock.clone());
        cell.get();
        clock.advance(1);
        cell.get();
        assert!(!cell.value_log().is_empty());
        cell.reset();
        assert!(cell.value_log().is_empty());
    }
}
