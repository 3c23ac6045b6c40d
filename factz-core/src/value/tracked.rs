//! Tracked cells — computed cells with change-detection hysteresis.

use crate::clock::{Clock, SharedClock};
use crate::codec::ValueCodec;
use crate::config::CellConfig;
use crate::context::SharedContext;
use crate::policy::ChangeGate;
use crate::types::Timestamp;
use crate::value::computed::ComputedValue;
use crate::value::{UntypedValue, Value};

/// A computed cell that also recognizes when its value *changed*.
///
/// A change is recognized only when both hold: at least
/// `min_change_interval` seconds have passed since the previously recognized
/// change, and the current value differs from the recorded one under the
/// cell's equality capability (`PartialEq` by default,
/// [`with_equality`](TrackedValue::with_equality) for semantic comparisons
/// such as tolerance checks on floats). Brief flickers inside the interval
/// are absorbed rather than reacted to.
pub struct TrackedValue<T> {
    base: ComputedValue<T>,
    gate: ChangeGate,
    last_value: T,
    equal_to_last: Box<dyn Fn(&T, &T) -> bool>,
}

impl<T: Clone + Default + PartialEq + 'static> TrackedValue<T> {
    /// New tracked cell with `PartialEq` change comparison and a zero
    /// minimum change interval.
    #[must_use]
    pub fn new(
        owner: SharedContext,
        name: impl Into<String>,
        calculate: impl FnMut() -> T + 'static,
    ) -> Self {
        let base = ComputedValue::new(owner, name, calculate);
        let now = base.clock().now();
        Self {
            base,
            gate: ChangeGate::new(CellConfig::default().min_change_interval, now),
            last_value: T::default(),
            equal_to_last: Box::new(|candidate, last| candidate == last),
        }
    }
}

impl<T: Clone + Default> TrackedValue<T> {
    /// Replace the equality capability used against the recorded value.
    #[must_use]
    pub fn with_equality(mut self, equal: impl Fn(&T, &T) -> bool + 'static) -> Self {
        self.equal_to_last = Box::new(equal);
        self
    }

    /// Set the recompute interval in seconds.
    #[must_use]
    pub fn with_check_interval(mut self, seconds: u32) -> Self {
        self.base = self.base.with_check_interval(seconds);
        self
    }

    /// Set the minimum seconds between recognized changes.
    #[must_use]
    pub fn with_min_change_interval(mut self, seconds: u32) -> Self {
        let now = self.base.clock().now();
        self.gate = ChangeGate::new(seconds, now);
        self
    }

    /// Pick both intervals up from configuration.
    #[must_use]
    pub fn with_config(self, config: &CellConfig) -> Self {
        self.with_check_interval(config.check_interval)
            .with_min_change_interval(config.min_change_interval)
    }

    /// Replace the time source. The gate restarts at the new clock's
    /// current instant, as if freshly constructed.
    #[must_use]
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.base = self.base.with_clock(clock);
        self.gate.reset(self.base.clock().now());
        self
    }

    /// The cell's stable identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        self.base.name()
    }

    /// Borrow the cached value without any side effects.
    #[must_use]
    pub fn peek(&self) -> &T {
        self.base.peek()
    }

    /// Whether no new change should be recognized at `now`: the gate still
    /// throttles, or the current value equals the recorded one.
    #[must_use]
    pub fn can_skip_change(&self, now: Timestamp) -> bool {
        self.gate.is_throttled(now) || (self.equal_to_last)(self.base.peek(), &self.last_value)
    }

    /// Run change detection against the cached value.
    ///
    /// Returns `true` when a change was recognized just now (the gate and
    /// the recorded value advance), `false` when nothing was recognized.
    pub fn update_change(&mut self) -> bool {
        let now = self.base.clock().now();
        if self.can_skip_change(now) {
            return false;
        }
        self.gate.mark_changed(now);
        self.last_value = self.base.peek().clone();
        true
    }

    /// Current value via the windowed recompute, followed by change
    /// detection (its verdict is not surfaced here).
    pub fn get(&mut self) -> T {
        let value = self.refresh();
        self.update_change();
        value
    }

    /// Cached value, unconditionally.
    ///
    /// Unlike plain computed cells, a tracked cell's `lazy_get` never forces
    /// even the first computation: before any `get` it reports the default
    /// value. Consumers that need a guaranteed-fresh first read go through
    /// `get`.
    pub fn lazy_get(&mut self) -> T {
        self.base.peek().clone()
    }

    /// Re-store the cached value and run change detection.
    ///
    /// The `value` argument is deliberately discarded: a tracked cell only
    /// accepts new values from its own derivation, and `set` exists solely
    /// to poke change detection. Long-standing behavior that event-driven
    /// consumers depend on; see DESIGN.md before "fixing" it.
    pub fn set(&mut self, _value: T) {
        self.reassert_cached();
        self.update_change();
    }

    /// Timestamp of the most recently recognized change, after refreshing
    /// the value and re-running change detection.
    pub fn last_change_on(&mut self) -> Timestamp {
        self.get();
        self.update_change();
        self.gate.last_change()
    }

    /// Seconds since the most recently recognized change.
    pub fn last_change_delay(&mut self) -> u64 {
        let at = self.last_change_on();
        self.clock().now().seconds_since(at)
    }

    /// Clear the recompute window and restart the change gate at now.
    pub fn reset(&mut self) {
        self.base.reset();
        let now = self.base.clock().now();
        self.gate.reset(now);
    }

    /// Windowed recompute only, no change detection. Variants layering
    /// their own `update_change` on top call this.
    pub(crate) fn refresh(&mut self) -> T {
        self.base.get()
    }

    /// The argument-free half of `set`: overwrite the cache with itself.
    pub(crate) fn reassert_cached(&mut self) {
        let current = self.base.peek().clone();
        self.base.set(current);
    }

    pub(crate) fn clock(&self) -> &SharedClock {
        self.base.clock()
    }

    pub(crate) fn recorded_change_at(&self) -> Timestamp {
        self.gate.last_change()
    }
}

impl<T: Clone + Default> Value<T> for TrackedValue<T> {
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

impl<T: Clone + Default + ValueCodec> UntypedValue for TrackedValue<T> {
    fn name(&self) -> &str {
        self.base.name()
    }

    fn reset(&mut self) {
        Self::reset(self);
    }

    fn format(&self) -> String {
        self.base.peek().format()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::context::BasicContext;
    use std::cell::Cell;
    use std::rc::Rc;

    fn tracked_counter(
        min_change_interval: u32,
    ) -> (Rc<Cell<u32>>, std::sync::Arc<ManualClock>, TrackedValue<u32>) {
        let source = Rc::new(Cell::new(0_u32));
        let feed = Rc::clone(&source);
        let clock = ManualClock::shared();
        let value = TrackedValue::new(BasicContext::new("npc").shared(), "threat", move || {
            feed.get()
        })
        .with_clock(clock.clone())
        .with_min_change_interval(min_change_interval);
        (source, clock, value)
    }

    #[test]
    fn equal_values_are_never_a_change() {
        let (_source, clock, mut threat) = tracked_counter(0);
        threat.get();
        clock.advance(30);
        threat.get();
        // The source never moved off the recorded value; nothing to recognize.
        assert!(!threat.update_change());
    }

    #[test]
    fn set_discards_its_argument() {
        let (source, clock, mut threat) = tracked_counter(0);
        source.set(4);
        assert_eq!(threat.get(), 4);
        clock.advance(1);
        threat.set(999);
        // The cached value is untouched by the argument.
        assert_eq!(threat.lazy_get(), 4);
    }

    #[test]
    fn lazy_get_before_first_get_is_the_default() {
        let (source, _clock, mut threat) = tracked_counter(0);
        source.set(9);
        assert_eq!(threat.lazy_get(), 0);
        assert_eq!(threat.get(), 9);
        assert_eq!(threat.lazy_get(), 9);
    }

    #[test]
    fn custom_equality_absorbs_small_drift() {
        let level = Rc::new(Cell::new(0.50_f32));
        let feed = Rc::clone(&level);
        let clock = ManualClock::shared();
        let mut mana = TrackedValue::new(BasicContext::new("npc").shared(), "mana", move || {
            feed.get()
        })
        .with_clock(clock.clone())
        .with_equality(|candidate, last| (candidate - last).abs() < 0.05);

        mana.get();
        clock.advance(10);
        level.set(0.52); // within tolerance
        mana.get();
        assert!(!mana.update_change());

        clock.advance(10);
        level.set(0.90);
        mana.get();
        assert_eq!(mana.lazy_get(), 0.90);
    }
}
