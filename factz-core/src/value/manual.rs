//! Manual cells — externally-pushed facts with reset-to-default semantics.

use crate::codec::ValueCodec;
use crate::context::SharedContext;
use crate::error::Result;
use crate::value::{NamedCell, UntypedValue, Value};

/// A fact pushed into the cell from outside rather than derived.
///
/// No timing, no instrumentation, no change tracking: `get` and `lazy_get`
/// return the stored value unconditionally, `set` overwrites it, and
/// `reset` restores the default captured at construction.
///
/// Manual cells are the persistable kind: since nothing recomputes them,
/// the save/load round-trip through their codec is what restores them
/// across sessions.
pub struct ManualValue<T> {
    cell: NamedCell,
    value: T,
    default_value: T,
}

impl<T: Clone> ManualValue<T> {
    /// New manual cell holding `default_value`, which `reset` restores.
    #[must_use]
    pub fn new(owner: SharedContext, name: impl Into<String>, default_value: T) -> Self {
        Self {
            cell: NamedCell::new(owner, name),
            value: default_value.clone(),
            default_value,
        }
    }

    /// The cell's stable identifier.
    #[must_use]
    pub fn name(&self) -> &str {
        self.cell.name()
    }

    /// Borrow the stored value.
    #[must_use]
    pub fn peek(&self) -> &T {
        &self.value
    }

    /// The stored value.
    pub fn get(&mut self) -> T {
        self.value.clone()
    }

    /// Identical to `get`: manual cells have nothing to force.
    pub fn lazy_get(&mut self) -> T {
        self.value.clone()
    }

    /// Overwrite the stored value.
    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Restore the default captured at construction.
    pub fn reset(&mut self) {
        self.value = self.default_value.clone();
    }
}

impl<T: Clone> Value<T> for ManualValue<T> {
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

impl<T: Clone + ValueCodec> UntypedValue for ManualValue<T> {
    fn name(&self) -> &str {
        self.cell.name()
    }

    fn reset(&mut self) {
        Self::reset(self);
    }

    fn format(&self) -> String {
        self.value.format()
    }

    fn save(&self) -> String {
        self.value.save()
    }

    /// Parse completes before anything is assigned, so a malformed payload
    /// leaves the stored value untouched.
    fn load(&mut self, raw: &str) -> Result<()> {
        let parsed = T::parse(raw)?;
        self.value = parsed;
        Ok(())
    }
}
