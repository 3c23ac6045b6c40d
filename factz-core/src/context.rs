//! The owning-agent interface seen by value cells.
//!
//! A cell does not know what kind of agent owns it. It only needs a scope
//! label for diagnostics and an optional instrumentation handle; everything
//! else an agent exposes (world queries, component access) is captured
//! directly by the concrete `calculate` closures.

use std::sync::Arc;

use crate::probe::ValueProbe;

/// What an owning agent exposes to its value cells.
pub trait AgentContext {
    /// Scope label used in diagnostics and instrumentation output.
    fn scope(&self) -> &str;

    /// The agent's instrumentation collaborator; `None` disables probing.
    fn probe(&self) -> Option<Arc<ValueProbe>> {
        None
    }
}

/// Shared handle to an owning context, cloned into every cell.
pub type SharedContext = Arc<dyn AgentContext>;

/// Minimal concrete context: a scope string and an optional probe.
///
/// Enough for tests and for hosts that keep world access entirely inside
/// their `calculate` closures.
#[derive(Default)]
pub struct BasicContext {
    scope: String,
    probe: Option<Arc<ValueProbe>>,
}

impl BasicContext {
    /// Create a context with the given scope label and no probe.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            probe: None,
        }
    }

    /// Attach an instrumentation probe.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<ValueProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Wrap into the shared handle cells expect.
    #[must_use]
    pub fn shared(self) -> SharedContext {
        Arc::new(self)
    }
}

impl AgentContext for BasicContext {
    fn scope(&self) -> &str {
        &self.scope
    }

    fn probe(&self) -> Option<Arc<ValueProbe>> {
        self.probe.clone()
    }
}
