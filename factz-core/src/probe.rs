//! Computation instrumentation for value cells.
//!
//! A [`ValueProbe`] is the injected collaborator that measures how long each
//! cell's derivation takes. One probe instance belongs to one owning agent
//! and is handed to its cells through [`AgentContext::probe`]; an agent
//! with no probe runs fully uninstrumented at zero cost.
//!
//! Spans are RAII guards: [`ValueProbe::start`] pushes the span onto the
//! probe's internal stack and [`ProbeSpan`]'s `Drop` pops it, accumulates
//! elapsed time, and emits a `tracing` event. Drop-based closing keeps the
//! span balanced on every exit path of the instrumented computation.
//!
//! [`AgentContext::probe`]: crate::context::AgentContext::probe

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Which engine subsystem a span belongs to.
///
/// This crate only opens [`ProbeCategory::Value`] spans; the enum is
/// non-exhaustive so a host engine sharing the probe can grow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProbeCategory {
    /// Derived-value computation.
    Value,
}

impl fmt::Display for ProbeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => write!(f, "value"),
        }
    }
}

// ---------------------------------------------------------------------------
// Probe
// ---------------------------------------------------------------------------

/// Per-span aggregate, keyed by span name.
#[derive(Debug, Default, Clone, Copy)]
struct SpanStats {
    calls: u64,
    total_us: u64,
    max_us: u64,
}

/// Shared aggregation state, co-owned by the probe and its open spans.
#[derive(Debug, Default)]
struct ProbeInner {
    stats: Mutex<HashMap<String, SpanStats>>,
    stack: Mutex<Vec<String>>,
}

impl ProbeInner {
    fn finish(&self, name: &str, elapsed_us: u64) {
        {
            let mut stack = self.stack.lock();
            if stack.last().map(String::as_str) == Some(name) {
                stack.pop();
            }
        }
        let mut stats = self.stats.lock();
        let entry = stats.entry(name.to_string()).or_default();
        entry.calls += 1;
        entry.total_us += elapsed_us;
        entry.max_us = entry.max_us.max(elapsed_us);
    }
}

/// Per-agent timing recorder for value computations.
///
/// Aggregates are guarded by `parking_lot` mutexes: spans are opened and
/// closed on the owning agent's tick thread, while reports may be pulled
/// from elsewhere (a debug console, a dashboard exporter).
#[derive(Debug, Default)]
pub struct ValueProbe {
    inner: Arc<ProbeInner>,
}

impl ValueProbe {
    /// Create a fresh probe wrapped for sharing.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Open a measurement span. The span closes when the returned guard is
    /// dropped.
    #[must_use]
    pub fn start(&self, category: ProbeCategory, name: &str) -> ProbeSpan {
        self.inner.stack.lock().push(name.to_string());
        ProbeSpan {
            inner: Arc::clone(&self.inner),
            category,
            name: name.to_string(),
            started: Instant::now(),
        }
    }

    /// How many spans are currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.stack.lock().len()
    }

    /// Snapshot the aggregated timings, most expensive first.
    #[must_use]
    pub fn snapshot(&self) -> ProbeReport {
        let stats = self.inner.stats.lock();
        let mut entries: Vec<ProbeEntry> = stats
            .iter()
            .map(|(name, s)| ProbeEntry {
                name: name.clone(),
                calls: s.calls,
                total_us: s.total_us,
                max_us: s.max_us,
            })
            .collect();
        entries.sort_by(|a, b| b.total_us.cmp(&a.total_us).then(a.name.cmp(&b.name)));
        ProbeReport { entries }
    }
}

/// An open measurement span; closing happens on drop.
#[derive(Debug)]
pub struct ProbeSpan {
    inner: Arc<ProbeInner>,
    category: ProbeCategory,
    name: String,
    started: Instant,
}

impl Drop for ProbeSpan {
    fn drop(&mut self) {
        let elapsed_us = u64::try_from(self.started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.inner.finish(&self.name, elapsed_us);
        tracing::trace!(
            target: "factz::probe",
            category = %self.category,
            name = %self.name,
            elapsed_us,
            "span closed"
        );
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One aggregated row of a [`ProbeReport`].
#[derive(Debug, Clone)]
pub struct ProbeEntry {
    /// Span name (the cell name).
    pub name: String,
    /// Number of closed spans.
    pub calls: u64,
    /// Total microseconds across all calls.
    pub total_us: u64,
    /// Worst single call, microseconds.
    pub max_us: u64,
}

impl ProbeEntry {
    /// Mean microseconds per call.
    #[must_use]
    pub fn avg_us(&self) -> u64 {
        if self.calls == 0 {
            0
        } else {
            self.total_us / self.calls
        }
    }
}

/// Aggregated timing snapshot, renderable as a console table.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Rows, most expensive first.
    pub entries: Vec<ProbeEntry>,
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<32} {:>8} {:>10} {:>8} {:>8}", "name", "calls", "total_us", "avg_us", "max_us")?;
        for e in &self.entries {
            writeln!(
                f,
                "{:<32} {:>8} {:>10} {:>8} {:>8}",
                e.name,
                e.calls,
                e.total_us,
                e.avg_us(),
                e.max_us
            )?;
        }
        Ok(())
    }
}
