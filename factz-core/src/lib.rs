//! # FACTZ Core Library
//!
//! Time-aware memoized fact cells for game-agent decision loops.
//!
//! A decision loop running many times per second cannot afford to rederive
//! every fact about its environment ("nearest hostile", "current mana
//! percentage") on every tick. FACTZ represents each derived fact as a
//! typed, lazily-recomputed, optionally change-tracked cell:
//!
//! - [`ComputedValue`] — recomputes at most every `check_interval` seconds
//! - [`OnceValue`] — computes exactly once and caches forever
//! - [`TrackedValue`] — recognizes value *changes* with hysteresis
//! - [`HistoryValue`] — retains a bounded log of change samples
//! - [`ManualValue`] — externally pushed, never computed
//!
//! All cells implement [`Value<T>`] for typed access and (for codec-capable
//! kinds) the object-safe [`UntypedValue`], so a fact registry can
//! enumerate, format, and persist heterogeneous cells generically.
//!
//! ## Performance Contract
//!
//! Cells are built for real-time tick loops:
//! - Cached `get` (inside the window): a clock read and a clone
//! - Forced recompute: the derivation itself plus one probe span
//! - Change detection: one equality check and two timestamp compares
//!
//! Cells are single-owner and tick-driven — there is no internal locking,
//! and sharing one cell across threads is not supported.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod policy;
pub mod probe;
pub mod types;
pub mod value;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use codec::ValueCodec;
pub use config::{CellConfig, FactzConfig};
pub use context::{AgentContext, BasicContext, SharedContext};
pub use error::{FactzError, Result};
pub use probe::{ProbeCategory, ValueProbe};
pub use types::*;
pub use value::{
    ComputedValue, HistoryValue, ManualValue, NamedCell, OnceValue, TrackedValue, UntypedValue,
    Value,
};
