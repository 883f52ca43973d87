//! # Homewatch Poller
//! The watcher's heart: the tick state machine that fetches, validates,
//! diffs, and notifies — with delivery-gated commits and error-report
//! deduplication.

pub mod engine;
pub mod notify;
pub mod verdict;

pub use engine::{PollEngine, TickOutcome};
pub use notify::Notifier;
