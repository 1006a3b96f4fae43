//!
//! handoff - Single-Slot Producer/Consumer Handoff
//!
//! One producer thread hands items to one consumer thread through a shared
//! capacity-1 slot. Production and processing are simulated as random
//! delays. The slot guarantees that no item is dropped, none is read twice,
//! and the two threads never race on the slot's state.
//!
//! ## Disciplines
//!
//! The slot comes in two interchangeable locking disciplines behind the
//! same `put` / `take` contract:
//!
//! - `Discipline::Signaling` - two conditions, the guard is never held
//!   across simulated work
//! - `Discipline::LockHeld` - one condition, the consumer holds the guard
//!   across its processing step and backpressure comes from lock contention
//!
//! ## Modules
//!
//! - `slot` - the handoff slot and both disciplines
//! - `work` - simulated production/processing delays
//! - `roles` - the producer and consumer loops
//! - `runner` - spawns both roles on OS threads and checks the outcome
//! - `observer` - the line-oriented progress stream
//! - `config` - TOML run configuration
//!

pub mod config;
pub mod error;
pub mod observer;
pub mod roles;
pub mod runner;
pub mod slot;
pub mod work;

pub use config::Config;
pub use error::{ConfigError, HandoffError};
pub use observer::{Event, EventKind, LineObserver, NullObserver, Observer, Role};
pub use roles::{RoleReport, consume, produce};
pub use runner::{Summary, run, run_with, verify_sequence};
pub use slot::{Consumer, Discipline, HandoffSlot, Item, SlotStats};
pub use work::{DelaySource, RandomDelays, ScriptedDelays, SimulatedWork};
