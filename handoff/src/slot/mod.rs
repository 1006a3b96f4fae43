//!
//! Handoff Slot
//!
//! A capacity-1 buffer shared by exactly one producer and one consumer,
//! together with its synchronization state: the `guard` mutex protecting the
//! occupancy, an item-ready condition, and (in the signaling discipline only)
//! a slot-free condition.
//!
//! ## Disciplines
//!
//! Both disciplines expose the same contract, `put` for the producer and
//! `Consumer::take` for the consumer, and differ only in how the producer
//! learns that the slot is free again:
//!
//! - `Discipline::Signaling`: the guard is held only across the state
//!   check/mutate. Freeing the slot signals `slot_free`, and a consumer that
//!   finds the slot empty signals `slot_free` once more before parking, to
//!   tell a blocked producer it is ready to receive.
//! - `Discipline::LockHeld`: there is no `slot_free` condition. The consumer
//!   keeps the guard for its whole lifetime, releasing it only while parked
//!   on `item_ready`, so its processing happens under the lock and the
//!   producer's attempt to acquire the guard is what blocks it.
//!
//! ## Transitions
//!
//! All occupancy changes go through `mark_occupied` and `mark_free`, which
//! check `0 <= occupancy <= capacity` and send the signal that belongs to the
//! transition. Every wait is a loop around the condition wait, so lost and
//! spurious wakeups are both harmless.
//!

mod lock_held;
mod signaling;

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Discipline {
    /// Symmetric signaling with two conditions; guard never held across work
    Signaling,
    /// Consumer holds the guard across processing; one condition
    LockHeld,
}

impl std::fmt::Display for Discipline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Discipline::Signaling => write!(f, "signaling"),
            Discipline::LockHeld => write!(f, "lock-held"),
        }
    }
}

/// An item in flight, tagged with the producer's sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub seq: u64,
}

/// Snapshot of the slot counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotStats {
    pub occupancy: usize,
    pub puts: u64,
    pub takes: u64,
}

#[derive(Debug, Default)]
struct SlotState {
    items: VecDeque<Item>,
    puts: u64,
    takes: u64,
}

impl SlotState {
    fn occupancy(&self) -> usize {
        self.items.len()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct HandoffSlot {
    capacity: usize,
    guard: Mutex<SlotState>,
    item_ready: Condvar,
    slot_free: Option<Condvar>,
}

impl HandoffSlot {
    pub fn new(discipline: Discipline) -> Self {
        Self::with_capacity(discipline, 1)
    }

    /// Create a slot holding up to `capacity` items (at least 1).
    ///
    /// Under `Discipline::LockHeld` the producer can only get the guard while
    /// the consumer is parked on an empty slot, so the effective capacity
    /// stays 1 whatever is requested here.
    pub fn with_capacity(discipline: Discipline, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let slot_free = match discipline {
            Discipline::Signaling => Some(Condvar::new()),
            Discipline::LockHeld => None,
        };
        Self {
            capacity,
            guard: Mutex::new(SlotState {
                items: VecDeque::with_capacity(capacity),
                ..SlotState::default()
            }),
            item_ready: Condvar::new(),
            slot_free,
        }
    }

    pub fn discipline(&self) -> Discipline {
        if self.slot_free.is_some() {
            Discipline::Signaling
        } else {
            Discipline::LockHeld
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Block until the slot has room, then place `item` in it.
    /// Producer only.
    pub fn put(&self, item: Item) {
        match &self.slot_free {
            Some(slot_free) => signaling::put(self, slot_free, item),
            None => lock_held::put(self, item),
        }
    }

    /// The consumer's handle on the slot.
    ///
    /// Under `Discipline::LockHeld` this acquires the guard and keeps it until
    /// the handle is dropped, so it must be created on the consumer thread
    /// and dropped once the consumer is finished.
    pub fn consumer(&self) -> Consumer<'_> {
        let held = match self.discipline() {
            Discipline::Signaling => None,
            Discipline::LockHeld => {
                let state = self.lock();
                trace!("consumer acquired guard");
                Some(state)
            }
        };
        Consumer { slot: self, held }
    }

    /// Blocks while a lock-held consumer owns the guard.
    pub fn stats(&self) -> SlotStats {
        let state = self.lock();
        SlotStats {
            occupancy: state.occupancy(),
            puts: state.puts,
            takes: state.takes,
        }
    }

    pub fn occupancy(&self) -> usize {
        self.stats().occupancy
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 0 -> 1 (or n -> n+1) transition, always followed by `item_ready`
    fn mark_occupied(&self, state: &mut SlotState, item: Item) {
        assert!(
            state.occupancy() < self.capacity,
            "put on a full slot (occupancy {}, capacity {})",
            state.occupancy(),
            self.capacity
        );
        state.items.push_back(item);
        state.puts += 1;
        debug!(seq = item.seq, occupancy = state.occupancy(), "slot occupied");
        self.item_ready.notify_one();
    }

    /// 1 -> 0 (or n -> n-1) transition, followed by `slot_free` when the
    /// discipline has one
    fn mark_free(&self, state: &mut SlotState) -> Item {
        let item = match state.items.pop_front() {
            Some(item) => item,
            None => unreachable!("take on an empty slot"),
        };
        state.takes += 1;
        debug!(seq = item.seq, occupancy = state.occupancy(), "slot freed");
        if let Some(slot_free) = &self.slot_free {
            slot_free.notify_one();
        }
        item
    }
}

fn wait<'a>(condition: &Condvar, state: MutexGuard<'a, SlotState>) -> MutexGuard<'a, SlotState> {
    condition.wait(state).unwrap_or_else(PoisonError::into_inner)
}

/// Consumer side of a `HandoffSlot`
pub struct Consumer<'a> {
    slot: &'a HandoffSlot,
    held: Option<MutexGuard<'a, SlotState>>,
}

impl Consumer<'_> {
    /// Block until an item is available, then remove and return it
    pub fn take(&mut self) -> Item {
        match &self.slot.slot_free {
            Some(slot_free) => signaling::take(self.slot, slot_free),
            None => lock_held::take(self.slot, &mut self.held),
        }
    }

    /// Whether this handle currently owns the guard
    pub fn holds_guard(&self) -> bool {
        self.held.is_some()
    }
}

impl Drop for Consumer<'_> {
    fn drop(&mut self) {
        if self.held.take().is_some() {
            trace!("consumer released guard");
        }
    }
}
