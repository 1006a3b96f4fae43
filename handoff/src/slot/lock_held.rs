//!
//! Lock-held discipline
//!
//! There is no free-slot condition. The consumer acquires the guard once,
//! when its handle is created, and owns it between takes: it only lets go
//! while parked on `item_ready` and when the handle is dropped. Processing
//! done between two takes therefore happens under the lock, and a producer
//! calling `put` in that window blocks on the guard itself until the
//! consumer parks again.
//!

use std::sync::MutexGuard;
use std::thread;

use tracing::trace;

use super::{HandoffSlot, Item, SlotState, wait};

pub(super) fn put(slot: &HandoffSlot, item: Item) {
    trace!(seq = item.seq, "producer acquiring guard");
    let mut state = slot.lock();

    // Only reachable if the producer wins the guard back before a woken
    // consumer has drained the slot. Release and retry.
    while state.occupancy() == slot.capacity {
        trace!(seq = item.seq, "slot full, producer backing off");
        drop(state);
        thread::yield_now();
        state = slot.lock();
    }

    slot.mark_occupied(&mut state, item);
}

pub(super) fn take<'a>(
    slot: &'a HandoffSlot,
    held: &mut Option<MutexGuard<'a, SlotState>>,
) -> Item {
    let mut state = match held.take() {
        Some(state) => state,
        None => slot.lock(),
    };

    while state.is_empty() {
        trace!("slot empty, consumer waiting on item_ready");
        state = wait(&slot.item_ready, state);
        trace!(occupancy = state.occupancy(), "consumer woken");
    }

    let item = slot.mark_free(&mut state);
    *held = Some(state);
    item
}
