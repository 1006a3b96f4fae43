//!
//! Symmetric signaling discipline
//!
//! The guard is held only while the occupancy is checked and changed. The
//! producer parks on `slot_free` while the slot is full; the consumer parks
//! on `item_ready` while it is empty. Before parking, the consumer signals
//! `slot_free` once to announce it is ready to receive, which lets a producer
//! blocked on a full slot proceed as soon as a take cycle begins.
//!

use std::sync::Condvar;

use tracing::trace;

use super::{HandoffSlot, Item, wait};

pub(super) fn put(slot: &HandoffSlot, slot_free: &Condvar, item: Item) {
    let mut state = slot.lock();

    while state.occupancy() == slot.capacity {
        trace!(seq = item.seq, "slot full, producer waiting on slot_free");
        state = wait(slot_free, state);
        trace!(seq = item.seq, occupancy = state.occupancy(), "producer woken");
    }

    slot.mark_occupied(&mut state, item);
}

pub(super) fn take(slot: &HandoffSlot, slot_free: &Condvar) -> Item {
    let mut state = slot.lock();

    if state.is_empty() {
        // Ready to receive. A no-op when no producer is parked.
        slot_free.notify_one();
        trace!("slot empty, slot_free sent");

        while state.is_empty() {
            trace!("consumer waiting on item_ready");
            state = wait(&slot.item_ready, state);
            trace!(occupancy = state.occupancy(), "consumer woken");
        }
    }

    slot.mark_free(&mut state)
}
