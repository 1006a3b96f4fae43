//!
//! Producer and consumer loops
//!
//! Each role runs a fixed number of strictly sequential iterations against
//! the same `HandoffSlot`. The producer works, then puts; the consumer takes,
//! then works. Which of the consumer's steps run under the slot's guard is
//! decided by the slot's discipline, not here.
//!

use serde::Serialize;
use tracing::info_span;

use crate::observer::{Event, EventKind, Observer, Role};
use crate::slot::{HandoffSlot, Item};
use crate::work::SimulatedWork;

/// What one role did over its run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleReport {
    pub role: Role,
    pub iterations: usize,
    /// Total simulated time units performed
    pub units: u64,
    /// Sequence numbers handed (producer) or received (consumer), in order
    pub sequence: Vec<u64>,
}

impl RoleReport {
    fn new(role: Role, n: usize) -> Self {
        Self {
            role,
            iterations: 0,
            units: 0,
            sequence: Vec::with_capacity(n),
        }
    }
}

pub fn produce(
    slot: &HandoffSlot,
    work: &mut SimulatedWork,
    observer: &dyn Observer,
    n: usize,
) -> RoleReport {
    let _span = info_span!("producer").entered();
    let mut report = RoleReport::new(Role::Producer, n);

    for i in 0..n {
        emit(observer, Role::Producer, i, EventKind::Start);
        report.units += work.run(Role::Producer, i, observer) as u64;

        let item = Item { seq: i as u64 };
        slot.put(item);
        emit(observer, Role::Producer, i, EventKind::Handed { seq: item.seq });

        report.sequence.push(item.seq);
        report.iterations += 1;
    }

    report
}

pub fn consume(
    slot: &HandoffSlot,
    work: &mut SimulatedWork,
    observer: &dyn Observer,
    n: usize,
) -> RoleReport {
    let _span = info_span!("consumer").entered();
    let mut report = RoleReport::new(Role::Consumer, n);
    let mut consumer = slot.consumer();

    for i in 0..n {
        emit(observer, Role::Consumer, i, EventKind::Start);

        let item = consumer.take();
        emit(observer, Role::Consumer, i, EventKind::Received { seq: item.seq });
        report.sequence.push(item.seq);

        report.units += work.run(Role::Consumer, i, observer) as u64;
        report.iterations += 1;
    }

    report
}

fn emit(observer: &dyn Observer, role: Role, iteration: usize, kind: EventKind) {
    observer.on_event(&Event {
        role,
        iteration,
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;
    use crate::slot::Discipline;
    use crate::work::ScriptedDelays;
    use std::thread;
    use std::time::Duration;

    fn instant_work() -> SimulatedWork {
        SimulatedWork::new(ScriptedDelays::default(), Duration::from_millis(1))
    }

    #[test]
    fn test_roles_exchange_in_order() {
        for discipline in [Discipline::Signaling, Discipline::LockHeld] {
            let slot = HandoffSlot::new(discipline);

            let (produced, consumed) = thread::scope(|s| {
                let p = s.spawn(|| produce(&slot, &mut instant_work(), &NullObserver, 25));
                let c = s.spawn(|| consume(&slot, &mut instant_work(), &NullObserver, 25));
                (p.join().unwrap(), c.join().unwrap())
            });

            let expected: Vec<u64> = (0..25).collect();
            assert_eq!(produced.sequence, expected);
            assert_eq!(consumed.sequence, expected);
            assert_eq!(produced.iterations, 25);
            assert_eq!(consumed.iterations, 25);
            assert_eq!(slot.occupancy(), 0);
        }
    }

    #[test]
    fn test_units_are_summed() {
        let slot = HandoffSlot::new(Discipline::Signaling);
        let mut work = SimulatedWork::new(ScriptedDelays::new([1, 2]), Duration::from_millis(1));

        let report = produce(&slot, &mut work, &NullObserver, 1);
        assert_eq!(report.units, 1);
        assert_eq!(slot.occupancy(), 1);
    }

    #[test]
    fn test_zero_iterations() {
        let slot = HandoffSlot::new(Discipline::LockHeld);
        let report = consume(&slot, &mut instant_work(), &NullObserver, 0);
        assert_eq!(report.iterations, 0);
        assert!(report.sequence.is_empty());
    }
}
