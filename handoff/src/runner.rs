//!
//! Run driver
//!
//! Builds the handoff slot, starts the producer and consumer on their own
//! named OS threads, waits for both and checks the result. The slot is owned
//! by the driver and borrowed by both threads through `thread::scope`, so it
//! cannot be dropped while either role is still running.
//!

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use handoff_random::SharedRng;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::error::HandoffError;
use crate::observer::{Observer, Role};
use crate::roles::{RoleReport, consume, produce};
use crate::slot::{Discipline, HandoffSlot, SlotStats};
use crate::work::{RandomDelays, SimulatedWork};

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub discipline: Discipline,
    pub iterations: usize,
    pub seed: Option<u64>,
    pub slot: SlotStats,
    pub producer: RoleReport,
    pub consumer: RoleReport,
    pub elapsed_ms: u64,
}

/// Run both roles with random delays as described by `config`
pub fn run(config: &Config, observer: &dyn Observer) -> Result<Summary, HandoffError> {
    let rng = Arc::new(match config.seed {
        Some(seed) => SharedRng::new(seed),
        None => SharedRng::from_time(),
    });
    let seed = rng.seed();

    let producer_work = SimulatedWork::new(
        RandomDelays::new(Arc::clone(&rng), config.min_delay, config.max_delay),
        config.unit(),
    );
    let consumer_work = SimulatedWork::new(
        RandomDelays::new(rng, config.min_delay, config.max_delay),
        config.unit(),
    );

    let mut summary = run_with(
        config.discipline,
        config.iterations,
        producer_work,
        consumer_work,
        observer,
    )?;
    summary.seed = Some(seed);
    Ok(summary)
}

/// Run both roles for `n` iterations each with the given work sources
pub fn run_with(
    discipline: Discipline,
    n: usize,
    mut producer_work: SimulatedWork,
    mut consumer_work: SimulatedWork,
    observer: &dyn Observer,
) -> Result<Summary, HandoffError> {
    info!(%discipline, iterations = n, "starting handoff");
    let started = Instant::now();
    let slot = HandoffSlot::new(discipline);

    let (produced, consumed) = thread::scope(|s| -> Result<_, HandoffError> {
        let slot = &slot;

        // The producer holds off until the consumer thread exists, so a
        // failed spawn never leaves it blocked on a slot nobody drains.
        let (go, ready) = mpsc::channel::<()>();

        let producer = thread::Builder::new()
            .name("producer".to_string())
            .spawn_scoped(s, move || -> Option<RoleReport> {
                ready.recv().ok()?;
                Some(produce(slot, &mut producer_work, observer, n))
            })
            .map_err(|source| HandoffError::Spawn {
                role: Role::Producer,
                source,
            })?;

        let consumer = thread::Builder::new()
            .name("consumer".to_string())
            .spawn_scoped(s, move || consume(slot, &mut consumer_work, observer, n))
            .map_err(|source| HandoffError::Spawn {
                role: Role::Consumer,
                source,
            })?;

        let _ = go.send(());

        let produced = producer
            .join()
            .ok()
            .flatten()
            .ok_or(HandoffError::Panicked {
                role: Role::Producer,
            })?;
        let consumed = consumer.join().map_err(|_| HandoffError::Panicked {
            role: Role::Consumer,
        })?;

        Ok((produced, consumed))
    })?;

    verify_sequence(&consumed.sequence, n)?;

    let stats = slot.stats();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        puts = stats.puts,
        takes = stats.takes,
        occupancy = stats.occupancy,
        elapsed_ms,
        "handoff finished"
    );

    Ok(Summary {
        discipline,
        iterations: n,
        seed: None,
        slot: stats,
        producer: produced,
        consumer: consumed,
        elapsed_ms,
    })
}

/// The consumer must have received exactly `0..n`, in order
pub fn verify_sequence(received: &[u64], n: usize) -> Result<(), HandoffError> {
    for expected in 0..n as u64 {
        let found = received.get(expected as usize).copied();
        if found != Some(expected) {
            return Err(HandoffError::OutOfOrder { expected, found });
        }
    }
    if let Some(&extra) = received.get(n) {
        return Err(HandoffError::OutOfOrder {
            expected: n as u64,
            found: Some(extra),
        });
    }
    Ok(())
}
