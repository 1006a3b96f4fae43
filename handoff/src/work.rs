//!
//! Simulated Work
//!
//! Producing an item and processing an item are both modelled as a delay of
//! `d` time units, performed as `d` sequential unit-length sleeps so that
//! progress (`step / d`) can be reported after each one. The duration comes
//! from a `DelaySource`: random in `[min, max]` for real runs, or a fixed
//! script for reproducible scenarios.
//!
//! Simulated work only ever blocks the calling thread on a timer. It never
//! touches the handoff slot.
//!

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use handoff_random::SharedRng;

use crate::observer::{Event, EventKind, Observer, Role};

/// Supplies the number of time units each piece of work takes
pub trait DelaySource: Send {
    fn next_delay(&mut self) -> u32;
}

/// Uniform delays in `[min, max]` drawn from a shared generator
#[derive(Debug, Clone)]
pub struct RandomDelays {
    rng: Arc<SharedRng>,
    min: u32,
    max: u32,
}

impl RandomDelays {
    pub fn new(rng: Arc<SharedRng>, min: u32, max: u32) -> Self {
        Self { rng, min, max }
    }
}

impl DelaySource for RandomDelays {
    fn next_delay(&mut self) -> u32 {
        self.rng.range(self.min as u64, self.max as u64) as u32
    }
}

/// A fixed sequence of delays; yields 0 once the script runs out
#[derive(Debug, Clone, Default)]
pub struct ScriptedDelays {
    script: VecDeque<u32>,
}

impl ScriptedDelays {
    pub fn new(script: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }
}

impl DelaySource for ScriptedDelays {
    fn next_delay(&mut self) -> u32 {
        self.script.pop_front().unwrap_or(0)
    }
}

pub struct SimulatedWork {
    delays: Box<dyn DelaySource>,
    unit: Duration,
}

impl SimulatedWork {
    pub fn new(delays: impl DelaySource + 'static, unit: Duration) -> Self {
        Self {
            delays: Box::new(delays),
            unit,
        }
    }

    pub fn unit(&self) -> Duration {
        self.unit
    }

    /// Perform one piece of work for `role` at `iteration`, reporting each
    /// completed step. Returns the number of units performed.
    pub fn run(&mut self, role: Role, iteration: usize, observer: &dyn Observer) -> u32 {
        let total = self.delays.next_delay();
        for step in 1..=total {
            thread::sleep(self.unit);
            observer.on_event(&Event {
                role,
                iteration,
                kind: EventKind::Working { step, total },
            });
        }
        total
    }
}
