//!
//! handoff-random - Random Number Generation
//!
//! Provides the random source shared by the producer and the consumer when
//! drawing simulated work durations. Uses a fast XORshift generator seeded
//! once, either explicitly or from system time.
//!
//! ## Functions
//!
//! - `SharedRng::range(min, max) -> u64` - Random integer in range [min, max]
//! - `SharedRng::next_u64() -> u64` - Raw next value of the sequence
//!
//! ## Thread Safety
//!
//! The generator state lives in an atomic variable advanced with
//! compare-and-swap, so two threads drawing at the same time always observe
//! distinct states of the same sequence.
//!

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// XORshift state shared between threads.
#[derive(Debug)]
pub struct SharedRng {
    state: AtomicU64,
    seed: u64,
}

fn step(mut s: u64) -> u64 {
    s ^= s << 13;
    s ^= s >> 7;
    s ^= s << 17;
    s
}

impl SharedRng {
    /// Create a generator from a fixed seed. Zero is the XORshift fixed
    /// point and is replaced by 1.
    pub fn new(seed: u64) -> Self {
        let s = if seed == 0 { 1 } else { seed };
        Self {
            state: AtomicU64::new(s),
            seed: s,
        }
    }

    /// Create a generator seeded from the current system time
    pub fn from_time() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0xdeadbeef);
        Self::new(seed)
    }

    /// The seed this generator started from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&self) -> u64 {
        let prev = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| Some(step(s)))
            .unwrap_or_else(|s| s);
        step(prev)
    }

    /// Generate a random integer in the range [min, max] (inclusive)
    pub fn range(&self, min: u64, max: u64) -> u64 {
        if min >= max {
            return min;
        }
        let span = max - min;
        if span == u64::MAX {
            return self.next_u64();
        }
        min + self.next_u64() % (span + 1)
    }
}

impl Default for SharedRng {
    fn default() -> Self {
        Self::from_time()
    }
}
