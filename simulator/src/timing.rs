//! Timing for the simulator.
//!
//! The common crate never reads a clock; everything here is `std`-only and
//! produces the millisecond timestamps it expects.

use std::time::{Duration, Instant};

use stryke_common::config::TICK_MS;

/// Refresh period of the window loop.
pub const FRAME_TIME: Duration = Duration::from_millis(TICK_MS);

/// Milliseconds since the simulator started.
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self { Self { start: Instant::now() } }

    /// Current timestamp in milliseconds.
    pub fn now_ms(&self) -> u64 { self.start.elapsed().as_millis() as u64 }

    pub fn uptime(&self) -> Duration { self.start.elapsed() }
}

impl Default for Clock {
    fn default() -> Self { Self::new() }
}
