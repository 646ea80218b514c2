//! Wall-clock frame timing.
//!
//! Counters that need no clock live in `stryke_common::profiling`; this adds
//! the render durations the desktop can measure.

use std::time::Duration;

use heapless::String;
use stryke_common::profiling::push_u32;

/// Render timing statistics (microseconds).
pub struct FrameTimer {
    pub last_us: u32,
    pub min_us: u32,
    pub max_us: u32,
    avg_us: f32,
    pub samples: u64,
}

impl FrameTimer {
    const EMA_ALPHA: f32 = 0.1;

    pub const fn new() -> Self {
        Self {
            last_us: 0,
            min_us: u32::MAX,
            max_us: 0,
            avg_us: 0.0,
            samples: 0,
        }
    }

    /// Record how long one update (event handling, tick, blit) took.
    pub fn record(
        &mut self,
        elapsed: Duration,
    ) {
        let us = elapsed.as_micros().min(u128::from(u32::MAX)) as u32;
        self.last_us = us;
        self.min_us = self.min_us.min(us);
        self.max_us = self.max_us.max(us);

        if self.samples == 0 {
            self.avg_us = us as f32;
        } else {
            self.avg_us = Self::EMA_ALPHA.mul_add(us as f32, (1.0 - Self::EMA_ALPHA) * self.avg_us);
        }
        self.samples += 1;
    }

    /// Smoothed update time in microseconds.
    #[inline]
    pub const fn avg_us(&self) -> u32 { self.avg_us as u32 }

    /// Minimum update time, 0 before the first sample.
    #[inline]
    pub const fn min_us(&self) -> u32 { if self.samples == 0 { 0 } else { self.min_us } }
}

impl Default for FrameTimer {
    fn default() -> Self { Self::new() }
}

/// Format a duration as `HH:MM:SS`.
pub fn uptime_string(uptime: Duration) -> String<12> {
    let secs = uptime.as_secs();
    let fields = [secs / 3600, (secs % 3600) / 60, secs % 60];

    let mut s = String::new();
    for (i, value) in fields.into_iter().enumerate() {
        if i > 0 {
            s.push(':').ok();
        }
        if value < 10 {
            s.push('0').ok();
        }
        push_u32(&mut s, value.min(u64::from(u32::MAX)) as u32);
    }
    s
}
