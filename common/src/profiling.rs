//! On-device logging and frame counters.
//!
//! [`DebugLog`] keeps the last few driver messages (sink failures, init
//! results, layer changes) for the logs page. [`FrameStats`] counts what the
//! refresh loop did and feeds the debug page. Neither needs a clock or heap.
//!
//! ```ignore
//! let mut log = DebugLog::new();
//! log.push("sink ready");
//! log.push_value("blit failed #", 3);
//!
//! for line in log.iter() {
//!     println!("{line}");
//! }
//! ```

use heapless::{Deque, String};

// =============================================================================
// Debug Log Configuration
// =============================================================================

/// Number of lines kept in the ring buffer.
pub const LOG_BUFFER_SIZE: usize = 6;

/// Maximum bytes per log line.
pub const LOG_LINE_LENGTH: usize = 48;

/// One stored log line.
pub type LogLine = String<LOG_LINE_LENGTH>;

// =============================================================================
// Debug Log Ring Buffer
// =============================================================================

/// Ring buffer of the most recent log lines. The oldest line is dropped when
/// a new one arrives on a full buffer.
#[derive(Clone, Debug, Default)]
pub struct DebugLog {
    lines: Deque<LogLine, LOG_BUFFER_SIZE>,
    /// Lines pushed since boot, including dropped ones.
    total: u32,
}

impl DebugLog {
    pub const fn new() -> Self {
        Self {
            lines: Deque::new(),
            total: 0,
        }
    }

    /// Append a line, truncated to `LOG_LINE_LENGTH` bytes at a char boundary.
    pub fn push(
        &mut self,
        msg: &str,
    ) {
        let mut line = LogLine::new();
        push_str_truncated(&mut line, msg);
        self.push_line(line);
    }

    /// Append `prefix` followed by a decimal value.
    pub fn push_value(
        &mut self,
        prefix: &str,
        value: u32,
    ) {
        let mut line = LogLine::new();
        push_str_truncated(&mut line, prefix);
        push_u32(&mut line, value);
        self.push_line(line);
    }

    fn push_line(
        &mut self,
        line: LogLine,
    ) {
        if self.lines.is_full() {
            self.lines.pop_front();
        }
        self.lines.push_back(line).ok();
        self.total = self.total.wrapping_add(1);
    }

    /// Lines, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> { self.lines.iter().map(LogLine::as_str) }

    /// Most recent line.
    pub fn last(&self) -> Option<&str> { self.lines.back().map(LogLine::as_str) }

    #[inline]
    pub fn len(&self) -> usize { self.lines.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }

    /// Lines pushed since boot.
    #[inline]
    pub const fn total(&self) -> u32 { self.total }

    /// Drop every stored line. The running total is kept.
    pub fn clear(&mut self) { self.lines.clear(); }
}

// =============================================================================
// Frame Statistics
// =============================================================================

/// Counters maintained by the refresh loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    /// `tick` calls.
    pub ticks: u32,
    /// Frames composed into the framebuffer.
    pub redraws: u32,
    /// Frames handed to the sink successfully.
    pub blits: u32,
    /// Frames the sink rejected.
    pub blit_failures: u32,
    /// Frames composed but not sent because the sink is unavailable.
    pub skipped_frames: u32,
}

impl FrameStats {
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            redraws: 0,
            blits: 0,
            blit_failures: 0,
            skipped_frames: 0,
        }
    }

    #[inline]
    pub fn record_tick(&mut self) { self.ticks = self.ticks.wrapping_add(1); }

    #[inline]
    pub fn record_redraw(&mut self) { self.redraws = self.redraws.wrapping_add(1); }

    #[inline]
    pub fn record_blit(&mut self) { self.blits = self.blits.wrapping_add(1); }

    #[inline]
    pub fn record_blit_failure(&mut self) { self.blit_failures = self.blit_failures.wrapping_add(1); }

    #[inline]
    pub fn record_skipped(&mut self) { self.skipped_frames = self.skipped_frames.wrapping_add(1); }

    /// Ticks that did not need a redraw.
    #[inline]
    pub const fn idle_ticks(&self) -> u32 { self.ticks.saturating_sub(self.redraws) }

    /// One-line summary for the debug page, e.g. `"T:120 R:14 B:14 F:0 S:0"`.
    pub fn summary(&self) -> LogLine {
        let mut line = LogLine::new();
        let fields = [
            ("T:", self.ticks),
            (" R:", self.redraws),
            (" B:", self.blits),
            (" F:", self.blit_failures),
            (" S:", self.skipped_frames),
        ];
        for (label, value) in fields {
            push_str_truncated(&mut line, label);
            push_u32(&mut line, value);
        }
        line
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Append as much of `text` as fits without splitting a character.
pub fn push_str_truncated<const N: usize>(
    s: &mut String<N>,
    text: &str,
) {
    for c in text.chars() {
        if s.push(c).is_err() {
            break;
        }
    }
}

/// Push a u32 value to a heapless string (no format! macro).
pub fn push_u32<const N: usize>(
    s: &mut String<N>,
    mut val: u32,
) {
    if val == 0 {
        s.push('0').ok();
        return;
    }

    let mut digits = [0u8; 10];
    let mut i = 0;
    while val > 0 {
        digits[i] = (val % 10) as u8;
        val /= 10;
        i += 1;
    }

    while i > 0 {
        i -= 1;
        s.push((b'0' + digits[i]) as char).ok();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_log_push() {
        let mut log = DebugLog::new();
        assert!(log.is_empty());

        log.push("sink ready");
        log.push_value("layer ", 3);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last(), Some("layer 3"));
    }

    #[test]
    fn test_debug_log_drops_oldest() {
        let mut log = DebugLog::new();
        for i in 0..LOG_BUFFER_SIZE as u32 {
            log.push_value("", i);
        }
        log.push("new");

        assert_eq!(log.len(), LOG_BUFFER_SIZE);
        assert_eq!(log.iter().next(), Some("1"));
        assert_eq!(log.last(), Some("new"));
        assert_eq!(log.total(), LOG_BUFFER_SIZE as u32 + 1);
    }

    #[test]
    fn test_debug_log_truncation() {
        let mut log = DebugLog::new();
        log.push("a message that is definitely longer than forty-eight bytes in total");
        let stored = log.last().unwrap();
        assert_eq!(stored.len(), LOG_LINE_LENGTH);
    }

    #[test]
    fn test_debug_log_clear_keeps_total() {
        let mut log = DebugLog::new();
        log.push("one");
        log.push("two");
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.total(), 2);
    }

    #[test]
    fn test_push_u32() {
        let mut s: String<16> = String::new();
        push_u32(&mut s, 0);
        assert_eq!(s.as_str(), "0");

        let mut s: String<16> = String::new();
        push_u32(&mut s, 4_294_967_295);
        assert_eq!(s.as_str(), "4294967295");
    }

    #[test]
    fn test_frame_stats_summary() {
        let mut stats = FrameStats::new();
        for _ in 0..5 {
            stats.record_tick();
        }
        stats.record_redraw();
        stats.record_blit();
        stats.record_blit_failure();
        assert_eq!(stats.idle_ticks(), 4);
        assert_eq!(stats.summary().as_str(), "T:5 R:1 B:1 F:1 S:0");
    }
}
