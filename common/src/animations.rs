//! Time-based intensity helpers for the press highlight.
//!
//! The key highlight fades out linearly after the fresh-press window. All math
//! is fixed-point so the same code runs on the MCU and the host:
//!
//! ```text
//! t       = (elapsed - press_ms) / (fade_ms - press_ms)     in 0..=1
//! opacity = 255 - 255 * t
//! ```

/// Fixed-point one (8 fractional bits).
const FIXED_ONE: u32 = 256;

/// Linear interpolation between two intensity levels.
///
/// `t` is a fixed-point fraction with 8 fractional bits: 0 returns `from`,
/// 256 (or more) returns `to`.
pub fn lerp_level(
    from: u8,
    to: u8,
    t: u32,
) -> u8 {
    let t = t.min(FIXED_ONE) as i32;
    let from = i32::from(from);
    let to = i32::from(to);
    let value = from + (((to - from) * t) >> 8);
    value.clamp(0, 255) as u8
}

/// Opacity of the fading highlight `elapsed_ms` after a press.
///
/// 255 at the end of the fresh window, falling linearly to 0 at `fade_ms`.
/// Returns 0 when the fade window is empty or already over.
pub fn fade_opacity(
    elapsed_ms: u64,
    press_ms: u64,
    fade_ms: u64,
) -> u8 {
    if elapsed_ms < press_ms {
        return u8::MAX;
    }
    if fade_ms <= press_ms || elapsed_ms >= fade_ms {
        return 0;
    }
    let span = fade_ms - press_ms;
    let into = elapsed_ms - press_ms;
    let t = (into * u64::from(FIXED_ONE) / span) as u32;
    lerp_level(u8::MAX, 0, t)
}

/// Scale `level` by `opacity` (both 0..=255).
#[inline]
pub const fn apply_opacity(
    level: u8,
    opacity: u8,
) -> u8 {
    ((level as u16 * opacity as u16 + 127) / 255) as u8
}
