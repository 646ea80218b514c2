//! Boot animation and splash screen.
//!
//! The animation grows a rounded frame out of the screen center; the splash
//! follows with the product name and firmware version.

use crate::font::draw_text;
use crate::framebuffer::Canvas;
use crate::primitives::draw_rounded_rect;

/// Number of frames in the boot animation.
pub const BOOT_FRAMES: usize = 32;

/// Suggested delay between boot frames.
pub const BOOT_FRAME_MS: u64 = 30;

/// How long the splash stays up before the status screen takes over.
pub const SPLASH_MS: u64 = 1000;

/// Growth per frame in pixels (horizontal half-width).
const BOOT_STEP: i32 = 2;

const BOOT_RADIUS: i32 = 3;

const SPLASH_TITLE: &str = "KEYBOARD";
const SPLASH_VERSION: &str = concat!("OS v", env!("CARGO_PKG_VERSION"));

/// Draw boot frame `step`. Steps past the last frame draw the last frame.
pub fn draw_boot_frame<C: Canvas>(
    canvas: &mut C,
    step: usize,
) {
    let step = step.min(BOOT_FRAMES - 1) as i32;
    let grow = step * BOOT_STEP;
    let cx = canvas.width() / 2;
    let cy = canvas.height() / 2;

    Canvas::clear(canvas);
    draw_rounded_rect(canvas, cx - grow, cy - grow / 2, grow * 2, grow, BOOT_RADIUS, C::on());
}

/// Draw the splash screen.
pub fn draw_splash<C: Canvas>(canvas: &mut C) {
    let (width, height) = (canvas.width(), canvas.height());
    Canvas::clear(canvas);
    draw_text(canvas, SPLASH_TITLE, 20, 18, 2, C::on());
    draw_text(canvas, SPLASH_VERSION, 35, 38, 1, C::on());
    draw_rounded_rect(canvas, 0, 0, width, height, BOOT_RADIUS, C::on());
}
