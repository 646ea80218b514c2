//! Debug page: frame counters, sink health and update timing.

use core::fmt::Write;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use profont::PROFONT_7_POINT;
use stryke_common::{Canvas, PageContext};

use super::{COL1_X, LINE_HEIGHT, draw_header};
use crate::profiling::FrameTimer;

const STATS_Y: i32 = 11;

pub fn draw_debug_page<D>(
    display: &mut D,
    context: &PageContext<'_>,
    timer: &FrameTimer,
    uptime: &str,
) where
    D: Canvas + DrawTarget<Color = <D as Canvas>::Color>,
{
    Canvas::clear(display);
    draw_header(display, context.page.title(), uptime);

    let stats = context.stats;
    let state = context.state;
    let style = MonoTextStyle::new(&PROFONT_7_POINT, D::on());

    let mut lines: [String<32>; 5] = Default::default();
    let _ = write!(lines[0], "Ticks {} Idle {}", stats.ticks, stats.idle_ticks());
    let _ = write!(lines[1], "Redraw {} Blit {}", stats.redraws, stats.blits);
    let _ = write!(lines[2], "Fail {} Skip {}", stats.blit_failures, stats.skipped_frames);
    let _ = write!(
        lines[3],
        "Sink {} L{} K{}",
        if context.sink_ready { "OK" } else { "DOWN" },
        state.current_layer(),
        state.key_press_count()
    );
    let _ = write!(lines[4], "Upd {}us Max {}us", timer.avg_us(), timer.max_us);

    let mut y = STATS_Y;
    for line in &lines {
        Text::with_baseline(line, Point::new(COL1_X, y), style, Baseline::Top)
            .draw(display)
            .ok();
        y += LINE_HEIGHT;
    }
}
