//! Log page: the most recent driver log lines, oldest first.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use profont::PROFONT_7_POINT;
use stryke_common::{Canvas, PageContext};

use super::{COL1_X, LINE_HEIGHT, draw_header};

const LOG_Y: i32 = 10;
const PROMPT_WIDTH: i32 = 8;

pub fn draw_logs_page<D>(
    display: &mut D,
    context: &PageContext<'_>,
    uptime: &str,
) where
    D: Canvas + DrawTarget<Color = <D as Canvas>::Color>,
{
    Canvas::clear(display);
    draw_header(display, context.page.title(), uptime);

    let style = MonoTextStyle::new(&PROFONT_7_POINT, D::on());
    let mut y = LOG_Y;

    for line in context.log.iter() {
        Text::with_baseline(">", Point::new(COL1_X, y), style, Baseline::Top)
            .draw(display)
            .ok();
        Text::with_baseline(line, Point::new(COL1_X + PROMPT_WIDTH, y), style, Baseline::Top)
            .draw(display)
            .ok();
        y += LINE_HEIGHT;
    }

    if context.log.is_empty() {
        Text::with_baseline("> _", Point::new(COL1_X, y), style, Baseline::Top)
            .draw(display)
            .ok();
    }
}
