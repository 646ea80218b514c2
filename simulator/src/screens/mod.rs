//! Debug and log pages, drawn with ProFont on the status canvas.

mod debug;
mod logs;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use profont::PROFONT_7_POINT;
use stryke_common::Canvas;
use stryke_common::config::SCREEN_WIDTH;

pub use debug::draw_debug_page;
pub use logs::draw_logs_page;

const COL1_X: i32 = 2;
const LINE_HEIGHT: i32 = 9;
const HEADER_DIVIDER_Y: i32 = 9;

/// Page title on the left, uptime on the right, divider below.
fn draw_header<D>(
    display: &mut D,
    title: &str,
    uptime: &str,
) where
    D: Canvas + DrawTarget<Color = <D as Canvas>::Color>,
{
    let style = MonoTextStyle::new(&PROFONT_7_POINT, D::on());
    let right = TextStyleBuilder::new()
        .alignment(Alignment::Right)
        .baseline(Baseline::Top)
        .build();

    Text::with_baseline(title, Point::new(COL1_X, 0), style, Baseline::Top)
        .draw(display)
        .ok();
    Text::with_text_style(uptime, Point::new(SCREEN_WIDTH as i32 - COL1_X, 0), style, right)
        .draw(display)
        .ok();
    Line::new(
        Point::new(COL1_X, HEADER_DIVIDER_Y),
        Point::new(SCREEN_WIDTH as i32 - COL1_X, HEADER_DIVIDER_Y),
    )
    .into_styled(PrimitiveStyle::with_stroke(D::on(), 1))
    .draw(display)
    .ok();
}
