//! Frame sinks for the desktop.
//!
//! [`AsciiSink`] renders frames as half-block text to any writer, which is
//! what the headless demo and the tests use. [`WindowSink`] (feature `sdl`)
//! shows them in an SDL2 window.

use std::io::Write;

use stryke_common::{Canvas, DisplayError, FrameSink};

/// Levels at or above this count as lit in text output.
const LIT_THRESHOLD: u8 = 64;

/// Prints every frame as text, two pixel rows per line.
pub struct AsciiSink<W: Write> {
    out: W,
    frames: u32,
    fail_init: bool,
}

impl<W: Write> AsciiSink<W> {
    pub const fn new(out: W) -> Self {
        Self {
            out,
            frames: 0,
            fail_init: false,
        }
    }

    /// Sink whose `init` fails, for demonstrating degraded mode.
    pub const fn failing(out: W) -> Self {
        Self {
            out,
            frames: 0,
            fail_init: true,
        }
    }

    /// Frames written so far.
    pub const fn frames(&self) -> u32 { self.frames }

    pub fn into_inner(self) -> W { self.out }
}

impl<C: Canvas, W: Write> FrameSink<C> for AsciiSink<W> {
    fn init(&mut self) -> Result<(), DisplayError> {
        if self.fail_init {
            return Err(DisplayError::Communication);
        }
        Ok(())
    }

    fn blit(
        &mut self,
        frame: &C,
    ) -> Result<(), DisplayError> {
        let text = render_ascii(frame);
        writeln!(self.out, "+{}+", "-".repeat(frame.width() as usize))
            .and_then(|()| self.out.write_all(text.as_bytes()))
            .and_then(|()| writeln!(self.out, "+{}+", "-".repeat(frame.width() as usize)))
            .and_then(|()| self.out.flush())
            .map_err(|_| DisplayError::Communication)?;
        self.frames += 1;
        Ok(())
    }
}

/// Render `frame` with `▀`, `▄` and `█`, one text line per two pixel rows.
pub fn render_ascii<C: Canvas>(frame: &C) -> String {
    let lit = |x: i32, y: i32| frame.get(x, y).is_some_and(|c| C::level(c) >= LIT_THRESHOLD);

    let mut text = String::new();
    for y in (0..frame.height()).step_by(2) {
        text.push('|');
        for x in 0..frame.width() {
            text.push(match (lit(x, y), lit(x, y + 1)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        text.push_str("|\n");
    }
    text
}

// =============================================================================
// SDL2 Window
// =============================================================================

#[cfg(feature = "sdl")]
pub use window::WindowSink;

#[cfg(feature = "sdl")]
mod window {
    use embedded_graphics::pixelcolor::Gray8;
    use embedded_graphics::prelude::*;
    use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
    use stryke_common::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use stryke_common::{Canvas, DisplayError, FrameSink};

    const WINDOW_SCALE: u32 = 4;

    /// Shows frames in a scaled SDL2 window.
    pub struct WindowSink {
        display: SimulatorDisplay<Gray8>,
        window: Window,
    }

    impl WindowSink {
        pub fn new(title: &str) -> Self {
            let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).pixel_spacing(1).build();
            Self {
                display: SimulatorDisplay::new(Size::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32)),
                window: Window::new(title, &output_settings),
            }
        }

        /// Pending window events. Only valid after `init`.
        pub fn events(&mut self) -> impl Iterator<Item = SimulatorEvent> + '_ { self.window.events() }
    }

    impl<C: Canvas> FrameSink<C> for WindowSink {
        fn init(&mut self) -> Result<(), DisplayError> {
            self.display.clear(Gray8::BLACK).ok();
            self.window.update(&self.display);
            Ok(())
        }

        fn blit(
            &mut self,
            frame: &C,
        ) -> Result<(), DisplayError> {
            if frame.width() != SCREEN_WIDTH as i32 || frame.height() != SCREEN_HEIGHT as i32 {
                return Err(DisplayError::BufferOverflow);
            }
            let pixels = (0..frame.height()).flat_map(|y| {
                (0..frame.width()).filter_map(move |x| {
                    frame
                        .get(x, y)
                        .map(|color| Pixel(Point::new(x, y), Gray8::new(C::level(color))))
                })
            });
            self.display.draw_iter(pixels).ok();
            self.window.update(&self.display);
            Ok(())
        }
    }
}
