//! Stryke status display simulator.
//!
//! Runs the status screen from `stryke-common` on the desktop. By default a
//! scripted session is played and every frame is printed as text. With the
//! `sdl` feature and `--window`, frames go to an SDL2 window and the desktop
//! keyboard drives the state machine:
//!
//! - F9 / F10: previous / next layer
//! - F11: cycle status, debug and log pages
//! - Escape or closing the window: quit (Escape is also reported as a key)

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

#[cfg(feature = "sdl")]
mod keymap;
mod profiling;
mod screens;
mod script;
mod sink;
mod timing;

use std::time::Instant;

use clap::Parser;
use embedded_graphics::prelude::*;
use stryke_common::boot::BOOT_FRAMES;
use stryke_common::config::TICK_MS;
use stryke_common::profiling::DebugLog;
use stryke_common::{Canvas, FrameSink, Page, StatusConfig, StatusDisplay, StatusFramebuffer, StatusGrayFramebuffer};

use crate::profiling::{FrameTimer, uptime_string};
use crate::screens::{draw_debug_page, draw_logs_page};
use crate::script::{DEMO, SETTLE_MS};
use crate::sink::AsciiSink;
use crate::timing::Clock;

/// Desktop simulator for the Stryke keyboard status display.
#[derive(Parser, Clone, Copy, Debug, Default)]
#[command(name = "simulator", version, about)]
struct Options {
    /// Render on the 8-bit grayscale buffer (enables fading).
    #[arg(long)]
    grayscale: bool,

    /// Fail sink initialization and run without output.
    #[arg(long)]
    degraded: bool,

    /// Include the boot animation frames.
    #[arg(long)]
    boot: bool,

    /// Open an SDL2 window (requires the `sdl` feature).
    #[arg(long)]
    window: bool,
}

fn main() {
    let options = Options::parse();

    if options.window {
        #[cfg(feature = "sdl")]
        {
            if options.grayscale {
                window::run(StatusGrayFramebuffer::new());
            } else {
                window::run(StatusFramebuffer::new());
            }
            return;
        }
        #[cfg(not(feature = "sdl"))]
        {
            eprintln!("--window needs the `sdl` feature");
            std::process::exit(2);
        }
    }

    if options.grayscale {
        run_headless(StatusGrayFramebuffer::new(), options);
    } else {
        run_headless(StatusFramebuffer::new(), options);
    }
}

/// Play the scripted session and print every frame.
fn run_headless<C>(
    canvas: C,
    options: Options,
) where
    C: Canvas + DrawTarget<Color = <C as Canvas>::Color>,
{
    let clock = Clock::new();
    let sink = if options.degraded {
        AsciiSink::failing(std::io::stdout())
    } else {
        AsciiSink::new(std::io::stdout())
    };
    let mut display = StatusDisplay::new(canvas, sink, StatusConfig::default());
    if let Err(err) = display.init() {
        eprintln!("sink init failed ({err}), running without output");
    }

    if options.boot {
        for step in 0..BOOT_FRAMES {
            display.show_boot_frame(step);
        }
    }
    display.show_splash();

    let mut timer = FrameTimer::new();
    let mut printed = display.log().total();
    let mut steps = DEMO.iter().peekable();
    let end = script::duration(DEMO) + SETTLE_MS;

    let mut now = 0;
    while now <= end {
        let started = Instant::now();
        while let Some(step) = steps.next_if(|s| s.at_ms <= now) {
            step.action.apply(&mut display, now);
        }
        display.tick(now);
        timer.record(started.elapsed());

        printed = print_new_log_lines(display.log(), printed);
        now += TICK_MS;
    }

    let uptime = uptime_string(clock.uptime());
    for page in [Page::Debug, Page::Logs] {
        display.set_page(page);
        present_page(&mut display, &timer, &uptime);
    }

    println!("{}", display.stats().summary());
}

/// Draw the current non-status page. The status page is drawn by `tick`.
fn present_page<C, S>(
    display: &mut StatusDisplay<C, S>,
    timer: &FrameTimer,
    uptime: &str,
) where
    C: Canvas + DrawTarget<Color = <C as Canvas>::Color>,
    S: FrameSink<C>,
{
    match display.page() {
        Page::Status => {}
        Page::Debug => display.present_page(|canvas, context| draw_debug_page(canvas, context, timer, uptime)),
        Page::Logs => display.present_page(|canvas, context| draw_logs_page(canvas, context, uptime)),
    }
}

/// Echo log lines pushed since `printed` lines had been seen.
fn print_new_log_lines(
    log: &DebugLog,
    printed: u32,
) -> u32 {
    let fresh = log.total().wrapping_sub(printed) as usize;
    for line in log.iter().skip(log.len().saturating_sub(fresh)) {
        println!("[log] {line}");
    }
    log.total()
}

// =============================================================================
// SDL2 Window
// =============================================================================

#[cfg(feature = "sdl")]
mod window {
    use std::thread;
    use std::time::{Duration, Instant};

    use embedded_graphics::prelude::*;
    use embedded_graphics_simulator::SimulatorEvent;
    use embedded_graphics_simulator::sdl2::Keycode;
    use stryke_common::boot::{BOOT_FRAME_MS, BOOT_FRAMES, SPLASH_MS};
    use stryke_common::keycodes::Modifiers;
    use stryke_common::{Canvas, Event, KeyEvent, Page, StatusConfig, StatusDisplay};

    use crate::keymap::hid_usage;
    use crate::profiling::{FrameTimer, uptime_string};
    use crate::sink::WindowSink;
    use crate::timing::{Clock, FRAME_TIME};

    type WindowDisplay<C> = StatusDisplay<C, WindowSink>;

    pub fn run<C>(canvas: C)
    where
        C: Canvas + DrawTarget<Color = <C as Canvas>::Color>,
    {
        let clock = Clock::new();
        let mut display = StatusDisplay::new(canvas, WindowSink::new("Stryke Status"), StatusConfig::default());
        if let Err(err) = display.init() {
            eprintln!("window init failed: {err}");
            return;
        }

        for step in 0..BOOT_FRAMES {
            display.show_boot_frame(step);
            if !wait(&mut display, Duration::from_millis(BOOT_FRAME_MS)) {
                return;
            }
        }
        display.show_splash();
        if !wait(&mut display, Duration::from_millis(SPLASH_MS)) {
            return;
        }

        let mut timer = FrameTimer::new();
        loop {
            let frame_start = Instant::now();
            let now = clock.now_ms();

            let events: Vec<SimulatorEvent> = display.sink_mut().events().collect();
            for event in events {
                if !handle_event(&mut display, event, now) {
                    return;
                }
            }

            if display.page() == Page::Status {
                display.tick(now);
            } else {
                let uptime = uptime_string(clock.uptime());
                super::present_page(&mut display, &timer, &uptime);
            }
            timer.record(frame_start.elapsed());

            if let Some(rest) = FRAME_TIME.checked_sub(frame_start.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    /// Apply one window event. Returns `false` when the window was closed.
    fn handle_event<C>(
        display: &mut WindowDisplay<C>,
        event: SimulatorEvent,
        now: u64,
    ) -> bool
    where
        C: Canvas,
    {
        match event {
            SimulatorEvent::Quit => return false,
            SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                if repeat {
                    return true;
                }
                let layer = display.state().current_layer();
                match keycode {
                    Keycode::F9 => {
                        display.set_layer(layer.saturating_sub(1), now);
                    }
                    Keycode::F10 => {
                        display.set_layer(layer.saturating_add(1), now);
                    }
                    Keycode::F11 => {
                        let page = display.page().toggle();
                        display.set_page(page);
                        display.log_mut().push(page.title());
                    }
                    _ => send_key(display, keycode, true, now),
                }
            }
            SimulatorEvent::KeyUp { keycode, .. } => send_key(display, keycode, false, now),
            _ => {}
        }
        true
    }

    fn send_key<C: Canvas>(
        display: &mut WindowDisplay<C>,
        keycode: Keycode,
        pressed: bool,
        now: u64,
    ) {
        if let Some(usage) = hid_usage(keycode) {
            display.handle_event(
                Event::Key(KeyEvent {
                    keycode: usage,
                    pressed,
                    modifiers: Modifiers::empty(),
                    timestamp_ms: now,
                }),
                now,
            );
        }
    }

    /// Keep the window responsive for `duration`. Returns `false` on quit.
    fn wait<C: Canvas>(
        display: &mut WindowDisplay<C>,
        duration: Duration,
    ) -> bool {
        let start = Instant::now();
        while start.elapsed() < duration {
            if display
                .sink_mut()
                .events()
                .any(|event| matches!(event, SimulatorEvent::Quit))
            {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_options_parse() {
        let options = Options::try_parse_from(["simulator", "--grayscale", "--boot"]).unwrap();
        assert!(options.grayscale);
        assert!(options.boot);
        assert!(!options.degraded);
        assert!(!options.window);
    }

    #[test]
    fn test_options_defaults() {
        let options = Options::try_parse_from(["simulator"]).unwrap();
        assert!(!options.grayscale && !options.degraded && !options.boot && !options.window);
    }

    #[test]
    fn test_options_reject_unknown() {
        assert!(Options::try_parse_from(["simulator", "--fast"]).is_err());
        assert!(Options::try_parse_from(["simulator", "layer"]).is_err());
    }

    #[test]
    fn test_options_command_valid() { Options::command().debug_assert(); }

    #[test]
    fn test_print_new_log_lines_total() {
        let mut log = DebugLog::new();
        log.push("one");
        let printed = print_new_log_lines(&log, 0);
        assert_eq!(printed, 1);
        log.push("two");
        assert_eq!(print_new_log_lines(&log, printed), 2);
    }
}
