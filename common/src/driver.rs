//! Refresh driver interface and the composed status display.
//!
//! The physical transport (I2C/SPI command sequences, a desktop window, a test
//! double) lives outside this crate behind [`FrameSink`]. [`StatusDisplay`]
//! ties a canvas, a sink and the [`DisplayState`] together:
//!
//! ```text
//! events ──► DisplayState ──► render_status ──► canvas ──► FrameSink::blit
//!                 ▲                                 ▲
//!                 └──────── tick(now) ──────────────┘   (only when dirty)
//! ```
//!
//! # Degraded Mode
//!
//! [`StatusDisplay::init`] reports a sink failure once. Afterwards the display
//! keeps tracking state and composing frames, but frames are counted as
//! skipped instead of being sent. Runtime blit failures are counted and
//! logged; they never propagate to the caller.

use crate::boot::{BOOT_FRAMES, draw_boot_frame, draw_splash};
use crate::config::StatusConfig;
use crate::framebuffer::Canvas;
use crate::pages::Page;
use crate::profiling::{DebugLog, FrameStats};
use crate::render::{RenderState, render_status};
use crate::state::{DisplayState, Event, EventOutcome};

// =============================================================================
// Errors
// =============================================================================

/// Display transport errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication with the panel failed.
    Communication,
    /// The sink was used before a successful `init`.
    NotInitialized,
    /// The frame does not match the panel size.
    BufferOverflow,
}

impl DisplayError {
    /// Short description for log lines.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Communication => "communication",
            Self::NotInitialized => "not initialized",
            Self::BufferOverflow => "buffer overflow",
        }
    }
}

impl core::fmt::Display for DisplayError {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Frame Sink
// =============================================================================

/// Endpoint that pushes a composed frame to the physical display.
pub trait FrameSink<C: Canvas> {
    /// Bring the transport up. Called once before the first blit.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Send a complete frame.
    fn blit(
        &mut self,
        frame: &C,
    ) -> Result<(), DisplayError>;
}

impl<C: Canvas, S: FrameSink<C> + ?Sized> FrameSink<C> for &mut S {
    fn init(&mut self) -> Result<(), DisplayError> { (**self).init() }

    fn blit(
        &mut self,
        frame: &C,
    ) -> Result<(), DisplayError> {
        (**self).blit(frame)
    }
}

// =============================================================================
// Status Display
// =============================================================================

/// Read-only view handed to custom page renderers.
pub struct PageContext<'a> {
    pub page: Page,
    pub state: &'a DisplayState,
    pub stats: &'a FrameStats,
    pub log: &'a DebugLog,
    pub sink_ready: bool,
}

/// Canvas, sink and state composed into one refresh loop.
pub struct StatusDisplay<C, S> {
    canvas: C,
    sink: S,
    state: DisplayState,
    render: RenderState,
    log: DebugLog,
    stats: FrameStats,
    page: Page,
    sink_ready: bool,
}

impl<C: Canvas, S: FrameSink<C>> StatusDisplay<C, S> {
    /// Compose a display. Nothing is sent until [`StatusDisplay::init`].
    pub fn new(
        canvas: C,
        sink: S,
        config: StatusConfig,
    ) -> Self {
        Self {
            canvas,
            sink,
            state: DisplayState::new(config),
            render: RenderState::new(),
            log: DebugLog::new(),
            stats: FrameStats::new(),
            page: Page::Status,
            sink_ready: false,
        }
    }

    /// Initialize the sink.
    ///
    /// On failure the error is returned once and the display runs degraded.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        match self.sink.init() {
            Ok(()) => {
                self.sink_ready = true;
                self.log.push("sink ready");
                #[cfg(feature = "defmt")]
                defmt::info!("status display: sink ready");
                Ok(())
            }
            Err(err) => {
                self.sink_ready = false;
                self.log_error("sink init: ", err);
                #[cfg(feature = "defmt")]
                defmt::warn!("status display: sink init failed: {}", err);
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub const fn state(&self) -> &DisplayState { &self.state }

    #[inline]
    pub const fn stats(&self) -> &FrameStats { &self.stats }

    #[inline]
    pub const fn log(&self) -> &DebugLog { &self.log }

    /// Mutable log access so drivers can add their own lines.
    #[inline]
    pub fn log_mut(&mut self) -> &mut DebugLog { &mut self.log }

    /// The composed frame.
    #[inline]
    pub const fn canvas(&self) -> &C { &self.canvas }

    #[inline]
    pub const fn sink(&self) -> &S { &self.sink }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S { &mut self.sink }

    /// Whether frames reach the sink (false in degraded mode).
    #[inline]
    pub const fn is_sink_ready(&self) -> bool { self.sink_ready }

    #[inline]
    pub const fn page(&self) -> Page { self.page }

    // -------------------------------------------------------------------------
    // Updates
    // -------------------------------------------------------------------------

    /// Apply an event and redraw immediately if anything changed.
    pub fn handle_event(
        &mut self,
        event: Event,
        now: u64,
    ) -> EventOutcome {
        let outcome = self.state.handle_event(event);
        if outcome.is_changed() && matches!(event, Event::Layer(_)) {
            self.log.push_value("layer ", u32::from(self.state.current_layer()));
        }
        self.after_update(outcome, now)
    }

    /// Show `text` on the key card as a fresh press and redraw.
    pub fn set_key_label(
        &mut self,
        text: &str,
        now: u64,
    ) -> EventOutcome {
        let outcome = self.state.set_key_label(text, now);
        self.after_update(outcome, now)
    }

    /// Highlight layer `index` and redraw.
    pub fn set_layer(
        &mut self,
        index: u8,
        now: u64,
    ) -> EventOutcome {
        let outcome = self.state.set_layer(index);
        self.after_update(outcome, now)
    }

    fn after_update(
        &mut self,
        outcome: EventOutcome,
        now: u64,
    ) -> EventOutcome {
        if outcome.is_changed() && self.page == Page::Status {
            self.redraw(now);
        }
        outcome
    }

    /// Periodic refresh. Redraws and blits only when the frame would differ
    /// from the last one sent. Returns `true` when a frame was drawn.
    pub fn tick(
        &mut self,
        now: u64,
    ) -> bool {
        self.stats.record_tick();
        if self.page != Page::Status {
            return false;
        }
        let phase = self.state.phase(now, C::GRAYSCALE);
        if !self.render.is_dirty(self.state.revision(), phase, self.page) {
            return false;
        }
        self.redraw(now);
        true
    }

    /// Compose the status screen and send it, regardless of dirty state.
    pub fn redraw(
        &mut self,
        now: u64,
    ) {
        let phase = self.state.phase(now, C::GRAYSCALE);
        render_status(&mut self.canvas, &self.state, now);
        self.stats.record_redraw();
        self.present();
        self.render.end_frame(self.state.revision(), phase, Page::Status);
    }

    // -------------------------------------------------------------------------
    // Pages
    // -------------------------------------------------------------------------

    /// Switch pages. The status screen is redrawn on the next tick when it
    /// becomes visible again.
    pub fn set_page(
        &mut self,
        page: Page,
    ) {
        if page != self.page {
            self.page = page;
            self.render.mark_display_cleared();
        }
    }

    /// Draw a non-status page with `draw` and send it.
    pub fn present_page<F>(
        &mut self,
        draw: F,
    ) where
        F: FnOnce(&mut C, &PageContext<'_>),
    {
        let context = PageContext {
            page: self.page,
            state: &self.state,
            stats: &self.stats,
            log: &self.log,
            sink_ready: self.sink_ready,
        };
        draw(&mut self.canvas, &context);
        self.stats.record_redraw();
        self.present();
        self.render.mark_display_cleared();
    }

    // -------------------------------------------------------------------------
    // Boot Splash
    // -------------------------------------------------------------------------

    /// Send boot animation frame `step` (`0..BOOT_FRAMES`).
    pub fn show_boot_frame(
        &mut self,
        step: usize,
    ) {
        draw_boot_frame(&mut self.canvas, step.min(BOOT_FRAMES - 1));
        self.present();
        self.render.mark_display_cleared();
    }

    /// Send the splash screen shown after the boot animation.
    pub fn show_splash(&mut self) {
        draw_splash(&mut self.canvas);
        self.present();
        self.render.mark_display_cleared();
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    fn present(&mut self) {
        if !self.sink_ready {
            self.stats.record_skipped();
            return;
        }
        match self.sink.blit(&self.canvas) {
            Ok(()) => self.stats.record_blit(),
            Err(err) => {
                self.stats.record_blit_failure();
                self.log_error("blit: ", err);
                #[cfg(feature = "defmt")]
                defmt::warn!("status display: blit failed: {}", err);
            }
        }
    }

    fn log_error(
        &mut self,
        context: &str,
        err: DisplayError,
    ) {
        let mut line: heapless::String<32> = heapless::String::new();
        crate::profiling::push_str_truncated(&mut line, context);
        crate::profiling::push_str_truncated(&mut line, err.as_str());
        self.log.push(&line);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
