//! Status display core for the Stryke split keyboard.
//!
//! This crate contains the platform-agnostic half of the OLED status screen,
//! shared between the desktop simulator and keyboard firmware:
//!
//! - [`config`]: Panel geometry, timing and [`StatusConfig`]
//! - [`framebuffer`]: The [`Canvas`] trait with monochrome and grayscale buffers
//! - [`primitives`]: Lines, rectangles and rounded rectangles
//! - [`font`]: Built-in 5x7 bitmap font with integer scaling
//! - [`layout`]: Combo segmentation, best-fit scale and label placement
//! - [`keycodes`]: HID usage names and modifier tracking
//! - [`state`]: Events and the [`DisplayState`] machine
//! - [`animations`]: Press fade timing and level blending
//! - [`render`]: Status screen composition and dirty tracking
//! - [`driver`]: [`FrameSink`] transport seam and the composed [`StatusDisplay`]
//! - [`boot`]: Boot animation and splash screen
//! - [`pages`]: Page navigation enum
//! - [`profiling`]: Debug log buffer and frame counters
//!
//! # no_std Compatibility
//!
//! This crate is `no_std`, allocation-free and clock-free. Callers pass the
//! current time in milliseconds; nothing here blocks.

#![no_std]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod animations;
pub mod boot;
pub mod config;
pub mod driver;
pub mod font;
pub mod framebuffer;
pub mod keycodes;
pub mod layout;
pub mod pages;
pub mod primitives;
pub mod profiling;
pub mod render;
pub mod state;

// Re-export commonly used items
pub use config::{IndicatorStyle, SCREEN_HEIGHT, SCREEN_WIDTH, StatusConfig};
pub use driver::{DisplayError, FrameSink, PageContext, StatusDisplay};
pub use framebuffer::{Canvas, GrayFramebuffer, Framebuffer, StatusFramebuffer, StatusGrayFramebuffer};
pub use keycodes::{Modifier, Modifiers};
pub use pages::Page;
pub use state::{DisplayState, Event, EventOutcome, KeyEvent, LayerEvent, PressPhase};
