//! Pixel buffers the status screen is composed into.
//!
//! Two buffer types are provided:
//!
//! - [`Framebuffer`]: packed 1 bit per pixel in SSD1306/SH1106 page order, ready
//!   to be streamed to the panel byte by byte
//! - [`GrayFramebuffer`]: one byte of luminance per pixel for targets that can
//!   show intermediate brightness (needed for the fade-out phase)
//!
//! Both implement [`Canvas`], which is what the primitive renderer, the font
//! renderer and the layout engine draw through, and both implement
//! embedded-graphics `DrawTarget` so stock fonts can be used on top.
//!
//! # Page Layout
//!
//! The 1bpp buffer is organised as `PAGES` rows of `W` bytes. Byte `x` of page
//! `p` holds pixels `(x, 8p)..=(x, 8p + 7)`, least significant bit on top:
//!
//! ```text
//! byte index = x + (y / 8) * W
//! bit        = y & 7
//! ```
//!
//! All writes are clipped: coordinates outside the buffer are ignored.

use core::convert::Infallible;

use embedded_graphics::Pixel;
use embedded_graphics::pixelcolor::{BinaryColor, Gray8, GrayColor, PixelColor};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Point, Size};

use crate::config::{SCREEN_HEIGHT, SCREEN_PAGES, SCREEN_WIDTH};

// =============================================================================
// Canvas Trait
// =============================================================================

/// A fixed-size pixel grid that drawing routines can write into.
///
/// Colors are addressed either natively (`Self::Color`) or through an
/// intensity level `0..=255` via [`Canvas::shade`], which lets the renderer
/// express "dimmed" styles without knowing the pixel format.
pub trait Canvas {
    /// Native pixel color.
    type Color: PixelColor;

    /// Whether intermediate intensity levels are visible on this target.
    const GRAYSCALE: bool;

    /// Width in pixels.
    fn width(&self) -> i32;

    /// Height in pixels.
    fn height(&self) -> i32;

    /// Write one pixel. Out-of-bounds coordinates are ignored.
    fn set(
        &mut self,
        x: i32,
        y: i32,
        color: Self::Color,
    );

    /// Read one pixel, `None` outside the buffer.
    fn get(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Self::Color>;

    /// Fill the whole buffer with one color.
    fn fill(
        &mut self,
        color: Self::Color,
    );

    /// Map an intensity level to the native color.
    fn shade(level: u8) -> Self::Color;

    /// Map a native color back to an intensity level.
    fn level(color: Self::Color) -> u8;

    /// Foreground (lit) color.
    #[inline]
    fn on() -> Self::Color { Self::shade(u8::MAX) }

    /// Background (unlit) color.
    #[inline]
    fn off() -> Self::Color { Self::shade(0) }

    /// Reset the buffer to the background color.
    #[inline]
    fn clear(&mut self) { self.fill(Self::off()); }

    /// Check whether a coordinate is inside the buffer.
    #[inline]
    fn contains(
        &self,
        x: i32,
        y: i32,
    ) -> bool {
        x >= 0 && y >= 0 && x < self.width() && y < self.height()
    }
}

// =============================================================================
// Monochrome Framebuffer
// =============================================================================

/// Framebuffer for the Stryke panel (128x64, 1bpp).
pub type StatusFramebuffer = Framebuffer<SCREEN_WIDTH, SCREEN_PAGES>;

/// Packed 1 bit per pixel framebuffer, `W` pixels wide and `PAGES * 8` tall.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer<const W: usize, const PAGES: usize> {
    pages: [[u8; W]; PAGES],
}

impl<const W: usize, const PAGES: usize> Framebuffer<W, PAGES> {
    /// Height in pixels.
    pub const HEIGHT: usize = PAGES * 8;

    /// Create a cleared framebuffer.
    pub const fn new() -> Self { Self { pages: [[0; W]; PAGES] } }

    /// Turn a pixel on or off. No-op outside the buffer.
    #[inline]
    pub fn set_pixel(
        &mut self,
        x: i32,
        y: i32,
        on: bool,
    ) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= W || y >= Self::HEIGHT {
            return;
        }
        let mask = 1u8 << (y & 7);
        let byte = &mut self.pages[y / 8][x];
        if on {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Read a pixel. Pixels outside the buffer read as off.
    #[inline]
    pub fn get_pixel(
        &self,
        x: i32,
        y: i32,
    ) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= W || y >= Self::HEIGHT {
            return false;
        }
        self.pages[y / 8][x] & (1 << (y & 7)) != 0
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) {
        for page in &mut self.pages {
            page.fill(0);
        }
    }

    /// Page-organised view of the buffer (one `[u8; W]` per 8 rows).
    #[inline]
    pub const fn as_pages(&self) -> &[[u8; W]; PAGES] { &self.pages }

    /// The buffer as one contiguous byte slice in panel transfer order.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] { self.pages.as_flattened() }

    /// Number of lit pixels.
    pub fn count_lit(&self) -> u32 {
        self.pages
            .iter()
            .flat_map(|page| page.iter())
            .map(|byte| byte.count_ones())
            .sum()
    }

    /// Iterate over every pixel in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<BinaryColor>> + '_ {
        (0..Self::HEIGHT as i32).flat_map(move |y| {
            (0..W as i32).map(move |x| Pixel(Point::new(x, y), BinaryColor::from(self.get_pixel(x, y))))
        })
    }
}

impl<const W: usize, const PAGES: usize> Default for Framebuffer<W, PAGES> {
    fn default() -> Self { Self::new() }
}

impl<const W: usize, const PAGES: usize> Canvas for Framebuffer<W, PAGES> {
    type Color = BinaryColor;

    const GRAYSCALE: bool = false;

    #[inline]
    fn width(&self) -> i32 { W as i32 }

    #[inline]
    fn height(&self) -> i32 { Self::HEIGHT as i32 }

    #[inline]
    fn set(
        &mut self,
        x: i32,
        y: i32,
        color: BinaryColor,
    ) {
        self.set_pixel(x, y, color.is_on());
    }

    fn get(
        &self,
        x: i32,
        y: i32,
    ) -> Option<BinaryColor> {
        self.contains(x, y).then(|| BinaryColor::from(self.get_pixel(x, y)))
    }

    fn fill(
        &mut self,
        color: BinaryColor,
    ) {
        let byte = if color.is_on() { 0xFF } else { 0x00 };
        for page in &mut self.pages {
            page.fill(byte);
        }
    }

    #[inline]
    fn shade(level: u8) -> BinaryColor { BinaryColor::from(level > 0) }

    #[inline]
    fn level(color: BinaryColor) -> u8 { if color.is_on() { u8::MAX } else { 0 } }
}

impl<const W: usize, const PAGES: usize> OriginDimensions for Framebuffer<W, PAGES> {
    fn size(&self) -> Size { Size::new(W as u32, Self::HEIGHT as u32) }
}

impl<const W: usize, const PAGES: usize> DrawTarget for Framebuffer<W, PAGES> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<BinaryColor>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color.is_on());
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: BinaryColor,
    ) -> Result<(), Self::Error> {
        Canvas::fill(self, color);
        Ok(())
    }
}

// =============================================================================
// Grayscale Framebuffer
// =============================================================================

/// Grayscale framebuffer for the Stryke panel geometry.
pub type StatusGrayFramebuffer = GrayFramebuffer<SCREEN_WIDTH, SCREEN_HEIGHT>;

/// One byte of luminance per pixel, `W` x `H`.
#[derive(Clone, PartialEq, Eq)]
pub struct GrayFramebuffer<const W: usize, const H: usize> {
    rows: [[u8; W]; H],
}

impl<const W: usize, const H: usize> GrayFramebuffer<W, H> {
    /// Create a black framebuffer.
    pub const fn new() -> Self { Self { rows: [[0; W]; H] } }

    /// Set every pixel to black.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(0);
        }
    }

    /// Set a pixel's luminance. No-op outside the buffer.
    #[inline]
    pub fn set_level(
        &mut self,
        x: i32,
        y: i32,
        level: u8,
    ) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < W && y < H {
            self.rows[y][x] = level;
        }
    }

    /// Read a pixel's luminance. Pixels outside the buffer read as 0.
    #[inline]
    pub fn get_level(
        &self,
        x: i32,
        y: i32,
    ) -> u8 {
        if x < 0 || y < 0 {
            return 0;
        }
        let (x, y) = (x as usize, y as usize);
        if x < W && y < H { self.rows[y][x] } else { 0 }
    }

    /// Row-major view of the buffer.
    #[inline]
    pub const fn as_rows(&self) -> &[[u8; W]; H] { &self.rows }

    /// Iterate over every pixel in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<Gray8>> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &level)| Pixel(Point::new(x as i32, y as i32), Gray8::new(level)))
        })
    }
}

impl<const W: usize, const H: usize> Default for GrayFramebuffer<W, H> {
    fn default() -> Self { Self::new() }
}

impl<const W: usize, const H: usize> Canvas for GrayFramebuffer<W, H> {
    type Color = Gray8;

    const GRAYSCALE: bool = true;

    #[inline]
    fn width(&self) -> i32 { W as i32 }

    #[inline]
    fn height(&self) -> i32 { H as i32 }

    #[inline]
    fn set(
        &mut self,
        x: i32,
        y: i32,
        color: Gray8,
    ) {
        self.set_level(x, y, color.luma());
    }

    fn get(
        &self,
        x: i32,
        y: i32,
    ) -> Option<Gray8> {
        self.contains(x, y).then(|| Gray8::new(self.get_level(x, y)))
    }

    fn fill(
        &mut self,
        color: Gray8,
    ) {
        for row in &mut self.rows {
            row.fill(color.luma());
        }
    }

    #[inline]
    fn shade(level: u8) -> Gray8 { Gray8::new(level) }

    #[inline]
    fn level(color: Gray8) -> u8 { color.luma() }
}

impl<const W: usize, const H: usize> OriginDimensions for GrayFramebuffer<W, H> {
    fn size(&self) -> Size { Size::new(W as u32, H as u32) }
}

impl<const W: usize, const H: usize> DrawTarget for GrayFramebuffer<W, H> {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Gray8>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_level(coord.x, coord.y, color.luma());
        }
        Ok(())
    }

    fn clear(
        &mut self,
        color: Gray8,
    ) -> Result<(), Self::Error> {
        Canvas::fill(self, color);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
