//! Low-level drawing primitives shared by the status screen and boot splash.
//!
//! Everything here draws through [`Canvas`] and clips to its bounds, so callers
//! can pass any coordinates without checking them first.

use core::ops::RangeInclusive;

use crate::framebuffer::Canvas;

// =============================================================================
// Clipped Writes
// =============================================================================
//
// Geometry is computed in i64. Every loop is bounded by the canvas, not by
// the shape.

/// Set one pixel given wide coordinates. Off-canvas pixels are skipped.
#[inline]
fn plot<C: Canvas>(
    canvas: &mut C,
    x: i64,
    y: i64,
    color: C::Color,
) {
    if x >= 0 && y >= 0 && x < i64::from(canvas.width()) && y < i64::from(canvas.height()) {
        canvas.set(x as i32, y as i32, color);
    }
}

/// Fill the horizontal run `x0..x1` (exclusive) on row `y`, clipped.
fn fill_span<C: Canvas>(
    canvas: &mut C,
    x0: i64,
    x1: i64,
    y: i64,
    color: C::Color,
) {
    if y < 0 || y >= i64::from(canvas.height()) {
        return;
    }
    let start = x0.max(0);
    let end = x1.min(i64::from(canvas.width()));
    for x in start..end {
        canvas.set(x as i32, y as i32, color);
    }
}

/// Fill the area `x0..x1` x `y0..y1` (exclusive ends), clipped.
fn fill_area<C: Canvas>(
    canvas: &mut C,
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
    color: C::Color,
) {
    for y in y0.max(0)..y1.min(i64::from(canvas.height())) {
        fill_span(canvas, x0, x1, y, color);
    }
}

/// Rows of the canvas inside `top..=bottom`.
#[inline]
fn visible_rows<C: Canvas>(
    canvas: &C,
    top: i64,
    bottom: i64,
) -> RangeInclusive<i64> {
    top.max(0)..=bottom.min(i64::from(canvas.height()) - 1)
}

// =============================================================================
// Lines
// =============================================================================

/// Round `num / den` to the nearest integer, halves towards positive. `den > 0`.
#[inline]
const fn div_round(
    num: i128,
    den: i128,
) -> i128 {
    (2 * num + den).div_euclid(2 * den)
}

/// Draw a line, endpoints inclusive.
///
/// Bresenham's pixel choice computed in closed form: one pixel per step along
/// the major axis, at the minor coordinate nearest the ideal line (exact
/// halves round towards positive). Only the steps that fall on the canvas are
/// visited, so arbitrarily long lines cost at most one canvas side.
///
/// The line is always evaluated from the lexicographically smaller endpoint,
/// so `draw_line(a, b)` and `draw_line(b, a)` light exactly the same pixels.
pub fn draw_line<C: Canvas>(
    canvas: &mut C,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: C::Color,
) {
    let ((x0, y0), (x1, y1)) = if (x1, y1) < (x0, y0) {
        ((x1, y1), (x0, y0))
    } else {
        ((x0, y0), (x1, y1))
    };
    let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    let (dx, dy) = (x1 - x0, y1 - y0);
    let (w, h) = (i64::from(canvas.width()), i64::from(canvas.height()));

    if dx == 0 && dy == 0 {
        plot(canvas, x0, y0, color);
        return;
    }

    if dx >= dy.abs() {
        // x-major; canonical order guarantees dx > 0 here
        for x in x0.max(0)..=x1.min(w - 1) {
            let y = i128::from(y0) + div_round(i128::from(x - x0) * i128::from(dy), i128::from(dx));
            if (0..i128::from(h)).contains(&y) {
                canvas.set(x as i32, y as i32, color);
            }
        }
    } else {
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        let (num_sign, den) = if dy > 0 { (1, dy) } else { (-1, -dy) };
        for y in top.max(0)..=bottom.min(h - 1) {
            let step = i128::from(num_sign * (y - y0)) * i128::from(dx);
            let x = i128::from(x0) + div_round(step, i128::from(den));
            if (0..i128::from(w)).contains(&x) {
                canvas.set(x as i32, y as i32, color);
            }
        }
    }
}

// =============================================================================
// Rectangles
// =============================================================================

/// Draw a 1px rectangle outline. Non-positive sizes draw nothing.
pub fn draw_rect<C: Canvas>(
    canvas: &mut C,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: C::Color,
) {
    if w <= 0 || h <= 0 {
        return;
    }
    let (x, y) = (i64::from(x), i64::from(y));
    let right = x + i64::from(w) - 1;
    let bottom = y + i64::from(h) - 1;

    fill_span(canvas, x, right + 1, y, color);
    fill_span(canvas, x, right + 1, bottom, color);
    for row in visible_rows(canvas, y, bottom) {
        plot(canvas, x, row, color);
        plot(canvas, right, row, color);
    }
}

/// Fill a rectangle. Non-positive sizes draw nothing.
pub fn draw_filled_rect<C: Canvas>(
    canvas: &mut C,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    color: C::Color,
) {
    if w <= 0 || h <= 0 {
        return;
    }
    let (x, y) = (i64::from(x), i64::from(y));
    fill_area(canvas, x, y, x + i64::from(w), y + i64::from(h), color);
}

/// Clamp a corner radius to `[0, min(w, h) / 2]`.
#[inline]
pub fn clamp_radius(
    w: i32,
    h: i32,
    r: i32,
) -> i32 {
    r.clamp(0, (w.min(h) / 2).max(0))
}

/// Whether `(i, j)` lies inside the quarter disc of radius `r`.
#[inline]
const fn in_disc(
    i: i64,
    j: i64,
    r: i64,
) -> bool {
    i * i + j * j <= r * r
}

/// Offsets `k` in `0..=r` for which `center + dir * k` lands in `0..limit`.
fn arc_offsets(
    center: i64,
    dir: i64,
    r: i64,
    limit: i64,
) -> RangeInclusive<i64> {
    let (lo, hi) = if dir > 0 {
        (-center, limit - 1 - center)
    } else {
        (center - (limit - 1), center)
    };
    lo.max(0)..=hi.min(r)
}

/// Corner centers and radius of a rounded rect, in wide coordinates.
struct Corners {
    left: i64,
    right: i64,
    top: i64,
    bottom: i64,
    r: i64,
}

impl Corners {
    fn new(
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        r: i32,
    ) -> Self {
        let (x, y, r) = (i64::from(x), i64::from(y), i64::from(r));
        Self {
            left: x + r,
            right: x + i64::from(w) - 1 - r,
            top: y + r,
            bottom: y + i64::from(h) - 1 - r,
            r,
        }
    }

    /// Call `plot(i, j, px, py)` for every on-canvas cell of the four quarter
    /// squares around the corner centers.
    fn for_each_visible<C: Canvas>(
        &self,
        canvas: &mut C,
        mut visit: impl FnMut(&mut C, i64, i64, i64, i64),
    ) {
        let (w, h) = (i64::from(canvas.width()), i64::from(canvas.height()));
        for (cx, sx) in [(self.left, -1), (self.right, 1)] {
            for (cy, sy) in [(self.top, -1), (self.bottom, 1)] {
                for i in arc_offsets(cx, sx, self.r, w) {
                    for j in arc_offsets(cy, sy, self.r, h) {
                        visit(canvas, i, j, cx + sx * i, cy + sy * j);
                    }
                }
            }
        }
    }
}

/// Draw a rounded rectangle outline.
///
/// Straight edges run between the corner arcs; each arc is the outer boundary
/// of the quarter disc `i² + j² <= r²` around the corner center.
pub fn draw_rounded_rect<C: Canvas>(
    canvas: &mut C,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    r: i32,
    color: C::Color,
) {
    if w <= 0 || h <= 0 {
        return;
    }
    let r = clamp_radius(w, h, r);
    if r == 0 {
        draw_rect(canvas, x, y, w, h, color);
        return;
    }

    let corners = Corners::new(x, y, w, h, r);
    let (left, top) = (i64::from(x), i64::from(y));
    let right = left + i64::from(w) - 1;
    let bottom = top + i64::from(h) - 1;

    // Straight edges
    fill_span(canvas, corners.left, corners.right + 1, top, color);
    fill_span(canvas, corners.left, corners.right + 1, bottom, color);
    for row in visible_rows(canvas, corners.top, corners.bottom) {
        plot(canvas, left, row, color);
        plot(canvas, right, row, color);
    }

    // Corner arcs
    let r = corners.r;
    corners.for_each_visible(canvas, |canvas, i, j, px, py| {
        if in_disc(i, j, r) && (!in_disc(i + 1, j, r) || !in_disc(i, j + 1, r)) {
            plot(canvas, px, py, color);
        }
    });
}

/// Fill a rounded rectangle: center block, two side strips and four filled
/// quarter discs.
pub fn draw_filled_rounded_rect<C: Canvas>(
    canvas: &mut C,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    r: i32,
    color: C::Color,
) {
    if w <= 0 || h <= 0 {
        return;
    }
    let r = clamp_radius(w, h, r);
    let corners = Corners::new(x, y, w, h, r);
    let (left, top) = (i64::from(x), i64::from(y));
    let right = left + i64::from(w);
    let bottom = top + i64::from(h);

    fill_area(canvas, corners.left, top, corners.right + 1, bottom, color);
    fill_area(canvas, left, corners.top, corners.left, corners.bottom + 1, color);
    fill_area(canvas, corners.right + 1, corners.top, right, corners.bottom + 1, color);

    if r == 0 {
        return;
    }
    let r = corners.r;
    corners.for_each_visible(canvas, |canvas, i, j, px, py| {
        if in_disc(i, j, r) {
            plot(canvas, px, py, color);
        }
    });
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embedded_graphics::Pixel;
    use embedded_graphics::pixelcolor::BinaryColor;

    use super::*;
    use crate::framebuffer::StatusFramebuffer;

    const ON: BinaryColor = BinaryColor::On;

    #[test]
    fn test_horizontal_line_inclusive() {
        let mut fb = StatusFramebuffer::new();
        draw_line(&mut fb, 10, 5, 20, 5, ON);
        assert_eq!(fb.count_lit(), 11);
        assert!(fb.get_pixel(10, 5));
        assert!(fb.get_pixel(20, 5));
    }

    #[test]
    fn test_single_point_line() {
        let mut fb = StatusFramebuffer::new();
        draw_line(&mut fb, 3, 3, 3, 3, ON);
        assert_eq!(fb.count_lit(), 1);
    }

    #[test]
    fn test_line_symmetry() {
        let cases = [(0, 0, 127, 63), (5, 40, 90, 3), (100, 2, 7, 60), (-20, 10, 140, 50), (30, 0, 31, 63)];
        for &(x0, y0, x1, y1) in &cases {
            let mut forward = StatusFramebuffer::new();
            let mut backward = StatusFramebuffer::new();
            draw_line(&mut forward, x0, y0, x1, y1, ON);
            draw_line(&mut backward, x1, y1, x0, y0, ON);
            assert!(forward == backward, "line {x0},{y0} -> {x1},{y1} is not symmetric");
        }
    }

    #[test]
    fn test_line_off_screen_clipped() {
        let mut fb = StatusFramebuffer::new();
        draw_line(&mut fb, -1000, -5, -10, 70, ON);
        assert_eq!(fb.count_lit(), 0);

        draw_line(&mut fb, -10, 10, 200, 10, ON);
        assert_eq!(fb.count_lit(), 128);
    }

    #[test]
    fn test_line_huge_endpoints() {
        let mut fb = StatusFramebuffer::new();
        draw_line(&mut fb, 0, 0, i32::MAX, 0, ON);
        assert_eq!(fb.count_lit(), 128);

        let mut fb = StatusFramebuffer::new();
        draw_line(&mut fb, i32::MIN, 5, i32::MAX, 5, ON);
        assert_eq!(fb.count_lit(), 128);
        assert!(fb.get_pixel(0, 5) && fb.get_pixel(127, 5));

        // Steep and reversed: one pixel per visible row
        let mut fb = StatusFramebuffer::new();
        draw_line(&mut fb, 3, i32::MAX, 3, i32::MIN, ON);
        assert_eq!(fb.count_lit(), 64);

        let mut fb = StatusFramebuffer::new();
        draw_line(&mut fb, i32::MIN, i32::MIN, i32::MAX, i32::MAX, ON);
        let mut reversed = StatusFramebuffer::new();
        draw_line(&mut reversed, i32::MAX, i32::MAX, i32::MIN, i32::MIN, ON);
        assert!(fb == reversed);
        assert_eq!(fb.count_lit(), 64);
    }

    #[test]
    fn test_diagonal_line_matches_stepping() {
        let mut fb = StatusFramebuffer::new();
        draw_line(&mut fb, 0, 0, 9, 3, ON);
        let expected = [(0, 0), (1, 0), (2, 1), (3, 1), (4, 1), (5, 2), (6, 2), (7, 2), (8, 3), (9, 3)];
        assert_eq!(fb.count_lit(), 10);
        assert!(expected.iter().all(|&(x, y)| fb.get_pixel(x, y)));
    }

    #[test]
    fn test_rect_outline() {
        let mut fb = StatusFramebuffer::new();
        draw_rect(&mut fb, 2, 2, 10, 5, ON);
        assert_eq!(fb.count_lit(), 2 * 10 + 2 * 3);
        assert!(fb.get_pixel(11, 6));
        assert!(!fb.get_pixel(5, 4));
    }

    #[test]
    fn test_rect_degenerate_sizes() {
        let mut fb = StatusFramebuffer::new();
        draw_rect(&mut fb, 5, 5, 0, 10, ON);
        draw_rect(&mut fb, 5, 5, 10, -1, ON);
        draw_filled_rect(&mut fb, 5, 5, -3, 3, ON);
        draw_rounded_rect(&mut fb, 5, 5, 0, 0, 4, ON);
        draw_filled_rounded_rect(&mut fb, 5, 5, 6, 0, 2, ON);
        assert_eq!(fb.count_lit(), 0);

        draw_rect(&mut fb, 5, 5, 1, 1, ON);
        assert_eq!(fb.count_lit(), 1);
    }

    #[test]
    fn test_extreme_coordinates_clipped() {
        let mut fb = StatusFramebuffer::new();
        draw_rect(&mut fb, i32::MAX - 2, i32::MAX - 2, i32::MAX, i32::MAX, ON);
        draw_filled_rect(&mut fb, i32::MAX - 2, 0, 10, 10, ON);
        draw_rounded_rect(&mut fb, i32::MAX - 2, 0, 10, 10, 4, ON);
        draw_filled_rounded_rect(&mut fb, i32::MAX - 2, 0, 10, 10, 4, ON);
        draw_filled_rounded_rect(&mut fb, i32::MIN, i32::MIN, 10, 10, 4, ON);
        assert_eq!(fb.count_lit(), 0);

        // Everything visible lies in the straight interior of a huge shape
        draw_rounded_rect(&mut fb, -50_000, -50_000, 100_000, 100_000, 50_000, ON);
        assert_eq!(fb.count_lit(), 0);
        draw_filled_rounded_rect(&mut fb, -50_000, -50_000, 100_000, 100_000, 50_000, ON);
        assert_eq!(fb.count_lit(), 128 * 64);

        let mut fb = StatusFramebuffer::new();
        draw_filled_rect(&mut fb, i32::MIN, i32::MIN, i32::MAX, i32::MAX, ON);
        assert_eq!(fb.count_lit(), 0);
        draw_filled_rect(&mut fb, -10, -10, i32::MAX, i32::MAX, ON);
        assert_eq!(fb.count_lit(), 128 * 64);
    }

    #[test]
    fn test_filled_rect_area_and_clipping() {
        let mut fb = StatusFramebuffer::new();
        draw_filled_rect(&mut fb, 0, 0, 4, 3, ON);
        assert_eq!(fb.count_lit(), 12);

        let mut fb = StatusFramebuffer::new();
        draw_filled_rect(&mut fb, 120, 60, 50, 50, ON);
        assert_eq!(fb.count_lit(), 8 * 4);
    }

    #[test]
    fn test_radius_clamped() {
        assert_eq!(clamp_radius(10, 6, 8), 3);
        assert_eq!(clamp_radius(10, 6, -2), 0);
        assert_eq!(clamp_radius(10, 6, 2), 2);
    }

    #[test]
    fn test_rounded_rect_corners_cut() {
        let mut fb = StatusFramebuffer::new();
        draw_rounded_rect(&mut fb, 10, 10, 30, 20, 6, ON);
        // Corners of the bounding box stay dark
        assert!(!fb.get_pixel(10, 10));
        assert!(!fb.get_pixel(39, 10));
        assert!(!fb.get_pixel(10, 29));
        assert!(!fb.get_pixel(39, 29));
        // Edge midpoints are lit
        assert!(fb.get_pixel(25, 10));
        assert!(fb.get_pixel(25, 29));
        assert!(fb.get_pixel(10, 20));
        assert!(fb.get_pixel(39, 20));
        // Interior stays empty
        assert!(!fb.get_pixel(25, 20));
    }

    #[test]
    fn test_rounded_rect_mirror_symmetric() {
        let mut fb = StatusFramebuffer::new();
        let (x, y, w, h) = (4, 4, 40, 24);
        draw_rounded_rect(&mut fb, x, y, w, h, 8, ON);
        for dy in 0..h {
            for dx in 0..w {
                let here = fb.get_pixel(x + dx, y + dy);
                assert_eq!(here, fb.get_pixel(x + w - 1 - dx, y + dy));
                assert_eq!(here, fb.get_pixel(x + dx, y + h - 1 - dy));
            }
        }
    }

    #[test]
    fn test_filled_rounded_rect_contains_outline() {
        let mut outline = StatusFramebuffer::new();
        let mut filled = StatusFramebuffer::new();
        draw_rounded_rect(&mut outline, 2, 2, 124, 36, 8, ON);
        draw_filled_rounded_rect(&mut filled, 2, 2, 124, 36, 8, ON);

        for Pixel(point, color) in outline.pixels() {
            if color.is_on() {
                assert!(filled.get_pixel(point.x, point.y), "outline pixel {point:?} not filled");
            }
        }
        assert!(!filled.get_pixel(2, 2));
        assert!(filled.get_pixel(64, 20));
    }

    #[test]
    fn test_filled_rounded_rect_zero_radius_is_rect() {
        let mut fb = StatusFramebuffer::new();
        draw_filled_rounded_rect(&mut fb, 0, 0, 5, 4, 0, ON);
        assert_eq!(fb.count_lit(), 20);
    }
}
