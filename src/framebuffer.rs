//! In-memory pixel buffer and drawing primitives.
//!
//! The buffer is `WIDTH * HEIGHT * 2` bytes of RGB565 and never reallocates;
//! drawing only ever mutates it in place. Nothing here touches the bus —
//! pushing pixels to the panel is the driver's job.

use core::convert::TryInto;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{OriginDimensions, Size};
use embedded_graphics::Pixel;

use crate::font;
use crate::{color, BUFFER_LEN, HEIGHT, WIDTH};

/// An owned 128x128 RGB565 pixel buffer.
///
/// Out-of-bounds coordinates are clipped: `set_pixel` is a no-op,
/// `get_pixel` returns `None`, and the rectangle primitives draw only the
/// in-bounds part.
pub struct Framebuffer {
    buffer: [u8; BUFFER_LEN],
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            buffer: [0; BUFFER_LEN],
        }
    }

    /// The raw buffer, in wire order.
    pub fn data(&self) -> &[u8] {
        &self.buffer
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u16) {
        if x < WIDTH && y < HEIGHT {
            let idx = (y * WIDTH + x) * 2;
            self.buffer[idx..idx + 2].copy_from_slice(&color.to_le_bytes());
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<u16> {
        if x < WIDTH && y < HEIGHT {
            let idx = (y * WIDTH + x) * 2;
            Some(u16::from_le_bytes([self.buffer[idx], self.buffer[idx + 1]]))
        } else {
            None
        }
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: u16) {
        let bytes = color.to_le_bytes();
        for chunk in self.buffer.chunks_exact_mut(2) {
            chunk[0] = bytes[0];
            chunk[1] = bytes[1];
        }
    }

    /// Fill a `w` x `h` rectangle with its top-left corner at `(x, y)`,
    /// clipped to the buffer.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u16) {
        let x_end = x.saturating_add(w).min(WIDTH);
        let y_end = y.saturating_add(h).min(HEIGHT);
        let bytes = color.to_le_bytes();
        for row in y..y_end {
            for col in x..x_end {
                let idx = (row * WIDTH + col) * 2;
                self.buffer[idx] = bytes[0];
                self.buffer[idx + 1] = bytes[1];
            }
        }
    }

    /// Draw the one-pixel outline of the same rectangle.
    pub fn rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u16) {
        if w == 0 || h == 0 {
            return;
        }
        self.fill_rect(x, y, w, 1, color);
        self.fill_rect(x, y.saturating_add(h).saturating_sub(1), w, 1, color);
        self.fill_rect(x, y, 1, h, color);
        self.fill_rect(x.saturating_add(w).saturating_sub(1), y, 1, h, color);
    }

    /// Render `text` with the built-in 8x8 font, one glyph per 8-pixel
    /// advance, left to right, no wrapping.
    pub fn draw_text(&mut self, text: &str, x: usize, y: usize, color: u16) {
        for (cell, ch) in text.chars().enumerate() {
            let glyph = font::glyph(ch);
            let gx = x + cell * 8;
            for (j, row) in glyph.iter().enumerate() {
                for i in 0..8 {
                    if row & (1 << i) != 0 {
                        self.set_pixel(gx + i, y + j, color);
                    }
                }
            }
        }
    }

    /// Render `text` magnified by an integer `scale`, keeping the top-left
    /// anchor at `(x, y)`. `scaled_text(t, x, y, 1, c)` is pixel-identical to
    /// `draw_text(t, x, y, c)`.
    ///
    /// There is no variable-size font, so this renders at scale 1, finds the
    /// glyph pixels by comparing against `color`, erases the scale-1 pass by
    /// re-rendering in the color sampled at the anchor, then expands each
    /// glyph pixel to a `scale` x `scale` block. Known limitation: when the
    /// pixel at the anchor already equals `color`, glyph pixels cannot be
    /// told apart from same-colored background inside the text's bounding
    /// box, and the output picks up those background pixels.
    pub fn scaled_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u16) {
        let background = self.get_pixel(x, y).unwrap_or(color::BLACK);
        let cols = text.chars().count() * 8;

        self.draw_text(text, x, y, color);

        // One bit per panel column; anything that matched `color` after the
        // scale-1 pass is treated as a glyph pixel.
        let mut mask = [0u128; 8];
        for j in 0..8 {
            for i in 0..cols {
                if self.get_pixel(x + i, y + j) == Some(color) {
                    mask[j] |= 1 << (x + i);
                }
            }
        }

        self.draw_text(text, x, y, background);

        for (j, row) in mask.iter().enumerate() {
            for abs_x in x..WIDTH {
                if row & (1 << abs_x) != 0 {
                    let i = abs_x - x;
                    self.fill_rect(x + scale * i, y + scale * j, scale, scale, color);
                }
            }
        }
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, c) in pixels {
            if let Ok((x, y)) = TryInto::<(u32, u32)>::try_into(coord) {
                self.set_pixel(x as usize, y as usize, color::from_rgb565(c));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, BLUE, GREEN, RED, WHITE};

    #[test]
    fn set_then_get_round_trips() {
        let mut fb = Framebuffer::new();
        for &(x, y) in &[(0, 0), (127, 0), (0, 127), (127, 127), (64, 31)] {
            for &c in &[RED, GREEN, BLUE, WHITE, 0x1234, 0xFFFF] {
                fb.set_pixel(x, y, c);
                assert_eq!(fb.get_pixel(x, y), Some(c));
            }
        }
    }

    #[test]
    fn out_of_bounds_is_clipped() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(128, 0, WHITE);
        fb.set_pixel(0, 128, WHITE);
        fb.set_pixel(usize::MAX, usize::MAX, WHITE);
        assert_eq!(fb.get_pixel(128, 0), None);
        assert_eq!(fb.get_pixel(0, 128), None);
        assert!(fb.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn pixel_bytes_are_little_endian() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(1, 0, RED);
        // RED = 0x00F8 puts 0xF8 (the high RGB565 byte) first on the wire
        assert_eq!(&fb.data()[2..4], &[0xF8, 0x00]);
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut fb = Framebuffer::new();
        fb.fill(GREEN);
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                assert_eq!(fb.get_pixel(x, y), Some(GREEN));
            }
        }
    }

    #[test]
    fn fill_rect_is_clipped_to_buffer() {
        let mut fb = Framebuffer::new();
        fb.fill_rect(120, 124, 20, 20, WHITE);
        assert_eq!(fb.get_pixel(120, 124), Some(WHITE));
        assert_eq!(fb.get_pixel(127, 127), Some(WHITE));
        assert_eq!(fb.get_pixel(119, 124), Some(BLACK));
        assert_eq!(fb.get_pixel(120, 123), Some(BLACK));
    }

    #[test]
    fn rect_draws_only_the_outline() {
        let mut fb = Framebuffer::new();
        fb.rect(10, 20, 6, 5, BLUE);
        for x in 10..16 {
            assert_eq!(fb.get_pixel(x, 20), Some(BLUE));
            assert_eq!(fb.get_pixel(x, 24), Some(BLUE));
        }
        for y in 20..25 {
            assert_eq!(fb.get_pixel(10, y), Some(BLUE));
            assert_eq!(fb.get_pixel(15, y), Some(BLUE));
        }
        assert_eq!(fb.get_pixel(12, 22), Some(BLACK));
    }

    #[test]
    fn rect_over_fill_rect_keeps_interior_and_border() {
        let mut fb = Framebuffer::new();
        fb.fill_rect(4, 4, 8, 8, RED);
        fb.rect(4, 4, 8, 8, RED);
        for y in 4..12 {
            for x in 4..12 {
                assert_eq!(fb.get_pixel(x, y), Some(RED));
            }
        }
    }

    #[test]
    fn draw_text_advances_eight_pixels_per_glyph() {
        let mut fb = Framebuffer::new();
        fb.draw_text("HH", 0, 0, WHITE);
        let first: Vec<Option<u16>> =
            (0..8).flat_map(|j| (0..8).map(move |i| (i, j))).map(|(i, j)| fb.get_pixel(i, j)).collect();
        let second: Vec<Option<u16>> =
            (0..8).flat_map(|j| (8..16).map(move |i| (i, j))).map(|(i, j)| fb.get_pixel(i, j)).collect();
        assert_eq!(first, second);
        assert!(first.iter().any(|&p| p == Some(WHITE)));
    }

    #[test]
    fn draw_text_does_not_wrap() {
        let mut fb = Framebuffer::new();
        fb.draw_text("WWWWWWWWWWWWWWWWWWWW", 0, 0, WHITE);
        for y in 8..HEIGHT {
            for x in 0..WIDTH {
                assert_eq!(fb.get_pixel(x, y), Some(BLACK));
            }
        }
    }

    #[test]
    fn scaled_text_at_scale_one_matches_draw_text() {
        let mut base = Framebuffer::new();
        base.draw_text("Hi!", 12, 30, GREEN);
        let mut scaled = Framebuffer::new();
        scaled.scaled_text("Hi!", 12, 30, 1, GREEN);
        assert_eq!(base.data(), scaled.data());
    }

    #[test]
    fn scaled_text_magnifies_each_glyph_pixel() {
        let mut base = Framebuffer::new();
        base.draw_text("A", 10, 10, WHITE);
        let mut scaled = Framebuffer::new();
        scaled.scaled_text("A", 10, 10, 3, WHITE);
        for j in 0..8 {
            for i in 0..8 {
                let expected = base.get_pixel(10 + i, 10 + j).unwrap();
                for dj in 0..3 {
                    for di in 0..3 {
                        assert_eq!(
                            scaled.get_pixel(10 + 3 * i + di, 10 + 3 * j + dj),
                            Some(expected),
                            "block for glyph pixel ({}, {})",
                            i,
                            j
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn scaled_text_keeps_the_anchor() {
        // Top row of 'L' has its leftmost pixel at the anchor column
        let mut base = Framebuffer::new();
        base.draw_text("L", 40, 40, WHITE);
        let mut scaled = Framebuffer::new();
        scaled.scaled_text("L", 40, 40, 2, WHITE);
        let base_first = (0..8).find(|&i| base.get_pixel(40 + i, 40) == Some(WHITE));
        let scaled_first = (0..16).find(|&i| scaled.get_pixel(40 + i, 40) == Some(WHITE));
        assert_eq!(base_first.map(|i| 2 * i), scaled_first);
    }

    #[test]
    fn rect_clips_extreme_coordinates() {
        let mut fb = Framebuffer::new();
        fb.rect(usize::MAX - 2, usize::MAX - 2, 5, 5, WHITE);
        assert!(fb.data().iter().all(|&b| b == 0));

        fb.rect(120, 120, usize::MAX, usize::MAX, WHITE);
        // only the top and left edges reach the panel
        for i in 120..WIDTH {
            assert_eq!(fb.get_pixel(i, 120), Some(WHITE));
            assert_eq!(fb.get_pixel(120, i), Some(WHITE));
        }
        assert_eq!(fb.get_pixel(125, 125), Some(BLACK));
    }

    #[test]
    fn scaled_text_clips_past_the_right_edge() {
        let mut fb = Framebuffer::new();
        // scan box runs to column 133; everything off-panel is dropped
        fb.scaled_text("XX", 118, 0, 2, WHITE);
        // 'X' sets its leftmost top pixel, magnified in place at the anchor
        assert_eq!(fb.get_pixel(118, 0), Some(WHITE));
        assert_eq!(fb.get_pixel(128, 0), None);
    }

    #[test]
    fn scaled_text_background_collision_leaves_scale_one_pixels() {
        // Documented limitation: an anchor pixel equal to the text color
        // makes the erase pass a no-op and scales the anchor pixel along
        // with the glyph.
        let mut fb = Framebuffer::new();
        fb.set_pixel(20, 20, WHITE);
        fb.scaled_text("-", 20, 20, 2, WHITE);
        // the stray anchor pixel was picked up and magnified
        assert_eq!(fb.get_pixel(20, 20), Some(WHITE));
        assert_eq!(fb.get_pixel(21, 21), Some(WHITE));
        // the scale-1 render was "erased" in the same color, so it remains
        assert_eq!(fb.get_pixel(20, 23), Some(WHITE));
        // the magnified glyph row
        assert_eq!(fb.get_pixel(20, 26), Some(WHITE));
        assert_eq!(fb.get_pixel(27, 23), Some(BLACK));
    }

    #[test]
    fn scaled_text_restores_background_under_the_scan_box() {
        let mut fb = Framebuffer::new();
        fb.fill(BLUE);
        fb.scaled_text("!", 20, 20, 2, WHITE);
        // '!' never sets its leftmost column, so the scale-1 pass there must
        // have been erased back to the sampled background
        for j in 0..8 {
            assert_eq!(fb.get_pixel(20, 20 + j), Some(BLUE));
        }
    }
}
