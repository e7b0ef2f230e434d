//! Software framebuffer in minifb's `0RGB` pixel format.
use font8x8::{BASIC_FONTS, UnicodeFonts};

/// Glyph cell size of the bitmap font at scale 1.
pub const GLYPH_SIZE: i32 = 8;

pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

pub const fn channels(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// Scales each channel of `color` by `factor` (`0.0..=1.0`).
pub fn shade(color: u32, factor: f32) -> u32 {
    let factor = factor.clamp(0.0, 1.0);
    let [r, g, b] = channels(color);
    let scale = |c: u8| (f32::from(c) * factor).round() as u8;
    rgb(scale(r), scale(g), scale(b))
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Resizes the surface; contents are discarded.
    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width * height];
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|idx| self.pixels[idx])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    /// Composites a premultiplied RGBA colour over the pixel at `(x, y)`.
    pub fn blend_pixel(&mut self, x: i32, y: i32, [r, g, b, a]: [u8; 4]) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        if a == 0 && r == 0 && g == 0 && b == 0 {
            return;
        }
        let inv = 255 - u32::from(a);
        let [dr, dg, db] = channels(self.pixels[idx]);
        let mix = |src: u8, dst: u8| {
            (u32::from(src) + (u32::from(dst) * inv + 127) / 255).min(255) as u8
        };
        self.pixels[idx] = rgb(mix(r, dr), mix(g, dg), mix(b, db));
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width as i32);
        let y1 = y.saturating_add(h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for yy in y0..y1 {
            let row = yy as usize * self.width;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(color);
        }
    }

    /// Rectangle outline `thick` pixels wide, drawn inside the bounds.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, thick: i32, color: u32) {
        let thick = thick.max(1).min(w / 2 + 1).min(h / 2 + 1);
        self.fill_rect(x, y, w, thick, color);
        self.fill_rect(x, y + h - thick, w, thick, color);
        self.fill_rect(x, y, thick, h, color);
        self.fill_rect(x + w - thick, y, thick, h, color);
    }

    /// Draws `text` with the 8x8 bitmap font; returns the advance in pixels.
    ///
    /// Characters without a glyph leave a blank cell.
    pub fn draw_text(&mut self, x: i32, y: i32, scale: i32, color: u32, text: &str) -> i32 {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            if let Some(glyph) = BASIC_FONTS.get(ch) {
                for (row, bits) in glyph.iter().enumerate() {
                    for col in 0..GLYPH_SIZE {
                        if (bits >> col) & 1 == 1 {
                            self.fill_rect(
                                cx + col * scale,
                                y + row as i32 * scale,
                                scale,
                                scale,
                                color,
                            );
                        }
                    }
                }
            }
            cx += GLYPH_SIZE * scale;
        }
        cx - x
    }
}

/// Pixel width of `text` at `scale`.
pub fn text_width(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * GLYPH_SIZE * scale.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut surface = Surface::new(4, 4);
        surface.fill_rect(-2, -2, 4, 4, 7);
        assert_eq!(surface.pixel(0, 0), Some(7));
        assert_eq!(surface.pixel(1, 1), Some(7));
        assert_eq!(surface.pixel(2, 2), Some(0));
        surface.fill_rect(10, 10, 5, 5, 9);
        assert!(surface.pixels().iter().all(|&p| p != 9));
    }

    #[test]
    fn text_lights_pixels_and_advances() {
        let mut surface = Surface::new(32, 8);
        let advance = surface.draw_text(0, 0, 1, 0xFF_FFFF, "Hi");
        assert_eq!(advance, 16);
        assert!(surface.pixels().iter().any(|&p| p == 0xFF_FFFF));
        assert_eq!(text_width("Hi", 2), 32);
    }

    #[test]
    fn blend_respects_premultiplied_alpha() {
        let mut surface = Surface::new(1, 1);
        surface.clear(rgb(0, 0, 200));
        surface.blend_pixel(0, 0, [255, 0, 0, 255]);
        assert_eq!(surface.pixel(0, 0), Some(rgb(255, 0, 0)));

        surface.clear(rgb(0, 0, 200));
        surface.blend_pixel(0, 0, [0, 0, 0, 128]);
        assert_eq!(surface.pixel(0, 0), Some(rgb(0, 0, 100)));
    }

    #[test]
    fn shade_scales_channels() {
        assert_eq!(shade(rgb(200, 100, 50), 0.5), rgb(100, 50, 25));
        assert_eq!(shade(rgb(200, 100, 50), 2.0), rgb(200, 100, 50));
    }
}
