//! Software rasterizer for egui's tessellated output.
use std::collections::HashMap;

use egui::{
    epaint::{ClippedPrimitive, ImageData, Primitive, Vertex},
    Pos2, TextureId, TexturesDelta,
};

use crate::surface::Surface;

struct Texture {
    width: usize,
    height: usize,
    /// Premultiplied RGBA.
    pixels: Vec<[u8; 4]>,
}

impl Texture {
    fn sample(&self, uv: Pos2) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0; 4];
        }
        let x = ((uv.x * self.width as f32) as usize).min(self.width - 1);
        let y = ((uv.y * self.height as f32) as usize).min(self.height - 1);
        self.pixels[y * self.width + x]
    }
}

/// Paints egui meshes into a [`Surface`] with nearest-neighbour sampling.
#[derive(Default)]
pub struct SoftwarePainter {
    textures: HashMap<TextureId, Texture>,
}

impl SoftwarePainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Applies uploads from `delta`; frees must wait until after painting.
    pub fn update_textures(&mut self, delta: &TexturesDelta) {
        for (id, image_delta) in &delta.set {
            let (width, height, pixels): (usize, usize, Vec<[u8; 4]>) = match &image_delta.image {
                ImageData::Color(image) => (
                    image.size[0],
                    image.size[1],
                    image.pixels.iter().map(|c| c.to_array()).collect(),
                ),
                ImageData::Font(font) => (
                    font.size[0],
                    font.size[1],
                    font.srgba_pixels(None).map(|c| c.to_array()).collect(),
                ),
            };

            match image_delta.pos {
                None => {
                    self.textures.insert(
                        *id,
                        Texture {
                            width,
                            height,
                            pixels,
                        },
                    );
                }
                Some([x0, y0]) => {
                    let Some(texture) = self.textures.get_mut(id) else {
                        tracing::warn!(?id, "partial update for unknown overlay texture");
                        continue;
                    };
                    for row in 0..height {
                        for col in 0..width {
                            let (x, y) = (x0 + col, y0 + row);
                            if x < texture.width && y < texture.height {
                                texture.pixels[y * texture.width + x] = pixels[row * width + col];
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn free_textures(&mut self, delta: &TexturesDelta) {
        for id in &delta.free {
            self.textures.remove(id);
        }
    }

    pub fn paint(&self, surface: &mut Surface, primitives: &[ClippedPrimitive]) {
        for clipped in primitives {
            let Primitive::Mesh(mesh) = &clipped.primitive else {
                continue;
            };
            let texture = self.textures.get(&mesh.texture_id);

            let clip = (
                (clipped.clip_rect.min.x.floor() as i32).max(0),
                (clipped.clip_rect.min.y.floor() as i32).max(0),
                (clipped.clip_rect.max.x.ceil() as i32).min(surface.width() as i32),
                (clipped.clip_rect.max.y.ceil() as i32).min(surface.height() as i32),
            );
            if clip.0 >= clip.2 || clip.1 >= clip.3 {
                continue;
            }

            for tri in mesh.indices.chunks_exact(3) {
                let (Some(a), Some(b), Some(c)) = (
                    mesh.vertices.get(tri[0] as usize),
                    mesh.vertices.get(tri[1] as usize),
                    mesh.vertices.get(tri[2] as usize),
                ) else {
                    continue;
                };
                raster_triangle(surface, clip, texture, [a, b, c]);
            }
        }
    }
}

fn edge(a: Pos2, b: Pos2, p: Pos2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn raster_triangle(
    surface: &mut Surface,
    (cx0, cy0, cx1, cy1): (i32, i32, i32, i32),
    texture: Option<&Texture>,
    [a, b, c]: [&Vertex; 3],
) {
    let area = edge(a.pos, b.pos, c.pos);
    if area.abs() < f32::EPSILON {
        return;
    }

    let x0 = (a.pos.x.min(b.pos.x).min(c.pos.x).floor() as i32).max(cx0);
    let y0 = (a.pos.y.min(b.pos.y).min(c.pos.y).floor() as i32).max(cy0);
    let x1 = (a.pos.x.max(b.pos.x).max(c.pos.x).ceil() as i32).min(cx1);
    let y1 = (a.pos.y.max(b.pos.y).max(c.pos.y).ceil() as i32).min(cy1);

    let (ca, cb, cc) = (a.color.to_array(), b.color.to_array(), c.color.to_array());

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            let wa = edge(b.pos, c.pos, p) / area;
            let wb = edge(c.pos, a.pos, p) / area;
            let wc = edge(a.pos, b.pos, p) / area;
            if wa < 0.0 || wb < 0.0 || wc < 0.0 {
                continue;
            }

            let texel = texture.map_or([255; 4], |tex| {
                tex.sample(Pos2::new(
                    a.uv.x * wa + b.uv.x * wb + c.uv.x * wc,
                    a.uv.y * wa + b.uv.y * wb + c.uv.y * wc,
                ))
            });

            let mut out = [0u8; 4];
            for ch in 0..4 {
                let vertex =
                    f32::from(ca[ch]) * wa + f32::from(cb[ch]) * wb + f32::from(cc[ch]) * wc;
                let shaded = vertex * f32::from(texel[ch]) / 255.0;
                out[ch] = shaded.round().clamp(0.0, 255.0) as u8;
            }
            surface.blend_pixel(x, y, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::rgb;
    use egui::{
        epaint::{ImageDelta, Mesh},
        Color32, ColorImage, Rect, TextureOptions,
    };

    fn white_texture() -> TexturesDelta {
        TexturesDelta {
            set: vec![(
                TextureId::default(),
                ImageDelta::full(ColorImage::new([1, 1], Color32::WHITE), TextureOptions::NEAREST),
            )],
            free: Vec::new(),
        }
    }

    fn rect_primitive(rect: Rect, clip: Rect, color: Color32) -> ClippedPrimitive {
        let mut mesh = Mesh::default();
        mesh.add_colored_rect(rect, color);
        ClippedPrimitive {
            clip_rect: clip,
            primitive: Primitive::Mesh(mesh),
        }
    }

    #[test]
    fn opaque_rect_fills_covered_pixels() {
        let mut painter = SoftwarePainter::new();
        painter.update_textures(&white_texture());

        let mut surface = Surface::new(10, 10);
        let rect = Rect::from_min_max(Pos2::new(2.0, 2.0), Pos2::new(6.0, 6.0));
        let everything = Rect::from_min_max(Pos2::ZERO, Pos2::new(10.0, 10.0));
        painter.paint(&mut surface, &[rect_primitive(rect, everything, Color32::RED)]);

        assert_eq!(surface.pixel(3, 3), Some(rgb(255, 0, 0)));
        assert_eq!(surface.pixel(8, 8), Some(0));
    }

    #[test]
    fn clip_rect_limits_painting() {
        let mut painter = SoftwarePainter::new();
        painter.update_textures(&white_texture());

        let mut surface = Surface::new(10, 10);
        let rect = Rect::from_min_max(Pos2::ZERO, Pos2::new(10.0, 10.0));
        let clip = Rect::from_min_max(Pos2::ZERO, Pos2::new(5.0, 10.0));
        painter.paint(&mut surface, &[rect_primitive(rect, clip, Color32::GREEN)]);

        assert_eq!(surface.pixel(4, 4), Some(rgb(0, 255, 0)));
        assert_eq!(surface.pixel(5, 4), Some(0));
    }

    #[test]
    fn freed_textures_are_dropped() {
        let mut painter = SoftwarePainter::new();
        painter.update_textures(&white_texture());
        assert_eq!(painter.texture_count(), 1);

        let delta = TexturesDelta {
            set: Vec::new(),
            free: vec![TextureId::default()],
        };
        painter.free_textures(&delta);
        assert_eq!(painter.texture_count(), 0);
    }
}
