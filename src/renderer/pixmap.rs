//! tiny-skia rasterization backend
//!
//! Owns the scene -> pixel mapping (y up, origin centered) and a fixed-size
//! pixmap allocated once at setup. Paths are built directly in pixel space so
//! stroke widths behave like the scene-unit line widths of a vector surface.

use glam::DVec2;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::{Canvas, Rgba};
use crate::error::SetupError;

pub struct PixmapCanvas {
    pixmap: Pixmap,
}

fn to_color(c: Rgba) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba(
        c.r.clamp(0.0, 1.0),
        c.g.clamp(0.0, 1.0),
        c.b.clamp(0.0, 1.0),
        c.a.clamp(0.0, 1.0),
    )
    .unwrap_or(tiny_skia::Color::BLACK)
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_color(color));
    paint.anti_alias = true;
    paint
}

impl PixmapCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self, SetupError> {
        let pixmap = Pixmap::new(width, height)
            .ok_or_else(|| SetupError::Canvas(format!("cannot allocate {width}x{height} pixmap")))?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Pixels per scene unit along x.
    fn scale(&self) -> f32 {
        self.pixmap.width() as f32 / 2.0
    }

    fn to_px(&self, p: DVec2) -> (f32, f32) {
        let w = self.pixmap.width() as f64;
        let h = self.pixmap.height() as f64;
        (((p.x + 1.0) * w / 2.0) as f32, ((1.0 - p.y) * h / 2.0) as f32)
    }

    fn fill_and_stroke(
        &mut self,
        path: &tiny_skia::Path,
        fill: Rgba,
        stroke: Rgba,
        stroke_width: f64,
    ) {
        self.pixmap
            .fill_path(path, &paint(fill), FillRule::Winding, Transform::identity(), None);
        let stroke_px = Stroke {
            width: (stroke_width as f32 * self.scale()).max(0.5),
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint(stroke), &stroke_px, Transform::identity(), None);
    }

    /// Raw RGBA bytes of the backing pixmap.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Copy the frame into `out` as 0x00RRGGBB words. `out` must hold exactly
    /// width * height entries.
    pub fn copy_pixels(&self, out: &mut [u32]) {
        debug_assert_eq!(out.len(), (self.width() * self.height()) as usize);
        for (dst, px) in out.iter_mut().zip(self.pixmap.pixels()) {
            let c = px.demultiply();
            *dst = (u32::from(c.red()) << 16) | (u32::from(c.green()) << 8) | u32::from(c.blue());
        }
    }
}

impl Canvas for PixmapCanvas {
    fn clear(&mut self, color: Rgba) {
        self.pixmap.fill(to_color(color));
    }

    fn circle(&mut self, center: DVec2, radius: f64, fill: Rgba, stroke: Rgba, stroke_width: f64) {
        let (cx, cy) = self.to_px(center);
        let r = radius as f32 * self.scale();
        let mut pb = PathBuilder::new();
        pb.push_circle(cx, cy, r);
        if let Some(path) = pb.finish() {
            self.fill_and_stroke(&path, fill, stroke, stroke_width);
        }
    }

    fn box_at(
        &mut self,
        center: DVec2,
        half_extents: DVec2,
        angle: f64,
        fill: Rgba,
        stroke: Rgba,
        stroke_width: f64,
    ) {
        let (sin, cos) = angle.sin_cos();
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)].map(|(sx, sy)| {
            let local = DVec2::new(sx * half_extents.x, sy * half_extents.y);
            let rotated = DVec2::new(local.x * cos - local.y * sin, local.x * sin + local.y * cos);
            self.to_px(center + rotated)
        });

        let mut pb = PathBuilder::new();
        pb.move_to(corners[0].0, corners[0].1);
        for &(x, y) in &corners[1..] {
            pb.line_to(x, y);
        }
        pb.close();
        if let Some(path) = pb.finish() {
            self.fill_and_stroke(&path, fill, stroke, stroke_width);
        }
    }
}
