//! Scene rendering
//!
//! The renderer issues a deterministic sequence of vector drawing commands
//! against the `Canvas` seam; it never rasterizes pixels itself and never
//! mutates simulation state. `pixmap` holds the tiny-skia backend.

pub mod pixmap;

pub use pixmap::PixmapCanvas;

use glam::DVec2;

use crate::consts::STROKE_WIDTH;
use crate::sim::{Model, Simulation};

/// Straight-alpha color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Drawing surface collaborator. Coordinates are scene space: [-1, 1] on both
/// axes, y up, origin centered. Stroke widths are scene units.
pub trait Canvas {
    fn clear(&mut self, color: Rgba);
    fn circle(&mut self, center: DVec2, radius: f64, fill: Rgba, stroke: Rgba, stroke_width: f64);
    fn box_at(
        &mut self,
        center: DVec2,
        half_extents: DVec2,
        angle: f64,
        fill: Rgba,
        stroke: Rgba,
        stroke_width: f64,
    );
}

/// Converts current simulation state into drawing commands.
///
/// Entities draw in store iteration order, so later entities occlude earlier
/// ones at overlapping positions - a deliberate, reproducible tie-break.
pub struct SceneRenderer {
    background: Rgba,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
        }
    }
}

impl SceneRenderer {
    pub fn render(&self, canvas: &mut dyn Canvas, sim: &Simulation) {
        canvas.clear(self.background);
        match sim.model() {
            Model::Swarm(model) => {
                model.store().for_each(|e| {
                    canvas.circle(e.pos, e.radius, e.color, Rgba::BLACK, STROKE_WIDTH);
                });
            }
            Model::Springs(scene) => {
                for pose in scene.poses() {
                    canvas.box_at(
                        pose.pos,
                        pose.half_extents,
                        pose.angle,
                        pose.color,
                        Rgba::BLACK,
                        STROKE_WIDTH,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Mode};

    /// Records commands instead of rasterizing.
    #[derive(Default)]
    struct RecordingCanvas {
        ops: Vec<String>,
    }

    impl Canvas for RecordingCanvas {
        fn clear(&mut self, color: Rgba) {
            self.ops.push(format!("clear {color:?}"));
        }

        fn circle(
            &mut self,
            center: DVec2,
            radius: f64,
            fill: Rgba,
            _stroke: Rgba,
            _stroke_width: f64,
        ) {
            self.ops.push(format!("circle {center:?} {radius} {fill:?}"));
        }

        fn box_at(
            &mut self,
            center: DVec2,
            _half_extents: DVec2,
            angle: f64,
            _fill: Rgba,
            _stroke: Rgba,
            _stroke_width: f64,
        ) {
            self.ops.push(format!("box {center:?} {angle}"));
        }
    }

    #[test]
    fn test_clear_then_entities_in_store_order() {
        let config = Config {
            entity_count: 4,
            ..Config::for_mode(Mode::Swarm)
        };
        let sim = Simulation::setup(&config).unwrap();
        let mut canvas = RecordingCanvas::default();

        SceneRenderer::default().render(&mut canvas, &sim);

        assert_eq!(canvas.ops.len(), 5);
        assert!(canvas.ops[0].starts_with("clear"));
        // One circle per entity, drawn in insertion order.
        let mut expected = Vec::new();
        match sim.model() {
            Model::Swarm(m) => m.store().for_each(|e| {
                expected.push(format!("circle {:?} {} {:?}", e.pos, e.radius, e.color));
            }),
            Model::Springs(_) => unreachable!(),
        }
        assert_eq!(&canvas.ops[1..], &expected[..]);
    }

    #[test]
    fn test_render_emits_identical_commands_for_unchanged_state() {
        let config = Config::for_mode(Mode::Swarm);
        let sim = Simulation::setup(&config).unwrap();
        let renderer = SceneRenderer::default();

        let mut first = RecordingCanvas::default();
        renderer.render(&mut first, &sim);
        let mut second = RecordingCanvas::default();
        renderer.render(&mut second, &sim);

        assert_eq!(first.ops, second.ops);
    }

    #[test]
    fn test_springs_scene_draws_boxes() {
        let config = Config::for_mode(Mode::Springs);
        let sim = Simulation::setup(&config).unwrap();
        let mut canvas = RecordingCanvas::default();

        SceneRenderer::default().render(&mut canvas, &sim);

        assert!(canvas.ops[0].starts_with("clear"));
        assert_eq!(canvas.ops.iter().filter(|op| op.starts_with("box")).count(), 2);
    }
}
