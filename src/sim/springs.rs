//! Springs strategy: rigid slabs hanging from damped springs
//!
//! The rigid-body math lives entirely in rapier; this module only configures
//! the world once (gravity, ground segment, anchor, slabs, springs), advances
//! it in fixed sub-steps and reads poses back for rendering.

use glam::DVec2;
use rapier2d::prelude::*;

use crate::consts::{SPRING_SUBSTEP_DT, SPRING_SUBSTEPS};
use crate::renderer::Rgba;

const ANCHOR_POS: (f64, f64) = (0.0, 1.0);
const SLAB1_POS: (f64, f64) = (0.5, 0.75);
const SLAB2_POS: (f64, f64) = (0.5, 0.333);
/// Half extents of the two hanging slabs.
const SLAB1_HALF: (f64, f64) = (0.28, 0.07);
const SLAB2_HALF: (f64, f64) = (0.30, 0.07);

const REST_LENGTH: f32 = 0.667;
const STIFFNESS: f32 = 30.0;
const SPRING_DAMPING: f32 = 1e-4;
/// Vertical offset of the spring attachment points on the slabs.
const ANCHOR_PAD: f32 = 0.01;

/// One dynamic box plus its render attributes.
struct Slab {
    handle: RigidBodyHandle,
    half_extents: DVec2,
    color: Rgba,
}

/// Pose readback for one slab, in scene coordinates.
#[derive(Debug, Clone, Copy)]
pub struct SlabPose {
    pub pos: DVec2,
    pub angle: f64,
    pub half_extents: DVec2,
    pub color: Rgba,
}

/// Strategy B scene: a static anchor, two slabs and two damped springs over a
/// frictionless ground segment, under fixed downward gravity.
pub struct SpringScene {
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    gravity: Vector<Real>,
    anchor: RigidBodyHandle,
    slabs: Vec<Slab>,
}

impl SpringScene {
    /// Create the world, bodies, shapes and constraints. Done exactly once.
    pub fn setup() -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();
        let mut impulse_joints = ImpulseJointSet::new();

        // Ground segment along the bottom scene edge.
        colliders.insert(
            ColliderBuilder::segment(point![-1.0, -1.0], point![1.0, -1.0])
                .friction(0.0)
                .build(),
        );

        let anchor = bodies.insert(
            RigidBodyBuilder::fixed()
                .translation(vector![ANCHOR_POS.0 as f32, ANCHOR_POS.1 as f32])
                .build(),
        );

        let mut slabs = Vec::new();
        let mut add_slab = |pos: (f64, f64), half: (f64, f64), color: Rgba| {
            let handle = bodies.insert(
                RigidBodyBuilder::dynamic()
                    .translation(vector![pos.0 as f32, pos.1 as f32])
                    .build(),
            );
            // Mass and moment of inertia come from the shape at uniform density.
            colliders.insert_with_parent(
                ColliderBuilder::cuboid(half.0 as f32, half.1 as f32)
                    .density(1.0)
                    .friction(0.0)
                    .build(),
                handle,
                &mut bodies,
            );
            slabs.push(Slab {
                handle,
                half_extents: DVec2::new(half.0, half.1),
                color,
            });
            handle
        };

        let slab1 = add_slab(SLAB1_POS, SLAB1_HALF, Rgba::new(0.0, 0.0, 1.0, 1.0));
        let slab2 = add_slab(SLAB2_POS, SLAB2_HALF, Rgba::new(0.0, 1.0, 0.0, 1.0));

        let spring1 = SpringJointBuilder::new(REST_LENGTH, STIFFNESS, SPRING_DAMPING)
            .local_anchor1(point![0.0, 0.0])
            .local_anchor2(point![0.0, ANCHOR_PAD]);
        impulse_joints.insert(anchor, slab1, spring1, true);

        let spring2 = SpringJointBuilder::new(REST_LENGTH, STIFFNESS, SPRING_DAMPING)
            .local_anchor1(point![0.0, -ANCHOR_PAD])
            .local_anchor2(point![0.0, ANCHOR_PAD]);
        impulse_joints.insert(slab1, slab2, spring2, true);

        let params = IntegrationParameters {
            dt: SPRING_SUBSTEP_DT as f32,
            ..IntegrationParameters::default()
        };

        Self {
            pipeline: PhysicsPipeline::new(),
            params,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            impulse_joints,
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            gravity: vector![0.0, -1.0],
            anchor,
            slabs,
        }
    }

    /// Advance the world by one render tick worth of fixed sub-steps.
    pub fn step(&mut self) {
        for _ in 0..SPRING_SUBSTEPS {
            self.pipeline.step(
                &self.gravity,
                &self.params,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd,
                None,
                &(),
                &(),
            );
        }
    }

    /// Current pose of every slab, in creation order.
    pub fn poses(&self) -> Vec<SlabPose> {
        self.slabs
            .iter()
            .map(|slab| {
                let body = &self.bodies[slab.handle];
                let t = body.translation();
                SlabPose {
                    pos: DVec2::new(t.x as f64, t.y as f64),
                    angle: body.rotation().angle() as f64,
                    half_extents: slab.half_extents,
                    color: slab.color,
                }
            })
            .collect()
    }

    pub fn anchor_position(&self) -> DVec2 {
        let t = self.bodies[self.anchor].translation();
        DVec2::new(t.x as f64, t.y as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_scene() {
        let scene = SpringScene::setup();
        let poses = scene.poses();
        assert_eq!(poses.len(), 2);
        assert_eq!(scene.anchor_position(), DVec2::new(0.0, 1.0));
        assert!((poses[0].pos.x - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_gravity_and_springs_act() {
        let mut scene = SpringScene::setup();
        let start = scene.poses();

        // One simulated second.
        for _ in 0..50 {
            scene.step();
        }

        let now = scene.poses();
        for (a, b) in start.iter().zip(&now) {
            assert!(a.pos.distance(b.pos) > 1e-4, "slab never moved");
            assert!(b.pos.is_finite());
            assert!(b.angle.is_finite());
        }
        // The anchor is static.
        assert_eq!(scene.anchor_position(), DVec2::new(0.0, 1.0));
    }

    #[test]
    fn test_spring_keeps_slab_near_anchor() {
        let mut scene = SpringScene::setup();
        for _ in 0..200 {
            scene.step();
        }
        let poses = scene.poses();
        let anchor = scene.anchor_position();
        assert!(poses[0].pos.distance(anchor) < 2.5);
    }
}
