//! Swarm strategy: pairwise force law over dots and blobs
//!
//! Same-kind pairs repel with an inverse-square law. Cross-kind pairs attract,
//! switching to a soft linear law inside `BLOB_RADIUS` so the magnitude stays
//! bounded as the pair closes in. Damping is applied once per entity per tick,
//! then positions integrate with reflect-without-clamp boundaries: an entity
//! may overshoot the scene edge by one step before the flipped velocity pulls
//! it back.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityStore, Kind};
use crate::consts::*;
use crate::renderer::Rgba;

/// Signed magnitude of the force `b` exerts on `a` at squared distance `d2`.
/// Positive pushes the pair apart, negative pulls it together.
pub fn pair_magnitude(same_kind: bool, d2: f64) -> f64 {
    let base = FORCE_SCALE / d2;
    if same_kind {
        base
    } else if d2 > BLOB_RADIUS * BLOB_RADIUS {
        -base
    } else {
        // Soft inner law, continuous with the outer branch at d = BLOB_RADIUS.
        -FORCE_SCALE / (BLOB_RADIUS * BLOB_RADIUS) * d2.sqrt() / BLOB_RADIUS
    }
}

/// Accumulate pairwise forces into entity velocities.
///
/// The magnitude decomposes along `(dx^2, dy^2) / d2`, sign-corrected by which
/// coordinate is larger, so the per-axis push always points away from (or
/// toward) the other entity.
pub fn accumulate_forces(store: &mut EntityStore) {
    store.for_each_pair(|a, b| {
        let d = a.pos - b.pos;
        let d2 = d.length_squared();
        if d2 == 0.0 {
            return;
        }

        let magn = pair_magnitude(a.kind == b.kind, d2);

        let mut ax = magn * (d.x * d.x / d2);
        if a.pos.x < b.pos.x {
            ax = -ax;
        }
        let mut ay = magn * (d.y * d.y / d2);
        if a.pos.y < b.pos.y {
            ay = -ay;
        }
        a.vel += DVec2::new(ax, ay);
    });
}

/// Damp, advance and reflect every entity once.
pub fn integrate(store: &mut EntityStore) {
    store.for_each_mut(|e| {
        e.vel *= DAMPING;
        e.pos += e.vel;
        if e.pos.x < SCENE_MIN || e.pos.x > SCENE_MAX {
            e.vel.x = -e.vel.x;
        }
        if e.pos.y < SCENE_MIN || e.pos.y > SCENE_MAX {
            e.vel.y = -e.vel.y;
        }
    });
}

/// Strategy A model: owns the entity store and advances it one tick at a time.
#[derive(Debug, Clone)]
pub struct SwarmModel {
    store: EntityStore,
}

impl SwarmModel {
    /// Populate `count` entities, the first half blobs and the rest dots, at
    /// seeded uniform positions with zero initial velocity.
    pub fn setup(count: usize, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let half = count / 2;
        let store = EntityStore::create(count, |i| {
            let kind = if i < half { Kind::Blob } else { Kind::Dot };
            Entity {
                pos: DVec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
                vel: DVec2::ZERO,
                kind,
                radius: match kind {
                    Kind::Dot => DOT_RADIUS,
                    Kind::Blob => BLOB_RADIUS,
                },
                color: match kind {
                    Kind::Dot => Rgba::new(0.0, 0.0, 1.0, 1.0),
                    Kind::Blob => Rgba::new(1.0, 1.0, 0.0, 0.5),
                },
            }
        });
        Self { store }
    }

    pub fn step(&mut self) {
        accumulate_forces(&mut self.store);
        integrate(&mut self.store);
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }
}
