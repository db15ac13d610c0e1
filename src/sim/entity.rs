//! Entity store for the swarm mode
//!
//! The store is populated once at setup and its size never changes afterwards.
//! Components borrow entities for the duration of a single call only.

use glam::DVec2;

use crate::renderer::Rgba;

/// Closed particle classification; selects radius, color and force-law branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Small blue particle
    Dot,
    /// Large translucent yellow particle
    Blob,
}

/// One simulated particle in scene space [-1, 1] x [-1, 1].
#[derive(Debug, Clone)]
pub struct Entity {
    pub pos: DVec2,
    /// Accumulated across ticks; never reset.
    pub vel: DVec2,
    pub kind: Kind,
    pub radius: f64,
    pub color: Rgba,
}

/// Fixed-size collection of entities with insertion-ordered iteration.
#[derive(Debug, Clone)]
pub struct EntityStore {
    entities: Vec<Entity>,
}

impl EntityStore {
    /// Populate exactly `n` entities from the supplied generator.
    pub fn create(n: usize, mut generator: impl FnMut(usize) -> Entity) -> Self {
        let entities = (0..n).map(&mut generator).collect();
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: usize) -> &Entity {
        &self.entities[index]
    }

    /// Visit every entity in insertion order.
    pub fn for_each(&self, mut f: impl FnMut(&Entity)) {
        for entity in &self.entities {
            f(entity);
        }
    }

    /// Visit every entity mutably in insertion order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut Entity)) {
        for entity in &mut self.entities {
            f(entity);
        }
    }

    /// Visit every ordered pair of distinct entities, `(a, b)` and `(b, a)`
    /// both included. The first argument is mutable so asymmetric forces can
    /// accumulate into it while the second is only read. Self-pairs are never
    /// yielded.
    pub fn for_each_pair(&mut self, mut f: impl FnMut(&mut Entity, &Entity)) {
        for i in 0..self.entities.len() {
            for j in 0..self.entities.len() {
                if i == j {
                    continue;
                }
                // Split borrow so `a` is mutable while `b` stays shared.
                if i < j {
                    let (lo, hi) = self.entities.split_at_mut(j);
                    f(&mut lo[i], &hi[0]);
                } else {
                    let (lo, hi) = self.entities.split_at_mut(i);
                    f(&mut hi[0], &lo[j]);
                }
            }
        }
    }
}
