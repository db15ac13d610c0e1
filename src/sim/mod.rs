//! Deterministic simulation module
//!
//! All entity-update logic lives here. This module must stay pure:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable, insertion-determined iteration order
//! - No rendering or platform dependencies

pub mod entity;
pub mod springs;
pub mod swarm;
pub mod world;

pub use entity::{Entity, EntityStore, Kind};
pub use springs::{SlabPose, SpringScene};
pub use swarm::SwarmModel;
pub use world::{Model, Simulation};
