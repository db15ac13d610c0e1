//! Dotfield - a real-time particle and spring-body toy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity store, swarm forces, spring scene)
//! - `renderer`: Scene renderer over a vector canvas seam, tiny-skia backend
//! - `pipeline`: Producer/consumer frame pipeline and shared pixel buffer
//! - `platform`: winit/softbuffer presentation glue

pub mod config;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{Config, Mode};
pub use error::SetupError;

/// Tuning constants
pub mod consts {
    /// Pairwise force scale for the swarm mode
    pub const FORCE_SCALE: f64 = 1e-7;
    /// Cross-kind pairs switch to the soft inner law at this range
    pub const BLOB_RADIUS: f64 = 0.1;
    /// Radius of a small dot
    pub const DOT_RADIUS: f64 = 0.01;
    /// Velocity damping applied once per entity per tick
    pub const DAMPING: f64 = 0.99999;

    /// Scene space is the square [-1, 1] on both axes
    pub const SCENE_MIN: f64 = -1.0;
    pub const SCENE_MAX: f64 = 1.0;

    /// Outline width for every shape, in scene units
    pub const STROKE_WIDTH: f64 = 0.0025;

    /// Springs mode advances the physics world in fixed sub-steps per tick
    pub const SPRING_SUBSTEPS: u32 = 20;
    /// Length of one physics sub-step in seconds
    pub const SPRING_SUBSTEP_DT: f64 = 1.0 / 1000.0;

    /// Default window / canvas size in pixels
    pub const CANVAS_SIZE: u32 = 800;
    /// Default inter-frame interval for the swarm mode (ms)
    pub const SWARM_FRAME_MS: u64 = 10;
    /// Default inter-frame interval for the springs mode (ms)
    pub const SPRINGS_FRAME_MS: u64 = 20;
    /// Default entity count for the swarm mode
    pub const SWARM_COUNT: usize = 100;
}
