//! Simulation stepper
//!
//! `Simulation::setup` is the single UNINITIALIZED -> RUNNING transition: a
//! `Simulation` value only exists in the running state. `step` advances one
//! tick and is never called concurrently with itself (the producer loop is the
//! sole caller).

use crate::config::{Config, Mode};
use crate::error::SetupError;

use super::springs::SpringScene;
use super::swarm::SwarmModel;

/// The active strategy. Selected once per run; never mixed.
pub enum Model {
    Swarm(SwarmModel),
    Springs(SpringScene),
}

/// Owns the whole simulation state. This is the one context object handed to
/// the pipeline and the renderer; there are no globals.
pub struct Simulation {
    model: Model,
    ticks: u64,
}

impl Simulation {
    /// Create entities, bodies and constraints once.
    pub fn setup(config: &Config) -> Result<Self, SetupError> {
        let model = match config.mode {
            Mode::Swarm => Model::Swarm(SwarmModel::setup(config.entity_count, config.seed)),
            Mode::Springs => Model::Springs(SpringScene::setup()),
        };
        log::info!(
            "simulation ready: mode={} entities={} seed={}",
            config.mode.as_str(),
            config.entity_count,
            config.seed
        );
        Ok(Self { model, ticks: 0 })
    }

    /// Advance exactly one tick. No failure mode at steady state.
    pub fn step(&mut self) {
        match &mut self.model {
            Model::Swarm(m) => m.step(),
            Model::Springs(s) => s.step(),
        }
        self.ticks += 1;
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_then_step_counts_ticks() {
        let config = Config::for_mode(Mode::Swarm);
        let mut sim = Simulation::setup(&config).unwrap();
        assert_eq!(sim.ticks(), 0);
        sim.step();
        sim.step();
        assert_eq!(sim.ticks(), 2);
    }

    #[test]
    fn test_entity_count_fixed_across_steps() {
        let config = Config {
            entity_count: 100,
            ..Config::for_mode(Mode::Swarm)
        };
        let mut sim = Simulation::setup(&config).unwrap();
        for _ in 0..10 {
            sim.step();
        }
        match sim.model() {
            Model::Swarm(m) => assert_eq!(m.store().len(), 100),
            Model::Springs(_) => unreachable!(),
        }
    }
}
