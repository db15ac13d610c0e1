//! Run configuration
//!
//! There are no CLI flags; everything is read from `DOTFIELD_*` environment
//! variables with sensible defaults. Invalid values fall back with a warning.

use crate::consts::*;

/// Which simulation strategy drives the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Pairwise force law over dots and blobs
    #[default]
    Swarm,
    /// Rigid slabs hanging from damped springs
    Springs,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Swarm => "swarm",
            Mode::Springs => "springs",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "swarm" | "dots" => Some(Mode::Swarm),
            "springs" | "spring" => Some(Mode::Springs),
            _ => None,
        }
    }
}

/// Everything a run needs, owned by the caller and passed down by reference.
#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    /// Entity count for swarm mode (springs mode has a fixed scene)
    pub entity_count: usize,
    /// RNG seed for the initial population
    pub seed: u64,
    /// Inter-frame interval of the producer loop, in milliseconds
    pub frame_interval_ms: u64,
    /// Canvas and window size in pixels (square, fixed for the run)
    pub canvas_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Swarm,
            entity_count: SWARM_COUNT,
            seed: 0,
            frame_interval_ms: SWARM_FRAME_MS,
            canvas_size: CANVAS_SIZE,
        }
    }
}

impl Config {
    /// Build a config for the given mode with that mode's default cadence.
    pub fn for_mode(mode: Mode) -> Self {
        let frame_interval_ms = match mode {
            Mode::Swarm => SWARM_FRAME_MS,
            Mode::Springs => SPRINGS_FRAME_MS,
        };
        Self {
            mode,
            frame_interval_ms,
            ..Default::default()
        }
    }

    /// Read configuration from `DOTFIELD_MODE`, `DOTFIELD_COUNT`,
    /// `DOTFIELD_SEED` and `DOTFIELD_FRAME_MS`.
    pub fn from_env() -> Self {
        let mode = match std::env::var("DOTFIELD_MODE") {
            Ok(raw) => Mode::parse(&raw).unwrap_or_else(|| {
                log::warn!("unknown DOTFIELD_MODE {raw:?}, using swarm");
                Mode::Swarm
            }),
            Err(_) => Mode::Swarm,
        };
        let mut config = Config::for_mode(mode);

        if let Some(count) = parse_var::<usize>("DOTFIELD_COUNT") {
            if count > 0 {
                config.entity_count = count;
            } else {
                log::warn!("DOTFIELD_COUNT must be positive, keeping {}", config.entity_count);
            }
        }
        if let Some(seed) = parse_var::<u64>("DOTFIELD_SEED") {
            config.seed = seed;
        }
        if let Some(ms) = parse_var::<u64>("DOTFIELD_FRAME_MS") {
            config.frame_interval_ms = ms.clamp(1, 1000);
        }
        config
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring unparsable {name}={raw:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse("swarm"), Some(Mode::Swarm));
        assert_eq!(Mode::parse("SPRINGS"), Some(Mode::Springs));
        assert_eq!(Mode::parse("dots"), Some(Mode::Swarm));
        assert_eq!(Mode::parse("pinball"), None);
    }

    #[test]
    fn test_mode_defaults() {
        let swarm = Config::for_mode(Mode::Swarm);
        assert_eq!(swarm.frame_interval_ms, SWARM_FRAME_MS);
        assert_eq!(swarm.entity_count, SWARM_COUNT);

        let springs = Config::for_mode(Mode::Springs);
        assert_eq!(springs.frame_interval_ms, SPRINGS_FRAME_MS);
    }
}
