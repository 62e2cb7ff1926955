use thiserror::Error;

/// Options applied when a growth front stochastically spawns a child.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpawnOptions {
    /// Fixed child heading relative to the parent's direction of travel.
    /// When `None`, children use a randomized perpendicular jitter instead.
    pub velocity_angle: Option<f32>,
}

/// Simulation parameters for a [`crate::system::SubstrateSystem`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Inner simulation ticks per `update` call. Must be at least 1.
    pub speed: u32,
    /// Per-edge, per-tick probability of spawning a child front, in `[0, 1]`.
    pub spawn_probability_ratio: f32,
    pub spawn_options: SpawnOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: 1,
            spawn_probability_ratio: 0.1,
            spawn_options: SpawnOptions::default(),
        }
    }
}

/// Rejected construction parameters. The simulation fails fast: none of
/// these are recoverable at runtime.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidSize { width: usize, height: usize },
    #[error("speed must be at least 1")]
    InvalidSpeed,
    #[error("spawn_probability_ratio must be within [0, 1], got {0}")]
    InvalidSpawnRatio(f32),
}

impl Config {
    /// Validates this configuration against the target grid dimensions.
    pub fn validate(&self, width: usize, height: usize) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidSize { width, height });
        }
        if self.speed == 0 {
            return Err(ConfigError::InvalidSpeed);
        }
        if !(0.0..=1.0).contains(&self.spawn_probability_ratio) {
            return Err(ConfigError::InvalidSpawnRatio(self.spawn_probability_ratio));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(Config::default().validate(100, 100), Ok(()));
        assert_eq!(Config::default().speed, 1);
        assert_eq!(Config::default().spawn_probability_ratio, 0.1);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let cfg = Config::default();
        assert_eq!(
            cfg.validate(0, 10),
            Err(ConfigError::InvalidSize { width: 0, height: 10 })
        );
        assert_eq!(
            cfg.validate(10, 0),
            Err(ConfigError::InvalidSize { width: 10, height: 0 })
        );
    }

    #[test]
    fn zero_speed_is_rejected() {
        let cfg = Config {
            speed: 0,
            ..Config::default()
        };
        assert_eq!(cfg.validate(10, 10), Err(ConfigError::InvalidSpeed));
    }

    #[test]
    fn spawn_ratio_outside_unit_interval_is_rejected() {
        for bad in [-0.01, 1.01, f32::NAN] {
            let cfg = Config {
                spawn_probability_ratio: bad,
                ..Config::default()
            };
            assert!(matches!(
                cfg.validate(10, 10),
                Err(ConfigError::InvalidSpawnRatio(_))
            ));
        }
    }
}
