//! Run configuration loaded from TOML.

use std::{fs, path::Path, time::Duration};

use arkadien_core::{CellCoord, PathError, Vec3};
use arkadien_system_movement::WaypointPath;
use arkadien_world::WorldOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration `{path}`")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text was not valid TOML for the schema.
    #[error("malformed configuration")]
    Parse(#[from] toml::de::Error),
    /// The tick rate was zero.
    #[error("tick rate must be at least one tick per second")]
    ZeroTickRate,
    /// The grid had no cells or a non-positive cell size.
    #[error("placement grid needs at least one cell of positive size")]
    EmptyGrid,
    /// The waypoint list did not form a path.
    #[error("invalid enemy path")]
    Path(#[from] PathError),
}

/// Tunable parameters of a simulation run.
///
/// Every field is optional in the TOML source and falls back to the authored
/// default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Fixed steps per simulated second.
    pub tick_rate: u32,
    /// Number of cells along each side of the placement grid.
    pub grid_size: u32,
    /// Side length of a grid cell in world units.
    pub cell_size: f32,
    /// Interval between wave completion checks in milliseconds.
    pub completion_poll_interval_ms: u64,
    /// Enemy path as `[x, y, z]` points in walking order.
    pub waypoints: Vec<[f32; 3]>,
    /// Cells on which towers may never be placed.
    pub reserved_cells: Vec<CellCoord>,
    /// Height above a tower at which its projectiles are launched.
    pub projectile_launch_height: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            grid_size: 20,
            cell_size: 2.0,
            completion_poll_interval_ms: 500,
            waypoints: vec![
                [-15.0, 0.0, -10.0],
                [-10.0, 0.0, -10.0],
                [-10.0, 0.0, -5.0],
                [-5.0, 0.0, -5.0],
                [-5.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 0.0, 5.0],
                [5.0, 0.0, 5.0],
                [5.0, 0.0, 10.0],
                [10.0, 0.0, 10.0],
                [15.0, 0.0, 10.0],
            ],
            reserved_cells: Vec::new(),
            projectile_launch_height: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text does not match the schema.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the configuration stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Duration of a single fixed step.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTickRate`] when the rate is zero.
    pub fn tick_duration(&self) -> Result<Duration, ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(Duration::from_secs(1) / self.tick_rate)
    }

    /// Builds the enemy path from the configured waypoints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Path`] when fewer than two waypoints are given.
    pub fn path(&self) -> Result<WaypointPath, ConfigError> {
        let points = self
            .waypoints
            .iter()
            .map(|[x, y, z]| Vec3::new(*x, *y, *z))
            .collect();
        Ok(WaypointPath::new(points)?)
    }

    /// Layout parameters handed to the world.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyGrid`] for a degenerate grid.
    pub fn world_options(&self) -> Result<WorldOptions, ConfigError> {
        if self.grid_size == 0 || self.cell_size <= 0.0 {
            return Err(ConfigError::EmptyGrid);
        }
        Ok(WorldOptions {
            grid_size: self.grid_size,
            cell_size: self.cell_size,
            projectile_launch_height: self.projectile_launch_height,
        })
    }

    /// Interval between wave completion checks.
    #[must_use]
    pub fn completion_poll_interval(&self) -> Duration {
        Duration::from_millis(self.completion_poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SimulationConfig::from_toml_str("").expect("valid config");
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.path().expect("default path").waypoint_count(), 11);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            tick_rate = 30
            reserved_cells = [{ column = 2, row = 5 }]
            "#,
        )
        .expect("valid config");
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.reserved_cells, vec![CellCoord::new(2, 5)]);
        assert_eq!(config.grid_size, 20);
        assert_eq!(
            config.tick_duration().expect("non-zero rate"),
            Duration::from_secs(1) / 30
        );
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            SimulationConfig::from_toml_str("tick_rte = 30"),
            Err(ConfigError::Parse(_))
        ));

        let config = SimulationConfig {
            tick_rate: 0,
            waypoints: vec![[0.0, 0.0, 0.0]],
            ..SimulationConfig::default()
        };
        assert!(matches!(config.tick_duration(), Err(ConfigError::ZeroTickRate)));
        assert!(matches!(
            config.path(),
            Err(ConfigError::Path(PathError::TooShort { len: 1 }))
        ));
    }
}
