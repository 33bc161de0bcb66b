//! Declarative body table with RON persistence.
//!
//! Every body's elements live in one table keyed by name instead of being
//! repeated per scene. [`SystemConfig::default`] is the scaled inner solar system.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ElementsError};
use crate::kepler::KeplerSolver;
use crate::orbit_path::OrbitPath;

/// Scene units per astronomical unit.
pub const UNITS_PER_AU: f64 = 40.0;
/// Kilometres per scene unit for planetary radii.
pub const KM_PER_UNIT: f64 = 2123.67;

/// Top-level system configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SystemConfig {
    /// The central star.
    pub star: StarConfig,
    /// Primary bodies, updated in table order.
    pub bodies: Vec<BodyConfig>,
    /// Satellites, updated after all primaries.
    pub satellites: Vec<SatelliteConfig>,
    /// Samples per orbit guide.
    pub orbit_path_samples: usize,
    /// Kepler solver stopping policy.
    pub solver: SolverConfig,
    /// Log filter used when `RUST_LOG` is unset (e.g. "info", "orrery_simulation=debug").
    pub log_level: String,
}

/// The central star.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarConfig {
    pub name: String,
    /// Self-rotation per frame in radians.
    pub spin_step: f64,
    /// Visual radius in scene units.
    pub visual_radius: f64,
}

/// One primary body on a Keplerian ellipse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    pub name: String,
    /// Scene units.
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Signed mean anomaly decrement per frame.
    pub mean_anomaly_step: f64,
    /// 0 places the body at perihelion.
    pub initial_mean_anomaly: f64,
    /// Signed self-rotation per frame; negative for retrograde rotators.
    pub spin_step: f64,
    /// Visual radius in scene units.
    pub visual_radius: f64,
}

/// One satellite on a circular orbit around a named parent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SatelliteConfig {
    pub name: String,
    /// Name of a body in [`SystemConfig::bodies`].
    pub parent: String,
    pub distance: f64,
    /// Signed angle decrement per frame.
    pub angle_step: f64,
    pub initial_angle: f64,
    pub visual_radius: f64,
}

/// Kepler solver policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub max_iterations: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            star: StarConfig::default(),
            bodies: vec![
                BodyConfig::planet("Mercury", 0.387, 0.2056, 0.0298, 0.0021, 2439.7),
                BodyConfig::planet("Venus", 0.723, 0.0067, 0.0116, -0.0005, 6051.8),
                BodyConfig::planet("Earth", 1.0, 0.0167, 0.009, 0.12, 6371.0),
                BodyConfig::planet("Mars", 1.524, 0.0934, 0.0048, 0.015, 3389.5),
            ],
            satellites: vec![SatelliteConfig::default()],
            orbit_path_samples: OrbitPath::DEFAULT_SAMPLES,
            solver: SolverConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            name: "Sun".to_string(),
            spin_step: 0.002,
            visual_radius: 8.0,
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self::planet("Earth", 1.0, 0.0167, 0.009, 0.12, 6371.0)
    }
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        // The moon keeps its unscaled distance and size so it stays visible.
        Self {
            name: "Moon".to_string(),
            parent: "Earth".to_string(),
            distance: 4.033,
            angle_step: 0.09203,
            initial_angle: 0.0,
            visual_radius: 0.7,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: KeplerSolver::DEFAULT_TOLERANCE,
            max_iterations: KeplerSolver::DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl BodyConfig {
    /// A planet given in astronomical units and kilometres.
    pub fn planet(
        name: &str,
        semi_major_axis_au: f64,
        eccentricity: f64,
        mean_anomaly_step: f64,
        spin_step: f64,
        radius_km: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            semi_major_axis: semi_major_axis_au * UNITS_PER_AU,
            eccentricity,
            mean_anomaly_step,
            initial_mean_anomaly: 0.0,
            spin_step,
            visual_radius: radius_km / KM_PER_UNIT,
        }
    }
}

impl TryFrom<SolverConfig> for KeplerSolver {
    type Error = ElementsError;

    fn try_from(config: SolverConfig) -> Result<Self, Self::Error> {
        KeplerSolver::checked(config.tolerance, config.max_iterations)
    }
}

impl SystemConfig {
    /// Parse a configuration from RON text.
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        ron::from_str(contents).map_err(ConfigError::Parse)
    }

    /// Serialize to pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new().depth_limit(3);
        ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        let config = Self::from_ron_str(&contents)?;
        tracing::debug!(path = %path.display(), bodies = config.bodies.len(), "loaded system config");
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the built-in table.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Write the configuration to disk as RON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_ron_string()?;
        std::fs::write(path, contents).map_err(ConfigError::Write)
    }
}
