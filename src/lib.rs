pub mod body;
pub mod c_api;
pub mod config;
pub mod elements;
pub mod error;
pub mod kepler;
pub mod logging;
pub mod orbit_path;
pub mod registry;
pub mod satellite;
pub mod utils;

pub use body::{OrbitingBody, Pose, Readiness, Spin, Star};
pub use config::{BodyConfig, SatelliteConfig, SolverConfig, StarConfig, SystemConfig};
pub use elements::OrbitalElements;
pub use error::{ConfigError, ElementsError};
pub use kepler::{KeplerSolution, KeplerSolver, solve_kepler};
pub use orbit_path::OrbitPath;
pub use registry::{BodyKind, BodyPose, OrbitRegistry};
pub use satellite::SatelliteBody;
pub use ultraviolet;
