//! Error types for orbit construction and configuration loading.

/// Construction-time violations of the orbital element contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ElementsError {
    /// A field was NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },

    /// Semi-major axis must be strictly positive.
    #[error("semi-major axis must be positive, got {0}")]
    NonPositiveSemiMajorAxis(f64),

    /// Eccentricity outside `[0, 1)`; parabolic and hyperbolic orbits are not supported.
    #[error("eccentricity must lie in [0, 1), got {0}")]
    UnboundEccentricity(f64),

    /// Satellite distance must be strictly positive.
    #[error("satellite distance must be positive, got {0}")]
    NonPositiveDistance(f64),

    /// Visual radius must be zero or positive.
    #[error("visual radius must not be negative, got {0}")]
    NegativeRadius(f64),

    /// Solver tolerance must be a positive finite number.
    #[error("solver tolerance must be positive, got {0}")]
    InvalidTolerance(f64),

    /// A solver with no iterations never refines its initial guess.
    #[error("solver iteration cap must be at least 1")]
    ZeroIterationCap,

    /// Orbit paths need at least three samples to describe a closed curve.
    #[error("orbit path needs at least 3 samples, got {0}")]
    InvalidSampleCount(usize),
}

/// Errors that can occur when loading or applying a system configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to write the config file to disk.
    #[error("failed to write config: {0}")]
    Write(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// Failed to serialize config to RON.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),

    /// A body or satellite entry carries invalid elements.
    #[error("invalid orbit for `{name}`: {source}")]
    InvalidBody {
        name: String,
        #[source]
        source: ElementsError,
    },

    /// The Kepler solver policy is unusable.
    #[error("invalid solver policy: {0}")]
    InvalidSolver(#[source] ElementsError),

    /// A satellite names a parent that is not a registered body.
    #[error("satellite `{satellite}` refers to unknown parent `{parent}`")]
    UnknownParent { satellite: String, parent: String },

    /// Two entries share the same name.
    #[error("duplicate body name `{0}`")]
    DuplicateName(String),
}
