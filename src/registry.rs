use crate::{
    body::{OrbitingBody, Pose, Readiness, Spin, Star},
    config::{BodyConfig, SatelliteConfig, StarConfig, SystemConfig},
    elements::OrbitalElements,
    error::{ConfigError, ElementsError},
    kepler::KeplerSolver,
    orbit_path::OrbitPath,
    satellite::SatelliteBody,
};

use ultraviolet::DVec3;

/// Which table an entry lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    Star,
    Primary,
    Satellite,
}

/// One entry of the per-tick output handed to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPose<'a> {
    pub name: &'a str,
    pub kind: BodyKind,
    pub pose: Pose,
    pub readiness: Readiness,
    /// Illumination direction, set for satellites only.
    pub light_direction: Option<DVec3>,
}

#[derive(Clone, Debug, PartialEq)]
struct Satellite {
    parent: usize,
    body: SatelliteBody,
}

/// Owns every body and advances them once per tick in a fixed order:
/// star spin, then every primary, then every satellite.
#[derive(Clone, Debug)]
pub struct OrbitRegistry {
    /// Number of completed ticks.
    pub frame: usize,
    solver: KeplerSolver,
    orbit_path_samples: usize,
    star: Star,
    bodies: Vec<OrbitingBody>,
    paths: Vec<OrbitPath>,
    satellites: Vec<Satellite>,
}

impl OrbitRegistry {
    /// An empty registry around a star.
    pub fn new(star: Star, solver: KeplerSolver, orbit_path_samples: usize) -> Self {
        Self {
            frame: 0,
            solver,
            orbit_path_samples,
            star,
            bodies: Vec::new(),
            paths: Vec::new(),
            satellites: Vec::new(),
        }
    }

    /// Builds a registry from a declarative body table.
    pub fn from_config(config: &SystemConfig) -> Result<Self, ConfigError> {
        let solver = KeplerSolver::try_from(config.solver).map_err(ConfigError::InvalidSolver)?;
        let mut registry = Self::new(star_from_config(&config.star)?, solver, config.orbit_path_samples);

        for body in &config.bodies {
            registry.add_body(body)?;
        }
        for satellite in &config.satellites {
            registry.add_satellite(satellite)?;
        }

        tracing::debug!(
            bodies = registry.bodies.len(),
            satellites = registry.satellites.len(),
            samples = registry.orbit_path_samples,
            "orbit registry built"
        );
        Ok(registry)
    }

    /// The scaled inner solar system.
    pub fn solar_system() -> Result<Self, ConfigError> {
        Self::from_config(&SystemConfig::default())
    }

    /// Registers a primary body and samples its orbit guide. Returns its index.
    pub fn add_body(&mut self, config: &BodyConfig) -> Result<usize, ConfigError> {
        self.ensure_unique(&config.name)?;
        let invalid = |source: ElementsError| ConfigError::InvalidBody {
            name: config.name.clone(),
            source,
        };

        let elements = OrbitalElements::new(
            config.semi_major_axis,
            config.eccentricity,
            config.mean_anomaly_step,
        )
        .map_err(invalid)?;
        let path = OrbitPath::sample(&elements, self.orbit_path_samples).map_err(invalid)?;

        let mut body = OrbitingBody::new(
            config.name.clone(),
            elements,
            config.initial_mean_anomaly,
            Spin::new(config.spin_step),
            config.visual_radius,
        )
        .map_err(invalid)?;
        // Re-solve under the table's policy.
        body.set_mean_anomaly(config.initial_mean_anomaly, &self.solver);

        self.bodies.push(body);
        self.paths.push(path);
        Ok(self.bodies.len() - 1)
    }

    /// Registers a satellite around an already registered primary. Returns its index.
    pub fn add_satellite(&mut self, config: &SatelliteConfig) -> Result<usize, ConfigError> {
        self.ensure_unique(&config.name)?;
        let parent = self
            .bodies
            .iter()
            .position(|b| b.name == config.parent)
            .ok_or_else(|| ConfigError::UnknownParent {
                satellite: config.name.clone(),
                parent: config.parent.clone(),
            })?;

        let mut body = SatelliteBody::new(
            config.name.clone(),
            config.distance,
            config.angle_step,
            config.initial_angle,
            config.visual_radius,
        )
        .map_err(|source| ConfigError::InvalidBody {
            name: config.name.clone(),
            source,
        })?;
        body.anchor(self.bodies[parent].position(), self.star.light_position());

        self.satellites.push(Satellite { parent, body });
        Ok(self.satellites.len() - 1)
    }

    fn ensure_unique(&self, name: &str) -> Result<(), ConfigError> {
        let taken = self.star.name == name
            || self.bodies.iter().any(|b| b.name == name)
            || self.satellites.iter().any(|s| s.body.name == name);
        if taken {
            Err(ConfigError::DuplicateName(name.to_string()))
        } else {
            Ok(())
        }
    }

    /// Advances the whole system by one tick.
    ///
    /// All primaries are updated before any satellite so each satellite reads
    /// its parent's position from this tick.
    pub fn step(&mut self) {
        self.star.update();

        for body in &mut self.bodies {
            body.update(&self.solver);
        }

        let light = self.star.light_position();
        for satellite in &mut self.satellites {
            let parent = self.bodies[satellite.parent].position();
            satellite.body.update(parent, light);
        }

        self.frame += 1;
        tracing::trace!(frame = self.frame, "tick");
    }

    /// Advances `ticks` frames.
    pub fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.step();
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn solver(&self) -> &KeplerSolver {
        &self.solver
    }

    pub fn star(&self) -> &Star {
        &self.star
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    pub fn satellites(&self) -> impl Iterator<Item = &SatelliteBody> {
        self.satellites.iter().map(|s| &s.body)
    }

    pub fn satellite_count(&self) -> usize {
        self.satellites.len()
    }

    pub fn body(&self, name: &str) -> Option<&OrbitingBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn satellite(&self, name: &str) -> Option<&SatelliteBody> {
        self.satellites().find(|s| s.name == name)
    }

    /// Parent of the named satellite.
    pub fn parent_of(&self, satellite: &str) -> Option<&OrbitingBody> {
        self.satellites
            .iter()
            .find(|s| s.body.name == satellite)
            .map(|s| &self.bodies[s.parent])
    }

    /// Static orbit guide of a primary body.
    pub fn orbit_path(&self, name: &str) -> Option<&OrbitPath> {
        self.bodies
            .iter()
            .position(|b| b.name == name)
            .map(|i| &self.paths[i])
    }

    pub fn orbit_paths(&self) -> &[OrbitPath] {
        &self.paths
    }

    /// Flags a body's renderable as loaded. Returns false for unknown names.
    pub fn mark_ready(&mut self, name: &str) -> bool {
        if self.star.name == name {
            self.star.readiness = Readiness::Ready;
            return true;
        }
        if let Some(body) = self.bodies.iter_mut().find(|b| b.name == name) {
            body.readiness = Readiness::Ready;
            return true;
        }
        if let Some(satellite) = self.satellites.iter_mut().find(|s| s.body.name == name) {
            satellite.body.readiness = Readiness::Ready;
            return true;
        }
        false
    }

    /// Total solves that hit the iteration cap across all bodies.
    pub fn non_converged_solves(&self) -> u64 {
        self.bodies.iter().map(|b| b.non_converged_solves()).sum()
    }

    /// Poses of every body: star, primaries in table order, then satellites.
    pub fn poses(&self) -> impl Iterator<Item = BodyPose<'_>> {
        let star = std::iter::once(BodyPose {
            name: &self.star.name,
            kind: BodyKind::Star,
            pose: self.star.pose(),
            readiness: self.star.readiness,
            light_direction: None,
        });
        let primaries = self.bodies.iter().map(|b| BodyPose {
            name: &b.name,
            kind: BodyKind::Primary,
            pose: b.pose(),
            readiness: b.readiness,
            light_direction: None,
        });
        let satellites = self.satellites().map(|s| BodyPose {
            name: &s.name,
            kind: BodyKind::Satellite,
            pose: s.pose(),
            readiness: s.readiness,
            light_direction: Some(s.light_direction()),
        });
        star.chain(primaries).chain(satellites)
    }

    /// Poses of bodies whose renderable exists.
    pub fn ready_poses(&self) -> impl Iterator<Item = BodyPose<'_>> {
        self.poses().filter(|p| p.readiness == Readiness::Ready)
    }
}

fn star_from_config(config: &StarConfig) -> Result<Star, ConfigError> {
    Star::new(
        config.name.clone(),
        Spin::new(config.spin_step),
        config.visual_radius,
    )
    .map_err(|source| ConfigError::InvalidBody {
        name: config.name.clone(),
        source,
    })
}
