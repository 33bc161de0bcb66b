use crate::{
    body::{Pose, Readiness},
    elements,
    error::ElementsError,
};
use ultraviolet::DVec3;

/// A body on a circular orbit anchored to a parent's current position.
///
/// Must be updated after its parent within the same tick so it reads the
/// parent's fresh position.
#[derive(Clone, Debug, PartialEq)]
pub struct SatelliteBody {
    pub name: String,
    /// Visual radius in scene units.
    pub radius: f64,
    pub readiness: Readiness,
    distance: f64,
    angle_step: f64,
    angle: f64,
    position: DVec3,
    guide_center: DVec3,
    light_direction: DVec3,
}

impl SatelliteBody {
    pub fn new(
        name: impl Into<String>,
        distance: f64,
        angle_step: f64,
        initial_angle: f64,
        radius: f64,
    ) -> Result<Self, ElementsError> {
        let distance = elements::validate_distance(distance)?;
        let radius = elements::validate_radius(radius)?;
        if !angle_step.is_finite() {
            return Err(ElementsError::NonFinite { field: "angle_step" });
        }
        if !initial_angle.is_finite() {
            return Err(ElementsError::NonFinite {
                field: "initial_angle",
            });
        }

        Ok(Self {
            name: name.into(),
            radius,
            readiness: Readiness::Pending,
            distance,
            angle_step,
            angle: initial_angle,
            position: DVec3::zero(),
            guide_center: DVec3::zero(),
            light_direction: DVec3::unit_x(),
        })
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn angle_step(&self) -> f64 {
        self.angle_step
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Centre of the satellite's orbit guide ring; tracks the parent.
    pub fn guide_center(&self) -> DVec3 {
        self.guide_center
    }

    /// Unit vector from the satellite towards the light, or zero if they coincide.
    pub fn light_direction(&self) -> DVec3 {
        self.light_direction
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            spin: 0.0,
        }
    }

    /// Places the satellite around `parent` without advancing its angle.
    pub fn anchor(&mut self, parent: DVec3, light: DVec3) {
        let (sin, cos) = self.angle.sin_cos();
        self.position = DVec3::new(
            parent.x + self.distance * cos,
            parent.y,
            parent.z + self.distance * sin,
        );
        self.guide_center = parent;
        self.light_direction = direction_towards(self.position, light);
    }

    /// Advances one frame around the parent's already-updated position.
    pub fn update(&mut self, parent: DVec3, light: DVec3) {
        self.angle -= self.angle_step;
        self.anchor(parent, light);
    }
}

/// Normalised `to - from`, falling back to zero for coincident points.
pub fn direction_towards(from: DVec3, to: DVec3) -> DVec3 {
    let d = to - from;
    let len = d.mag();
    if len > f64::EPSILON { d / len } else { DVec3::zero() }
}
