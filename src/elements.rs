use crate::error::ElementsError;
use ultraviolet::DVec3;

/// Immutable orbital elements of a primary body.
///
/// The orbit lies in the `y = 0` plane with the star at the focus (origin)
/// and perihelion on the `+x` axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitalElements {
    semi_major_axis: f64,
    eccentricity: f64,
    mean_anomaly_step: f64,
}

impl OrbitalElements {
    /// Validates and creates a set of elements.
    ///
    /// `mean_anomaly_step` is the signed per-frame decrement of the mean anomaly.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        mean_anomaly_step: f64,
    ) -> Result<Self, ElementsError> {
        if !semi_major_axis.is_finite() {
            return Err(ElementsError::NonFinite {
                field: "semi_major_axis",
            });
        }
        if !eccentricity.is_finite() {
            return Err(ElementsError::NonFinite {
                field: "eccentricity",
            });
        }
        if !mean_anomaly_step.is_finite() {
            return Err(ElementsError::NonFinite {
                field: "mean_anomaly_step",
            });
        }
        if semi_major_axis <= 0.0 {
            return Err(ElementsError::NonPositiveSemiMajorAxis(semi_major_axis));
        }
        if !(0.0..1.0).contains(&eccentricity) {
            return Err(ElementsError::UnboundEccentricity(eccentricity));
        }

        Ok(Self {
            semi_major_axis,
            eccentricity,
            mean_anomaly_step,
        })
    }

    pub fn semi_major_axis(&self) -> f64 {
        self.semi_major_axis
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn mean_anomaly_step(&self) -> f64 {
        self.mean_anomaly_step
    }

    /// `b = a·√(1−e²)`
    pub fn semi_minor_axis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity).sqrt()
    }

    pub fn perihelion_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    pub fn aphelion_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// Position on the ellipse for a given eccentric anomaly.
    #[inline]
    pub fn position_at(&self, eccentric_anomaly: f64) -> DVec3 {
        let (sin, cos) = eccentric_anomaly.sin_cos();
        let x = self.semi_major_axis * (cos - self.eccentricity);
        let z = self.semi_minor_axis() * sin;
        DVec3::new(x, 0.0, z)
    }

    /// Number of frames needed for one full revolution, if the body moves at all.
    pub fn frames_per_revolution(&self) -> Option<f64> {
        if self.mean_anomaly_step == 0.0 {
            None
        } else {
            Some(std::f64::consts::TAU / self.mean_anomaly_step.abs())
        }
    }
}

/// Checks a satellite distance the same way elements are checked.
pub(crate) fn validate_distance(distance: f64) -> Result<f64, ElementsError> {
    if !distance.is_finite() {
        return Err(ElementsError::NonFinite { field: "distance" });
    }
    if distance <= 0.0 {
        return Err(ElementsError::NonPositiveDistance(distance));
    }
    Ok(distance)
}

/// Rejects non-finite per-frame spin increments.
pub(crate) fn validate_spin(step: f64) -> Result<f64, ElementsError> {
    if !step.is_finite() {
        return Err(ElementsError::NonFinite { field: "spin_step" });
    }
    Ok(step)
}

/// Visual radii may be zero (point-like) but never negative or non-finite.
pub(crate) fn validate_radius(radius: f64) -> Result<f64, ElementsError> {
    if !radius.is_finite() {
        return Err(ElementsError::NonFinite {
            field: "visual_radius",
        });
    }
    if radius < 0.0 {
        return Err(ElementsError::NegativeRadius(radius));
    }
    Ok(radius)
}
