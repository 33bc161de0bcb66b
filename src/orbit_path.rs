use crate::{elements::OrbitalElements, error::ElementsError};
use std::f64::consts::TAU;
use ultraviolet::DVec3;

/// Static polyline approximating a body's ellipse, built once at construction.
///
/// Samples are uniform in eccentric anomaly, not in time. They do not follow
/// the body's speed along the orbit and must not be resampled to do so.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitPath {
    points: Vec<DVec3>,
}

impl OrbitPath {
    pub const DEFAULT_SAMPLES: usize = 100;
    pub const MIN_SAMPLES: usize = 3;

    pub fn sample(elements: &OrbitalElements, samples: usize) -> Result<Self, ElementsError> {
        if samples < Self::MIN_SAMPLES {
            return Err(ElementsError::InvalidSampleCount(samples));
        }

        let points = (0..samples)
            .map(|i| elements.position_at(i as f64 / samples as f64 * TAU))
            .collect();

        Ok(Self { points })
    }

    /// The `n` distinct samples, starting at perihelion.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Samples followed by the first one again, for line-strip renderers.
    pub fn closed(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.points.iter().chain(self.points.first()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earth() -> OrbitalElements {
        OrbitalElements::new(40.0, 0.0167, 0.009).unwrap()
    }

    #[test]
    fn test_sample_count_and_start() {
        let path = OrbitPath::sample(&earth(), OrbitPath::DEFAULT_SAMPLES).unwrap();
        assert_eq!(path.len(), 100);
        let first = path.points()[0];
        assert!((first.x - earth().perihelion_distance()).abs() < 1e-12);
        assert!(first.z.abs() < 1e-12);
    }

    #[test]
    fn test_rejects_degenerate_sample_count() {
        assert_eq!(
            OrbitPath::sample(&earth(), 2),
            Err(ElementsError::InvalidSampleCount(2))
        );
    }

    #[test]
    fn test_closed_repeats_first_point() {
        let path = OrbitPath::sample(&earth(), 8).unwrap();
        let closed: Vec<DVec3> = path.closed().collect();
        assert_eq!(closed.len(), 9);
        assert_eq!(closed[0], closed[8]);
    }

    #[test]
    fn test_points_lie_on_ellipse() {
        let el = OrbitalElements::new(15.48, 0.2056, 0.0298).unwrap();
        let path = OrbitPath::sample(&el, 64).unwrap();
        let a = el.semi_major_axis();
        let b = el.semi_minor_axis();
        let c = a * el.eccentricity();
        for p in path.points() {
            assert_eq!(p.y, 0.0);
            let lhs = ((p.x + c) / a).powi(2) + (p.z / b).powi(2);
            assert!((lhs - 1.0).abs() < 1e-12, "lhs = {lhs}");
        }
    }

    #[test]
    fn test_uniform_in_eccentric_anomaly() {
        let el = OrbitalElements::new(10.0, 0.5, 0.01).unwrap();
        let n = 16;
        let path = OrbitPath::sample(&el, n).unwrap();
        for (i, p) in path.points().iter().enumerate() {
            let expected = el.position_at(i as f64 * TAU / n as f64);
            assert!((*p - expected).mag() < 1e-12);
        }
        // Chord length follows |dP/dE|, which is smallest at the ends of the major axis.
        let peri_chord = (path.points()[1] - path.points()[0]).mag();
        let side_chord = (path.points()[5] - path.points()[4]).mag();
        assert!(peri_chord < side_chord);
    }
}
