use crate::{
    elements::{OrbitalElements, validate_radius, validate_spin},
    error::ElementsError,
    kepler::{KeplerSolution, KeplerSolver},
    utils,
};
use ultraviolet::DVec3;

/// Per-frame self-rotation accumulator, decoupled from orbital motion.
///
/// The sign of `step` is the rotation sense; retrograde rotators use a negative step.
/// The angle is never wrapped since it only feeds incremental rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spin {
    pub angle: f64,
    pub step: f64,
}

impl Spin {
    pub fn new(step: f64) -> Self {
        Self { angle: 0.0, step }
    }

    pub fn advance(&mut self) {
        self.angle += self.step;
    }
}

/// Whether a body's renderable representation exists yet.
///
/// Orbital state is propagated from tick zero regardless; only pose application
/// by the presentation layer waits for `Ready`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Readiness {
    #[default]
    Pending,
    Ready,
}

/// Position and spin handed to the rendering collaborator each tick.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: DVec3,
    pub spin: f64,
}

/// The central star: fixed at the origin, spinning, and the light source.
#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub name: String,
    pub spin: Spin,
    /// Visual radius in scene units.
    pub radius: f64,
    pub readiness: Readiness,
}

impl Star {
    pub fn new(name: impl Into<String>, spin: Spin, radius: f64) -> Result<Self, ElementsError> {
        validate_spin(spin.step)?;
        Ok(Self {
            name: name.into(),
            spin,
            radius: validate_radius(radius)?,
            readiness: Readiness::Pending,
        })
    }

    pub fn position(&self) -> DVec3 {
        DVec3::zero()
    }

    /// The star doubles as the point light for satellite shading.
    pub fn light_position(&self) -> DVec3 {
        self.position()
    }

    pub fn update(&mut self) {
        self.spin.advance();
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position(),
            spin: self.spin.angle,
        }
    }
}

/// A primary body on a Keplerian ellipse around the star.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitingBody {
    pub name: String,
    /// Visual radius in scene units.
    pub radius: f64,
    pub spin: Spin,
    pub readiness: Readiness,
    elements: OrbitalElements,
    mean_anomaly: f64,
    position: DVec3,
    non_converged: u64,
}

impl OrbitingBody {
    /// Creates a body and places it at the position implied by `initial_mean_anomaly`.
    pub fn new(
        name: impl Into<String>,
        elements: OrbitalElements,
        initial_mean_anomaly: f64,
        spin: Spin,
        radius: f64,
    ) -> Result<Self, ElementsError> {
        if !initial_mean_anomaly.is_finite() {
            return Err(ElementsError::NonFinite {
                field: "initial_mean_anomaly",
            });
        }
        validate_spin(spin.step)?;
        let mut body = Self {
            name: name.into(),
            radius: validate_radius(radius)?,
            spin,
            readiness: Readiness::Pending,
            elements,
            mean_anomaly: 0.0,
            position: DVec3::zero(),
            non_converged: 0,
        };
        body.set_mean_anomaly(initial_mean_anomaly, &KeplerSolver::default());
        Ok(body)
    }

    pub fn elements(&self) -> &OrbitalElements {
        &self.elements
    }

    /// Current mean anomaly, always in `[0, 2π)`.
    pub fn mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            spin: self.spin.angle,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.readiness == Readiness::Ready
    }

    /// Number of solves that hit the iteration cap for this body.
    pub fn non_converged_solves(&self) -> u64 {
        self.non_converged
    }

    /// Jumps to a given mean anomaly and re-derives the position.
    pub fn set_mean_anomaly(&mut self, mean_anomaly: f64, solver: &KeplerSolver) -> KeplerSolution {
        self.mean_anomaly = utils::wrap_angle(mean_anomaly);
        self.solve_position(solver)
    }

    /// Advances the body by one frame: anomaly step, wrap, Kepler solve, spin.
    pub fn update(&mut self, solver: &KeplerSolver) -> KeplerSolution {
        self.mean_anomaly = utils::wrap_angle(self.mean_anomaly - self.elements.mean_anomaly_step());
        let solution = self.solve_position(solver);
        self.spin.advance();
        solution
    }

    fn solve_position(&mut self, solver: &KeplerSolver) -> KeplerSolution {
        let solution = solver.solve(self.mean_anomaly, self.elements.eccentricity());
        if !solution.converged {
            if self.non_converged == 0 {
                tracing::warn!(
                    body = %self.name,
                    mean_anomaly = self.mean_anomaly,
                    eccentricity = self.elements.eccentricity(),
                    iterations = solution.iterations,
                    "kepler solve hit the iteration cap, using best estimate"
                );
            }
            self.non_converged += 1;
        }
        self.position = self.elements.position_at(solution.eccentric_anomaly);
        solution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    fn body(a: f64, e: f64, step: f64) -> OrbitingBody {
        let elements = OrbitalElements::new(a, e, step).unwrap();
        OrbitingBody::new("test", elements, 0.0, Spin::new(0.01), 1.0).unwrap()
    }

    #[test]
    fn test_new_body_starts_at_perihelion() {
        let b = body(40.0, 0.2, 0.009);
        let p = b.position();
        assert!((p.x - 40.0 * 0.8).abs() < 1e-9);
        assert!(p.z.abs() < 1e-9);
        assert_eq!(p.y, 0.0);
        assert_eq!(b.readiness, Readiness::Pending);
    }

    #[test]
    fn test_aphelion_at_half_revolution() {
        let mut b = body(40.0, 0.2, 0.009);
        b.set_mean_anomaly(PI, &KeplerSolver::default());
        let p = b.position();
        assert!((p.x + 40.0 * 1.2).abs() < 1e-6, "x = {}", p.x);
        assert!(p.z.abs() < 1e-6, "z = {}", p.z);
    }

    #[test]
    fn test_single_tick_scenario() {
        let mut b = body(40.0, 0.2, 0.009);
        let solution = b.update(&KeplerSolver::default());

        assert!((b.mean_anomaly() - (TAU - 0.009)).abs() < 1e-12);
        assert!(solution.converged);
        let e_anom = solution.eccentric_anomaly;
        assert!((e_anom - 0.2 * e_anom.sin() - b.mean_anomaly()).abs() < 1e-6);
        assert!((e_anom - (TAU - 0.01125)).abs() < 1e-4, "E = {e_anom}");

        let p = b.position();
        assert!((p.x - 31.9975).abs() < 1e-3, "x = {}", p.x);
        assert!((p.z + 0.4409).abs() < 1e-3, "z = {}", p.z);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_wrap_invariant_over_many_ticks() {
        let solver = KeplerSolver::default();
        for step in [0.0298, 0.009, -0.0116, 1.7, -3.9] {
            let mut b = body(20.0, 0.1, step);
            for _ in 0..5_000 {
                b.update(&solver);
                let m = b.mean_anomaly();
                assert!((0.0..TAU).contains(&m), "m = {m} for step {step}");
            }
        }
    }

    #[test]
    fn test_periodicity_after_full_revolution() {
        let solver = KeplerSolver::default();
        let steps = 360;
        let mut b = body(60.96, 0.0934, TAU / steps as f64);
        let start = b.position();
        for _ in 0..steps {
            b.update(&solver);
        }
        let drift = (b.position() - start).mag();
        assert!(drift < 1e-6, "drift = {drift}");
    }

    #[test]
    fn test_spin_is_independent_of_orbit() {
        let elements = OrbitalElements::new(28.92, 0.0067, 0.0116).unwrap();
        let mut venus = OrbitingBody::new("Venus", elements, 0.0, Spin::new(-0.0005), 2.85).unwrap();
        let solver = KeplerSolver::default();
        for _ in 0..10 {
            venus.update(&solver);
        }
        assert!((venus.spin.angle + 0.005).abs() < 1e-12);
        assert!((venus.pose().spin - venus.spin.angle).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_convergence_is_counted_not_fatal() {
        let mut b = body(10.0, 0.9, 0.5);
        let strict = KeplerSolver::new(0.0, 1);
        let solution = b.update(&strict);
        assert!(!solution.converged);
        b.update(&strict);
        assert_eq!(b.non_converged_solves(), 2);
        assert!(b.position().x.is_finite());
    }

    #[test]
    fn test_star_spin_and_light() {
        let mut star = Star::new("Sun", Spin::new(0.002), 8.0).unwrap();
        star.update();
        star.update();
        assert!((star.pose().spin - 0.004).abs() < 1e-12);
        assert_eq!(star.light_position(), DVec3::zero());
    }

    #[test]
    fn test_constructors_reject_unusable_state() {
        let elements = OrbitalElements::new(40.0, 0.2, 0.009).unwrap();
        for m in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                OrbitingBody::new("Earth", elements, m, Spin::new(0.01), 1.0),
                Err(ElementsError::NonFinite {
                    field: "initial_mean_anomaly"
                })
            );
        }
        assert_eq!(
            OrbitingBody::new("Earth", elements, 0.0, Spin::new(f64::NAN), 1.0),
            Err(ElementsError::NonFinite { field: "spin_step" })
        );
        assert_eq!(
            OrbitingBody::new("Earth", elements, 0.0, Spin::new(0.01), -1.0),
            Err(ElementsError::NegativeRadius(-1.0))
        );

        assert_eq!(
            Star::new("Sun", Spin::new(f64::INFINITY), 8.0),
            Err(ElementsError::NonFinite { field: "spin_step" })
        );
        assert_eq!(
            Star::new("Sun", Spin::new(0.002), f64::NAN),
            Err(ElementsError::NonFinite {
                field: "visual_radius"
            })
        );
        assert!(Star::new("Sun", Spin::new(0.002), 0.0).is_ok());
    }
}
