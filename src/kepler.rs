use crate::error::ElementsError;

/// Newton-Raphson solver for Kepler's equation `E - e·sin(E) = M`.
///
/// Stateless apart from its stopping policy. The solve is best-effort: when the
/// iteration cap is reached the last estimate is returned and flagged as not
/// converged instead of raising an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerSolver {
    /// Absolute bound on the last Newton step, `|ΔE|`.
    pub tolerance: f64,
    /// Hard cap on Newton updates per solve.
    pub max_iterations: u32,
}

/// Result of a single solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly, not normalised.
    pub eccentric_anomaly: f64,
    /// Number of Newton updates performed.
    pub iterations: u32,
    /// Whether `|ΔE|` dropped below the tolerance before the cap.
    pub converged: bool,
}

impl Default for KeplerSolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE, Self::DEFAULT_MAX_ITERATIONS)
    }
}

impl KeplerSolver {
    /// Default constants.
    pub const DEFAULT_TOLERANCE: f64 = 1e-6;
    pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Like [`KeplerSolver::new`], but rejects policies that cannot converge:
    /// a non-finite or non-positive tolerance, or a zero iteration cap.
    pub fn checked(tolerance: f64, max_iterations: u32) -> Result<Self, ElementsError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ElementsError::InvalidTolerance(tolerance));
        }
        if max_iterations == 0 {
            return Err(ElementsError::ZeroIterationCap);
        }
        Ok(Self::new(tolerance, max_iterations))
    }

    /// Solves for the eccentric anomaly given mean anomaly `m` and eccentricity `e`.
    ///
    /// `e` is assumed to lie in `[0, 1)`, which keeps `1 - e·cos(E)` strictly
    /// positive; callers get that guarantee from [`crate::OrbitalElements::new`].
    pub fn solve(&self, m: f64, e: f64) -> KeplerSolution {
        let mut ecc_anomaly = m;

        for i in 1..=self.max_iterations {
            let (sin, cos) = ecc_anomaly.sin_cos();
            let f = ecc_anomaly - e * sin - m;
            let f_prime = 1.0 - e * cos;
            let delta = f / f_prime;
            ecc_anomaly -= delta;

            if delta.abs() < self.tolerance {
                return KeplerSolution {
                    eccentric_anomaly: ecc_anomaly,
                    iterations: i,
                    converged: true,
                };
            }
        }

        KeplerSolution {
            eccentric_anomaly: ecc_anomaly,
            iterations: self.max_iterations,
            converged: false,
        }
    }
}

/// Solves Kepler's equation with the default tolerance and iteration cap.
pub fn solve_kepler(m: f64, e: f64) -> f64 {
    KeplerSolver::default().solve(m, e).eccentric_anomaly
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    fn residual(ecc_anomaly: f64, m: f64, e: f64) -> f64 {
        (ecc_anomaly - e * ecc_anomaly.sin() - m).abs()
    }

    #[test]
    fn test_circular_orbit_is_identity() {
        for m in [0.0, 0.3, PI, 5.0] {
            let solution = KeplerSolver::default().solve(m, 0.0);
            assert!(solution.converged);
            assert_eq!(solution.iterations, 1);
            assert!((solution.eccentric_anomaly - m).abs() < 1e-12);
        }
    }

    #[test]
    fn test_randomized_equation_satisfaction() {
        let mut rng = fastrand::Rng::with_seed(0x6b65706c);
        let solver = KeplerSolver::default();

        for _ in 0..10_000 {
            let m = rng.f64() * TAU;
            let e = rng.f64() * 0.95;
            let solution = solver.solve(m, e);
            assert!(solution.converged, "no convergence for m={m}, e={e}");
            assert!(solution.iterations <= 100);
            let r = residual(solution.eccentric_anomaly, m, e);
            assert!(r < 1e-5, "residual {r} for m={m}, e={e}");
        }
    }

    #[test]
    fn test_mean_anomaly_outside_one_revolution() {
        let solver = KeplerSolver::default();
        for m in [-7.5, -0.2, 8.0, 40.0] {
            let solution = solver.solve(m, 0.3);
            assert!(solution.converged);
            assert!(residual(solution.eccentric_anomaly, m, 0.3) < 1e-5);
        }
    }

    #[test]
    fn test_iteration_count_grows_with_eccentricity() {
        let solver = KeplerSolver::default();
        for m in [1.0, 2.5] {
            let counts: Vec<u32> = [0.0, 0.2, 0.4, 0.6, 0.8, 0.95]
                .iter()
                .map(|&e| solver.solve(m, e).iterations)
                .collect();
            assert!(
                counts.windows(2).all(|w| w[0] <= w[1]),
                "iteration counts not monotonic for m={m}: {counts:?}"
            );
            assert!(counts.iter().all(|&c| c <= 100));
        }
    }

    #[test]
    fn test_cap_returns_best_estimate() {
        let solver = KeplerSolver::new(1e-15, 1);
        let solution = solver.solve(1.0, 0.9);
        assert!(!solution.converged);
        assert_eq!(solution.iterations, 1);
        assert!(solution.eccentric_anomaly.is_finite());

        let resumed = KeplerSolver::default().solve(1.0, 0.9);
        assert!(resumed.converged);
        assert!(resumed.iterations > 1);
    }

    #[test]
    fn test_checked_rejects_unusable_policies() {
        assert_eq!(KeplerSolver::checked(1e-6, 100), Ok(KeplerSolver::default()));
        assert_eq!(
            KeplerSolver::checked(1e-6, 0),
            Err(ElementsError::ZeroIterationCap)
        );
        assert_eq!(
            KeplerSolver::checked(0.0, 100),
            Err(ElementsError::InvalidTolerance(0.0))
        );
        assert_eq!(
            KeplerSolver::checked(-1e-6, 100),
            Err(ElementsError::InvalidTolerance(-1e-6))
        );
        assert!(matches!(
            KeplerSolver::checked(f64::NAN, 100),
            Err(ElementsError::InvalidTolerance(t)) if t.is_nan()
        ));
    }

    #[test]
    fn test_solve_kepler_matches_default_solver() {
        let m = TAU - 0.009;
        assert_eq!(
            solve_kepler(m, 0.2),
            KeplerSolver::default().solve(m, 0.2).eccentric_anomaly
        );
    }
}
