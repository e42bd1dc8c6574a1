#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    keplers_equation, keplers_equation_derivative, validate_eccentricity, KeplerError,
    DEFAULT_TOLERANCE, GOLDEN_RATIO, NEWTON_MAX_ITERATIONS, NUMERIC_MAX_ITERS,
};
use std::f64::consts::TAU;

/// A root-finding method for Kepler's equation.
///
/// Implementors find the eccentric anomaly `E` with
/// `E - e*sin(E) - M = 0` for a given mean anomaly `M` and eccentricity
/// `e` in `[0, 1)`. The root is unique for elliptic orbits, so every
/// method must agree on it within its tolerance; which one you pick is a
/// speed/robustness trade-off, not a correctness one.
///
/// Tolerance and the iteration cap are fields on each concrete solver, so
/// a caller can tighten or loosen them per instance without touching this
/// contract.
///
/// # Example
/// ```
/// use kepler_solvers::{Bisection, KeplerSolver, NewtonRaphson};
///
/// # fn main() -> Result<(), kepler_solvers::KeplerError> {
/// let newton = NewtonRaphson::default().solve(2.5, 0.3)?;
/// let bisect = Bisection::default().solve(2.5, 0.3)?;
/// assert!((newton - bisect).abs() < 1e-4);
/// # Ok(())
/// # }
/// ```
pub trait KeplerSolver {
    /// Solves `E - e*sin(E) = M` for `E`.
    ///
    /// The mean anomaly may be any real number; solutions honor
    /// `E(M + 2pi*k) = E(M) + 2pi*k`, so whole turns pass through
    /// unchanged.
    ///
    /// # Errors
    /// - [`KeplerError::InvalidEccentricity`] if `eccentricity` is outside
    ///   `[0, 1)`.
    /// - [`KeplerError::NotConverged`] if the iteration cap ran out before
    ///   the tolerance was met. The error carries the best iterate.
    fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> Result<f64, KeplerError>;

    /// A short human-readable method name, for benchmark and report labels.
    fn name(&self) -> &'static str;
}

/// Newton-Raphson iteration on the Kepler residual.
///
/// Starts from `E = M` and repeats
/// `E <- E + (M - (E - e*sin(E))) / (1 - e*cos(E))` until the update step
/// drops below the tolerance. Converges quadratically for eccentricities
/// not close to 1; this is the method to reach for by default.
///
/// The denominator `1 - e*cos(E)` is bounded away from zero for `e < 1`,
/// so no bracketing or damping is needed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NewtonRaphson {
    /// Stop once `|E_new - E| < tolerance`.
    pub tolerance: f64,
    /// Give up with [`KeplerError::NotConverged`] after this many steps.
    pub max_iterations: u32,
}

impl NewtonRaphson {
    /// Creates a solver with an explicit tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        NewtonRaphson {
            tolerance,
            max_iterations,
        }
    }
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, NEWTON_MAX_ITERATIONS)
    }
}

impl KeplerSolver for NewtonRaphson {
    fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> Result<f64, KeplerError> {
        validate_eccentricity(eccentricity)?;

        let mut ecc_anom = mean_anomaly;
        for _ in 0..self.max_iterations {
            let delta = -keplers_equation(mean_anomaly, ecc_anom, eccentricity)
                / keplers_equation_derivative(ecc_anom, eccentricity);
            ecc_anom += delta;

            if delta.abs() < self.tolerance {
                return Ok(ecc_anom);
            }
        }

        Err(KeplerError::NotConverged {
            iterations: self.max_iterations,
            best: ecc_anom,
            residual: keplers_equation(mean_anomaly, ecc_anom, eccentricity),
        })
    }

    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }
}

/// Bracketing search with a golden-ratio interior point.
///
/// Works on the bracket `[0, 2pi]` (after reducing the mean anomaly by
/// whole turns) and probes at `c = lo + (hi - lo) / phi`, keeping
/// whichever sub-interval still has the sign change. Despite the name this
/// is not golden-section *minimization* (the Kepler residual is monotone,
/// not unimodal); it is sign-test bracketing that happens to split at the
/// golden point, shrinking the interval to at most `1/phi ~ 0.618` of its
/// width per step.
///
/// Linear convergence, but unconditionally robust for any `e < 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GoldenSection {
    /// Stop once the bracket width drops below this.
    pub tolerance: f64,
    /// Give up with [`KeplerError::NotConverged`] after this many steps.
    pub max_iterations: u32,
}

impl GoldenSection {
    /// Creates a solver with an explicit tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        GoldenSection {
            tolerance,
            max_iterations,
        }
    }
}

impl Default for GoldenSection {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, NUMERIC_MAX_ITERS)
    }
}

impl KeplerSolver for GoldenSection {
    fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> Result<f64, KeplerError> {
        validate_eccentricity(eccentricity)?;

        // Reduce M into [0, 2pi); the solved anomaly is shifted back by the
        // same whole turns at the end.
        let turns = (mean_anomaly / TAU).floor() * TAU;
        let reduced = mean_anomaly - turns;

        let (mut lo, mut hi) = (0.0_f64, TAU);
        let f_lo = keplers_equation(reduced, lo, eccentricity);
        if f_lo == 0.0 {
            return Ok(turns);
        }
        if f_lo * keplers_equation(reduced, hi, eccentricity) > 0.0 {
            return Err(KeplerError::DegenerateBracket {
                lo,
                hi,
                mean_anomaly: reduced,
            });
        }

        let mut iterations = 0;
        while hi - lo > self.tolerance {
            if iterations >= self.max_iterations {
                let best = 0.5 * (lo + hi) + turns;
                return Err(KeplerError::NotConverged {
                    iterations,
                    best,
                    residual: keplers_equation(mean_anomaly, best, eccentricity),
                });
            }
            iterations += 1;

            let probe = lo + (hi - lo) / GOLDEN_RATIO;
            let f_probe = keplers_equation(reduced, probe, eccentricity);
            if f_probe == 0.0 {
                return Ok(probe + turns);
            }

            if keplers_equation(reduced, lo, eccentricity) * f_probe < 0.0 {
                hi = probe;
            } else {
                lo = probe;
            }
        }

        Ok(0.5 * (lo + hi) + turns)
    }

    fn name(&self) -> &'static str {
        "golden section"
    }
}

/// Classic bisection on the bracket `[0, 2pi]`.
///
/// Halves the interval each step based on the sign of the Kepler residual
/// at the midpoint. Gains exactly one bit of the answer per iteration;
/// slow but impossible to throw off.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bisection {
    /// Stop once the bracket width drops below this.
    pub tolerance: f64,
    /// Give up with [`KeplerError::NotConverged`] after this many steps.
    pub max_iterations: u32,
}

impl Bisection {
    /// Creates a solver with an explicit tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Bisection {
            tolerance,
            max_iterations,
        }
    }
}

impl Default for Bisection {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, NUMERIC_MAX_ITERS)
    }
}

impl KeplerSolver for Bisection {
    fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> Result<f64, KeplerError> {
        validate_eccentricity(eccentricity)?;

        let turns = (mean_anomaly / TAU).floor() * TAU;
        let reduced = mean_anomaly - turns;

        let (mut lo, mut hi) = (0.0_f64, TAU);
        let f_lo = keplers_equation(reduced, lo, eccentricity);
        if f_lo == 0.0 {
            return Ok(turns);
        }
        if f_lo * keplers_equation(reduced, hi, eccentricity) > 0.0 {
            return Err(KeplerError::DegenerateBracket {
                lo,
                hi,
                mean_anomaly: reduced,
            });
        }

        let mut iterations = 0;
        while hi - lo > self.tolerance {
            if iterations >= self.max_iterations {
                let best = 0.5 * (lo + hi) + turns;
                return Err(KeplerError::NotConverged {
                    iterations,
                    best,
                    residual: keplers_equation(mean_anomaly, best, eccentricity),
                });
            }
            iterations += 1;

            let mid = 0.5 * (lo + hi);
            let f_mid = keplers_equation(reduced, mid, eccentricity);
            if f_mid == 0.0 {
                return Ok(mid + turns);
            }

            if keplers_equation(reduced, lo, eccentricity) * f_mid < 0.0 {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        Ok(0.5 * (lo + hi) + turns)
    }

    fn name(&self) -> &'static str {
        "bisection"
    }
}

/// Fixed-point (Picard) iteration `E <- e*sin(E) + M`.
///
/// The map contracts with factor `e`, so convergence is linear and slows
/// down badly as the eccentricity approaches 1: at `e = 0.9` it takes on
/// the order of 130 iterations to reach 1e-6. The default iteration cap is
/// sized accordingly; exceeding it reports [`KeplerError::NotConverged`]
/// instead of spinning forever.
///
/// The stopping test compares `|E_new - E|` against the tolerance. For
/// mean anomalies in `(pi, 2pi)` the iterates approach the root from
/// above, so a signed `E_new - E < tol` comparison would exit on the very
/// first step with a wrong answer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedPoint {
    /// Stop once `|E_new - E| < tolerance`.
    pub tolerance: f64,
    /// Give up with [`KeplerError::NotConverged`] after this many steps.
    pub max_iterations: u32,
}

impl FixedPoint {
    /// Creates a solver with an explicit tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        FixedPoint {
            tolerance,
            max_iterations,
        }
    }
}

impl Default for FixedPoint {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, NUMERIC_MAX_ITERS)
    }
}

impl KeplerSolver for FixedPoint {
    fn solve(&self, mean_anomaly: f64, eccentricity: f64) -> Result<f64, KeplerError> {
        validate_eccentricity(eccentricity)?;

        let mut ecc_anom = mean_anomaly;
        for _ in 0..self.max_iterations {
            let next = eccentricity * ecc_anom.sin() + mean_anomaly;

            if (next - ecc_anom).abs() < self.tolerance {
                // Returning `next` rather than `ecc_anom` buys one extra
                // contraction: its residual is at most e * |next - ecc_anom|.
                return Ok(next);
            }
            ecc_anom = next;
        }

        Err(KeplerError::NotConverged {
            iterations: self.max_iterations,
            best: ecc_anom,
            residual: keplers_equation(mean_anomaly, ecc_anom, eccentricity),
        })
    }

    fn name(&self) -> &'static str {
        "fixed-point"
    }
}
