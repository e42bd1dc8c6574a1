//! # Kepler's Equation Solvers
//! This library crate solves the classical two-body problem for a body on an
//! elliptic orbit: it inverts Kepler's equation `M = E - e*sin(E)` to find
//! the eccentric anomaly, then derives the true anomaly, radius vector, and
//! radial/transverse velocity components from it in closed form.
//!
//! Kepler's equation is transcendental, so the inversion has to be done
//! numerically. This crate provides four interchangeable root-finding
//! methods behind one [`KeplerSolver`] trait:
//! - [`NewtonRaphson`]: quadratic convergence away from e ~ 1; the usual
//!   default.
//! - [`GoldenSection`]: bracketing on `[0, 2pi]` with a golden-ratio
//!   interior point.
//! - [`Bisection`]: classic interval halving on the same bracket.
//! - [`FixedPoint`]: the Picard-style map `E <- e*sin(E) + M`.
//!
//! All four agree on the unique elliptic root and can be swapped freely,
//! which makes them easy to benchmark against each other (see the
//! criterion benches and the `compare_methods` example).
//!
//! ## Getting started
//! Describe the orbit with [`OrbitalParameters`], pick a solver, and either
//! solve pointwise or trace a whole period into plain arrays with
//! [`OrbitTrack`]:
//!
//! ```rust
//! use kepler_solvers::{KeplerSolver, NewtonRaphson, OrbitalParameters, OrbitTrack};
//!
//! # fn main() -> Result<(), kepler_solvers::KeplerError> {
//! // Molniya-like orbit: a = 43200 km, e = 0.736, T = 26121 s
//! let params = OrbitalParameters::new(43200.0, 0.736, 26121.0)?;
//!
//! let solver = NewtonRaphson::default();
//! let ecc_anom = solver.solve(params.mean_anomaly_at_time(6000.0), 0.736)?;
//! assert!(ecc_anom.is_finite());
//!
//! // One full period, 1000 samples, ready for plotting
//! let track = OrbitTrack::over_period(&params, &solver)?;
//! assert_eq!(track.len(), 1000);
//! # Ok(())
//! # }
//! ```
//!
//! Only closed elliptic orbits (`0 <= e < 1`) are supported; parabolic and
//! hyperbolic trajectories are rejected with [`KeplerError::InvalidEccentricity`].

#![warn(missing_docs)]

mod kinematics;
mod params;
mod solvers;
mod sweep;

#[cfg(test)]
mod tests;

pub use kinematics::{
    eccentric_anomaly_at_true_anomaly, radial_velocity, radius, speed, transverse_velocity,
    true_anomaly, KinematicState, StateVectors,
};
pub use params::OrbitalParameters;
pub use solvers::{Bisection, FixedPoint, GoldenSection, KeplerSolver, NewtonRaphson};
pub use sweep::{sample_times, OrbitTrack, VelocityTrack};

use thiserror::Error;

/// The default convergence tolerance for all solver methods.
///
/// For [`NewtonRaphson`] and [`FixedPoint`] this bounds the last update
/// step `|E_new - E|`; for the bracketing methods it bounds the final
/// interval width.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// The default iteration cap for [`NewtonRaphson`].
///
/// Newton's method converges quadratically on elliptic inputs, so in
/// practice it stops long before this. The cap only exists to bound the
/// loop when a caller asks for an unattainable tolerance.
pub const NEWTON_MAX_ITERATIONS: u32 = 100;

/// The default iteration cap for the linearly-converging methods
/// ([`GoldenSection`], [`Bisection`], [`FixedPoint`]).
///
/// This is used to prevent infinite loops in case the method fails to
/// converge. The fixed-point map contracts by a factor of roughly `e` per
/// step, so high eccentricities genuinely need hundreds of iterations.
pub const NUMERIC_MAX_ITERS: u32 = 1000;

/// The golden ratio, `(1 + sqrt(5)) / 2`.
///
/// Used by [`GoldenSection`] to place its interior probe point.
pub(crate) const GOLDEN_RATIO: f64 = 1.618033988749895;

/// The number of time samples [`OrbitTrack::over_period`] takes across one
/// orbital period.
pub const DEFAULT_SAMPLE_COUNT: usize = 1000;

/// An error from solving Kepler's equation or validating orbit parameters.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum KeplerError {
    /// The eccentricity is outside the closed elliptic range `[0, 1)`.
    ///
    /// Every formula in this crate divides by `1 - e^2` or takes
    /// `sqrt(1 - e)` somewhere, so parabolic and hyperbolic inputs are
    /// rejected up front instead of propagating NaNs.
    #[error("eccentricity {0} is outside the elliptic range [0, 1)")]
    InvalidEccentricity(f64),

    /// A length or time parameter that must be positive was not.
    #[error("{name} must be positive, got {value}")]
    NonPositiveParameter {
        /// Which parameter was rejected.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The iteration cap was reached before the tolerance was met.
    ///
    /// The best iterate found so far is carried along with its residual
    /// `E - e*sin(E) - M`, so a caller that prefers the reference
    /// behavior (use whatever the loop ended on) can still recover it.
    #[error(
        "solver did not converge after {iterations} iterations \
         (best iterate {best}, residual {residual:e})"
    )]
    NotConverged {
        /// How many iterations were run.
        iterations: u32,
        /// The last/best iterate produced.
        best: f64,
        /// The Kepler residual of that iterate.
        residual: f64,
    },

    /// The Kepler residual does not change sign across the bracket.
    ///
    /// For `0 <= e < 1` and a mean anomaly reduced into `[0, 2pi]` this
    /// cannot happen; the check guards the precondition instead of
    /// assuming it.
    #[error("no sign change across bracket [{lo}, {hi}] for mean anomaly {mean_anomaly}")]
    DegenerateBracket {
        /// Lower bracket endpoint.
        lo: f64,
        /// Upper bracket endpoint.
        hi: f64,
        /// The (reduced) mean anomaly being solved for.
        mean_anomaly: f64,
    },
}

/// Checks that an eccentricity describes a closed elliptic orbit.
pub(crate) fn validate_eccentricity(eccentricity: f64) -> Result<(), KeplerError> {
    if (0.0..1.0).contains(&eccentricity) {
        Ok(())
    } else {
        Err(KeplerError::InvalidEccentricity(eccentricity))
    }
}

/// The residual of Kepler's equation, `E - e*sin(E) - M`.
///
/// This is zero exactly when `E` is the eccentric anomaly matching the
/// mean anomaly `M`.
#[inline]
pub(crate) fn keplers_equation(mean_anomaly: f64, eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin() - mean_anomaly
}

/// The derivative of the Kepler residual with respect to `E`, `1 - e*cos(E)`.
///
/// Strictly positive for `e < 1`, which is what makes the elliptic root
/// unique and Newton's method safe to run without bracketing.
#[inline]
pub(crate) fn keplers_equation_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    1.0 - eccentricity * eccentric_anomaly.cos()
}
