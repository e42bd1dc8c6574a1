#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::KeplerError;
use std::f64::consts::TAU;

/// The parameters of a closed elliptic orbit.
///
/// This is the configuration handed to every stage of the pipeline; the
/// fields are plain numbers and the struct is never mutated after
/// construction.
///
/// # Example
/// ```
/// use kepler_solvers::OrbitalParameters;
///
/// # fn main() -> Result<(), kepler_solvers::KeplerError> {
/// let params = OrbitalParameters::new(43200.0, 0.736, 26121.0)?
///     .with_gravitational_parameter(398600.0)?;
///
/// assert_eq!(params.periapsis(), 43200.0 * (1.0 - 0.736));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitalParameters {
    /// The semi-major axis of the orbit, `a`.
    ///
    /// Half the longest diameter of the ellipse. Any length unit works as
    /// long as it is consistent with the gravitational parameter.
    pub semi_major_axis: f64,

    /// The eccentricity of the orbit, `e`.
    ///
    /// Constrained to `0 <= e < 1`: 0 is a circle, values approaching 1
    /// are increasingly elongated ellipses. Parabolic (`e = 1`) and
    /// hyperbolic (`e > 1`) trajectories are not supported.
    pub eccentricity: f64,

    /// The orbital period, `T`, in the time unit of your choice.
    ///
    /// The mean anomaly advances by a full turn over one period.
    pub period: f64,

    /// The gravitational parameter of the parent body, `mu = GM`.
    ///
    /// Only needed for the velocity formulas; anomalies and the radius
    /// vector can be computed without it, so it is optional.
    pub gravitational_parameter: Option<f64>,
}

impl OrbitalParameters {
    /// Creates a validated parameter set without a gravitational parameter.
    ///
    /// # Errors
    /// - [`KeplerError::InvalidEccentricity`] if `eccentricity` is outside
    ///   `[0, 1)`.
    /// - [`KeplerError::NonPositiveParameter`] if the semi-major axis or
    ///   period is not positive.
    pub fn new(
        semi_major_axis: f64,
        eccentricity: f64,
        period: f64,
    ) -> Result<OrbitalParameters, KeplerError> {
        crate::validate_eccentricity(eccentricity)?;
        if !(semi_major_axis > 0.0) {
            return Err(KeplerError::NonPositiveParameter {
                name: "semi-major axis",
                value: semi_major_axis,
            });
        }
        if !(period > 0.0) {
            return Err(KeplerError::NonPositiveParameter {
                name: "period",
                value: period,
            });
        }

        Ok(OrbitalParameters {
            semi_major_axis,
            eccentricity,
            period,
            gravitational_parameter: None,
        })
    }

    /// Attaches a gravitational parameter, enabling the velocity formulas.
    ///
    /// # Errors
    /// [`KeplerError::NonPositiveParameter`] if `mu` is not positive.
    pub fn with_gravitational_parameter(self, mu: f64) -> Result<OrbitalParameters, KeplerError> {
        if !(mu > 0.0) {
            return Err(KeplerError::NonPositiveParameter {
                name: "gravitational parameter",
                value: mu,
            });
        }

        Ok(OrbitalParameters {
            gravitational_parameter: Some(mu),
            ..self
        })
    }

    /// Gets the mean anomaly at a given time, `M = 2pi * t / T`.
    ///
    /// The mean anomaly is a fictitious angle that advances uniformly with
    /// time; it is the input every solver inverts. Time zero is periapsis
    /// passage. The result is not wrapped: `t` beyond one period keeps
    /// accumulating whole turns.
    #[inline]
    pub fn mean_anomaly_at_time(&self, t: f64) -> f64 {
        TAU * t / self.period
    }

    /// Gets the semi-latus rectum, `p = a * (1 - e^2)`.
    ///
    /// The geometric parameter that shows up in every radius and velocity
    /// formula.
    #[inline]
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Gets the periapsis radius, `a * (1 - e)`.
    ///
    /// The distance at the closest point to the parent body.
    #[inline]
    pub fn periapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Gets the apoapsis radius, `a * (1 + e)`.
    ///
    /// The distance at the farthest point from the parent body.
    #[inline]
    pub fn apoapsis(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }
}

impl Default for OrbitalParameters {
    /// Creates the unit orbit: a perfect circle with `a = 1` and `T = 1`,
    /// no gravitational parameter.
    fn default() -> Self {
        OrbitalParameters {
            semi_major_axis: 1.0,
            eccentricity: 0.0,
            period: 1.0,
            gravitational_parameter: None,
        }
    }
}
