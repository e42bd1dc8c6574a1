#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    kinematics, KeplerError, KeplerSolver, OrbitalParameters, DEFAULT_SAMPLE_COUNT,
};

/// Produces a uniform time grid of `count` points covering `[0, period]`,
/// endpoints included.
///
/// This is the usual input to [`OrbitTrack::trace`]. An empty or
/// single-point grid degenerates the obvious way.
pub fn sample_times(count: usize, period: f64) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = (count - 1) as f64;
            (0..count).map(|i| i as f64 / last * period).collect()
        }
    }
}

/// The velocity columns of an [`OrbitTrack`].
///
/// Only produced when the orbit's gravitational parameter is known; the
/// anomaly and radius columns don't need it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VelocityTrack {
    /// Radial velocity at each sample.
    pub radial: Vec<f64>,
    /// Transverse velocity at each sample.
    pub transverse: Vec<f64>,
    /// Speed magnitude at each sample.
    pub speed: Vec<f64>,
}

/// Same-length numeric columns tracing an orbit over a set of time samples.
///
/// This is the crate's output boundary: plain `Vec<f64>` columns ready to
/// hand to whatever plotting or reporting mechanism a consumer prefers.
/// Each column index `i` describes the orbit at `time[i]`; the data flows
/// strictly one way, time -> mean anomaly -> eccentric anomaly (via the
/// chosen solver) -> true anomaly -> kinematics.
///
/// # Example
/// ```
/// use kepler_solvers::{NewtonRaphson, OrbitalParameters, OrbitTrack};
///
/// # fn main() -> Result<(), kepler_solvers::KeplerError> {
/// let params = OrbitalParameters::new(43200.0, 0.736, 26121.0)?;
/// let track = OrbitTrack::over_period(&params, &NewtonRaphson::default())?;
///
/// assert_eq!(track.len(), 1000);
/// assert_eq!(track.time.len(), track.true_anomaly.len());
/// // No mu was given, so there are no velocity columns.
/// assert!(track.velocity.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbitTrack {
    /// The time samples the other columns were evaluated at.
    pub time: Vec<f64>,
    /// Mean anomaly at each sample, `2pi * t / T`, unwrapped.
    pub mean_anomaly: Vec<f64>,
    /// Eccentric anomaly at each sample, from the chosen solver.
    pub eccentric_anomaly: Vec<f64>,
    /// True anomaly at each sample.
    pub true_anomaly: Vec<f64>,
    /// Radius vector magnitude at each sample.
    pub radius: Vec<f64>,
    /// Velocity columns, present iff the orbit has a gravitational
    /// parameter.
    pub velocity: Option<VelocityTrack>,
}

impl OrbitTrack {
    /// Traces the orbit at each of the given times.
    ///
    /// Every sample is an independent pure computation over its own
    /// `(M, e)` pair; the sequential loop is an implementation detail, not
    /// an ordering requirement.
    ///
    /// # Errors
    /// Propagates the first [`KeplerError`] the solver reports. A
    /// non-converging sample aborts the whole trace rather than leaving a
    /// silently bad row in the output.
    pub fn trace(
        params: &OrbitalParameters,
        solver: &(impl KeplerSolver + ?Sized),
        times: &[f64],
    ) -> Result<OrbitTrack, KeplerError> {
        let n = times.len();
        let a = params.semi_major_axis;
        let e = params.eccentricity;

        let mut mean_anomaly = Vec::with_capacity(n);
        let mut eccentric_anomaly = Vec::with_capacity(n);
        let mut true_anomaly = Vec::with_capacity(n);
        let mut radius = Vec::with_capacity(n);

        for &t in times {
            let mean_anom = params.mean_anomaly_at_time(t);
            let ecc_anom = solver.solve(mean_anom, e)?;
            let true_anom = kinematics::true_anomaly(ecc_anom, e);

            mean_anomaly.push(mean_anom);
            eccentric_anomaly.push(ecc_anom);
            true_anomaly.push(true_anom);
            radius.push(kinematics::radius(true_anom, a, e));
        }

        let velocity = params.gravitational_parameter.map(|mu| {
            let mut radial = Vec::with_capacity(n);
            let mut transverse = Vec::with_capacity(n);
            let mut speed = Vec::with_capacity(n);

            for &true_anom in &true_anomaly {
                let vr = kinematics::radial_velocity(true_anom, a, e, mu);
                let vn = kinematics::transverse_velocity(true_anom, a, e, mu);
                radial.push(vr);
                transverse.push(vn);
                speed.push(kinematics::speed(vr, vn));
            }

            VelocityTrack {
                radial,
                transverse,
                speed,
            }
        });

        Ok(OrbitTrack {
            time: times.to_vec(),
            mean_anomaly,
            eccentric_anomaly,
            true_anomaly,
            radius,
            velocity,
        })
    }

    /// Traces one full orbital period with the default
    /// [`DEFAULT_SAMPLE_COUNT`] uniform samples.
    ///
    /// # Errors
    /// Same as [`OrbitTrack::trace`].
    pub fn over_period(
        params: &OrbitalParameters,
        solver: &(impl KeplerSolver + ?Sized),
    ) -> Result<OrbitTrack, KeplerError> {
        let times = sample_times(DEFAULT_SAMPLE_COUNT, params.period);
        Self::trace(params, solver, &times)
    }

    /// The number of samples in the track.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the track has no samples.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
