#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::DVec2;

use crate::OrbitalParameters;

/// Gets the true anomaly at a given eccentric anomaly.
///
/// Uses the two-argument arctangent form
/// `nu = 2*atan2(sqrt(1+e)*sin(E/2), sqrt(1-e)*cos(E/2))`, which stays
/// well-behaved near `E = pi` where the half-angle tangent form
/// `2*atan(sqrt((1+e)/(1-e))*tan(E/2))` blows up.
///
/// For `E` in `[0, 2pi]` the result is in `[0, 2pi]`; adding whole turns
/// to `E` shifts the result by the same turns modulo `2pi`.
///
/// The true anomaly is the actual angle between the orbiting body and
/// periapsis, as seen from the focus.
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    debug_assert!((0.0..1.0).contains(&eccentricity));

    let (sin_half, cos_half) = (eccentric_anomaly * 0.5).sin_cos();
    2.0 * f64::atan2(
        (1.0 + eccentricity).sqrt() * sin_half,
        (1.0 - eccentricity).sqrt() * cos_half,
    )
}

/// Gets the eccentric anomaly at a given true anomaly.
///
/// The inverse of [`true_anomaly`]: the same atan2 relation with the
/// square-root factors swapped,
/// `E = 2*atan2(sqrt(1-e)*sin(nu/2), sqrt(1+e)*cos(nu/2))`.
pub fn eccentric_anomaly_at_true_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    debug_assert!((0.0..1.0).contains(&eccentricity));

    let (sin_half, cos_half) = (true_anomaly * 0.5).sin_cos();
    2.0 * f64::atan2(
        (1.0 - eccentricity).sqrt() * sin_half,
        (1.0 + eccentricity).sqrt() * cos_half,
    )
}

/// Gets the radius vector magnitude at a given true anomaly,
/// `r = a*(1 - e^2) / (1 + e*cos(nu))`.
///
/// At periapsis (`nu = 0`) this is `a*(1 - e)`; at apoapsis (`nu = pi`),
/// `a*(1 + e)`.
pub fn radius(true_anomaly: f64, semi_major_axis: f64, eccentricity: f64) -> f64 {
    debug_assert!((0.0..1.0).contains(&eccentricity));

    let semi_latus_rectum = semi_major_axis * (1.0 - eccentricity * eccentricity);
    semi_latus_rectum / (1.0 + eccentricity * true_anomaly.cos())
}

/// Gets the radial velocity component at a given true anomaly,
/// `Vr = sqrt(mu/p) * e * sin(nu)` with `p = a*(1 - e^2)`.
///
/// Positive while climbing from periapsis to apoapsis, negative on the way
/// back down, zero at both apsides.
pub fn radial_velocity(true_anomaly: f64, semi_major_axis: f64, eccentricity: f64, mu: f64) -> f64 {
    debug_assert!((0.0..1.0).contains(&eccentricity));

    let semi_latus_rectum = semi_major_axis * (1.0 - eccentricity * eccentricity);
    (mu / semi_latus_rectum).sqrt() * eccentricity * true_anomaly.sin()
}

/// Gets the transverse velocity component at a given true anomaly,
/// `Vn = sqrt(mu/p) * (1 + e*cos(nu))` with `p = a*(1 - e^2)`.
///
/// The component perpendicular to the radius vector, in the direction of
/// motion. Always positive for an elliptic orbit.
pub fn transverse_velocity(
    true_anomaly: f64,
    semi_major_axis: f64,
    eccentricity: f64,
    mu: f64,
) -> f64 {
    debug_assert!((0.0..1.0).contains(&eccentricity));

    let semi_latus_rectum = semi_major_axis * (1.0 - eccentricity * eccentricity);
    (mu / semi_latus_rectum).sqrt() * (1.0 + eccentricity * true_anomaly.cos())
}

/// Gets the speed magnitude from its radial and transverse components,
/// `V = sqrt(Vr^2 + Vn^2)`.
pub fn speed(radial_velocity: f64, transverse_velocity: f64) -> f64 {
    (radial_velocity * radial_velocity + transverse_velocity * transverse_velocity).sqrt()
}

/// The scalar kinematic quantities at one point of an orbit.
///
/// A derived value tuple; compute it, read it, discard it. All fields are
/// in the units implied by the [`OrbitalParameters`] it was computed from.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicState {
    /// Distance from the focus to the body.
    pub radius: f64,
    /// Velocity component along the radius vector.
    pub radial_velocity: f64,
    /// Velocity component perpendicular to the radius vector.
    pub transverse_velocity: f64,
    /// Speed magnitude, `sqrt(Vr^2 + Vn^2)`.
    pub speed: f64,
}

impl KinematicState {
    /// Computes the kinematic state at a given true anomaly.
    ///
    /// Returns `None` when the parameters carry no gravitational
    /// parameter, since the velocity formulas need `mu`. If you only need
    /// the radius, call [`radius`] directly.
    ///
    /// # Example
    /// ```
    /// use kepler_solvers::{KinematicState, OrbitalParameters};
    ///
    /// # fn main() -> Result<(), kepler_solvers::KeplerError> {
    /// let params = OrbitalParameters::new(3696.0, 0.0088, 6720.0)?
    ///     .with_gravitational_parameter(42800.0)?;
    ///
    /// let at_periapsis = KinematicState::at_true_anomaly(&params, 0.0).unwrap();
    /// assert_eq!(at_periapsis.radial_velocity, 0.0);
    /// assert!((at_periapsis.radius - params.periapsis()).abs() < 1e-9);
    /// # Ok(())
    /// # }
    /// ```
    pub fn at_true_anomaly(params: &OrbitalParameters, true_anomaly: f64) -> Option<KinematicState> {
        let mu = params.gravitational_parameter?;
        let a = params.semi_major_axis;
        let e = params.eccentricity;

        let radial = radial_velocity(true_anomaly, a, e, mu);
        let transverse = transverse_velocity(true_anomaly, a, e, mu);

        Some(KinematicState {
            radius: radius(true_anomaly, a, e),
            radial_velocity: radial,
            transverse_velocity: transverse,
            speed: speed(radial, transverse),
        })
    }
}

/// A position and velocity in the perifocal (in-plane) frame.
///
/// The x axis points at periapsis, the y axis at `nu = pi/2`. Units follow
/// the [`OrbitalParameters`] the vectors were computed from.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateVectors {
    /// The in-plane position of the body.
    pub position: DVec2,
    /// The in-plane velocity of the body.
    pub velocity: DVec2,
}

impl StateVectors {
    /// Computes perifocal state vectors at a given true anomaly.
    ///
    /// The velocity is assembled from its radial and transverse
    /// components: `v = Vr*r_hat + Vn*t_hat` where `r_hat` points away
    /// from the focus and `t_hat` is `r_hat` rotated a quarter turn in the
    /// direction of motion.
    ///
    /// Returns `None` when the parameters carry no gravitational
    /// parameter.
    pub fn at_true_anomaly(params: &OrbitalParameters, true_anomaly: f64) -> Option<StateVectors> {
        let state = KinematicState::at_true_anomaly(params, true_anomaly)?;

        let (sin_nu, cos_nu) = true_anomaly.sin_cos();
        let radial_dir = DVec2::new(cos_nu, sin_nu);
        let transverse_dir = DVec2::new(-sin_nu, cos_nu);

        Some(StateVectors {
            position: state.radius * radial_dir,
            velocity: state.radial_velocity * radial_dir
                + state.transverse_velocity * transverse_dir,
        })
    }
}
