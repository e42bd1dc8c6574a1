//! Runs all four Kepler solvers over one period of a Molniya-like orbit,
//! times them, and prints the traced quantities as plain columns.
//!
//! This is the presentation side of the crate: it only consumes the
//! arrays `OrbitTrack` hands out, so any plotting backend could be
//! substituted for the println reporting here.

use std::time::Instant;

use kepler_solvers::{
    sample_times, Bisection, FixedPoint, GoldenSection, KeplerSolver, NewtonRaphson, OrbitTrack,
    OrbitalParameters,
};

const SAMPLES: usize = 1000;

fn main() {
    // a = 43200 km, e = 0.736, T = 26121 s, mu = 398600 km^3/s^2
    let params = OrbitalParameters::new(43200.0, 0.736, 26121.0)
        .unwrap()
        .with_gravitational_parameter(398600.0)
        .unwrap();

    let solvers: Vec<Box<dyn KeplerSolver>> = vec![
        Box::new(NewtonRaphson::default()),
        Box::new(GoldenSection::default()),
        Box::new(Bisection::default()),
        Box::new(FixedPoint::default()),
    ];

    let times = sample_times(SAMPLES, params.period);

    println!(
        "Tracing {} samples of a = {}, e = {}, T = {}",
        SAMPLES, params.semi_major_axis, params.eccentricity, params.period
    );
    println!();

    let mut tracks = Vec::new();
    for solver in &solvers {
        let start = Instant::now();
        let track = OrbitTrack::trace(&params, solver.as_ref(), &times).unwrap();
        let elapsed = start.elapsed();

        println!(
            "{:>14}: E(T) = {:.8} rad, traced in {elapsed:?}",
            solver.name(),
            track.eccentric_anomaly.last().unwrap(),
        );
        tracks.push(track);
    }

    // The methods are interchangeable; print the kinematics once, from the
    // Newton trace, at a handful of sample points.
    let track = &tracks[0];
    let velocity = track.velocity.as_ref().unwrap();

    println!();
    println!(
        "{:>10} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "t", "M", "nu", "r", "Vr", "Vn"
    );
    for i in (0..SAMPLES).step_by(SAMPLES / 10) {
        println!(
            "{:>10.1} {:>12.6} {:>12.6} {:>12.1} {:>12.4} {:>12.4}",
            track.time[i],
            track.mean_anomaly[i],
            track.true_anomaly[i],
            track.radius[i],
            velocity.radial[i],
            velocity.transverse[i],
        );
    }
}
