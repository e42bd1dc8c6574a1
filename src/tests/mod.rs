#![cfg(test)]

use std::f64::consts::{PI, TAU};

use crate::{
    eccentric_anomaly_at_true_anomaly, keplers_equation, radius, sample_times, speed,
    true_anomaly, Bisection, FixedPoint, GoldenSection, KeplerError, KeplerSolver,
    KinematicState, NewtonRaphson, OrbitTrack, OrbitalParameters, StateVectors,
};


use assertions::*;

const RANDOM_SAMPLES: usize = 256;

fn all_solvers() -> Vec<Box<dyn KeplerSolver>> {
    vec![
        Box::new(NewtonRaphson::default()),
        Box::new(GoldenSection::default()),
        Box::new(Bisection::default()),
        Box::new(FixedPoint::default()),
    ]
}

fn molniya() -> OrbitalParameters {
    OrbitalParameters::new(43200.0, 0.736, 26121.0).unwrap()
}

fn low_orbit() -> OrbitalParameters {
    OrbitalParameters::new(3696.0, 0.0088, 6720.0)
        .unwrap()
        .with_gravitational_parameter(42800.0)
        .unwrap()
}

#[test]
fn solvers_satisfy_keplers_equation() {
    let solvers = all_solvers();

    for _ in 0..RANDOM_SAMPLES {
        let eccentricity = rand::random_range(0.0..0.9);
        let mean_anomaly = rand::random_range(0.0..TAU);

        for solver in &solvers {
            let ecc_anom = solver.solve(mean_anomaly, eccentricity).unwrap();
            let residual = keplers_equation(mean_anomaly, ecc_anom, eccentricity);

            assert!(
                residual.abs() < 1e-5,
                "{} residual {residual:e} too large at M={mean_anomaly}, e={eccentricity}",
                solver.name()
            );
        }
    }
}

#[test]
fn solvers_agree_with_each_other() {
    let solvers = all_solvers();

    for _ in 0..RANDOM_SAMPLES {
        let eccentricity = rand::random_range(0.0..0.9);
        let mean_anomaly = rand::random_range(0.0..TAU);

        let results: Vec<f64> = solvers
            .iter()
            .map(|s| s.solve(mean_anomaly, eccentricity).unwrap())
            .collect();

        for (solver, &ecc_anom) in solvers.iter().zip(&results) {
            assert_almost_eq_tol(
                ecc_anom,
                results[0],
                1e-4,
                &format!(
                    "{} vs {} at M={mean_anomaly}, e={eccentricity}",
                    solver.name(),
                    solvers[0].name()
                ),
            );
        }
    }
}

#[test]
fn whole_turns_pass_through_solvers() {
    let solvers = all_solvers();

    for _ in 0..64 {
        let eccentricity = rand::random_range(0.0..0.9);
        let mean_anomaly = rand::random_range(0.0..TAU);
        let turns = rand::random_range(-3i32..=3) as f64 * TAU;

        for solver in &solvers {
            let base = solver.solve(mean_anomaly, eccentricity).unwrap();
            let shifted = solver.solve(mean_anomaly + turns, eccentricity).unwrap();

            assert_almost_eq_tol(
                shifted,
                base + turns,
                1e-4,
                &format!("{} with {turns} rad of whole turns", solver.name()),
            );
        }
    }
}

#[test]
fn zero_mean_anomaly_is_exact() {
    for solver in all_solvers() {
        assert_eq!(
            solver.solve(0.0, 0.736).unwrap(),
            0.0,
            "{} at periapsis",
            solver.name()
        );
    }
}

#[test]
fn molniya_apsides() {
    let params = molniya();
    let (a, e) = (params.semi_major_axis, params.eccentricity);

    for solver in all_solvers() {
        // Periapsis: M = 0 => E = 0, nu = 0, r = a(1 - e)
        let ecc_anom = solver.solve(0.0, e).unwrap();
        let true_anom = true_anomaly(ecc_anom, e);
        assert_almost_eq_tol(ecc_anom, 0.0, 1e-5, &format!("{} E at perigee", solver.name()));
        assert_almost_eq_tol(true_anom, 0.0, 1e-4, &format!("{} nu at perigee", solver.name()));
        assert_almost_eq_tol(
            radius(true_anom, a, e),
            11404.8,
            0.1,
            &format!("{} r at perigee", solver.name()),
        );

        // Apoapsis: M = pi => E = pi, nu = pi, r = a(1 + e)
        let ecc_anom = solver.solve(PI, e).unwrap();
        let true_anom = true_anomaly(ecc_anom, e);
        assert_almost_eq_tol(ecc_anom, PI, 1e-5, &format!("{} E at apogee", solver.name()));
        assert_almost_eq_angle(true_anom, PI, &format!("{} nu at apogee", solver.name()));
        assert_almost_eq_tol(
            radius(true_anom, a, e),
            a * (1.0 + e),
            0.1,
            &format!("{} r at apogee", solver.name()),
        );
    }
}

#[test]
fn true_anomaly_is_periodic() {
    for _ in 0..RANDOM_SAMPLES {
        let eccentricity = rand::random_range(0.0..0.99);
        let ecc_anom = rand::random_range(0.0..TAU);

        assert_almost_eq_angle(
            true_anomaly(ecc_anom + TAU, eccentricity),
            true_anomaly(ecc_anom, eccentricity),
            &format!("nu periodicity at E={ecc_anom}, e={eccentricity}"),
        );
    }
}

#[test]
fn true_anomaly_round_trips() {
    for _ in 0..RANDOM_SAMPLES {
        let eccentricity = rand::random_range(0.0..0.99);
        let ecc_anom = rand::random_range(0.0..TAU);

        let true_anom = true_anomaly(ecc_anom, eccentricity);
        let recovered = eccentric_anomaly_at_true_anomaly(true_anom, eccentricity);

        assert_almost_eq_angle(
            recovered,
            ecc_anom,
            &format!("round-trip at E={ecc_anom}, e={eccentricity}"),
        );
    }
}

#[test]
fn true_anomaly_forms_agree() {
    // The half-angle tangent form 2*atan(sqrt((1+e)/(1-e))*tan(E/2)) must
    // match the atan2 form everywhere it is defined.
    for _ in 0..RANDOM_SAMPLES {
        let eccentricity: f64 = rand::random_range(0.0..0.95);
        let ecc_anom = rand::random_range(0.0..TAU);

        let beta = ((1.0 + eccentricity) / (1.0 - eccentricity)).sqrt();
        let tan_form = 2.0 * (beta * (ecc_anom * 0.5).tan()).atan();

        assert_almost_eq_angle(
            true_anomaly(ecc_anom, eccentricity),
            tan_form,
            &format!("atan2 vs tan form at E={ecc_anom}, e={eccentricity}"),
        );
    }
}

#[test]
fn speed_is_the_component_magnitude() {
    let params = low_orbit();

    for _ in 0..RANDOM_SAMPLES {
        let true_anom = rand::random_range(0.0..TAU);
        let state = KinematicState::at_true_anomaly(&params, true_anom).unwrap();

        assert!(state.speed >= 0.0);
        assert_almost_eq(
            state.speed * state.speed,
            state.radial_velocity * state.radial_velocity
                + state.transverse_velocity * state.transverse_velocity,
            &format!("speed identity at nu={true_anom}"),
        );
    }

    assert_eq!(speed(3.0, 4.0), 5.0);
    assert_eq!(speed(0.0, 0.0), 0.0);
}

#[test]
fn kinematics_at_apsides() {
    let params = low_orbit();
    let mu = params.gravitational_parameter.unwrap();
    let circular_ish = (mu / params.semi_latus_rectum()).sqrt();

    let periapsis = KinematicState::at_true_anomaly(&params, 0.0).unwrap();
    assert_eq!(periapsis.radial_velocity, 0.0);
    assert_almost_eq(periapsis.radius, params.periapsis(), "r at periapsis");
    assert_almost_eq(
        periapsis.transverse_velocity,
        circular_ish * (1.0 + params.eccentricity),
        "Vn at periapsis",
    );

    let apoapsis = KinematicState::at_true_anomaly(&params, PI).unwrap();
    assert_almost_eq(apoapsis.radial_velocity, 0.0, "Vr at apoapsis");
    assert_almost_eq(apoapsis.radius, params.apoapsis(), "r at apoapsis");
    assert!(apoapsis.speed < periapsis.speed, "slower at apoapsis");
}

#[test]
fn state_vectors_at_apsides() {
    let params = low_orbit();

    let at_periapsis = StateVectors::at_true_anomaly(&params, 0.0).unwrap();
    assert_almost_eq(at_periapsis.position.x, params.periapsis(), "periapsis x");
    assert_almost_eq(at_periapsis.position.y, 0.0, "periapsis y");
    assert_almost_eq(at_periapsis.velocity.x, 0.0, "periapsis vx");
    assert!(at_periapsis.velocity.y > 0.0, "prograde at periapsis");

    let at_apoapsis = StateVectors::at_true_anomaly(&params, PI).unwrap();
    assert_almost_eq(at_apoapsis.position.x, -params.apoapsis(), "apoapsis x");
    assert_almost_eq(at_apoapsis.position.y, 0.0, "apoapsis y");
    assert!(at_apoapsis.velocity.y < 0.0, "prograde at apoapsis");

    // Without mu there are no velocities to assemble.
    assert!(StateVectors::at_true_anomaly(&molniya(), 0.0).is_none());
}

#[test]
fn invalid_eccentricity_is_rejected() {
    for bad in [1.0, 1.5, -0.1, f64::NAN] {
        assert!(matches!(
            OrbitalParameters::new(1.0, bad, 1.0),
            Err(KeplerError::InvalidEccentricity(_))
        ));

        for solver in all_solvers() {
            assert!(
                matches!(
                    solver.solve(1.0, bad),
                    Err(KeplerError::InvalidEccentricity(_))
                ),
                "{} accepted e={bad}",
                solver.name()
            );
        }
    }
}

#[test]
fn non_positive_parameters_are_rejected() {
    assert!(matches!(
        OrbitalParameters::new(0.0, 0.5, 1.0),
        Err(KeplerError::NonPositiveParameter { name: "semi-major axis", .. })
    ));
    assert!(matches!(
        OrbitalParameters::new(1.0, 0.5, -3.0),
        Err(KeplerError::NonPositiveParameter { name: "period", .. })
    ));
    assert!(matches!(
        OrbitalParameters::new(1.0, 0.5, 1.0)
            .unwrap()
            .with_gravitational_parameter(0.0),
        Err(KeplerError::NonPositiveParameter { .. })
    ));
}

#[test]
fn newton_reports_non_convergence() {
    // Two iterations cannot reach a 1e-16 step on a high-eccentricity input.
    let strict = NewtonRaphson::new(1e-16, 2);
    let err = strict.solve(3.0, 0.9).unwrap_err();

    match err {
        KeplerError::NotConverged { iterations, best, .. } => {
            assert_eq!(iterations, 2);
            assert!(best.is_finite());
        }
        other => panic!("expected NotConverged, got {other:?}"),
    }
}

#[test]
fn fixed_point_reports_non_convergence() {
    // The map contracts by ~0.95 per step; three steps are nowhere near 1e-9.
    let strict = FixedPoint::new(1e-9, 3);
    assert!(matches!(
        strict.solve(0.5, 0.95),
        Err(KeplerError::NotConverged { iterations: 3, .. })
    ));
}

#[test]
fn fixed_point_converges_on_descending_sequence() {
    // For M in (pi, 2pi) the iterates decrease toward the root; the
    // reference script's signed stopping test would bail out immediately
    // here and return an iterate that is off by ~e.
    let mean_anomaly = 5.0;
    let eccentricity = 0.5;

    let ecc_anom = FixedPoint::default()
        .solve(mean_anomaly, eccentricity)
        .unwrap();

    assert!(ecc_anom < mean_anomaly, "root lies below M when sin(E) < 0");
    assert!(keplers_equation(mean_anomaly, ecc_anom, eccentricity).abs() < 1e-5);
}

#[test]
fn mean_anomaly_generation() {
    let params = molniya();

    assert_eq!(params.mean_anomaly_at_time(0.0), 0.0);
    assert_almost_eq(
        params.mean_anomaly_at_time(params.period / 2.0),
        PI,
        "half a period",
    );
    assert_almost_eq(
        params.mean_anomaly_at_time(params.period),
        TAU,
        "full period",
    );
    // Unwrapped beyond one period.
    assert_almost_eq(
        params.mean_anomaly_at_time(params.period * 2.5),
        2.5 * TAU,
        "two and a half periods",
    );
}

#[test]
fn sample_times_grid() {
    assert!(sample_times(0, 10.0).is_empty());
    assert_eq!(sample_times(1, 10.0), vec![0.0]);

    let grid = sample_times(5, 8.0);
    assert_eq!(grid, vec![0.0, 2.0, 4.0, 6.0, 8.0]);

    let grid = sample_times(1000, 26121.0);
    assert_eq!(grid.len(), 1000);
    assert_eq!(grid[0], 0.0);
    assert_eq!(*grid.last().unwrap(), 26121.0);
}

#[test]
fn track_columns_share_length() {
    let solver = NewtonRaphson::default();

    let without_mu = OrbitTrack::over_period(&molniya(), &solver).unwrap();
    assert_eq!(without_mu.len(), 1000);
    assert!(!without_mu.is_empty());
    assert_eq!(without_mu.mean_anomaly.len(), 1000);
    assert_eq!(without_mu.eccentric_anomaly.len(), 1000);
    assert_eq!(without_mu.true_anomaly.len(), 1000);
    assert_eq!(without_mu.radius.len(), 1000);
    assert!(without_mu.velocity.is_none());

    let with_mu = OrbitTrack::over_period(&low_orbit(), &solver).unwrap();
    let velocity = with_mu.velocity.as_ref().expect("mu given, velocities expected");
    assert_eq!(velocity.radial.len(), 1000);
    assert_eq!(velocity.transverse.len(), 1000);
    assert_eq!(velocity.speed.len(), 1000);
}

#[test]
fn track_matches_pointwise_pipeline() {
    let params = low_orbit();
    let solver = Bisection::default();
    let times = sample_times(17, params.period);

    let track = OrbitTrack::trace(&params, &solver, &times).unwrap();
    let velocity = track.velocity.as_ref().unwrap();

    for (i, &t) in times.iter().enumerate() {
        let mean_anom = params.mean_anomaly_at_time(t);
        let ecc_anom = solver.solve(mean_anom, params.eccentricity).unwrap();
        let true_anom = true_anomaly(ecc_anom, params.eccentricity);
        let state = KinematicState::at_true_anomaly(&params, true_anom).unwrap();

        assert_eq!(track.time[i], t);
        assert_eq!(track.mean_anomaly[i], mean_anom);
        assert_eq!(track.eccentric_anomaly[i], ecc_anom);
        assert_eq!(track.true_anomaly[i], true_anom);
        assert_eq!(track.radius[i], state.radius);
        assert_eq!(velocity.radial[i], state.radial_velocity);
        assert_eq!(velocity.transverse[i], state.transverse_velocity);
        assert_eq!(velocity.speed[i], state.speed);
    }
}

#[test]
fn trace_propagates_solver_errors() {
    let params = molniya();
    let hopeless = FixedPoint::new(1e-16, 1);

    let times = sample_times(8, params.period);
    assert!(matches!(
        OrbitTrack::trace(&params, &hopeless, &times),
        Err(KeplerError::NotConverged { .. })
    ));
}
