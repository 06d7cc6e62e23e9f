use approx::assert_abs_diff_eq;
use ndarray::array;
use ndarray::prelude::*;

use ndarray_dde::delay::CreateDelaySolverError;
use ndarray_dde::{ButcherTableau, DelaySolver, Problem, RungeKutta, SolveError, Solver};

/// `y'(t) = y(t - delay)`.
fn delayed_growth<'f>(y0: f64, lower: f64, upper: f64) -> Problem<'f> {
    let mut problem = Problem::new(vec![Box::new(|_t: f64, p: ArrayView1<f64>| p[1])]);
    problem.set_initial_value(array![y0]);
    problem.set_lower_bound(lower);
    problem.set_upper_bound(upper);
    problem
}

fn solver(delay: f64, mesh_points: usize) -> DelaySolver<RungeKutta> {
    DelaySolver::new(delay, mesh_points, RungeKutta::default()).unwrap()
}

#[test]
fn first_interval_uses_constant_history() {
    let solver = solver(1., 4);
    assert_eq!(solver.step_size(), 0.25);
    let solution = solver.solve(&delayed_growth(2., 0., 1.)).unwrap();
    assert_eq!(solution.len(), 5);
    assert_eq!(solution.state(0)[0], 2.);
    // One step from the seeded history: 2 + 0.25 * 2.
    assert_abs_diff_eq!(solution.state(1)[0], 2.5, epsilon = 1e-12);
    for (&t, &y) in solution
        .timesteps()
        .iter()
        .zip(solution.values_by_variable().row(0))
    {
        assert_abs_diff_eq!(y, 2. * (1. + t), epsilon = 1e-12);
    }
}

#[test]
fn shifted_start() {
    let solution = solver(1., 4).solve(&delayed_growth(2., 5., 6.)).unwrap();
    assert_abs_diff_eq!(solution.timesteps()[0], 5., epsilon = 1e-12);
    assert_abs_diff_eq!(solution.timesteps()[4], 6., epsilon = 1e-12);
    assert_abs_diff_eq!(solution.state(1)[0], 2.5, epsilon = 1e-12);
    assert_abs_diff_eq!(solution.state(4)[0], 4., epsilon = 1e-12);
}

#[test]
fn second_interval_reads_first() {
    // Exact solution on [1, 2] is y(t) = 2 + (t^2 - 1) / 2.
    let solution = solver(1., 100).solve(&delayed_growth(1., 0., 2.)).unwrap();
    assert_eq!(solution.len(), 201);
    assert_abs_diff_eq!(solution.timesteps()[200], 2., epsilon = 1e-9);
    assert_abs_diff_eq!(solution.state(100)[0], 2., epsilon = 1e-9);
    let end = solution.state(200)[0];
    assert!(end < 3.5);
    assert_abs_diff_eq!(end, 3.5, epsilon = 1e-2);
}

#[test]
fn delayed_values_follow_current_values() {
    // x' = y(t - 1), y' = 0.
    let mut problem = Problem::new(vec![
        Box::new(|_t: f64, p: ArrayView1<f64>| p[3]),
        Box::new(|_t: f64, _p: ArrayView1<f64>| 0.),
    ]);
    problem.set_initial_value(array![0., 3.]);
    problem.set_lower_bound(0.);
    problem.set_upper_bound(2.);
    let solution = solver(1., 10).solve(&problem).unwrap();
    assert_eq!(solution.variables(), 2);
    assert_abs_diff_eq!(solution.state(10)[0], 3., epsilon = 1e-9);
    assert_abs_diff_eq!(solution.state(20)[0], 6., epsilon = 1e-9);
    assert!(solution
        .values_by_variable()
        .row(1)
        .iter()
        .all(|&y| y == 3.));
}

#[test]
fn last_interval_overshoots_upper_bound() {
    let solution = solver(1., 4).solve(&delayed_growth(1., 0., 1.5)).unwrap();
    assert_eq!(solution.len(), 9);
    assert_abs_diff_eq!(solution.timesteps()[8], 2., epsilon = 1e-12);
}

#[test]
fn empty_span() {
    let solution = solver(1., 4).solve(&delayed_growth(1., 0., 0.)).unwrap();
    assert_eq!(solution.len(), 1);
    assert_eq!(solution.timesteps()[0], 0.);
    assert_eq!(solution.state(0)[0], 1.);
}

#[test]
fn step_size_is_fixed() {
    let mut solver = DelaySolver::new(
        0.5,
        5,
        RungeKutta::new(0.3, ButcherTableau::MIDPOINT).unwrap(),
    )
    .unwrap();
    assert_abs_diff_eq!(solver.step_size(), 0.1, epsilon = 1e-15);
    solver.set_step_size(0.01);
    assert_abs_diff_eq!(solver.step_size(), 0.1, epsilon = 1e-15);
    assert_eq!(solver.delay(), 0.5);
    assert_eq!(solver.mesh_points(), 5);
    let solution = solver.solve(&delayed_growth(1., 0., 0.5)).unwrap();
    assert_eq!(solution.len(), 6);
}

#[test]
fn invalid_configuration() {
    assert!(matches!(
        DelaySolver::new(0., 4, RungeKutta::default()),
        Err(CreateDelaySolverError::NonPositiveDelay(_))
    ));
    assert!(matches!(
        DelaySolver::new(1., 0, RungeKutta::default()),
        Err(CreateDelaySolverError::NoMeshPoints)
    ));
    assert!(matches!(
        solver(1., 4).solve(&delayed_growth(1., 1., 0.)),
        Err(SolveError::NegativeSpan { .. })
    ));
}
