//! Delay differential equations with a single constant delay.
//!
//! The problem `y'(t) = F(t, y(t), y(t - delay))` is solved by the method of
//! steps: the time line is cut into intervals of length `delay`, and on each
//! of them the delayed state is already known, so the interval is an ordinary
//! initial value problem. Before `t0` the history is taken to be constant and
//! equal to the initial value.
//!
//! The derivatives of a delay problem receive a parameter vector of length
//! `2 * n`: the first `n` entries are the current state, the next `n` the
//! delayed state.

use log::{trace, warn};
use ndarray::prelude::*;
use ndarray::s;
use thiserror::Error;

use crate::function::Function;
use crate::problem::Problem;
use crate::solution::Solution;
use crate::{SolveError, Solver};

/// Relative slack, in mesh steps, when mapping a time to a mesh index.
const INDEX_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum CreateDelaySolverError {
    #[error("delay {0} is not a finite positive number")]
    NonPositiveDelay(f64),
    #[error("at least one mesh point per delay interval is required")]
    NoMeshPoints,
}

/// Solver of delay differential equations built on an ordinary solver.
#[derive(Clone, Debug)]
pub struct DelaySolver<S> {
    solver: S,
    delay: f64,
    mesh_points: usize,
}

/// Derivative of one variable on one delay interval.
///
/// Looks the delayed state up in the history table and forwards the
/// concatenated parameter vector to the delay-aware derivative.
struct DelayedDerivative<'h> {
    inner: &'h dyn Function,
    /// Shape `(variables, samples)`; sample 0 is at `t0 - delay`.
    history: ArrayView2<'h, f64>,
    t0: f64,
    delay: f64,
    mesh_points: usize,
}

impl<'h> Function for DelayedDerivative<'h> {
    fn value(&self, t: f64, y: ArrayView1<f64>) -> f64 {
        // Index of `t - delay` in the history table.
        let index = mesh_index(self.mesh_points as f64 * (t - self.t0) / self.delay)
            .min(self.history.ncols() - 1);
        let n = y.len();
        let mut params = Array1::<f64>::zeros(2 * n);
        params.slice_mut(s![..n]).assign(&y);
        params.slice_mut(s![n..]).assign(&self.history.column(index));
        self.inner.value(t, params.view())
    }
}

/// Floors a fractional mesh position, tolerating floating-point error just
/// below a mesh point.
fn mesh_index(position: f64) -> usize {
    (position + INDEX_TOLERANCE).floor().max(0.) as usize
}

impl<S: Solver> DelaySolver<S> {
    /// Creates a new `DelaySolver`.
    ///
    /// # Parameters
    ///
    /// * `delay`: The constant delay, must be finite and positive.
    ///
    /// * `mesh_points`: Number of steps the wrapped solver takes on each
    ///   interval `(t, t + delay)`.
    ///
    /// * `solver`: The wrapped solver. Its step size is set to
    ///   `delay / mesh_points` and stays fixed for the lifetime of the
    ///   `DelaySolver`.
    pub fn new(
        delay: f64,
        mesh_points: usize,
        mut solver: S,
    ) -> Result<DelaySolver<S>, CreateDelaySolverError> {
        if !(delay.is_finite() && delay > 0.) {
            return Err(CreateDelaySolverError::NonPositiveDelay(delay));
        }
        if mesh_points == 0 {
            return Err(CreateDelaySolverError::NoMeshPoints);
        }
        solver.set_step_size(delay / mesh_points as f64);
        Ok(DelaySolver {
            solver,
            delay,
            mesh_points,
        })
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn mesh_points(&self) -> usize {
        self.mesh_points
    }

    pub fn inner(&self) -> &S {
        &self.solver
    }
}

impl<S: Solver> Solver for DelaySolver<S> {
    /// Solves the delay problem on whole delay intervals.
    ///
    /// The number of intervals is `ceil((upper - lower) / delay)`, so the
    /// returned time grid ends at `lower + k * delay`, which may lie past
    /// `upper`.
    fn solve(&self, problem: &Problem<'_>) -> Result<Solution, SolveError> {
        problem.validate()?;
        let t0 = problem.lower_bound();
        let tn = problem.upper_bound();
        if tn < t0 {
            return Err(SolveError::NegativeSpan {
                lower: t0,
                upper: tn,
            });
        }
        let m = self.mesh_points;
        let h = self.delay / m as f64;
        let intervals = ((tn - t0) / self.delay - INDEX_TOLERANCE).ceil().max(0.) as usize;
        let vars = problem.size();
        let width = (intervals + 1) * m + 1;

        // Columns `0..=m` hold the constant history on `[t0 - delay, t0]`.
        let mut history = Array2::<f64>::zeros((vars, width));
        let mut timesteps = Array1::<f64>::zeros(width);
        for i in 0..=m {
            history.column_mut(i).assign(&problem.initial_value());
            timesteps[i] = t0 - self.delay + i as f64 * h;
        }

        for interval in 0..intervals {
            let lower = t0 + interval as f64 * self.delay;
            let offset = (interval + 1) * m;
            trace!(
                "delay interval {} of {}: [{}, {}]",
                interval + 1,
                intervals,
                lower,
                lower + self.delay
            );
            let sub_solution = {
                let derivatives = problem
                    .derivatives()
                    .iter()
                    .map(|f| {
                        Box::new(DelayedDerivative {
                            inner: &**f,
                            history: history.view(),
                            t0,
                            delay: self.delay,
                            mesh_points: m,
                        }) as Box<dyn Function + '_>
                    })
                    .collect();
                let mut ivp = Problem::new(derivatives);
                ivp.set_lower_bound(lower);
                ivp.set_upper_bound(lower + self.delay);
                ivp.set_initial_value(history.column(offset).to_owned());
                self.solver.solve(&ivp)?
            };
            let samples = sub_solution.len().min(m + 1);
            history
                .slice_mut(s![.., offset..offset + samples])
                .assign(&sub_solution.values_by_variable().slice(s![.., ..samples]));
            timesteps
                .slice_mut(s![offset..offset + samples])
                .assign(&sub_solution.timesteps().slice(s![..samples]));
        }

        // Drop the pre-history, keeping the sample at t0.
        Ok(Solution::new(
            timesteps.slice(s![m..]).to_owned(),
            history.slice(s![.., m..]).to_owned(),
        ))
    }

    fn step_size(&self) -> f64 {
        self.solver.step_size()
    }

    /// Does nothing: the step size of the wrapped solver is fixed to
    /// `delay / mesh_points` at construction.
    fn set_step_size(&mut self, h: f64) {
        warn!(
            "ignoring step size {}, delay solver steps are fixed at {}",
            h,
            self.solver.step_size()
        );
    }
}
