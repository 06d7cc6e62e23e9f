//! Fixed-step Runge–Kutta solver.

use log::debug;
use ndarray::prelude::*;
use ndarray::s;
use thiserror::Error;

use crate::problem::Problem;
use crate::solution::Solution;
use crate::tableau::ButcherTableau;
use crate::{SolveError, Solver};

/// Step size used when none is given.
pub const DEFAULT_STEP_SIZE: f64 = 0.05;

#[derive(Debug, Error, PartialEq)]
pub enum CreateRungeKuttaError {
    #[error("step size {0} is not a finite positive number")]
    NonPositiveStepSize(f64),
}

/// Checks that `h` can be used as a step size.
fn check_step_size(h: f64) -> bool {
    h.is_finite() && h > 0.
}

/// Explicit Runge–Kutta solver with a fixed step size.
///
/// The method is described by a [`ButcherTableau`]. Every call to `solve`
/// produces samples at `lower + n * h` for `n = 0..=N`, where `N` is
/// `(upper - lower) / h` rounded to the nearest integer.
///
/// No error estimation is done: non-finite derivative values propagate to
/// the solution unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct RungeKutta {
    /// Step size.
    h: f64,
    tableau: ButcherTableau,
}

impl RungeKutta {
    /// Creates a new `RungeKutta` solver.
    ///
    /// # Parameters
    ///
    /// * `h`: Step size, must be finite and positive.
    ///
    /// * `tableau`: Coefficients of the method.
    pub fn new(h: f64, tableau: ButcherTableau) -> Result<RungeKutta, CreateRungeKuttaError> {
        if !check_step_size(h) {
            return Err(CreateRungeKuttaError::NonPositiveStepSize(h));
        }
        Ok(RungeKutta { h, tableau })
    }

    /// Creates a classical fourth order solver with step size `h`.
    pub fn with_step_size(h: f64) -> Result<RungeKutta, CreateRungeKuttaError> {
        RungeKutta::new(h, ButcherTableau::default())
    }

    pub fn tableau(&self) -> &ButcherTableau {
        &self.tableau
    }

    /// Perform a single Runge–Kutta step of size `h` from state `y` at time
    /// `t`, storing the stages in `k`.
    ///
    /// `k` has shape `(stages, variables)`. Every stage evaluates all
    /// derivatives at the same intermediate state.
    fn step_by(
        &self,
        problem: &Problem<'_>,
        t: f64,
        y: ArrayView1<f64>,
        k: &mut Array2<f64>,
    ) -> Array1<f64> {
        let h = self.h;
        let c = self.tableau.c();
        for i in 0..self.tableau.stages() {
            let dy = k.slice(s![..i, ..]).t().dot(&self.tableau.a_row(i)) * h;
            let y_stage = dy + &y;
            let t_stage = t + c[i] * h;
            for (j, f) in problem.derivatives().iter().enumerate() {
                k[[i, j]] = f.value(t_stage, y_stage.view());
            }
        }
        k.t().dot(&self.tableau.b()) * h + &y
    }
}

impl Default for RungeKutta {
    fn default() -> RungeKutta {
        RungeKutta {
            h: DEFAULT_STEP_SIZE,
            tableau: ButcherTableau::default(),
        }
    }
}

impl Solver for RungeKutta {
    fn solve(&self, problem: &Problem<'_>) -> Result<Solution, SolveError> {
        problem.validate()?;
        if !check_step_size(self.h) {
            return Err(SolveError::NonPositiveStepSize(self.h));
        }
        let lower = problem.lower_bound();
        let upper = problem.upper_bound();
        // Rounding absorbs floating-point error in the span.
        let steps = ((upper - lower) / self.h).round();
        if steps < 0. {
            return Err(SolveError::NegativeSpan { lower, upper });
        }
        let steps = steps as usize;
        debug!(
            "{}: integrating {} variables over [{}, {}] in {} steps of {}",
            self.tableau.name(),
            problem.size(),
            lower,
            upper,
            steps,
            self.h
        );

        let mut times = Array1::<f64>::zeros(steps + 1);
        let mut values = Array2::<f64>::zeros((problem.size(), steps + 1));
        times[0] = lower;
        values.column_mut(0).assign(&problem.initial_value());

        let mut k = Array2::<f64>::zeros((self.tableau.stages(), problem.size()));
        for n in 0..steps {
            let y_new = self.step_by(problem, times[n], values.column(n), &mut k);
            values.column_mut(n + 1).assign(&y_new);
            times[n + 1] = lower + (n + 1) as f64 * self.h;
        }

        Ok(Solution::new(times, values))
    }

    fn step_size(&self) -> f64 {
        self.h
    }

    fn set_step_size(&mut self, h: f64) {
        self.h = h;
    }
}
