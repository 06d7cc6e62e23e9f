//! Point queries on the solution of an initial value problem.

use log::debug;
use ndarray::prelude::*;
use thiserror::Error;

use crate::problem::{InvalidProblemError, Problem};
use crate::rk::{CreateRungeKuttaError, RungeKutta};
use crate::{SolveError, Solver};

/// Extra time solved past each query that extends the buffer, so that a
/// run of slightly increasing queries triggers a single extension.
pub const MARGIN: f64 = 2.;

#[derive(Debug, Error, PartialEq)]
pub enum CreateReaderError {
    #[error(transparent)]
    InvalidProblem(#[from] InvalidProblemError),
    #[error(transparent)]
    InvalidSolver(#[from] CreateRungeKuttaError),
    #[error("solver step size {0} is not a finite positive number")]
    NonPositivePrecision(f64),
    #[error("{0} is not supported")]
    Unsupported(&'static str),
}

/// Answers "value at time `t`" queries on the solution of a problem.
pub trait SolutionReader {
    /// State at `time`.
    ///
    /// Times at or before the start of the problem return the initial value.
    fn values(&mut self, time: f64) -> Result<ArrayView1<'_, f64>, SolveError>;
    /// Lower bound of the problem when the reader was created.
    fn start_time(&self) -> f64;
    /// Spacing of the answered time grid.
    fn precision(&self) -> f64;
}

/// Reader that keeps every computed sample and extends the solution lazily.
///
/// Samples are stored contiguously, one state vector of `width` values per
/// time `start_time + i * precision`. A query past the horizon solves only
/// the missing stretch, starting from the last stored sample.
///
/// The wrapped solver must produce time grids uniformly spaced at its step
/// size; the buffer is indexed by `round((time - start_time) / precision)`.
pub struct BufferedSolutionReader<'f, S> {
    problem: Problem<'f>,
    solver: S,
    initial_value: Array1<f64>,
    start_time: f64,
    precision: f64,
    width: usize,
    buffer: Vec<f64>,
    end_time: f64,
}

impl<'f, S: Solver> BufferedSolutionReader<'f, S> {
    /// Creates a reader of `problem` solved with `solver`.
    ///
    /// The upper bound of `problem` is ignored; the reader extends the
    /// solution as far as it is queried.
    pub fn new(problem: Problem<'f>, solver: S) -> Result<Self, CreateReaderError> {
        let initial_value = problem.initial_value().to_owned();
        if initial_value.is_empty() {
            return Err(InvalidProblemError::EmptyInitialValue.into());
        }
        if initial_value.len() != problem.size() {
            return Err(InvalidProblemError::UnequalLengths {
                derivatives: problem.size(),
                initial: initial_value.len(),
            }
            .into());
        }
        let start_time = problem.lower_bound();
        if !start_time.is_finite() {
            return Err(InvalidProblemError::UndefinedLowerBound.into());
        }
        let precision = solver.step_size();
        if !(precision.is_finite() && precision > 0.) {
            return Err(CreateReaderError::NonPositivePrecision(precision));
        }
        Ok(BufferedSolutionReader {
            precision,
            width: initial_value.len(),
            buffer: initial_value.to_vec(),
            end_time: start_time,
            start_time,
            initial_value,
            problem,
            solver,
        })
    }

    /// A reader with a buffer of fixed capacity. Not supported.
    pub fn with_fixed_capacity(
        _problem: Problem<'f>,
        _solver: S,
        _capacity: usize,
    ) -> Result<Self, CreateReaderError> {
        Err(CreateReaderError::Unsupported("fixed-capacity buffering"))
    }

    /// Time of the last buffered sample.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.buffer.len() / self.width
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn sample(&self, index: usize) -> ArrayView1<'_, f64> {
        aview1(&self.buffer[index * self.width..(index + 1) * self.width])
    }

    /// Solves from the last buffered sample to `upper` and appends the new
    /// samples.
    fn extend_to(&mut self, upper: f64) -> Result<(), SolveError> {
        let last = self.len() - 1;
        let lower = self.start_time + last as f64 * self.precision;
        debug!("extending buffered solution from {} to {}", lower, upper);
        let initial_value = self.sample(last).to_owned();
        self.problem.set_initial_value(initial_value);
        self.problem.set_lower_bound(lower);
        self.problem.set_upper_bound(upper);
        let solution = self.solver.solve(&self.problem)?;
        // The first sample duplicates the last buffered one.
        for state in solution.values_by_variable().axis_iter(Axis(1)).skip(1) {
            self.buffer.extend(state.iter());
        }
        self.end_time = self.start_time + (self.len() - 1) as f64 * self.precision;
        Ok(())
    }
}

impl<'f> BufferedSolutionReader<'f, RungeKutta> {
    /// Creates a reader using the classical fourth order method with the
    /// default step size.
    pub fn with_default_solver(problem: Problem<'f>) -> Result<Self, CreateReaderError> {
        BufferedSolutionReader::new(problem, RungeKutta::default())
    }

    /// Creates a reader using the classical fourth order method with step
    /// size `h`.
    pub fn with_step_size(problem: Problem<'f>, h: f64) -> Result<Self, CreateReaderError> {
        BufferedSolutionReader::new(problem, RungeKutta::with_step_size(h)?)
    }
}

impl<'f, S: Solver> SolutionReader for BufferedSolutionReader<'f, S> {
    fn values(&mut self, time: f64) -> Result<ArrayView1<'_, f64>, SolveError> {
        if time <= self.start_time {
            return Ok(self.initial_value.view());
        }
        if time > self.end_time {
            self.extend_to(time + MARGIN)?;
        }
        let index = ((time - self.start_time) / self.precision).round() as usize;
        Ok(self.sample(index.min(self.len() - 1)))
    }

    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn precision(&self) -> f64 {
        self.precision
    }
}
