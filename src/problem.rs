//! Initial value problems `y' = F(t, y), y(t0) = y0` over `[t0, tn]`.

use ndarray::prelude::*;
use thiserror::Error;

use crate::function::Function;

#[derive(Debug, Error, PartialEq)]
pub enum InvalidProblemError {
    #[error("initial value is empty")]
    EmptyInitialValue,
    #[error("initial value has {initial} entries but there are {derivatives} derivatives")]
    UnequalLengths { derivatives: usize, initial: usize },
    #[error("lower bound is not defined")]
    UndefinedLowerBound,
    #[error("upper bound is not defined")]
    UndefinedUpperBound,
}

/// Initial value problem.
///
/// The right-hand side is given as one [`Function`] per dependent variable.
/// Bounds start out undefined (NaN) and the initial value starts out empty;
/// both must be set before the problem is solved.
pub struct Problem<'f> {
    derivatives: Vec<Box<dyn Function + 'f>>,
    lower_bound: f64,
    upper_bound: f64,
    initial_value: Array1<f64>,
}

impl<'f> Problem<'f> {
    pub fn new(derivatives: Vec<Box<dyn Function + 'f>>) -> Problem<'f> {
        Problem {
            derivatives,
            lower_bound: f64::NAN,
            upper_bound: f64::NAN,
            initial_value: Array1::zeros(0),
        }
    }

    /// Components `(f1, ..., fn)` of the right-hand side `F`.
    pub fn derivatives(&self) -> &[Box<dyn Function + 'f>] {
        &self.derivatives
    }

    /// Number of dependent variables.
    pub fn size(&self) -> usize {
        self.derivatives.len()
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn set_lower_bound(&mut self, lower_bound: f64) {
        self.lower_bound = lower_bound;
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    pub fn set_upper_bound(&mut self, upper_bound: f64) {
        self.upper_bound = upper_bound;
    }

    pub fn initial_value(&self) -> ArrayView1<'_, f64> {
        self.initial_value.view()
    }

    pub fn set_initial_value(&mut self, initial_value: Array1<f64>) {
        self.initial_value = initial_value;
    }

    /// Checks that the problem can be handed to a solver.
    pub fn validate(&self) -> Result<(), InvalidProblemError> {
        if self.initial_value.is_empty() {
            return Err(InvalidProblemError::EmptyInitialValue);
        }
        if self.initial_value.len() != self.size() {
            return Err(InvalidProblemError::UnequalLengths {
                derivatives: self.size(),
                initial: self.initial_value.len(),
            });
        }
        if !self.lower_bound.is_finite() {
            return Err(InvalidProblemError::UndefinedLowerBound);
        }
        if !self.upper_bound.is_finite() {
            return Err(InvalidProblemError::UndefinedUpperBound);
        }
        Ok(())
    }
}
