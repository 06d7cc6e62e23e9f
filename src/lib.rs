//! Fixed-step explicit Runge–Kutta integration of initial value problems,
//! with a constant-delay solver and a lazily extending solution reader built
//! on top of it.

pub mod delay;
pub mod function;
pub mod problem;
pub mod reader;
pub mod rk;
pub mod settings;
pub mod solution;
pub mod tableau;

pub use delay::DelaySolver;
pub use function::Function;
pub use problem::Problem;
pub use reader::{BufferedSolutionReader, SolutionReader};
pub use rk::RungeKutta;
pub use solution::Solution;
pub use tableau::ButcherTableau;

use problem::InvalidProblemError;
use thiserror::Error;

/// Errors returned by [`Solver::solve`].
#[derive(Debug, Error)]
pub enum SolveError {
    #[error(transparent)]
    InvalidProblem(#[from] InvalidProblemError),
    #[error("step size {0} is not a finite positive number")]
    NonPositiveStepSize(f64),
    #[error("upper bound {upper} lies before lower bound {lower}")]
    NegativeSpan { lower: f64, upper: f64 },
}

/// Solver of initial value problems on a uniform time grid.
pub trait Solver {
    /// Integrates `problem` over `[lower_bound, upper_bound]`.
    fn solve(&self, problem: &Problem<'_>) -> Result<Solution, SolveError>;
    /// Spacing of the time grid produced by `solve`.
    fn step_size(&self) -> f64;
    /// Changes the spacing of the time grid.
    fn set_step_size(&mut self, h: f64);
}
