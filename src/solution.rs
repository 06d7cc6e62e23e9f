use ndarray::prelude::*;

/// Numerical solution of an initial value problem on a uniform time grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    timesteps: Array1<f64>,
    /// Shape `(variables, timesteps)`.
    values: Array2<f64>,
}

impl Solution {
    /// Creates a solution from a time grid and a matrix of values indexed
    /// `[variable, timestep]`.
    pub fn new(timesteps: Array1<f64>, values: Array2<f64>) -> Solution {
        debug_assert_eq!(timesteps.len(), values.ncols());
        Solution { timesteps, values }
    }

    pub fn timesteps(&self) -> ArrayView1<'_, f64> {
        self.timesteps.view()
    }

    /// Values grouped by variable, `[variable, timestep]`.
    pub fn values_by_variable(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Values grouped by time, `[timestep, variable]`.
    pub fn values_by_time(&self) -> Array2<f64> {
        self.values.t().to_owned()
    }

    /// Number of samples on the time grid.
    pub fn len(&self) -> usize {
        self.timesteps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timesteps.is_empty()
    }

    /// Number of dependent variables.
    pub fn variables(&self) -> usize {
        self.values.nrows()
    }

    /// State vector at the `index`-th sample.
    pub fn state(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.column(index)
    }

    pub fn into_parts(self) -> (Array1<f64>, Array2<f64>) {
        (self.timesteps, self.values)
    }
}
