use ndarray::prelude::*;

/// Scalar map `f: R x R^n -> R`, one component of a right-hand side.
pub trait Function {
    /// Value of the function at time `t` and state `y`.
    fn value(&self, t: f64, y: ArrayView1<f64>) -> f64;
}

impl<F> Function for F
where
    F: Fn(f64, ArrayView1<f64>) -> f64,
{
    fn value(&self, t: f64, y: ArrayView1<f64>) -> f64 {
        self(t, y)
    }
}
