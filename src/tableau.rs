//! Butcher tableaus of explicit Runge–Kutta methods.

use lazy_static::lazy_static;
use ndarray::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InvalidTableauError {
    #[error("tableau has no stages")]
    NoStages,
    #[error("b has {b} entries but c has {c}")]
    UnequalWeights { b: usize, c: usize },
    #[error("a has {actual} entries, expected {expected} for {stages} stages")]
    WrongCouplingLength {
        stages: usize,
        expected: usize,
        actual: usize,
    },
}

/// Coefficients of an explicit Runge–Kutta method.
///
/// Notation is as in (ref 1): `c` are the stage times, `b` the weights of the
/// final combination and `a` the coupling between stages. For explicit
/// methods `a` is strictly lower triangular, so it is stored flattened row by
/// row: the coefficient for stage `i` and prior stage `j < i` is at index
/// `j + i * (i - 1) / 2`.
///
/// # References
///
/// 1. E. Hairer, S. P. Norsett G. Wanner, "Solving Ordinary Differential
///    Equations I: Nonstiff Problems", Sec. II.1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButcherTableau {
    name: &'static str,
    a: &'static [f64],
    b: &'static [f64],
    c: &'static [f64],
}

static ALL: [ButcherTableau; 4] = [
    ButcherTableau::EULER,
    ButcherTableau::TRAPEZOIDAL,
    ButcherTableau::MIDPOINT,
    ButcherTableau::RK4,
];

lazy_static! {
    static ref BUILT_IN: HashMap<String, ButcherTableau> = ButcherTableau::all()
        .iter()
        .map(|tableau| (tableau.name.to_lowercase(), *tableau))
        .collect();
}

impl ButcherTableau {
    /// Forward Euler, order 1.
    pub const EULER: ButcherTableau = ButcherTableau {
        name: "Euler",
        a: &[],
        b: &[1.],
        c: &[0.],
    };

    /// Explicit trapezoidal rule (Heun), order 2.
    pub const TRAPEZOIDAL: ButcherTableau = ButcherTableau {
        name: "Trapezoidal",
        a: &[1.],
        b: &[1. / 2., 1. / 2.],
        c: &[0., 1.],
    };

    /// Explicit midpoint rule, order 2.
    pub const MIDPOINT: ButcherTableau = ButcherTableau {
        name: "Midpoint",
        a: &[1. / 2.],
        b: &[0., 1.],
        c: &[0., 1. / 2.],
    };

    /// Classical Runge–Kutta method, order 4.
    pub const RK4: ButcherTableau = ButcherTableau {
        name: "RK4",
        a: &[1. / 2., 0., 1. / 2., 0., 0., 1.],
        b: &[1. / 6., 1. / 3., 1. / 3., 1. / 6.],
        c: &[0., 1. / 2., 1. / 2., 1.],
    };

    /// Creates a custom explicit tableau, checking the coefficient lengths.
    pub fn new(
        name: &'static str,
        a: &'static [f64],
        b: &'static [f64],
        c: &'static [f64],
    ) -> Result<ButcherTableau, InvalidTableauError> {
        let stages = c.len();
        if stages == 0 {
            return Err(InvalidTableauError::NoStages);
        }
        if b.len() != stages {
            return Err(InvalidTableauError::UnequalWeights {
                b: b.len(),
                c: stages,
            });
        }
        let expected = stages * (stages - 1) / 2;
        if a.len() != expected {
            return Err(InvalidTableauError::WrongCouplingLength {
                stages,
                expected,
                actual: a.len(),
            });
        }
        Ok(ButcherTableau { name, a, b, c })
    }

    /// The built-in tableaus.
    pub fn all() -> &'static [ButcherTableau] {
        &ALL
    }

    /// Looks up a built-in tableau by name, ignoring case.
    pub fn by_name(name: &str) -> Option<ButcherTableau> {
        BUILT_IN.get(&name.to_lowercase()).copied()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of stages `s`.
    pub fn stages(&self) -> usize {
        self.c.len()
    }

    /// Flattened strictly lower triangular coupling matrix, length
    /// `s * (s - 1) / 2`.
    pub fn a(&self) -> ArrayView1<'static, f64> {
        aview1(self.a)
    }

    /// Coupling coefficients of stage `i` with stages `0..i`.
    pub fn a_row(&self, i: usize) -> ArrayView1<'static, f64> {
        let a: &'static [f64] = self.a;
        let start = i * i.saturating_sub(1) / 2;
        aview1(&a[start..start + i])
    }

    /// Weights of the stages in the final combination, length `s`.
    pub fn b(&self) -> ArrayView1<'static, f64> {
        aview1(self.b)
    }

    /// Stage times as fractions of the step, length `s`.
    pub fn c(&self) -> ArrayView1<'static, f64> {
        aview1(self.c)
    }
}

impl Default for ButcherTableau {
    fn default() -> ButcherTableau {
        ButcherTableau::RK4
    }
}
