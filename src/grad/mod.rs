pub mod backprop;
pub mod finite_diff;

use serde::{Deserialize, Serialize};

use crate::error::{NnError, Result};
use crate::math::matrix::MatrixBase;
use crate::network::network::Network;

pub use backprop::backprop;
pub use finite_diff::finite_difference;

/// Strategy used to fill a gradient buffer.
///
/// - `FiniteDifference` perturbs each parameter by `epsilon` and re-evaluates
///   the full cost. One cost pass per parameter; meant as a reference oracle.
/// - `Backprop` computes the exact gradient with one forward and one backward
///   pass per sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GradientMethod {
    FiniteDifference { epsilon: f64 },
    Backprop,
}

impl GradientMethod {
    pub fn validate(&self) -> Result<()> {
        match *self {
            GradientMethod::FiniteDifference { epsilon } if !(epsilon.is_finite() && epsilon != 0.0) => {
                Err(NnError::Config(format!("finite-difference epsilon must be finite and non-zero, got {epsilon}")))
            }
            _ => Ok(()),
        }
    }

    /// Overwrites the weights and biases of `grad` with the cost gradient of
    /// `net` over the sample set.
    pub fn compute<I, T>(
        &self,
        net: &mut Network,
        grad: &mut Network,
        inputs: &MatrixBase<I>,
        targets: &MatrixBase<T>,
    ) -> Result<()>
    where
        I: AsRef<[f64]>,
        T: AsRef<[f64]>,
    {
        match *self {
            GradientMethod::FiniteDifference { epsilon } => {
                finite_difference(net, grad, epsilon, inputs, targets)
            }
            GradientMethod::Backprop => backprop(net, grad, inputs, targets),
        }
    }
}
