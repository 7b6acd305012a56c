use crate::error::Result;
use crate::loss::mse::cost;
use crate::math::matrix::{Matrix, MatrixBase};
use crate::network::network::Network;

#[derive(Clone, Copy)]
enum Param {
    Weights,
    Biases,
}

fn param_mut(net: &mut Network, param: Param, layer: usize) -> &mut Matrix {
    match param {
        Param::Weights => &mut net.weights[layer],
        Param::Biases => &mut net.biases[layer],
    }
}

/// Forward-difference estimate of the cost gradient.
///
/// Every weight and bias is nudged by `+epsilon` in turn, the full cost is
/// re-evaluated, and `(c1 - c0) / epsilon` is stored in the matching slot of
/// `grad`. The parameter is restored bit-for-bit afterwards, even when the
/// cost evaluation fails. `grad.activations` are left untouched.
pub fn finite_difference<I, T>(
    net: &mut Network,
    grad: &mut Network,
    epsilon: f64,
    inputs: &MatrixBase<I>,
    targets: &MatrixBase<T>,
) -> Result<()>
where
    I: AsRef<[f64]>,
    T: AsRef<[f64]>,
{
    net.ensure_same_shape(grad)?;
    let c0 = cost(net, inputs, targets)?;

    for layer in 0..net.layer_count() {
        for param in [Param::Weights, Param::Biases] {
            let (rows, cols) = param_mut(net, param, layer).shape();
            for j in 0..rows {
                for k in 0..cols {
                    let saved = param_mut(net, param, layer)[(j, k)];
                    param_mut(net, param, layer)[(j, k)] = saved + epsilon;
                    let c1 = cost(net, inputs, targets);
                    param_mut(net, param, layer)[(j, k)] = saved;

                    param_mut(grad, param, layer)[(j, k)] = (c1? - c0) / epsilon;
                }
            }
        }
    }
    Ok(())
}
