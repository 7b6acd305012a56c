use crate::activation::sigmoid_derivative;
use crate::error::Result;
use crate::loss::mse::MseLoss;
use crate::math::matrix::MatrixBase;
use crate::network::network::Network;

/// Exact cost gradient by backpropagation.
///
/// For each sample the input is propagated forward, the output error
/// `a_L - y` is written into `grad.activations[L]`, and layers are walked
/// from the output back to the input. With `q = δ_l[j] * a_l[j] * (1 - a_l[j])`:
///
/// ```text
/// grad.weights[l-1][k, j] += q * a_{l-1}[k]
/// grad.biases[l-1][j]     += q
/// δ_{l-1}[k]              += q * weights[l-1][k, j]
/// ```
///
/// The error terms live in `grad.activations` and are cleared per sample.
/// Accumulated weights and biases are finally scaled by `2 / n`, giving the
/// gradient of the mean squared error the [`cost`](crate::loss::cost)
/// function reports.
pub fn backprop<I, T>(
    net: &mut Network,
    grad: &mut Network,
    inputs: &MatrixBase<I>,
    targets: &MatrixBase<T>,
) -> Result<()>
where
    I: AsRef<[f64]>,
    T: AsRef<[f64]>,
{
    let n = net.check_samples(inputs, targets)?;
    net.ensure_same_shape(grad)?;
    grad.zero_parameters();

    let last = net.layer_count();
    for i in 0..n {
        grad.zero_activations();
        net.input_mut().copy_from(&inputs.row(i)?)?;
        net.forward()?;

        MseLoss::derivative_into(
            net.output().row_slice(0),
            targets.row_slice(i),
            grad.activations[last].row_slice_mut(0),
        );

        for l in (1..=last).rev() {
            let (lower, upper) = grad.activations.split_at_mut(l);
            let delta = &upper[0];
            let prev_delta = &mut lower[l - 1];
            let gw = &mut grad.weights[l - 1];
            let gb = &mut grad.biases[l - 1];

            let a = &net.activations[l];
            let a_prev = &net.activations[l - 1];
            let w = &net.weights[l - 1];

            for j in 0..a.cols() {
                let q = delta[(0, j)] * sigmoid_derivative(a[(0, j)]);
                gb[(0, j)] += q;
                for k in 0..a_prev.cols() {
                    gw[(k, j)] += q * a_prev[(0, k)];
                    prev_delta[(0, k)] += q * w[(k, j)];
                }
            }
        }
    }

    let scale = 2.0 / n as f64;
    for m in grad.weights.iter_mut().chain(grad.biases.iter_mut()) {
        m.scale(scale);
    }
    Ok(())
}
