use crate::error::Result;
use crate::math::matrix::MatrixBase;
use crate::network::network::Network;

pub struct MseLoss;

impl MseLoss {
    /// Squared error summed over the outputs of one sample.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum()
    }

    /// Per-output error term `predicted - expected`, written into `out`.
    /// The constant factor 2 of the true derivative is left to the caller.
    pub fn derivative_into(predicted: &[f64], expected: &[f64], out: &mut [f64]) {
        for ((o, p), e) in out.iter_mut().zip(predicted).zip(expected) {
            *o = p - e;
        }
    }
}

/// Mean squared error of `net` over a labeled sample set.
///
/// Row `i` of `inputs` and `targets` forms one example. Each row is loaded
/// into the input layer and propagated, so afterwards the activations hold
/// the last sample's forward pass. An empty sample set yields NaN.
pub fn cost<I, T>(net: &mut Network, inputs: &MatrixBase<I>, targets: &MatrixBase<T>) -> Result<f64>
where
    I: AsRef<[f64]>,
    T: AsRef<[f64]>,
{
    let n = net.check_samples(inputs, targets)?;

    let mut total = 0.0;
    for i in 0..n {
        net.input_mut().copy_from(&inputs.row(i)?)?;
        net.forward()?;
        total += MseLoss::loss(net.output().row_slice(0), targets.row_slice(i));
    }

    Ok(total / n as f64)
}
