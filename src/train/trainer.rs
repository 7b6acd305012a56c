use crate::{
    error::Result,
    grad::GradientMethod,
    math::matrix::MatrixBase,
    network::network::Network,
    optim::sgd::Sgd,
};

/// One full-batch training iteration: fills `grad` using `method`, then lets
/// `optimizer` apply it to `network`.
///
/// `grad` must come from `network.gradient_buffer()` (or share its shapes);
/// it is reused across calls so a training loop allocates it once.
pub fn train_step<I, T>(
    network: &mut Network,
    grad: &mut Network,
    inputs: &MatrixBase<I>,
    targets: &MatrixBase<T>,
    optimizer: &Sgd,
    method: GradientMethod,
) -> Result<()>
where
    I: AsRef<[f64]>,
    T: AsRef<[f64]>,
{
    method.compute(network, grad, inputs, targets)?;
    optimizer.step(network, grad)
}
