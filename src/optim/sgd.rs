use crate::error::Result;
use crate::network::network::Network;

/// One plain gradient-descent step: `param -= rate * grad` for every weight
/// and bias. Activations of either network are not touched.
pub fn apply_gradient(net: &mut Network, grad: &Network, rate: f64) -> Result<()> {
    net.ensure_same_shape(grad)?;
    for (w, g) in net.weights.iter_mut().zip(&grad.weights) {
        w.add_scaled(g, -rate)?;
    }
    for (b, g) in net.biases.iter_mut().zip(&grad.biases) {
        b.add_scaled(g, -rate)?;
    }
    Ok(())
}

pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies a pre-computed gradient to the network.
    pub fn step(&self, net: &mut Network, grad: &Network) -> Result<()> {
        apply_gradient(net, grad, self.learning_rate)
    }
}
