use rand::Rng;
use std::fmt;

use crate::error::{ensure_shape, NnError, Result};
use crate::math::matrix::{
    append_column, append_row, multiply, Matrix, MatrixBase, MatrixView, MatrixViewMut,
};

/// Fully connected sigmoid network.
///
/// For `layer_count` layers there are `layer_count` weight matrices and bias
/// rows, and `layer_count + 1` activation rows. `activations[0]` is the input
/// the caller fills before calling [`Network::forward`]; `activations[i]` for
/// `i > 0` is the sigmoid output of layer `i`.
///
/// The same type doubles as a gradient buffer (see
/// [`Network::gradient_buffer`]): weights and biases accumulate partial
/// derivatives and the activation rows hold per-layer error terms during
/// backpropagation.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub(crate) weights: Vec<Matrix>,
    pub(crate) biases: Vec<Matrix>,
    pub(crate) activations: Vec<Matrix>,
}

impl Network {
    /// Allocates a zero-initialised network for the given neuron counts,
    /// input layer first.
    pub fn new(architecture: &[usize]) -> Result<Network> {
        if architecture.len() < 2 {
            return Err(NnError::InvalidArchitecture(format!(
                "need at least an input and an output layer, got {} layer(s)",
                architecture.len()
            )));
        }
        if let Some(i) = architecture.iter().position(|&n| n == 0) {
            return Err(NnError::InvalidArchitecture(format!("layer {i} has no neurons")));
        }

        let layer_count = architecture.len() - 1;
        let mut weights = Vec::with_capacity(layer_count);
        let mut biases = Vec::with_capacity(layer_count);
        let mut activations = Vec::with_capacity(layer_count + 1);

        activations.push(Matrix::alloc(1, architecture[0])?);
        for pair in architecture.windows(2) {
            weights.push(Matrix::alloc(pair[0], pair[1])?);
            biases.push(Matrix::alloc(1, pair[1])?);
            activations.push(Matrix::alloc(1, pair[1])?);
        }

        Ok(Network { weights, biases, activations })
    }

    /// A zeroed network with identical shapes, for use as a gradient.
    pub fn gradient_buffer(&self) -> Result<Network> {
        Network::new(&self.architecture())
    }

    /// Uniformly randomizes every weight and bias in `[low, high)`.
    /// Activations are left untouched.
    pub fn randomize<R: Rng + ?Sized>(&mut self, low: f64, high: f64, rng: &mut R) {
        for (w, b) in self.weights.iter_mut().zip(self.biases.iter_mut()) {
            w.randomize(low, high, rng);
            b.randomize(low, high, rng);
        }
    }

    pub fn layer_count(&self) -> usize {
        self.weights.len()
    }

    /// Neuron counts per layer, input first.
    pub fn architecture(&self) -> Vec<usize> {
        self.activations.iter().map(Matrix::cols).collect()
    }

    pub fn input_width(&self) -> usize {
        self.activations[0].cols()
    }

    pub fn output_width(&self) -> usize {
        self.output().cols()
    }

    /// Total number of trainable weights and biases.
    pub fn parameter_count(&self) -> usize {
        self.weights
            .iter()
            .chain(&self.biases)
            .map(|m| m.rows() * m.cols())
            .sum()
    }

    pub fn input(&self) -> &Matrix {
        &self.activations[0]
    }

    /// Writable view of the input row. Elements can be set; the shape cannot
    /// change.
    pub fn input_mut(&mut self) -> MatrixViewMut<'_> {
        self.activations[0].as_view_mut()
    }

    pub fn output(&self) -> &Matrix {
        &self.activations[self.layer_count()]
    }

    pub fn weights(&self, layer: usize) -> &Matrix {
        &self.weights[layer]
    }

    pub fn weights_mut(&mut self, layer: usize) -> MatrixViewMut<'_> {
        self.weights[layer].as_view_mut()
    }

    pub fn biases(&self, layer: usize) -> &Matrix {
        &self.biases[layer]
    }

    pub fn biases_mut(&mut self, layer: usize) -> MatrixViewMut<'_> {
        self.biases[layer].as_view_mut()
    }

    pub fn activation(&self, index: usize) -> &Matrix {
        &self.activations[index]
    }

    /// Forward pass over the current input; overwrites `activations[1..]`.
    ///
    /// Each layer is computed as one product of augmented scratch matrices,
    /// `[a | 1] * [W; b]`, which equals `a * W + b`.
    pub fn forward(&mut self) -> Result<()> {
        for i in 0..self.layer_count() {
            let a = &self.activations[i];
            let w = &self.weights[i];

            let mut ones = Matrix::alloc(a.rows(), 1)?;
            ones.fill(1.0);
            let mut a_aug = Matrix::alloc(a.rows(), a.cols() + 1)?;
            append_column(&mut a_aug, a, &ones)?;

            let mut w_aug = Matrix::alloc(w.rows() + 1, w.cols())?;
            append_row(&mut w_aug, w, &self.biases[i])?;

            multiply(&mut self.activations[i + 1], &a_aug, &w_aug)?;
            self.activations[i + 1].sigmoid_inplace();
        }
        Ok(())
    }

    /// Loads `input` (a single row) and runs the forward pass.
    pub fn predict<S: AsRef<[f64]>>(&mut self, input: &MatrixBase<S>) -> Result<MatrixView<'_>> {
        self.input_mut().copy_from(input)?;
        self.forward()?;
        Ok(self.output().as_view())
    }

    pub(crate) fn zero_parameters(&mut self) {
        for m in self.weights.iter_mut().chain(self.biases.iter_mut()) {
            m.fill(0.0);
        }
    }

    pub(crate) fn zero_activations(&mut self) {
        for a in self.activations.iter_mut() {
            a.fill(0.0);
        }
    }

    /// Sum of squares over every weight and bias.
    pub fn squared_norm(&self) -> f64 {
        self.weights
            .iter()
            .chain(&self.biases)
            .map(MatrixBase::squared_norm)
            .sum()
    }

    /// Fails unless `other` has exactly this network's shapes.
    pub(crate) fn ensure_same_shape(&self, other: &Network) -> Result<()> {
        if self.layer_count() != other.layer_count() {
            return Err(NnError::ShapeMismatch {
                op: "gradient",
                expected: (self.layer_count(), 0),
                actual: (other.layer_count(), 0),
            });
        }
        let ours = self.weights.iter().chain(&self.biases).chain(&self.activations);
        let theirs = other.weights.iter().chain(&other.biases).chain(&other.activations);
        for (a, b) in ours.zip(theirs) {
            ensure_shape("gradient", a.shape(), b.shape())?;
        }
        Ok(())
    }

    /// Validates a training set against this network and returns the
    /// sample count.
    pub(crate) fn check_samples<I, T>(&self, inputs: &MatrixBase<I>, targets: &MatrixBase<T>) -> Result<usize>
    where
        I: AsRef<[f64]>,
        T: AsRef<[f64]>,
    {
        ensure_shape("samples", (inputs.rows(), self.output_width()), targets.shape())?;
        ensure_shape("samples", (inputs.rows(), self.input_width()), inputs.shape())?;
        Ok(inputs.rows())
    }

    pub fn render(&self, label: &str) -> String {
        let mut out = format!("{label} = [\n");
        for (i, (w, b)) in self.weights.iter().zip(&self.biases).enumerate() {
            out.push_str(&w.render(&format!("ws{i}"), 4));
            out.push_str(&b.render(&format!("bs{i}"), 4));
        }
        out.push_str("]\n");
        out
    }

    pub fn print(&self, label: &str) {
        print!("{}", self.render(label));
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render("nn"))
    }
}

/// Prints a network labelled with the expression that produced it.
#[macro_export]
macro_rules! nn_print {
    ($nn:expr) => {
        $nn.print(stringify!($nn))
    };
}
