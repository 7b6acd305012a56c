//! A small sigmoid multilayer perceptron built on a strided dense matrix.
//!
//! The pipeline is: build a [`Network`] from neuron counts, fill its input
//! row, run [`Network::forward`], score it with [`cost`], fill a gradient
//! buffer with [`finite_difference`] or [`backprop`], and apply it with
//! [`apply_gradient`]. [`train_loop`] drives those steps with progress
//! reporting.
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use strided_nn::{backprop, apply_gradient, cost, Matrix, Network};
//!
//! # fn main() -> strided_nn::Result<()> {
//! let inputs = Matrix::from_data(vec![vec![0.0, 1.0], vec![1.0, 1.0]])?;
//! let targets = Matrix::from_data(vec![vec![1.0], vec![0.0]])?;
//!
//! let mut nn = Network::new(&[2, 2, 1])?;
//! nn.randomize(0.0, 1.0, &mut StdRng::seed_from_u64(0));
//! let mut g = nn.gradient_buffer()?;
//!
//! let before = cost(&mut nn, &inputs, &targets)?;
//! for _ in 0..100 {
//!     backprop(&mut nn, &mut g, &inputs, &targets)?;
//!     apply_gradient(&mut nn, &g, 1.0)?;
//! }
//! assert!(cost(&mut nn, &inputs, &targets)? < before);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod grad;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::{append_column, append_row, multiply, Matrix, MatrixBase, MatrixView, MatrixViewMut};
pub use activation::{sigmoid, sigmoid_derivative};
pub use network::{Architecture, InitRange, Network};
pub use loss::mse::{cost, MseLoss};
pub use grad::{backprop, finite_difference, GradientMethod};
pub use optim::sgd::{apply_gradient, Sgd};
pub use train::{train_loop, train_step, IterationStats, TrainConfig};
