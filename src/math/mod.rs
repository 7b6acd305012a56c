pub mod matrix;

pub use matrix::{append_column, append_row, multiply, Matrix, MatrixBase, MatrixView, MatrixViewMut};
