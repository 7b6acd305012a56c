pub mod mse;

pub use mse::{cost, MseLoss};
