use serde::{Serialize, Deserialize};

/// Progress record emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, one record is
/// sent every `report_every` iterations and once more after the final
/// iteration. Receivers typically print them or serialize them to JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Total iterations requested for this run.
    pub total_iterations: usize,
    /// Mean squared error over the training set after this iteration's update.
    pub cost: f64,
    /// Euclidean norm of the gradient applied in this iteration.
    pub gradient_norm: f64,
    /// Wall-clock time since the run started, in milliseconds.
    pub elapsed_ms: u64,
}
