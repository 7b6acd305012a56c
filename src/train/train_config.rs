use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::error::{NnError, Result};
use crate::grad::GradientMethod;
use crate::train::iteration_stats::IterationStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `iterations`   — number of gradient-descent steps over the full set
/// - `method`       — how each step's gradient is computed
/// - `report_every` — emit an `IterationStats` every this many iterations
/// - `progress_tx`  — optional channel sender for progress records. If the
///                    receiver is dropped the loop terminates early.
/// - `stop_flag`    — optional atomic flag; when set to `true` from another
///                    thread the loop stops before the next iteration.
pub struct TrainConfig {
    pub iterations: usize,
    pub method: GradientMethod,
    pub report_every: usize,
    pub progress_tx: Option<mpsc::Sender<IterationStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` reporting ten times per run, with no progress
    /// channel and no stop flag.
    pub fn new(iterations: usize, method: GradientMethod) -> Self {
        TrainConfig {
            iterations,
            method,
            report_every: (iterations / 10).max(1),
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.report_every == 0 {
            return Err(NnError::Config("report_every must be at least 1".to_string()));
        }
        self.method.validate()
    }
}
