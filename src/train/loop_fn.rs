use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::error::Result;
use crate::loss::mse::cost;
use crate::math::matrix::MatrixBase;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::iteration_stats::IterationStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::train_step;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.iterations` full-batch steps and returns the
/// cost over the training set once the loop ends.
///
/// # Arguments
/// - `network`   — modified in place
/// - `inputs`    — one sample per row, `network.input_width()` columns
/// - `targets`   — one target per row, `network.output_width()` columns
/// - `optimizer` — SGD optimizer (carries the learning rate)
/// - `config`    — iteration count, gradient method, progress channel, stop flag
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// Fails before touching the network if the config is invalid or the sample
/// set does not fit the network's input/output widths.
pub fn train_loop<I, T>(
    network: &mut Network,
    inputs: &MatrixBase<I>,
    targets: &MatrixBase<T>,
    optimizer: &Sgd,
    config: &TrainConfig,
) -> Result<f64>
where
    I: AsRef<[f64]>,
    T: AsRef<[f64]>,
{
    config.validate()?;
    network.check_samples(inputs, targets)?;

    let mut grad = network.gradient_buffer()?;
    let started = Instant::now();

    for iteration in 1..=config.iterations {
        if stop_requested(config) {
            break;
        }

        train_step(network, &mut grad, inputs, targets, optimizer, config.method)?;

        let due = iteration % config.report_every == 0 || iteration == config.iterations;
        if let (true, Some(tx)) = (due, &config.progress_tx) {
            let stats = IterationStats {
                iteration,
                total_iterations: config.iterations,
                cost: cost(network, inputs, targets)?,
                gradient_norm: grad.squared_norm().sqrt(),
                elapsed_ms: started.elapsed().as_millis() as u64,
            };
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    cost(network, inputs, targets)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NnError;
    use crate::grad::GradientMethod;
    use crate::math::matrix::Matrix;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::atomic::AtomicBool;
    use std::sync::{mpsc, Arc};

    fn or_gate() -> (Matrix, Matrix) {
        let inputs = Matrix::from_data(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ])
        .unwrap();
        let targets = Matrix::from_data(vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]]).unwrap();
        (inputs, targets)
    }

    fn seeded(seed: u64) -> Network {
        let mut nn = Network::new(&[2, 2, 1]).unwrap();
        nn.randomize(0.0, 1.0, &mut StdRng::seed_from_u64(seed));
        nn
    }

    #[test]
    fn reports_on_schedule_and_on_last_iteration() {
        let (inputs, targets) = or_gate();
        let mut nn = seeded(1);
        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(25, GradientMethod::Backprop);
        config.report_every = 10;
        config.progress_tx = Some(tx);

        let final_cost = train_loop(&mut nn, &inputs, &targets, &Sgd::new(0.5), &config).unwrap();
        drop(config);

        let stats: Vec<IterationStats> = rx.iter().collect();
        let iterations: Vec<usize> = stats.iter().map(|s| s.iteration).collect();
        assert_eq!(iterations, vec![10, 20, 25]);
        assert!(stats.iter().all(|s| s.total_iterations == 25));
        assert_eq!(stats.last().unwrap().cost, final_cost);
        assert!(stats[0].cost > stats[2].cost);
    }

    #[test]
    fn matches_manual_steps() {
        let (inputs, targets) = or_gate();
        let sgd = Sgd::new(0.3);

        let mut looped = seeded(4);
        let mut manual = looped.clone();
        train_loop(&mut looped, &inputs, &targets, &sgd, &TrainConfig::new(7, GradientMethod::Backprop)).unwrap();

        let mut g = manual.gradient_buffer().unwrap();
        for _ in 0..7 {
            train_step(&mut manual, &mut g, &inputs, &targets, &sgd, GradientMethod::Backprop).unwrap();
        }
        assert_eq!(looped.weights, manual.weights);
        assert_eq!(looped.biases, manual.biases);
    }

    #[test]
    fn stop_flag_prevents_any_update() {
        let (inputs, targets) = or_gate();
        let mut nn = seeded(2);
        let before = nn.clone();
        let mut config = TrainConfig::new(100, GradientMethod::Backprop);
        config.stop_flag = Some(Arc::new(AtomicBool::new(true)));

        train_loop(&mut nn, &inputs, &targets, &Sgd::new(1.0), &config).unwrap();
        assert_eq!(nn.weights, before.weights);
        assert_eq!(nn.biases, before.biases);
    }

    #[test]
    fn dropped_receiver_stops_at_first_report() {
        let (inputs, targets) = or_gate();
        let sgd = Sgd::new(0.5);
        let mut nn = seeded(3);
        let mut expected = nn.clone();

        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut config = TrainConfig::new(100, GradientMethod::Backprop);
        config.report_every = 10;
        config.progress_tx = Some(tx);
        train_loop(&mut nn, &inputs, &targets, &sgd, &config).unwrap();

        let mut g = expected.gradient_buffer().unwrap();
        for _ in 0..10 {
            train_step(&mut expected, &mut g, &inputs, &targets, &sgd, GradientMethod::Backprop).unwrap();
        }
        assert_eq!(nn.weights, expected.weights);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let (inputs, targets) = or_gate();
        let mut nn = seeded(5);
        let before = nn.clone();

        let mut config = TrainConfig::new(10, GradientMethod::Backprop);
        config.report_every = 0;
        let err = train_loop(&mut nn, &inputs, &targets, &Sgd::new(0.1), &config).unwrap_err();
        assert!(matches!(err, NnError::Config(_)));

        let config = TrainConfig::new(10, GradientMethod::FiniteDifference { epsilon: 0.0 });
        assert!(train_loop(&mut nn, &inputs, &targets, &Sgd::new(0.1), &config).is_err());
        assert_eq!(nn, before);
    }

    #[test]
    fn zero_iterations_returns_initial_cost() {
        let (inputs, targets) = or_gate();
        let mut nn = seeded(6);
        let initial = cost(&mut nn, &inputs, &targets).unwrap();
        let c = train_loop(&mut nn, &inputs, &targets, &Sgd::new(0.1), &TrainConfig::new(0, GradientMethod::Backprop)).unwrap();
        assert_eq!(c, initial);
    }
}
