// Trains the OR gate on a sigmoid network and prints progress as JSON lines.
//
//   cargo run -- [architecture.json] [seed]
//
// The architecture file must describe a 2-input, 1-output network; without
// one the built-in [2, 2, 1] layout is used.
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use rand::{rngs::StdRng, SeedableRng};
use strided_nn::{Architecture, GradientMethod, Matrix, Sgd, TrainConfig, train_loop};

const ITERATIONS: usize = 5_000;
const LEARNING_RATE: f64 = 0.1;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let arch = match args.next() {
        Some(path) => Architecture::load_json(&path)
            .with_context(|| format!("loading architecture from {path}"))?,
        None => Architecture::new("or", vec![2, 2, 1]),
    };
    let mut rng = match args.next() {
        Some(seed) => StdRng::seed_from_u64(seed.parse().context("seed must be an integer")?),
        None => StdRng::from_entropy(),
    };

    let inputs = Matrix::from_data(vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ])?;
    let targets = Matrix::from_data(vec![vec![0.0], vec![1.0], vec![1.0], vec![1.0]])?;

    let mut network = arch.build(&mut rng)?;
    println!("training `{}` {:?} on OR", arch.name, arch.layers);

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(ITERATIONS, GradientMethod::Backprop);
    config.progress_tx = Some(tx);

    // Training runs on its own thread so progress is printed as it arrives.
    let trainer = thread::spawn(move || {
        let result = train_loop(&mut network, &inputs, &targets, &Sgd::new(LEARNING_RATE), &config);
        result.map(|cost| (network, inputs, cost))
    });

    for stats in rx {
        println!("{}", serde_json::to_string(&stats)?);
    }

    let (mut network, inputs, final_cost) = trainer
        .join()
        .map_err(|_| anyhow::anyhow!("training thread panicked"))??;
    println!("final cost = {final_cost:.6}");

    for i in 0..inputs.rows() {
        let x = inputs.row(i)?;
        let out = network.predict(&x)?[(0, 0)];
        println!("{:?} -> {out:.4}", x.row_slice(0));
    }
    network.print("nn");
    Ok(())
}
