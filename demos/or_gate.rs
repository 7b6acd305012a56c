use rand::{rngs::StdRng, SeedableRng};
use strided_nn::{cost, train_step, GradientMethod, MatrixView, Network, Sgd};

// x1, x2, y per row; inputs and targets are strided views into this table.
static OR_TABLE: [f64; 12] = [
    0.0, 0.0, 0.0,
    0.0, 1.0, 1.0,
    1.0, 0.0, 1.0,
    1.0, 1.0, 1.0,
];

fn main() -> anyhow::Result<()> {
    let inputs = MatrixView::from_parts(4, 2, 3, &OR_TABLE[..])?;
    let targets = MatrixView::from_parts(4, 1, 3, &OR_TABLE[2..])?;

    for method in [GradientMethod::FiniteDifference { epsilon: 1e-1 }, GradientMethod::Backprop] {
        let mut network = Network::new(&[2, 2, 1])?;
        network.randomize(0.0, 1.0, &mut StdRng::seed_from_u64(69));
        let mut grad = network.gradient_buffer()?;
        let optimizer = Sgd::new(1e-1);

        println!("{method:?}");
        println!("cost = {:.6}", cost(&mut network, &inputs, &targets)?);
        for _ in 0..5_000 {
            train_step(&mut network, &mut grad, &inputs, &targets, &optimizer, method)?;
        }
        println!("cost = {:.6}", cost(&mut network, &inputs, &targets)?);

        for i in 0..inputs.rows() {
            let x = inputs.row(i)?;
            println!("{} | {} = {:.4}", x[(0, 0)], x[(0, 1)], network.predict(&x)?[(0, 0)]);
        }
        strided_nn::nn_print!(network);
        println!("--------------------");
    }
    Ok(())
}
