// Fits y = w * x on {(x, 2x)} with a single bias-free weight, comparing the
// finite-difference and analytic derivatives of the mean squared error.
use rand::{rngs::StdRng, SeedableRng};
use strided_nn::Matrix;

fn cost(w: &Matrix, xs: &Matrix, ys: &Matrix) -> strided_nn::Result<f64> {
    let predicted = xs.dot(w)?;
    let n = xs.rows() as f64;
    Ok(predicted.iter().zip(ys.iter()).map(|(p, y)| (p - y).powi(2)).sum::<f64>() / n)
}

/// d/dw of the mean squared error: 2/n * sum((w*x - y) * x).
fn dcost(w: &Matrix, xs: &Matrix, ys: &Matrix) -> f64 {
    let n = xs.rows() as f64;
    let w = w[(0, 0)];
    xs.iter().zip(ys.iter()).map(|(x, y)| (w * x - y) * x).sum::<f64>() * 2.0 / n
}

fn main() -> anyhow::Result<()> {
    let xs = Matrix::from_data((0..5).map(|x| vec![x as f64]).collect())?;
    let ys = Matrix::from_data((0..5).map(|x| vec![2.0 * x as f64]).collect())?;

    let eps = 1e-3;
    let rate = 1e-2;

    let mut w = Matrix::alloc(1, 1)?;
    w.randomize(0.0, 10.0, &mut StdRng::from_entropy());
    let mut shifted = w.clone();

    for _ in 0..200 {
        let c = cost(&w, &xs, &ys)?;
        shifted.copy_from(&w)?;
        shifted[(0, 0)] += eps;
        let numeric = (cost(&shifted, &xs, &ys)? - c) / eps;
        let analytic = dcost(&w, &xs, &ys);

        w[(0, 0)] -= rate * analytic;
        println!("cost = {c:.6}, w = {:.6}, dw = {analytic:.6} (finite diff {numeric:.6})", w[(0, 0)]);
    }

    println!("---------------------");
    strided_nn::mat_print!(w);
    Ok(())
}
