/// Logistic function `1 / (1 + e^-x)`.
///
/// Very negative inputs overflow `exp` to infinity and yield `0.0`; NaN
/// propagates unchanged.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid expressed through its output `a = sigmoid(z)`.
pub fn sigmoid_derivative(a: f64) -> f64 {
    a * (1.0 - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn sigmoid_of_zero_is_exactly_half() {
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn derivative_peaks_at_half() {
        assert_eq!(sigmoid_derivative(0.5), 0.25);
        assert_eq!(sigmoid_derivative(0.0), 0.0);
        assert_eq!(sigmoid_derivative(1.0), 0.0);
    }

    #[test]
    fn derivative_matches_central_difference() {
        for &z in &[-3.0, -0.5, 0.0, 1.2, 4.0] {
            let h = 1e-6;
            let numeric = (sigmoid(z + h) - sigmoid(z - h)) / (2.0 * h);
            assert_abs_diff_eq!(sigmoid_derivative(sigmoid(z)), numeric, epsilon = 1e-8);
        }
    }

    #[test]
    fn nan_propagates() {
        assert!(sigmoid(f64::NAN).is_nan());
    }

    proptest! {
        #[test]
        fn output_in_open_unit_interval(x in -30.0f64..30.0) {
            let y = sigmoid(x);
            prop_assert!(y > 0.0 && y < 1.0);
        }

        #[test]
        fn symmetric_around_zero(x in -30.0f64..30.0) {
            assert_abs_diff_eq!(sigmoid(x) + sigmoid(-x), 1.0, epsilon = 1e-12);
        }
    }
}
