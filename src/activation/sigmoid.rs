/// Logistic sigmoid: σ(x) = 1 / (1 + e^-x). Output lies in the open interval (0, 1).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid expressed through its own output.
///
/// `y` must already be σ(x) (a cached activation), not the pre-activation sum:
/// σ'(x) = σ(x) · (1 - σ(x)) = y · (1 - y).
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}
