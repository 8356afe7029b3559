pub struct MseLoss;

impl MseLoss {
    /// Squared error of one output: (expected - current)²
    pub fn value(current: f64, expected: f64) -> f64 {
        (expected - current).powi(2)
    }

    /// ∂/∂current: 2·(current - expected)
    pub fn derivative(current: f64, expected: f64) -> f64 {
        2.0 * (current - expected)
    }
}
