pub struct MaeLoss;

impl MaeLoss {
    /// Absolute error of one output: |expected - current|
    pub fn value(current: f64, expected: f64) -> f64 {
        (expected - current).abs()
    }

    /// Subgradient: sign(current - expected), 0 when equal
    pub fn derivative(current: f64, expected: f64) -> f64 {
        let diff = current - expected;
        if diff > 0.0 { 1.0 } else if diff < 0.0 { -1.0 } else { 0.0 }
    }
}
