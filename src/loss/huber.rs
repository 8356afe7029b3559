pub struct HuberLoss;

const DELTA: f64 = 1.0;

impl HuberLoss {
    /// h(x) = 0.5·x²  if |x| ≤ δ
    ///        δ·(|x| − 0.5·δ)  otherwise
    /// with x = current − expected
    pub fn value(current: f64, expected: f64) -> f64 {
        let x = current - expected;
        if x.abs() <= DELTA {
            0.5 * x * x
        } else {
            DELTA * (x.abs() - 0.5 * DELTA)
        }
    }

    /// x  if |x| ≤ δ,  else δ·sign(x)
    pub fn derivative(current: f64, expected: f64) -> f64 {
        let x = current - expected;
        if x.abs() <= DELTA { x } else { DELTA * x.signum() }
    }
}
