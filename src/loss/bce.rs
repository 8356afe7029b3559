pub struct BceLoss;

const EPS: f64 = 1e-12;

impl BceLoss {
    /// -(y·log(p+ε) + (1-y)·log(1-p+ε))
    pub fn value(current: f64, expected: f64) -> f64 {
        let (p, y) = (current, expected);
        -(y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln())
    }

    /// (p - y) / ((p + ε) · (1 - p + ε))
    pub fn derivative(current: f64, expected: f64) -> f64 {
        let (p, y) = (current, expected);
        (p - y) / ((p + EPS) * (1.0 - p + EPS))
    }
}
