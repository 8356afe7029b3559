use crate::error::{NetError, Result};
use crate::network::network::Network;

/// Per-boundary quantization scales.
///
/// Boundary 0 covers the input weights and the first layer's biases;
/// boundary `i + 1` covers layer `i`'s outgoing weights and layer `i + 1`'s
/// biases. Each boundary `b` with `q` levels gets the scale
/// `s = 2 * max_abs / q`, so the stored range `[-q/2, q/2 - 1]` spans the
/// boundary's magnitude. A boundary whose parameters are all zero uses 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleTable {
    scales: Vec<f64>,
    levels: Vec<u32>,
}

impl ScaleTable {
    /// Derives the scales from `network`'s current parameters.
    ///
    /// Saving and loading both go through here so the two sides can never
    /// disagree on a scale.
    pub fn derive(network: &Network, levels: &[u32]) -> Result<ScaleTable> {
        if levels.len() != network.boundary_count() {
            return Err(NetError::config(format!(
                "{} quantization levels given for {} layer boundaries",
                levels.len(),
                network.boundary_count()
            )));
        }
        if levels.iter().any(|&q| q < 2) {
            return Err(NetError::config("quantization levels must be at least 2"));
        }

        let mut max_abs = vec![0.0f64; levels.len()];
        network.for_each_parameter(|boundary, value| {
            max_abs[boundary] = max_abs[boundary].max(value.abs());
        });

        let scales = max_abs.iter().zip(levels)
            .map(|(&magnitude, &q)| if magnitude == 0.0 { 1.0 } else { 2.0 * magnitude / q as f64 })
            .collect();

        Ok(ScaleTable { scales, levels: levels.to_vec() })
    }

    pub fn scale(&self, boundary: usize) -> f64 {
        self.scales[boundary]
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn quantize(&self, boundary: usize, value: f64) -> i32 {
        let half = (self.levels[boundary] / 2) as f64;
        (value / self.scales[boundary]).round().clamp(-half, half - 1.0) as i32
    }

    pub fn dequantize(&self, boundary: usize, stored: i32) -> f64 {
        stored as f64 * self.scales[boundary]
    }
}
