//! Orthonormal DCT-II.

use std::f64::consts::PI;

/// Precomputed orthonormal DCT-II basis truncated to the first
/// `num_coeffs` outputs.
pub struct Dct {
    input_len: usize,
    basis: Vec<Vec<f64>>,
}

impl Dct {
    pub fn new(input_len: usize, num_coeffs: usize) -> Self {
        let n = input_len as f64;
        let basis = (0..num_coeffs)
            .map(|k| {
                let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
                (0..input_len)
                    .map(|i| scale * (PI * k as f64 * (2 * i + 1) as f64 / (2.0 * n)).cos())
                    .collect()
            })
            .collect();
        Self { input_len, basis }
    }

    /// Transforms `input` (length `input_len`) into `num_coeffs` values.
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        assert_eq!(input.len(), self.input_len, "dct input length");
        self.basis
            .iter()
            .map(|row| row.iter().zip(input).map(|(b, x)| b * x).sum())
            .collect()
    }
}
