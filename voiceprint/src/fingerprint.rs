use std::fmt;

use serde::{Deserialize, Serialize};

use crate::VoiceprintError;

/// Number of cepstral coefficients in every fingerprint.
pub const DIMENSION: usize = 13;

/// A reciter's timbral fingerprint: the per-coefficient mean of the
/// clip's MFCC frames.
///
/// The dimensionality is fixed at [`DIMENSION`] by the type, so every
/// fingerprint in the system lives in the same distance space. Serialized
/// as a plain JSON array of numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint([f32; DIMENSION]);

impl Fingerprint {
    pub fn new(values: [f32; DIMENSION]) -> Self {
        Self(values)
    }

    /// Builds a fingerprint from a slice, checking its length.
    pub fn from_slice(values: &[f32]) -> Result<Self, VoiceprintError> {
        let arr: [f32; DIMENSION] =
            values
                .try_into()
                .map_err(|_| VoiceprintError::DimensionMismatch {
                    expected: DIMENSION,
                    got: values.len(),
                })?;
        Ok(Self(arr))
    }

    /// One-hot fingerprint with `1.0` at `axis`.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= DIMENSION`.
    pub fn unit(axis: usize) -> Self {
        let mut v = [0.0; DIMENSION];
        v[axis] = 1.0;
        Self(v)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl TryFrom<Vec<f32>> for Fingerprint {
    type Error = VoiceprintError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl AsRef<[f32]> for Fingerprint {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v:.3}")?;
        }
        write!(f, "]")
    }
}
