//! Face-to-face mapping of per-face patch data
//!
//! When a patch is resized or remeshed, every per-face array of its boundary
//! condition has to be carried over to the new faces. A [`FieldMapper`]
//! describes how.

use crate::error::{FvmError, Result};
use ndarray::Array1;

/// Maps per-face values of an old patch onto the faces of a new one
pub trait FieldMapper {
    /// Number of faces of the target patch
    fn size(&self) -> usize;

    /// Map a per-face field of the source patch onto the target faces
    fn map(&self, source: &Array1<f64>) -> Result<Array1<f64>>;
}

/// Each target face copies exactly one source face
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectMapper {
    addressing: Vec<usize>,
}

impl DirectMapper {
    /// `addressing[i]` is the source face copied into target face `i`
    pub fn new(addressing: Vec<usize>) -> Self {
        Self { addressing }
    }

    /// Face `i` maps to face `i`
    pub fn identity(size: usize) -> Self {
        Self::new((0..size).collect())
    }

    pub fn addressing(&self) -> &[usize] {
        &self.addressing
    }
}

impl FieldMapper for DirectMapper {
    fn size(&self) -> usize {
        self.addressing.len()
    }

    fn map(&self, source: &Array1<f64>) -> Result<Array1<f64>> {
        self.addressing
            .iter()
            .enumerate()
            .map(|(face, &from)| {
                source.get(from).copied().ok_or_else(|| {
                    FvmError::malformed(
                        "addressing",
                        format!(
                            "face {face} maps from face {from}, source has {} faces",
                            source.len()
                        ),
                    )
                })
            })
            .collect::<Result<Vec<f64>>>()
            .map(Array1::from)
    }
}

/// Each target face is a weighted average of several source faces
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedMapper {
    addressing: Vec<Vec<usize>>,
    weights: Vec<Vec<f64>>,
}

impl WeightedMapper {
    /// `addressing[i]` and `weights[i]` list the contributing source faces of
    /// target face `i` and their weights
    pub fn new(addressing: Vec<Vec<usize>>, weights: Vec<Vec<f64>>) -> Result<Self> {
        if addressing.len() != weights.len() {
            return Err(FvmError::size_mismatch(
                "mapper weights",
                addressing.len(),
                weights.len(),
            ));
        }
        for (face, (addr, w)) in addressing.iter().zip(&weights).enumerate() {
            if addr.len() != w.len() {
                return Err(FvmError::size_mismatch(
                    format!("mapper weights of face {face}"),
                    addr.len(),
                    w.len(),
                ));
            }
        }
        Ok(Self { addressing, weights })
    }
}

impl FieldMapper for WeightedMapper {
    fn size(&self) -> usize {
        self.addressing.len()
    }

    fn map(&self, source: &Array1<f64>) -> Result<Array1<f64>> {
        let mut mapped = Array1::zeros(self.size());
        for (face, (addr, weights)) in self.addressing.iter().zip(&self.weights).enumerate() {
            let mut sum = 0.0;
            for (&from, &w) in addr.iter().zip(weights) {
                let v = source.get(from).ok_or_else(|| {
                    FvmError::malformed(
                        "addressing",
                        format!(
                            "face {face} maps from face {from}, source has {} faces",
                            source.len()
                        ),
                    )
                })?;
                sum += w * v;
            }
            mapped[face] = sum;
        }
        Ok(mapped)
    }
}
