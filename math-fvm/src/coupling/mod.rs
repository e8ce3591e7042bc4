//! Region-to-region coupling
//!
//! A baffle patch sees the other side of the interface only through a
//! [`CouplingSource`]: given the local patch and a field name, it returns the
//! neighbour's face values, conductivity and face-to-cell distances, ordered
//! like the local faces.

mod database;

pub use database::*;

use crate::error::Result;
use crate::mesh::Patch;
use ndarray::Array1;

/// Neighbour-side data of a coupled patch, one entry per local face
#[derive(Debug, Clone, PartialEq)]
pub struct NeighbourPatchData {
    /// Region on the other side of the baffle
    pub region: String,
    /// Patch on the other side of the baffle
    pub patch: String,
    /// Neighbour field values on the coupled faces
    pub values: Array1<f64>,
    /// Neighbour conductivity on the coupled faces
    pub conductivity: Array1<f64>,
    /// Neighbour face-to-cell distances
    pub cell_distances: Array1<f64>,
}

impl NeighbourPatchData {
    pub fn size(&self) -> usize {
        self.values.len()
    }
}

/// Supplies neighbour-side data for baffle patches.
///
/// Reads are blocking. Whether the values come from the current or the
/// previous iteration is up to the implementation.
pub trait CouplingSource {
    /// Data of the patch coupled to `patch`, for the neighbour field `field_name`
    fn neighbour_patch_data(&self, patch: &Patch, field_name: &str) -> Result<NeighbourPatchData>;
}
