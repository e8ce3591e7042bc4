//! Region meshes and boundary patches
//!
//! A region is a separately meshed part of a multi-region case. The solver
//! only ever sees its boundary through [`Patch`]: per-face owner cells, face
//! areas and face-to-cell distances, plus an optional link to the patch on the
//! other side of a baffle.

use crate::error::{FvmError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Smallest face-to-cell distance used when forming delta coefficients.
pub const MIN_CELL_DISTANCE: f64 = 1e-12;

/// Identifies the patch on the other side of a baffle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatchLink {
    /// Name of the neighbouring region
    pub region: String,
    /// Name of the patch on the neighbouring region
    pub patch: String,
}

impl PatchLink {
    pub fn new(region: impl Into<String>, patch: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            patch: patch.into(),
        }
    }
}

/// A named set of boundary faces of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// Patch name, unique within the region
    pub name: String,
    /// Position of the patch in the region's patch list
    pub index: usize,
    /// Owner cell of each face
    pub face_cells: Vec<usize>,
    /// Face areas
    pub face_areas: Array1<f64>,
    /// Distance from each face centre to its owner cell centre, along the normal
    pub cell_distances: Array1<f64>,
    /// Coupled patch on the neighbouring region, if this patch is a baffle
    pub link: Option<PatchLink>,
}

impl Patch {
    /// Create a patch, checking that every per-face array has the same length
    pub fn new(
        name: impl Into<String>,
        index: usize,
        face_cells: Vec<usize>,
        face_areas: Array1<f64>,
        cell_distances: Array1<f64>,
    ) -> Result<Self> {
        let n = face_cells.len();
        if face_areas.len() != n {
            return Err(FvmError::size_mismatch("face areas", n, face_areas.len()));
        }
        if cell_distances.len() != n {
            return Err(FvmError::size_mismatch(
                "cell distances",
                n,
                cell_distances.len(),
            ));
        }
        Ok(Self {
            name: name.into(),
            index,
            face_cells,
            face_areas,
            cell_distances,
            link: None,
        })
    }

    /// Attach the baffle link
    pub fn with_link(mut self, link: PatchLink) -> Self {
        self.link = Some(link);
        self
    }

    /// Number of faces
    pub fn size(&self) -> usize {
        self.face_cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.face_cells.is_empty()
    }

    /// Inverse face-to-cell distances, with the distance floored at
    /// [`MIN_CELL_DISTANCE`]
    pub fn delta_coeffs(&self) -> Array1<f64> {
        self.cell_distances
            .mapv(|d| 1.0 / d.max(MIN_CELL_DISTANCE))
    }

    /// Gather the owner-cell values of an internal field onto the patch faces
    pub fn patch_internal_field(&self, internal: &Array1<f64>) -> Result<Array1<f64>> {
        let n_cells = internal.len();
        let mut values = Array1::zeros(self.size());
        for (face, &cell) in self.face_cells.iter().enumerate() {
            if cell >= n_cells {
                return Err(FvmError::CellOutOfRange {
                    face,
                    cell,
                    n_cells,
                });
            }
            values[face] = internal[cell];
        }
        Ok(values)
    }

    /// Total patch area
    pub fn total_area(&self) -> f64 {
        self.face_areas.sum()
    }
}

/// Mesh of a single region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMesh {
    /// Region name, unique within the case
    pub name: String,
    /// Number of cells
    pub n_cells: usize,
    /// Boundary patches
    pub patches: Vec<Patch>,
}

impl RegionMesh {
    pub fn new(name: impl Into<String>, n_cells: usize) -> Self {
        Self {
            name: name.into(),
            n_cells,
            patches: Vec::new(),
        }
    }

    /// Append a patch, renumbering its index to its position.
    ///
    /// Returns the patch index.
    pub fn add_patch(&mut self, mut patch: Patch) -> Result<usize> {
        if self.patches.iter().any(|p| p.name == patch.name) {
            return Err(FvmError::malformed(
                &patch.name,
                format!("duplicate patch on region '{}'", self.name),
            ));
        }
        if let Some((face, &cell)) = patch
            .face_cells
            .iter()
            .enumerate()
            .find(|&(_, &cell)| cell >= self.n_cells)
        {
            return Err(FvmError::CellOutOfRange {
                face,
                cell,
                n_cells: self.n_cells,
            });
        }
        patch.index = self.patches.len();
        self.patches.push(patch);
        Ok(self.patches.len() - 1)
    }

    /// Find a patch by name
    pub fn patch(&self, name: &str) -> Option<&Patch> {
        self.patches.iter().find(|p| p.name == name)
    }

    /// Find a patch by name, reporting the region on failure
    pub fn require_patch(&self, name: &str) -> Result<&Patch> {
        self.patch(name).ok_or_else(|| FvmError::UnknownPatch {
            region: self.name.clone(),
            patch: name.to_string(),
        })
    }

    pub(crate) fn patch_mut(&mut self, name: &str) -> Result<&mut Patch> {
        let region = self.name.clone();
        self.patches
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| FvmError::UnknownPatch {
                region,
                patch: name.to_string(),
            })
    }

    /// Total number of boundary faces
    pub fn num_boundary_faces(&self) -> usize {
        self.patches.iter().map(Patch::size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn three_face_patch() -> Patch {
        Patch::new(
            "top",
            0,
            vec![0, 1, 2],
            array![1.0, 1.0, 2.0],
            array![0.5, 0.25, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn test_patch_size_check() {
        let err = Patch::new("top", 0, vec![0, 1], array![1.0], array![0.5, 0.5]).unwrap_err();
        assert!(matches!(err, FvmError::SizeMismatch { expected: 2, got: 1, .. }));
    }

    #[test]
    fn test_delta_coeffs_floor_zero_distance() {
        let patch = three_face_patch();
        let dc = patch.delta_coeffs();
        assert_relative_eq!(dc[0], 2.0);
        assert_relative_eq!(dc[1], 4.0);
        assert!(dc[2].is_finite());
        assert_relative_eq!(dc[2], 1.0 / MIN_CELL_DISTANCE);
    }

    #[test]
    fn test_patch_internal_field() {
        let patch = three_face_patch();
        let internal = array![5.0, 6.0, 7.0, 8.0];
        let values = patch.patch_internal_field(&internal).unwrap();
        assert_eq!(values, array![5.0, 6.0, 7.0]);

        let short = array![1.0, 2.0];
        let err = patch.patch_internal_field(&short).unwrap_err();
        assert!(matches!(err, FvmError::CellOutOfRange { face: 2, cell: 2, n_cells: 2 }));
    }

    #[test]
    fn test_region_patches() {
        let mut mesh = RegionMesh::new("fluid", 3);
        let mut p = three_face_patch();
        p.index = 7;
        assert_eq!(mesh.add_patch(p.clone()).unwrap(), 0);
        assert_eq!(mesh.patch("top").unwrap().index, 0);
        assert!(mesh.add_patch(p).is_err());
        assert!(matches!(
            mesh.require_patch("bottom"),
            Err(FvmError::UnknownPatch { .. })
        ));
        assert_eq!(mesh.num_boundary_faces(), 3);
        assert_relative_eq!(mesh.patches[0].total_area(), 4.0);
    }

    #[test]
    fn test_add_patch_rejects_foreign_cells() {
        let mut mesh = RegionMesh::new("fluid", 2);
        let err = mesh.add_patch(three_face_patch()).unwrap_err();
        assert!(matches!(err, FvmError::CellOutOfRange { cell: 2, .. }));
    }
}
