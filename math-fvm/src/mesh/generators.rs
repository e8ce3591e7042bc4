//! Mesh generators for simple layered regions
//!
//! Provides structured blocks of cells stacked in columns, with a `bottom` and
//! a `top` patch, and a helper to join two patches into a baffle.

use super::types::{Patch, PatchLink, RegionMesh};
use crate::error::{FvmError, Result};
use ndarray::Array1;

/// Name of the patch closing the first layer of a [`layered_block`]
pub const BOTTOM_PATCH: &str = "bottom";
/// Name of the patch closing the last layer of a [`layered_block`]
pub const TOP_PATCH: &str = "top";

/// Generate a block of `columns x layers` cells.
///
/// Cell `c * layers + l` is layer `l` of column `c`. Each column has
/// cross-section `face_area` and total height `thickness`, so every boundary
/// face sits half a layer away from its owner cell centre.
pub fn layered_block(
    name: &str,
    columns: usize,
    layers: usize,
    thickness: f64,
    face_area: f64,
) -> Result<RegionMesh> {
    if columns == 0 || layers == 0 {
        return Err(FvmError::malformed(
            name,
            format!("block needs at least one cell, got {columns} x {layers}"),
        ));
    }
    if !thickness.is_finite() || thickness < 0.0 || !face_area.is_finite() || face_area <= 0.0 {
        return Err(FvmError::malformed(
            name,
            format!("invalid block geometry: thickness {thickness}, face area {face_area}"),
        ));
    }

    let mut mesh = RegionMesh::new(name, columns * layers);
    let half_layer = 0.5 * thickness / layers as f64;

    let bottom_cells: Vec<usize> = (0..columns).map(|c| c * layers).collect();
    let top_cells: Vec<usize> = (0..columns).map(|c| c * layers + layers - 1).collect();

    for (patch_name, cells) in [(BOTTOM_PATCH, bottom_cells), (TOP_PATCH, top_cells)] {
        let patch = Patch::new(
            patch_name,
            0,
            cells,
            Array1::from_elem(columns, face_area),
            Array1::from_elem(columns, half_layer),
        )?;
        mesh.add_patch(patch)?;
    }

    Ok(mesh)
}

/// Link two patches into a baffle, in both directions.
///
/// The patches must have the same number of faces; face `i` of one side is
/// coupled to face `i` of the other.
pub fn link_baffle(
    first: &mut RegionMesh,
    first_patch: &str,
    second: &mut RegionMesh,
    second_patch: &str,
) -> Result<()> {
    let n_first = first.require_patch(first_patch)?.size();
    let n_second = second.require_patch(second_patch)?.size();
    if n_first != n_second {
        return Err(FvmError::size_mismatch(
            format!("baffle '{first_patch}'/'{second_patch}'"),
            n_first,
            n_second,
        ));
    }

    let first_name = first.name.clone();
    let second_name = second.name.clone();
    first.patch_mut(first_patch)?.link = Some(PatchLink::new(second_name, second_patch));
    second.patch_mut(second_patch)?.link = Some(PatchLink::new(first_name, first_patch));

    log::debug!(
        "linked baffle {}/{} <-> {}/{} ({} faces)",
        first.name,
        first_patch,
        second.name,
        second_patch,
        n_first
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_layered_block() {
        let mesh = layered_block("solid", 3, 4, 2.0, 0.5).unwrap();

        // 3 columns x 4 layers
        assert_eq!(mesh.n_cells, 12);
        assert_eq!(mesh.patches.len(), 2);

        let bottom = mesh.patch(BOTTOM_PATCH).unwrap();
        let top = mesh.patch(TOP_PATCH).unwrap();
        assert_eq!(bottom.face_cells, vec![0, 4, 8]);
        assert_eq!(top.face_cells, vec![3, 7, 11]);
        assert_eq!(top.index, 1);

        // Half of a 0.5-thick layer
        for &d in top.cell_distances.iter() {
            assert_relative_eq!(d, 0.25);
        }
        assert_relative_eq!(bottom.total_area(), 1.5);
    }

    #[test]
    fn test_layered_block_rejects_empty() {
        assert!(layered_block("solid", 0, 4, 1.0, 1.0).is_err());
        assert!(layered_block("solid", 2, 2, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_link_baffle() {
        let mut fluid = layered_block("fluid", 3, 2, 1.0, 1.0).unwrap();
        let mut solid = layered_block("solid", 3, 5, 1.0, 1.0).unwrap();

        link_baffle(&mut fluid, TOP_PATCH, &mut solid, BOTTOM_PATCH).unwrap();

        let link = fluid.patch(TOP_PATCH).unwrap().link.clone().unwrap();
        assert_eq!(link, PatchLink::new("solid", BOTTOM_PATCH));
        let back = solid.patch(BOTTOM_PATCH).unwrap().link.clone().unwrap();
        assert_eq!(back, PatchLink::new("fluid", TOP_PATCH));
        assert!(fluid.patch(BOTTOM_PATCH).unwrap().link.is_none());
    }

    #[test]
    fn test_link_baffle_size_mismatch() {
        let mut fluid = layered_block("fluid", 3, 2, 1.0, 1.0).unwrap();
        let mut solid = layered_block("solid", 2, 2, 1.0, 1.0).unwrap();

        let err = link_baffle(&mut fluid, TOP_PATCH, &mut solid, BOTTOM_PATCH).unwrap_err();
        assert!(matches!(err, FvmError::SizeMismatch { expected: 3, got: 2, .. }));
    }
}
