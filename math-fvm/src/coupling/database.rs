//! In-memory region database
//!
//! Holds borrowed region meshes together with the scalar fields and the
//! per-patch conductivities published on each region, and answers neighbour
//! queries for baffle patches.

use super::{CouplingSource, NeighbourPatchData};
use crate::error::{FvmError, Result};
use crate::mesh::{Patch, RegionMesh};
use ndarray::Array1;
use std::collections::BTreeMap;

/// A cell-centred scalar field with its boundary values per patch
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    name: String,
    internal: Array1<f64>,
    boundary: BTreeMap<String, Array1<f64>>,
}

impl ScalarField {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell values
    pub fn internal(&self) -> &Array1<f64> {
        &self.internal
    }

    /// Published face values of a patch
    pub fn boundary(&self, patch: &str) -> Option<&Array1<f64>> {
        self.boundary.get(patch)
    }
}

#[derive(Debug)]
struct Region<'m> {
    mesh: &'m RegionMesh,
    fields: BTreeMap<String, ScalarField>,
    conductivity: BTreeMap<String, Array1<f64>>,
}

impl Region<'_> {
    fn field(&self, name: &str) -> Result<&ScalarField> {
        self.fields.get(name).ok_or_else(|| FvmError::UnknownField {
            region: self.mesh.name.clone(),
            field: name.to_string(),
        })
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut ScalarField> {
        let region = self.mesh.name.clone();
        self.fields
            .get_mut(name)
            .ok_or_else(|| FvmError::UnknownField {
                region,
                field: name.to_string(),
            })
    }
}

/// Fields and material data of every region of a multi-region case.
///
/// The meshes are borrowed: they must outlive the database and every boundary
/// condition attached to their patches.
#[derive(Debug, Default)]
pub struct RegionDatabase<'m> {
    regions: BTreeMap<String, Region<'m>>,
}

impl<'m> RegionDatabase<'m> {
    pub fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    /// Register a region mesh
    pub fn add_region(&mut self, mesh: &'m RegionMesh) -> Result<()> {
        if self.regions.contains_key(&mesh.name) {
            return Err(FvmError::malformed(
                &mesh.name,
                "region is already registered",
            ));
        }
        self.regions.insert(
            mesh.name.clone(),
            Region {
                mesh,
                fields: BTreeMap::new(),
                conductivity: BTreeMap::new(),
            },
        );
        Ok(())
    }

    /// Names of the registered regions, sorted
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    /// Mesh of a region
    pub fn mesh(&self, region: &str) -> Result<&'m RegionMesh> {
        Ok(self.region(region)?.mesh)
    }

    /// Create a field from its cell values. Every patch starts with the
    /// values of its owner cells.
    pub fn add_field(&mut self, region: &str, name: &str, internal: Array1<f64>) -> Result<()> {
        let entry = self.region_mut(region)?;
        let mesh = entry.mesh;
        if internal.len() != mesh.n_cells {
            return Err(FvmError::size_mismatch(
                format!("field '{name}'"),
                mesh.n_cells,
                internal.len(),
            ));
        }
        let boundary = mesh
            .patches
            .iter()
            .map(|p| {
                p.patch_internal_field(&internal)
                    .map(|values| (p.name.clone(), values))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        entry.fields.insert(
            name.to_string(),
            ScalarField {
                name: name.to_string(),
                internal,
                boundary,
            },
        );
        Ok(())
    }

    /// Look up a field
    pub fn field(&self, region: &str, name: &str) -> Result<&ScalarField> {
        self.region(region)?.field(name)
    }

    /// Replace the cell values of a field
    pub fn set_internal(&mut self, region: &str, name: &str, internal: Array1<f64>) -> Result<()> {
        let entry = self.region_mut(region)?;
        let n_cells = entry.mesh.n_cells;
        if internal.len() != n_cells {
            return Err(FvmError::size_mismatch(
                format!("field '{name}'"),
                n_cells,
                internal.len(),
            ));
        }
        entry.field_mut(name)?.internal = internal;
        Ok(())
    }

    /// Publish the evaluated face values of one patch of a field
    pub fn publish_boundary(
        &mut self,
        region: &str,
        field: &str,
        patch: &str,
        values: Array1<f64>,
    ) -> Result<()> {
        let entry = self.region_mut(region)?;
        let size = entry.mesh.require_patch(patch)?.size();
        if values.len() != size {
            return Err(FvmError::size_mismatch(
                format!("boundary values of '{patch}'"),
                size,
                values.len(),
            ));
        }
        entry
            .field_mut(field)?
            .boundary
            .insert(patch.to_string(), values);
        Ok(())
    }

    /// Publish a uniform conductivity on a patch
    pub fn set_patch_conductivity(&mut self, region: &str, patch: &str, sigma: f64) -> Result<()> {
        let size = self.mesh(region)?.require_patch(patch)?.size();
        self.set_patch_conductivity_field(region, patch, Array1::from_elem(size, sigma))
    }

    /// Publish a per-face conductivity on a patch
    pub fn set_patch_conductivity_field(
        &mut self,
        region: &str,
        patch: &str,
        sigma: Array1<f64>,
    ) -> Result<()> {
        if let Some(&bad) = sigma.iter().find(|s| !s.is_finite() || **s < 0.0) {
            return Err(FvmError::InvalidConductivity { value: bad });
        }
        let entry = self.region_mut(region)?;
        let size = entry.mesh.require_patch(patch)?.size();
        if sigma.len() != size {
            return Err(FvmError::size_mismatch(
                format!("conductivity of '{patch}'"),
                size,
                sigma.len(),
            ));
        }
        entry.conductivity.insert(patch.to_string(), sigma);
        Ok(())
    }

    /// Published conductivity of a patch
    pub fn patch_conductivity(&self, region: &str, patch: &str) -> Result<&Array1<f64>> {
        self.region(region)?
            .conductivity
            .get(patch)
            .ok_or_else(|| FvmError::MissingConductivity {
                region: region.to_string(),
                patch: patch.to_string(),
            })
    }

    fn region(&self, region: &str) -> Result<&Region<'m>> {
        self.regions
            .get(region)
            .ok_or_else(|| FvmError::UnknownRegion {
                region: region.to_string(),
            })
    }

    fn region_mut(&mut self, region: &str) -> Result<&mut Region<'m>> {
        self.regions
            .get_mut(region)
            .ok_or_else(|| FvmError::UnknownRegion {
                region: region.to_string(),
            })
    }
}

impl CouplingSource for RegionDatabase<'_> {
    fn neighbour_patch_data(&self, patch: &Patch, field_name: &str) -> Result<NeighbourPatchData> {
        let link = patch.link.as_ref().ok_or_else(|| FvmError::NotCoupled {
            patch: patch.name.clone(),
        })?;

        let region = self.region(&link.region)?;
        let nbr_patch = region.mesh.require_patch(&link.patch)?;
        if nbr_patch.size() != patch.size() {
            return Err(FvmError::size_mismatch(
                format!("neighbour patch '{}/{}'", link.region, link.patch),
                patch.size(),
                nbr_patch.size(),
            ));
        }

        let values = region
            .field(field_name)?
            .boundary(&link.patch)
            .ok_or_else(|| FvmError::UnknownPatch {
                region: link.region.clone(),
                patch: link.patch.clone(),
            })?;
        let conductivity = self.patch_conductivity(&link.region, &link.patch)?;

        Ok(NeighbourPatchData {
            region: link.region.clone(),
            patch: link.patch.clone(),
            values: values.clone(),
            conductivity: conductivity.clone(),
            cell_distances: nbr_patch.cell_distances.clone(),
        })
    }
}
