//! Constructor table keyed by condition type

use crate::condition::PatchCondition;
use crate::error::{BaffleError, Result};
use crate::potential::{self, CoupledPotentialBoundary};
use math_fvm::{Dictionary, FieldRef, Patch, RegionMesh};
use std::collections::BTreeMap;

/// Builds a condition on a patch from its boundary dictionary
pub type ConditionConstructor =
    for<'m> fn(&'m Patch, FieldRef, &Dictionary) -> Result<Box<dyn PatchCondition<'m> + 'm>>;

fn coupled_potential<'m>(
    patch: &'m Patch,
    field: FieldRef,
    dict: &Dictionary,
) -> Result<Box<dyn PatchCondition<'m> + 'm>> {
    Ok(Box::new(CoupledPotentialBoundary::from_dictionary(
        patch, field, dict,
    )?))
}

/// Table of condition constructors, looked up by the `type` entry
#[derive(Debug, Clone)]
pub struct ConditionTable {
    constructors: BTreeMap<&'static str, ConditionConstructor>,
}

impl Default for ConditionTable {
    fn default() -> Self {
        Self::with_builtin()
    }
}

impl ConditionTable {
    /// Empty table
    pub fn new() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Table with every condition of this crate registered
    pub fn with_builtin() -> Self {
        let mut table = Self::new();
        table.register(potential::TYPE_NAME, coupled_potential);
        table
    }

    /// Register a constructor, returning the one it replaces
    pub fn register(
        &mut self,
        type_name: &'static str,
        constructor: ConditionConstructor,
    ) -> Option<ConditionConstructor> {
        let previous = self.constructors.insert(type_name, constructor);
        if previous.is_some() {
            log::debug!("replaced constructor for '{type_name}'");
        }
        previous
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.constructors.contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }

    /// Build the condition named by the `type` entry of `dict`
    pub fn construct<'m>(
        &self,
        patch: &'m Patch,
        field: FieldRef,
        dict: &Dictionary,
    ) -> Result<Box<dyn PatchCondition<'m> + 'm>> {
        let type_name = dict
            .lookup_word(potential::TYPE_KEY)
            .map_err(|e| BaffleError::configuration(&patch.name, e))?;
        let constructor = self.constructors.get(type_name.as_str()).ok_or_else(|| {
            BaffleError::configuration(
                &patch.name,
                format!(
                    "unknown condition type '{type_name}', known types: {}",
                    self.type_names().collect::<Vec<_>>().join(", ")
                ),
            )
        })?;
        constructor(patch, field, dict)
    }

    /// Build one condition per entry of a `boundaryField` dictionary.
    ///
    /// Each key names a patch of `mesh` and holds that patch's boundary
    /// dictionary. Conditions are returned in key order.
    pub fn construct_boundary<'m>(
        &self,
        mesh: &'m RegionMesh,
        field_name: &str,
        boundary_field: &Dictionary,
    ) -> Result<Vec<Box<dyn PatchCondition<'m> + 'm>>> {
        boundary_field
            .keys()
            .map(|patch_name| {
                let patch = mesh
                    .require_patch(patch_name)
                    .map_err(|e| BaffleError::configuration(patch_name, e))?;
                let dict = boundary_field
                    .sub_dict(patch_name)
                    .map_err(|e| BaffleError::configuration(patch_name, e))?;
                self.construct(patch, FieldRef::new(mesh.name.as_str(), field_name), &dict)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_fvm::mesh::{TOP_PATCH, layered_block};

    #[test]
    fn test_builtin_table() {
        let table = ConditionTable::default();
        assert!(table.contains("potentialCoupledBaffleMixed"));
        assert!(!table.contains("fixedValue"));
        assert_eq!(
            table.type_names().collect::<Vec<_>>(),
            vec!["potentialCoupledBaffleMixed"]
        );
        assert_eq!(ConditionTable::new().type_names().count(), 0);
    }

    #[test]
    fn test_construct_dispatches_on_type() {
        let mesh = layered_block("fluid", 2, 1, 1.0, 1.0).unwrap();
        let patch = mesh.require_patch(TOP_PATCH).unwrap();
        let dict = Dictionary::from_json_str(
            r#"{"type": "potentialCoupledBaffleMixed", "conductivity": 4.0}"#,
        )
        .unwrap();

        let condition = ConditionTable::with_builtin()
            .construct(patch, FieldRef::new("fluid", "V"), &dict)
            .unwrap();
        assert_eq!(condition.type_name(), potential::TYPE_NAME);
        assert_eq!(condition.patch().name, TOP_PATCH);
        assert_eq!(condition.field().to_string(), "fluid/V");
    }

    #[test]
    fn test_missing_or_unknown_type() {
        let mesh = layered_block("fluid", 2, 1, 1.0, 1.0).unwrap();
        let patch = mesh.require_patch(TOP_PATCH).unwrap();
        let table = ConditionTable::with_builtin();

        let dict = Dictionary::from_json_str(r#"{"conductivity": 4.0}"#).unwrap();
        let err = table
            .construct(patch, FieldRef::new("fluid", "V"), &dict)
            .unwrap_err();
        assert!(err.is_configuration_error());

        let dict =
            Dictionary::from_json_str(r#"{"type": "zeroGradient", "conductivity": 4.0}"#).unwrap();
        let err = table
            .construct(patch, FieldRef::new("fluid", "V"), &dict)
            .unwrap_err();
        assert!(err.to_string().contains("zeroGradient"));
        assert!(err.to_string().contains("potentialCoupledBaffleMixed"));
    }

    #[test]
    fn test_register_alias() {
        let mut table = ConditionTable::new();
        assert!(table.register("coupledPotential", coupled_potential).is_none());
        assert!(table.register("coupledPotential", coupled_potential).is_some());

        let mesh = layered_block("fluid", 2, 1, 1.0, 1.0).unwrap();
        let patch = mesh.require_patch(TOP_PATCH).unwrap();
        let dict =
            Dictionary::from_json_str(r#"{"type": "coupledPotential", "conductivity": 1.0}"#)
                .unwrap();

        // The alias builds a condition whose own reader rejects the foreign tag
        let err = table
            .construct(patch, FieldRef::new("fluid", "V"), &dict)
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_construct_boundary() {
        let mesh = layered_block("solid", 3, 2, 1.0, 1.0).unwrap();
        let boundary = Dictionary::from_json_str(
            r#"{
                "bottom": {"type": "potentialCoupledBaffleMixed", "conductivity": 1.0},
                "top": {"type": "potentialCoupledBaffleMixed", "conductivity": 2.0}
            }"#,
        )
        .unwrap();

        let table = ConditionTable::with_builtin();
        let conditions = table.construct_boundary(&mesh, "V", &boundary).unwrap();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].patch().name, "bottom");
        assert_eq!(conditions[1].patch().name, "top");
        assert_eq!(conditions[1].field().region, "solid");

        let bad = Dictionary::from_json_str(
            r#"{"side": {"type": "potentialCoupledBaffleMixed", "conductivity": 1.0}}"#,
        )
        .unwrap();
        let err = table.construct_boundary(&mesh, "V", &bad).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
