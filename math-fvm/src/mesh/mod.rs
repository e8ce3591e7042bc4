//! Region meshes, boundary patches and generators
//!
//! This module provides the geometric side of a multi-region case: each region
//! owns its cells and patches, and baffle patches name their coupled partner.

mod generators;
mod types;

pub use generators::*;
pub use types::*;
