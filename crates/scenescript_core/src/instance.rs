//! Instance data: parameters for engine-generated sub-geometry
//!
//! Attaching instance data to a model asks the engine to scatter copies of
//! that model over the surface of a parent model. Two generators exist:
//! random scattering ([`RandomInstances`]) and layered building frames
//! ([`BuildingInstances`], columns with struts between them).

use serde::{Serialize, Deserialize};

use crate::model::ModelKey;
use crate::Transform;

/// Random scattering over the parent's surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomInstances {
    /// Instances per unit of parent surface area
    pub density: f32,
    pub seed: u32,
    pub randomness: f32,
    pub solidity: f32,
    /// Lower bound of the random offset applied to each instance
    pub min_offset: Transform,
    /// Upper bound of the random offset applied to each instance
    pub max_offset: Transform,
}

impl Default for RandomInstances {
    fn default() -> Self {
        Self {
            density: 0.0,
            seed: 0,
            randomness: 1.0,
            solidity: 0.0,
            min_offset: Transform::identity(),
            max_offset: Transform::identity(),
        }
    }
}

/// Layered building frame: columns along the parent's edges joined by struts
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingInstances {
    /// Index of the parent edge columns are aligned to
    pub align_to_edge_idx: u32,
    /// Columns per layer
    pub column_density: u32,
    pub min_column_offset: Transform,
    pub max_column_offset: Transform,
    pub min_strut_offset: Transform,
    pub max_strut_offset: Transform,
    /// `[min, max]` struts between neighbouring columns
    ///
    /// Kept fractional: scripts animate the lower bound smoothly and the
    /// generator rounds when it places struts.
    pub struts_per_column_range: [f32; 2],
    /// 0 = intact frame, 1 = fully scattered
    pub jenga_factor: f32,
    pub seed: u32,
}

impl Default for BuildingInstances {
    fn default() -> Self {
        Self {
            align_to_edge_idx: 0,
            column_density: 0,
            min_column_offset: Transform::identity(),
            max_column_offset: Transform::identity(),
            min_strut_offset: Transform::identity(),
            max_strut_offset: Transform::identity(),
            struts_per_column_range: [0.0, 0.0],
            jenga_factor: 0.0,
            seed: 0,
        }
    }
}

/// Instance data attached to a model
///
/// With no parent the model renders as a single stand-alone instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsInstanceData {
    /// Model whose surface the instances are generated on
    pub parent_object: Option<ModelKey>,
    pub random: RandomInstances,
    pub building: BuildingInstances,
    /// Number of stacked layers
    pub layers: u32,
    /// Vertical distance between layers
    pub layer_separation: f32,
}

impl Default for AsInstanceData {
    fn default() -> Self {
        Self {
            parent_object: None,
            random: RandomInstances::default(),
            building: BuildingInstances::default(),
            layers: 1,
            layer_separation: 0.0,
        }
    }
}

impl AsInstanceData {
    /// Builder: generate on the surface of `parent`
    pub fn with_parent(mut self, parent: ModelKey) -> Self {
        self.parent_object = Some(parent);
        self
    }

    /// Check if this data asks for generated instances
    #[inline]
    pub fn is_instanced(&self) -> bool {
        self.parent_object.is_some()
    }

    /// Reset to a plain stand-alone model
    pub fn make_stand_alone(&mut self) {
        *self = Self::default();
    }
}
