use crate::core::record::EnvelopeLayer;
use crate::errors::LookupError;
use indexmap::IndexMap;

/// Name of the structure type that couples to the ground rather than the ambient air.
pub const GROUND_COUPLED_STRUCTURE_TYPE: &str = "base_floor";

/// Heat flow path of a structure: where its exterior side connects to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StructureTopology {
    /// Partition between indoor spaces, assumed uninsulated.
    Internal,
    /// Floor slab coupled to the ground.
    GroundCoupled,
    /// Envelope structure facing the ambient air.
    ExteriorToAir,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StructureType {
    pub name: String,
    pub mapping: EnvelopeLayer,
    pub topology: StructureTopology,
    pub interior_resistance_m2k_w: f64,
    pub exterior_resistance_m2k_w: f64,
    pub linear_thermal_bridge_w_mk: f64,
}

impl StructureType {
    /// Classify a structure type from its reference data.
    ///
    /// Internal structures take precedence over the ground-coupled base floor.
    pub fn new(
        name: &str,
        mapping: EnvelopeLayer,
        is_internal: bool,
        interior_resistance_m2k_w: f64,
        exterior_resistance_m2k_w: f64,
        linear_thermal_bridge_w_mk: f64,
    ) -> Self {
        let topology = if is_internal {
            StructureTopology::Internal
        } else if name == GROUND_COUPLED_STRUCTURE_TYPE {
            StructureTopology::GroundCoupled
        } else {
            StructureTopology::ExteriorToAir
        };

        Self {
            name: name.to_string(),
            mapping,
            topology,
            interior_resistance_m2k_w,
            exterior_resistance_m2k_w,
            linear_thermal_bridge_w_mk,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.topology == StructureTopology::Internal
    }
}

/// Structure types indexed by name, in the order they were loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructureTypes(IndexMap<String, StructureType>);

impl StructureTypes {
    pub fn get(&self, name: &str) -> Result<&StructureType, LookupError> {
        self.0
            .get(name)
            .ok_or_else(|| LookupError::StructureType(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructureType> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<StructureType> for StructureTypes {
    fn from_iter<T: IntoIterator<Item = StructureType>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|structure_type| (structure_type.name.clone(), structure_type))
                .collect(),
        )
    }
}
