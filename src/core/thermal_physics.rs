use crate::core::record::EnvelopeProperties;
use crate::core::structure_type::{StructureTopology, StructureType};
use crate::core::units::{DEFAULT_INTERIOR_NODE_DEPTH, DEFAULT_PERIOD_OF_VARIATIONS};
use std::f64::consts::PI;

/// U-values of a structure split by heat flow path, in W/m2/K.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UValues {
    pub exterior_to_ambient_air: f64,
    pub exterior_to_ground: f64,
    pub interior: f64,
    pub total: f64,
}

/// Lumped thermal parameters of building structures.
///
/// Each structure is reduced to a single thermal mass node at `interior_node_depth`,
/// connected to the indoor air on one side and to the ambient air, the ground, or
/// (for internal structures) back to the indoor air on the other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalPhysics {
    /// Depth of the thermal mass node, as a fraction of the resistance from the indoor
    /// surface to the middle of the insulation.
    interior_node_depth: f64,
    /// Period of variations in seconds, for the effective thickness method.
    period_of_variations: f64,
}

impl Default for ThermalPhysics {
    fn default() -> Self {
        Self::new(DEFAULT_INTERIOR_NODE_DEPTH, DEFAULT_PERIOD_OF_VARIATIONS)
    }
}

impl ThermalPhysics {
    pub fn new(interior_node_depth: f64, period_of_variations: f64) -> Self {
        Self {
            interior_node_depth,
            period_of_variations,
        }
    }

    pub fn interior_node_depth(&self) -> f64 {
        self.interior_node_depth
    }

    pub fn period_of_variations(&self) -> f64 {
        self.period_of_variations
    }

    /// Effective thermal mass of a structure in J/m2/K,
    /// according to EN ISO 13786:2017 Annex C.2.4 (effective thickness method).
    ///
    /// Half of the insulation layer counts towards the heat capacity, except for internal
    /// structures which are assumed uninsulated.
    pub fn effective_thermal_mass(
        &self,
        structure_type: &StructureType,
        properties: &EnvelopeProperties,
    ) -> f64 {
        let mut shc = properties.material.areal_heat_capacity();
        if !structure_type.is_internal() {
            shc += 0.5 * properties.insulation.areal_heat_capacity();
        }

        let angular_frequency = 2. * PI / self.period_of_variations;
        (shc.powi(2)
            / (1.
                + angular_frequency.powi(2)
                    * shc.powi(2)
                    * structure_type.interior_resistance_m2k_w.powi(2)))
        .sqrt()
    }

    /// U-values of a structure for its heat flow topology.
    ///
    /// Ground-coupled heat losses are based on Kissock, K., "Simplified Model for Ground
    /// Heat Transfer from Slab-on-Grade Buildings", ASHRAE 2013.
    /// Zero conductivities produce non-finite values rather than errors.
    pub fn u_values(
        &self,
        structure_type: &StructureType,
        properties: &EnvelopeProperties,
    ) -> UValues {
        let material_resistance = properties.material.thermal_resistance();
        let insulation_resistance = properties.insulation.thermal_resistance();
        let r_si = structure_type.interior_resistance_m2k_w;
        let r_se = structure_type.exterior_resistance_m2k_w;

        match structure_type.topology {
            StructureTopology::Internal => {
                let interior_r = self.interior_node_depth * 0.5 * material_resistance + r_si;
                let exterior_r =
                    (2. - self.interior_node_depth) * 0.5 * material_resistance + r_se;
                UValues {
                    exterior_to_ambient_air: 1. / exterior_r,
                    exterior_to_ground: 0.,
                    interior: 1. / interior_r,
                    total: 1. / (exterior_r + interior_r),
                }
            }
            StructureTopology::GroundCoupled => {
                let interior_r = self.interior_resistance(
                    material_resistance,
                    insulation_resistance,
                    r_si,
                );
                let floor_r = material_resistance + insulation_resistance + r_si;
                let ground_r = ground_resistance(floor_r) - interior_r;
                UValues {
                    exterior_to_ambient_air: 0.,
                    exterior_to_ground: 1. / ground_r,
                    interior: 1. / interior_r,
                    total: 1. / (interior_r + ground_r),
                }
            }
            StructureTopology::ExteriorToAir => {
                let interior_r = self.interior_resistance(
                    material_resistance,
                    insulation_resistance,
                    r_si,
                );
                let exterior_r =
                    material_resistance + insulation_resistance + r_si + r_se - interior_r;
                UValues {
                    exterior_to_ambient_air: 1. / exterior_r,
                    exterior_to_ground: 0.,
                    interior: 1. / interior_r,
                    total: 1. / (exterior_r + interior_r),
                }
            }
        }
    }

    /// Resistance from the indoor air to the thermal mass node of an insulated structure.
    fn interior_resistance(
        &self,
        material_resistance: f64,
        insulation_resistance: f64,
        r_si: f64,
    ) -> f64 {
        self.interior_node_depth * (material_resistance + 0.5 * insulation_resistance) + r_si
    }
}

/// Resistance from the indoor air to the ground through a slab with resistance `floor_r`,
/// as two parallel empirical conductances.
pub fn ground_resistance(floor_r: f64) -> f64 {
    1. / (0.114 / (0.7044 + floor_r) + 0.8768 / (2.818 + floor_r))
}
