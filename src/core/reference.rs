use crate::core::record::WindowProperties;
use crate::core::structure_type::StructureTypes;
use crate::errors::LookupError;
use indexmap::IndexMap;

// Static reference tables, loaded once and shared read-only for a whole run.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FenestrationProperties {
    pub normal_solar_energy_transmittance: f64,
    pub frame_area_fraction: f64,
}

/// Global ventilation assumptions, applied to every archetype alike.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VentilationProperties {
    pub hru_efficiency: f64,
    pub infiltration_rate_1_h: f64,
    pub ventilation_rate_1_h: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuildingTypeMapping {
    pub category: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapefileMapping {
    pub shapefile_path: String,
    pub raster_weight_path: Option<String>,
    pub notes: Option<String>,
}

pub type FenestrationKey = (String, bool);

#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceData {
    pub structure_types: StructureTypes,
    pub fenestration: IndexMap<FenestrationKey, FenestrationProperties>,
    pub ventilation: VentilationProperties,
    /// Keyed by building type code.
    pub building_type_mappings: IndexMap<String, BuildingTypeMapping>,
    /// Keyed by country code.
    pub shapefile_mappings: IndexMap<String, ShapefileMapping>,
}

impl ReferenceData {
    pub fn fenestration_for(
        &self,
        window: &WindowProperties,
    ) -> Result<&FenestrationProperties, LookupError> {
        self.fenestration
            .get(&(window.glazing_type.clone(), window.coated))
            .ok_or_else(|| LookupError::Fenestration {
                glazing_type: window.glazing_type.clone(),
                coated: window.coated,
            })
    }

    pub fn building_type_mapping(
        &self,
        building_type: &str,
    ) -> Result<&BuildingTypeMapping, LookupError> {
        self.building_type_mappings
            .get(building_type)
            .ok_or_else(|| LookupError::BuildingTypeMapping(building_type.to_string()))
    }

    pub fn shapefile_mapping(&self, location_id: &str) -> Result<&ShapefileMapping, LookupError> {
        self.shapefile_mappings
            .get(location_id)
            .ok_or_else(|| LookupError::ShapefileMapping(location_id.to_string()))
    }
}
