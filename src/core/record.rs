use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Envelope part whose material fields a structure type draws on.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum EnvelopeLayer {
    Wall,
    Roof,
    Floor,
}

/// A homogeneous material layer of a structure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialLayer {
    pub thickness_m: f64,
    pub density_kg_m3: f64,
    pub specific_heat_capacity_j_kgk: f64,
    pub thermal_conductivity_w_mk: f64,
}

impl MaterialLayer {
    /// Heat capacity per unit area, in J/m2/K
    pub fn areal_heat_capacity(&self) -> f64 {
        self.thickness_m * self.density_kg_m3 * self.specific_heat_capacity_j_kgk
    }

    /// Thermal resistance of the layer, in m2K/W
    pub fn thermal_resistance(&self) -> f64 {
        self.thickness_m / self.thermal_conductivity_w_mk
    }
}

/// Material and insulation fields of one envelope part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeProperties {
    pub design_u_value_w_m2k: f64,
    pub material: MaterialLayer,
    pub insulation: MaterialLayer,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnvelopeLayers {
    pub wall: EnvelopeProperties,
    pub roof: EnvelopeProperties,
    pub floor: EnvelopeProperties,
}

impl EnvelopeLayers {
    pub fn get(&self, layer: EnvelopeLayer) -> &EnvelopeProperties {
        match layer {
            EnvelopeLayer::Wall => &self.wall,
            EnvelopeLayer::Roof => &self.roof,
            EnvelopeLayer::Floor => &self.floor,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowProperties {
    pub glazing_type: String,
    pub coated: bool,
    pub u_value_w_m2k: f64,
}

/// Number of ranked heating systems per record.
pub const HEATING_SYSTEM_SLOTS: usize = 3;

pub const DISTRICT_HEATING: &str = "District";

#[derive(Clone, Debug, PartialEq)]
pub struct HeatingSystem {
    pub fuel_used: Option<String>,
    pub dimensions: Option<String>,
    /// Share of the buildings using this system. NaN when unknown.
    pub prevalency: f64,
    /// Fuel used, or "District" for district heating. None for an unused slot.
    pub heat_source: Option<String>,
}

/// Identifies an archetype: the granularity of weighting and most aggregation.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ArchetypeKey {
    pub building_type: String,
    pub building_period: String,
    pub location_id: String,
}

/// One row of the normalized building stock data: a material combination of an archetype.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub building_code: String,
    pub building_type: String,
    pub location_id: String,
    pub building_period: String,
    pub construction_year_low: i32,
    pub construction_year_high: i32,
    pub number_of_buildings: f64,
    pub average_gross_floor_area_m2_per_building: f64,
    pub envelope: EnvelopeLayers,
    pub window: WindowProperties,
    pub heating_systems: [HeatingSystem; HEATING_SYSTEM_SLOTS],
    pub category: String,
    pub building_stock: String,
    pub building_stock_year: i32,
    pub shapefile_path: String,
    pub raster_weight_path: Option<String>,
    pub location_notes: Option<String>,
    /// Share of the archetype floor area represented by this record, set by weighting.
    pub material_combination_weight: Option<f64>,
}

impl Record {
    pub fn archetype_key(&self) -> ArchetypeKey {
        ArchetypeKey {
            building_type: self.building_type.clone(),
            building_period: self.building_period.clone(),
            location_id: self.location_id.clone(),
        }
    }

    /// The material combination weight, or NaN for a record that has not been weighted.
    pub fn weight(&self) -> f64 {
        self.material_combination_weight.unwrap_or(f64::NAN)
    }
}

pub fn building_period(construction_year_low: i32, construction_year_high: i32) -> String {
    format!("{construction_year_low}-{construction_year_high}")
}

pub fn building_stock_label(tag: &str, year: i32, location_id: &str, category: &str) -> String {
    format!("{tag}_{year}_{location_id}_{category}")
}
