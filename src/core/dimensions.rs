use crate::core::record::Record;
use crate::core::structure_type::{StructureType, StructureTypes};
use itertools::Itertools;
use std::collections::BTreeSet;

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct BuildingPeriod {
    pub building_period: String,
    pub period_start: i32,
    pub period_end: i32,
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct BuildingStock {
    pub building_stock: String,
    pub building_stock_year: i32,
    pub shapefile_path: String,
    pub raster_weight_path: Option<String>,
    pub notes: Option<String>,
}

pub fn building_periods(records: &[Record]) -> BTreeSet<BuildingPeriod> {
    records
        .iter()
        .map(|record| BuildingPeriod {
            building_period: record.building_period.clone(),
            period_start: record.construction_year_low,
            period_end: record.construction_year_high,
        })
        .collect()
}

pub fn building_stocks(records: &[Record]) -> BTreeSet<BuildingStock> {
    records
        .iter()
        .map(|record| BuildingStock {
            building_stock: record.building_stock.clone(),
            building_stock_year: record.building_stock_year,
            shapefile_path: record.shapefile_path.clone(),
            raster_weight_path: record.raster_weight_path.clone(),
            notes: record.location_notes.clone(),
        })
        .collect()
}

/// Structure types sorted by name.
pub fn structure_types_by_name(structure_types: &StructureTypes) -> Vec<StructureType> {
    structure_types
        .iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .cloned()
        .collect()
}

pub fn location_ids(records: &[Record]) -> BTreeSet<String> {
    records
        .iter()
        .map(|record| record.location_id.clone())
        .collect()
}
