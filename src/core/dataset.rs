use crate::core::aggregation::{
    building_stock_statistics, structure_statistics, ventilation_and_fenestration_statistics,
    BuildingStockStatistics, StructureStatistics, VentilationFenestrationStatistics,
};
use crate::core::dimensions::{
    building_periods, building_stocks, location_ids, structure_types_by_name, BuildingPeriod,
    BuildingStock,
};
use crate::core::record::Record;
use crate::core::reference::ReferenceData;
use crate::core::structure_type::StructureType;
use crate::core::thermal_physics::ThermalPhysics;
use crate::errors::LookupError;
use std::collections::BTreeSet;
use tracing::{info, instrument};

/// Archetype building data in the form consumed by ArchetypeBuildingModel.jl:
/// dimension tables plus the three statistic tables.
#[derive(Clone, Debug, PartialEq)]
pub struct AbmDataset {
    pub building_period: BTreeSet<BuildingPeriod>,
    pub building_stock: BTreeSet<BuildingStock>,
    pub structure_type: Vec<StructureType>,
    pub building_stock_statistics: BuildingStockStatistics,
    pub structure_statistics: StructureStatistics,
    pub ventilation_and_fenestration_statistics: VentilationFenestrationStatistics,
    pub location_id: BTreeSet<String>,
}

impl AbmDataset {
    /// Derive every table from weighted records. Nothing is cached: each call recomputes.
    #[instrument(skip_all)]
    pub fn from_records(
        records: &[Record],
        reference_data: &ReferenceData,
        physics: &ThermalPhysics,
    ) -> Result<Self, LookupError> {
        let dataset = Self {
            building_period: building_periods(records),
            building_stock: building_stocks(records),
            structure_type: structure_types_by_name(&reference_data.structure_types),
            building_stock_statistics: building_stock_statistics(records),
            structure_statistics: structure_statistics(
                records,
                &reference_data.structure_types,
                physics,
            ),
            ventilation_and_fenestration_statistics: ventilation_and_fenestration_statistics(
                records,
                reference_data,
            )?,
            location_id: location_ids(records),
        };

        info!(
            "processed {} records into {} building stock, {} structure and {} ventilation rows",
            records.len(),
            dataset.building_stock_statistics.len(),
            dataset.structure_statistics.len(),
            dataset.ventilation_and_fenestration_statistics.len()
        );

        Ok(dataset)
    }
}
