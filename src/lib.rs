pub mod core;
pub mod errors;
pub mod export;
pub mod input;
pub mod output;

#[cfg(test)]
mod tests;

use crate::core::dataset::AbmDataset;
use crate::core::extrapolation::extend_with_extrapolation;
use crate::core::normalizer::{normalize, RawEnvelopeRecord, RawHeatingSystemRecord};
use crate::core::record::Record;
use crate::core::reference::ReferenceData;
use crate::core::thermal_physics::ThermalPhysics;
use crate::core::weighting::assign_material_combination_weights;
use crate::errors::{AbmError, ConsistencyError};
use crate::export::{create_datapackage, export_csvs};
use crate::input::{read_raw_building_stock, read_reference_data, ProjectConfig};
use crate::output::Output;
use bitflags::bitflags;
use tracing::{info, instrument};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct ProjectFlags: u32 {
        /// Ignore the extrapolation block of the configuration.
        const SKIP_EXTRAPOLATION = 0b1;
        /// Export the CSV tables without a `datapackage.json` manifest.
        const SKIP_DATAPACKAGE = 0b10;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunResults {
    /// Weighted records the dataset was derived from, synthetic records included.
    pub records: Vec<Record>,
    pub dataset: AbmDataset,
    pub inconsistencies: Vec<ConsistencyError>,
}

/// Normalize, weight and optionally extrapolate the raw building stock, then aggregate it.
///
/// Extrapolated records join the weighting, so weights are computed once more after
/// extrapolation.
#[instrument(skip_all)]
pub fn process_building_stock(
    envelope_records: &[RawEnvelopeRecord],
    heating_system_records: &[RawHeatingSystemRecord],
    reference_data: &ReferenceData,
    config: &ProjectConfig,
    flags: &ProjectFlags,
) -> Result<RunResults, AbmError> {
    let normalized = normalize(
        envelope_records,
        heating_system_records,
        reference_data,
        &config.dataset_name,
        config.building_stock_year,
    )?;
    let mut records = assign_material_combination_weights(normalized.records);

    if let Some(extrapolation) = config.extrapolation.as_ref() {
        if flags.contains(ProjectFlags::SKIP_EXTRAPOLATION) {
            info!("skipping extrapolation");
        } else {
            records = assign_material_combination_weights(extend_with_extrapolation(
                records,
                &extrapolation.mappings,
                &extrapolation.tag,
                extrapolation.year,
                reference_data,
            )?);
        }
    }

    let physics = ThermalPhysics::new(config.interior_node_depth, config.period_of_variations);
    let dataset = AbmDataset::from_records(&records, reference_data, &physics)?;

    Ok(RunResults {
        records,
        dataset,
        inconsistencies: normalized.inconsistencies,
    })
}

/// Run the whole processing: read the configured inputs, process them and export the dataset.
pub fn run_project(
    config: &ProjectConfig,
    output: impl Output,
    flags: &ProjectFlags,
) -> anyhow::Result<RunResults> {
    let reference_data = read_reference_data(config)?;
    let (envelope_records, heating_system_records) = read_raw_building_stock(config)?;
    info!(
        "read {} building envelope rows and {} heating system rows",
        envelope_records.len(),
        heating_system_records.len()
    );

    let results = process_building_stock(
        &envelope_records,
        &heating_system_records,
        &reference_data,
        config,
        flags,
    )?;
    if !results.inconsistencies.is_empty() {
        info!(
            "{} buildings had heating system prevalencies that could not be normalized",
            results.inconsistencies.len()
        );
    }

    export_csvs(&results.dataset, &output)?;
    if !flags.contains(ProjectFlags::SKIP_DATAPACKAGE) {
        create_datapackage(&output)?;
    }

    Ok(results)
}
