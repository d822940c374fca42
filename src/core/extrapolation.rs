use crate::core::record::{building_stock_label, Record};
use crate::core::reference::ReferenceData;
use crate::errors::LookupError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtrapolationTarget {
    pub location_id: String,
    /// Multiplier applied to `number_of_buildings` of the cloned records.
    pub scaling_coefficient: f64,
}

/// Source location -> the location to synthesise from it.
pub type ExtrapolationMappings = IndexMap<String, ExtrapolationTarget>;

/// Clone the records of existing locations into synthetic records for new locations.
///
/// Only the number of buildings is scaled; building physics is assumed to carry over
/// unchanged. Returns the synthetic records alone, unweighted. A source location with no
/// records yields nothing.
#[instrument(skip(records, mappings, reference_data))]
pub fn extrapolate(
    records: &[Record],
    mappings: &ExtrapolationMappings,
    tag: &str,
    year: i32,
    reference_data: &ReferenceData,
) -> Result<Vec<Record>, LookupError> {
    let mut synthetic = vec![];

    for (source, target) in mappings {
        let sources = records
            .iter()
            .filter(|record| &record.location_id == source)
            .collect::<Vec<_>>();
        if sources.is_empty() {
            info!("no records to extrapolate from {source}");
            continue;
        }

        let shapefile = reference_data.shapefile_mapping(&target.location_id)?;
        let cloned = sources
            .into_iter()
            .map(|record| Record {
                building_code: record.building_code.replace(source.as_str(), &target.location_id),
                location_id: target.location_id.clone(),
                number_of_buildings: record.number_of_buildings * target.scaling_coefficient,
                building_stock: building_stock_label(
                    tag,
                    year,
                    &target.location_id,
                    &record.category,
                ),
                building_stock_year: year,
                shapefile_path: shapefile.shapefile_path.clone(),
                raster_weight_path: shapefile.raster_weight_path.clone(),
                location_notes: shapefile.notes.clone(),
                material_combination_weight: None,
                ..record.clone()
            })
            .collect::<Vec<_>>();

        info!(
            "extrapolated {} records from {source} to {} (scaling {})",
            cloned.len(),
            target.location_id,
            target.scaling_coefficient
        );
        synthetic.extend(cloned);
    }

    Ok(synthetic)
}

/// The existing records followed by the synthetic records of every mapping.
///
/// The result is unweighted and needs a fresh weighting pass.
pub fn extend_with_extrapolation(
    records: Vec<Record>,
    mappings: &ExtrapolationMappings,
    tag: &str,
    year: i32,
    reference_data: &ReferenceData,
) -> Result<Vec<Record>, LookupError> {
    let synthetic = extrapolate(&records, mappings, tag, year, reference_data)?;
    Ok(records
        .into_iter()
        .map(|record| Record {
            material_combination_weight: None,
            ..record
        })
        .chain(synthetic)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::tests::record;
    use crate::core::reference::tests::reference_data;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn records() -> Vec<Record> {
        vec![
            record("AT.SFH.01.Gen", "AT", 100., Some(0.25)),
            record("AT.SFH.02.Gen", "AT", 300., Some(0.75)),
            record("DE.SFH.01.Gen", "DE", 150., Some(1.)),
        ]
    }

    fn mappings(source: &str, target: &str, scaling_coefficient: f64) -> ExtrapolationMappings {
        IndexMap::from([(
            source.to_string(),
            ExtrapolationTarget {
                location_id: target.to_string(),
                scaling_coefficient,
            },
        )])
    }

    #[rstest]
    fn should_clone_and_scale_source_location(records: Vec<Record>, reference_data: ReferenceData) {
        let synthetic = extrapolate(
            &records,
            &mappings("AT", "NO", 0.6),
            "Synthetic",
            2020,
            &reference_data,
        )
        .unwrap();

        assert_eq!(synthetic.len(), 2);
        for (clone, original) in synthetic.iter().zip(&records) {
            assert_eq!(clone.location_id, "NO");
            assert_relative_eq!(
                clone.number_of_buildings,
                original.number_of_buildings * 0.6,
                max_relative = 1e-12
            );
            assert_eq!(clone.envelope, original.envelope);
            assert_eq!(clone.window, original.window);
            assert_eq!(clone.heating_systems, original.heating_systems);
            assert_eq!(
                clone.average_gross_floor_area_m2_per_building,
                original.average_gross_floor_area_m2_per_building
            );
            assert_eq!(clone.building_period, original.building_period);
        }
        assert_eq!(synthetic[0].building_code, "NO.SFH.01.Gen");
        assert_eq!(synthetic[0].building_stock, "Synthetic_2020_NO_residential");
        assert_eq!(synthetic[0].building_stock_year, 2020);
        assert_eq!(synthetic[0].shapefile_path, "shapefiles/NO.shp");
        assert_eq!(synthetic[0].material_combination_weight, None);
    }

    #[rstest]
    fn should_yield_nothing_for_source_without_records(
        records: Vec<Record>,
        reference_data: ReferenceData,
    ) {
        let synthetic = extrapolate(
            &records,
            &mappings("FR", "NO", 2.),
            "Synthetic",
            2016,
            &reference_data,
        )
        .unwrap();
        assert!(synthetic.is_empty());
    }

    #[rstest]
    fn should_not_look_up_target_of_source_without_records(
        records: Vec<Record>,
        reference_data: ReferenceData,
    ) {
        assert_eq!(
            extrapolate(
                &records,
                &mappings("FR", "IS", 1.),
                "Synthetic",
                2016,
                &reference_data
            ),
            Ok(vec![])
        );
    }

    #[rstest]
    fn should_fail_for_unmapped_target(records: Vec<Record>, reference_data: ReferenceData) {
        assert_eq!(
            extrapolate(
                &records,
                &mappings("AT", "IS", 0.1),
                "Synthetic",
                2016,
                &reference_data
            ),
            Err(LookupError::ShapefileMapping("IS".to_string()))
        );
    }

    #[rstest]
    fn should_append_synthetic_records_after_originals(
        records: Vec<Record>,
        reference_data: ReferenceData,
    ) {
        let extended = extend_with_extrapolation(
            records,
            &mappings("DE", "NO", 0.5),
            "Synthetic",
            2016,
            &reference_data,
        )
        .unwrap();

        let codes = extended
            .iter()
            .map(|record| record.building_code.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            codes,
            vec!["AT.SFH.01.Gen", "AT.SFH.02.Gen", "DE.SFH.01.Gen", "NO.SFH.01.Gen"]
        );
        assert!(extended
            .iter()
            .all(|record| record.material_combination_weight.is_none()));
    }
}
