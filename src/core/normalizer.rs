use crate::core::record::{
    building_period, building_stock_label, EnvelopeLayers, HeatingSystem, Record,
    WindowProperties, DISTRICT_HEATING, HEATING_SYSTEM_SLOTS,
};
use crate::core::reference::ReferenceData;
use crate::errors::{ConsistencyError, LookupError};
use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

/// A row of the building envelope database.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEnvelopeRecord {
    pub building_code: String,
    pub building_type: String,
    pub location_id: String,
    pub construction_year_low: i32,
    pub construction_year_high: i32,
    pub number_of_buildings: f64,
    pub average_gross_floor_area_m2_per_building: f64,
    pub envelope: EnvelopeLayers,
    pub window: WindowProperties,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawHeatingSystem {
    pub fuel_used: Option<String>,
    pub dimensions: Option<String>,
    pub prevalency: Option<f64>,
}

/// A row of the heating system database, keyed by building typology code.
#[derive(Clone, Debug, PartialEq)]
pub struct RawHeatingSystemRecord {
    pub building_typology: String,
    pub heating_systems: [RawHeatingSystem; HEATING_SYSTEM_SLOTS],
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedRecords {
    pub records: Vec<Record>,
    /// Records whose heating system prevalencies could not be normalized.
    pub inconsistencies: Vec<ConsistencyError>,
}

/// Join the envelope and heating system tables into unweighted records.
///
/// The join is inner on the building code: envelope rows without heating system data
/// (and vice versa) are dropped. Row order follows the envelope table.
#[instrument(skip_all)]
pub fn normalize(
    envelope_records: &[RawEnvelopeRecord],
    heating_system_records: &[RawHeatingSystemRecord],
    reference_data: &ReferenceData,
    dataset_name: &str,
    building_stock_year: i32,
) -> Result<NormalizedRecords, LookupError> {
    let mut heating_by_code: IndexMap<&str, Vec<&RawHeatingSystemRecord>> = IndexMap::new();
    for heating in heating_system_records {
        heating_by_code
            .entry(heating.building_typology.as_str())
            .or_default()
            .push(heating);
    }

    let mut normalized = NormalizedRecords::default();

    for envelope in envelope_records {
        let Some(matches) = heating_by_code.get(envelope.building_code.as_str()) else {
            debug!(
                "dropping building {} without heating system data",
                envelope.building_code
            );
            continue;
        };
        let category = &reference_data
            .building_type_mapping(&envelope.building_type)?
            .category;
        let shapefile = reference_data.shapefile_mapping(&envelope.location_id)?;

        for heating in matches {
            let (heating_systems, inconsistency) =
                normalize_heating_systems(&envelope.building_code, &heating.heating_systems);
            if let Some(inconsistency) = inconsistency {
                warn!("{inconsistency}");
                normalized.inconsistencies.push(inconsistency);
            }

            normalized.records.push(Record {
                building_code: envelope.building_code.clone(),
                building_type: envelope.building_type.clone(),
                location_id: envelope.location_id.clone(),
                building_period: building_period(
                    envelope.construction_year_low,
                    envelope.construction_year_high,
                ),
                construction_year_low: envelope.construction_year_low,
                construction_year_high: envelope.construction_year_high,
                number_of_buildings: envelope.number_of_buildings,
                average_gross_floor_area_m2_per_building: envelope
                    .average_gross_floor_area_m2_per_building,
                envelope: envelope.envelope,
                window: envelope.window.clone(),
                heating_systems,
                category: category.clone(),
                building_stock: building_stock_label(
                    dataset_name,
                    building_stock_year,
                    &envelope.location_id,
                    category,
                ),
                building_stock_year,
                shapefile_path: shapefile.shapefile_path.clone(),
                raster_weight_path: shapefile.raster_weight_path.clone(),
                location_notes: shapefile.notes.clone(),
                material_combination_weight: None,
            });
        }
    }

    debug!(
        "normalized {} envelope rows and {} heating system rows into {} records",
        envelope_records.len(),
        heating_system_records.len(),
        normalized.records.len()
    );

    Ok(normalized)
}

/// Scale the prevalencies of the ranked heating systems to sum to one and derive the heat source.
///
/// Missing prevalencies stay NaN and do not count towards the sum. A zero (or non-finite)
/// sum yields non-finite prevalencies, reported as a [`ConsistencyError`].
fn normalize_heating_systems(
    building_code: &str,
    raw: &[RawHeatingSystem; HEATING_SYSTEM_SLOTS],
) -> ([HeatingSystem; HEATING_SYSTEM_SLOTS], Option<ConsistencyError>) {
    let prevalency_sum: f64 = raw.iter().filter_map(|system| system.prevalency).sum();

    let heating_systems = raw.clone().map(|system| {
        let heat_source = if system.dimensions.as_deref() == Some(DISTRICT_HEATING) {
            Some(DISTRICT_HEATING.to_string())
        } else {
            system.fuel_used.clone()
        };
        HeatingSystem {
            prevalency: system.prevalency.unwrap_or(f64::NAN) / prevalency_sum,
            fuel_used: system.fuel_used,
            dimensions: system.dimensions,
            heat_source,
        }
    });

    let inconsistency = (prevalency_sum == 0. || !prevalency_sum.is_finite()).then(|| {
        ConsistencyError {
            building_code: building_code.to_string(),
            prevalency_sum,
        }
    });

    (heating_systems, inconsistency)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::reference::tests::reference_data;
    use crate::core::record::tests::record;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    pub(crate) fn raw_envelope(building_code: &str, location_id: &str, floor_area: f64) -> RawEnvelopeRecord {
        let template = record(building_code, location_id, floor_area, None);
        RawEnvelopeRecord {
            building_code: building_code.to_string(),
            building_type: template.building_type,
            location_id: location_id.to_string(),
            construction_year_low: 1980,
            construction_year_high: 1990,
            number_of_buildings: template.number_of_buildings,
            average_gross_floor_area_m2_per_building: floor_area,
            envelope: template.envelope,
            window: template.window,
        }
    }

    fn raw_system(fuel_used: Option<&str>, dimensions: Option<&str>, prevalency: Option<f64>) -> RawHeatingSystem {
        RawHeatingSystem {
            fuel_used: fuel_used.map(str::to_string),
            dimensions: dimensions.map(str::to_string),
            prevalency,
        }
    }

    pub(crate) fn raw_heating(building_typology: &str) -> RawHeatingSystemRecord {
        RawHeatingSystemRecord {
            building_typology: building_typology.to_string(),
            heating_systems: [
                raw_system(Some("Natural gas"), Some("Individual"), Some(50.)),
                raw_system(Some("Electricity"), Some("Individual"), Some(30.)),
                raw_system(Some("Biomass"), Some("District"), Some(40.)),
            ],
        }
    }

    #[rstest]
    fn should_normalize_prevalencies_to_sum_to_one() {
        let (systems, inconsistency) =
            normalize_heating_systems("AT.SFH.01", &raw_heating("AT.SFH.01").heating_systems);

        assert_eq!(inconsistency, None);
        assert_relative_eq!(systems[0].prevalency, 50. / 120., max_relative = 1e-12);
        assert_relative_eq!(systems[1].prevalency, 0.25, max_relative = 1e-12);
        assert_relative_eq!(
            systems.iter().map(|s| s.prevalency).sum::<f64>(),
            1.,
            epsilon = 1e-9
        );
    }

    #[rstest]
    fn should_override_heat_source_for_district_heating() {
        let (systems, _) =
            normalize_heating_systems("AT.SFH.01", &raw_heating("AT.SFH.01").heating_systems);

        assert_eq!(systems[0].heat_source.as_deref(), Some("Natural gas"));
        assert_eq!(systems[2].heat_source.as_deref(), Some("District"));
        assert_eq!(systems[2].fuel_used.as_deref(), Some("Biomass"));
    }

    #[rstest]
    fn should_keep_missing_slots_as_nan() {
        let raw = [
            raw_system(Some("Oil"), Some("Individual"), Some(0.8)),
            raw_system(None, None, None),
            raw_system(None, None, None),
        ];
        let (systems, inconsistency) = normalize_heating_systems("AT.SFH.01", &raw);

        assert_eq!(inconsistency, None);
        assert_eq!(systems[0].prevalency, 1.);
        assert!(systems[1].prevalency.is_nan());
        assert_eq!(systems[1].heat_source, None);
    }

    #[rstest]
    fn should_flag_zero_prevalency_sum_without_failing() {
        let raw = [
            raw_system(Some("Oil"), Some("Individual"), Some(0.)),
            raw_system(Some("Coal"), Some("Individual"), Some(0.)),
            raw_system(None, None, None),
        ];
        let (systems, inconsistency) = normalize_heating_systems("BG.SFH.02", &raw);

        assert!(systems.iter().all(|system| system.prevalency.is_nan()));
        assert_eq!(
            inconsistency,
            Some(ConsistencyError {
                building_code: "BG.SFH.02".to_string(),
                prevalency_sum: 0.
            })
        );
    }

    #[rstest]
    fn should_inner_join_on_building_code(reference_data: ReferenceData) {
        let envelope = vec![
            raw_envelope("AT.SFH.01", "AT", 100.),
            raw_envelope("AT.SFH.02", "AT", 300.),
        ];
        let heating = vec![raw_heating("AT.SFH.02"), raw_heating("DE.SFH.01")];

        let normalized = normalize(&envelope, &heating, &reference_data, "AmBIENCe", 2016).unwrap();

        assert_eq!(normalized.records.len(), 1);
        let record = &normalized.records[0];
        assert_eq!(record.building_code, "AT.SFH.02");
        assert_eq!(record.building_period, "1980-1990");
        assert_eq!(record.building_stock, "AmBIENCe_2016_AT_residential");
        assert_eq!(record.shapefile_path, "shapefiles/AT.shp");
        assert_eq!(record.material_combination_weight, None);
    }

    #[rstest]
    fn should_fail_on_unmapped_location(reference_data: ReferenceData) {
        let envelope = vec![raw_envelope("SE.SFH.01", "SE", 100.)];
        let heating = vec![raw_heating("SE.SFH.01")];

        assert_eq!(
            normalize(&envelope, &heating, &reference_data, "AmBIENCe", 2016),
            Err(LookupError::ShapefileMapping("SE".to_string()))
        );
    }
}
