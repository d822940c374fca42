use crate::core::aggregation::BuildingStockKey;
use crate::core::extrapolation::ExtrapolationTarget;
use crate::core::normalizer::{RawEnvelopeRecord, RawHeatingSystemRecord};
use crate::core::record::ArchetypeKey;
use crate::core::reference::tests::reference_data;
use crate::core::reference::ReferenceData;
use crate::input::tests::{envelope_csv, heating_csv, LAYERS};
use crate::input::{
    read_building_stock_properties, read_heating_systems, ExtrapolationConfig, ProjectConfig,
};
use crate::output::tests::MemoryOutput;
use crate::{process_building_stock, run_project, ProjectFlags, RunResults};
use approx::assert_relative_eq;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use rstest::*;
use std::fs;
use std::path::{Path, PathBuf};

fn envelope_table() -> String {
    envelope_csv(&[
        &format!("AT.SFH.01.Gen,SFH,AT,1980,1990,1000,100,{LAYERS},Double,False,2.8"),
        &format!("AT.SFH.02.Gen,SFH,AT,1980,1990,3000,300,{LAYERS},Double,True,1.6"),
        &format!("DE.SFH.01.Gen,SFH,DE,1980,1990,2000,150,{LAYERS},Double,False,2.8"),
        &format!("DE.SFH.09.Gen,SFH,DE,1980,1990,2000,150,{LAYERS},Double,False,2.8"),
    ])
}

fn heating_table() -> String {
    heating_csv(&[
        "AT.SFH.01.Gen,Natural gas,Individual,50,Electricity,Individual,30,Biomass,District,20",
        "AT.SFH.02.Gen,Natural gas,Individual,1.0,,,,,,",
        // header repeated inside the export
        "Building typology,HEATING SYSTEM 1 FUEL USED,HEATING SYSTEM 1 DIMENSIONS,\
         HEATING SYSTEM 1 PREVALENCY ON BUILDING STOCK,HEATING SYSTEM 2 FUEL USED,\
         HEATING SYSTEM 2 DIMENSIONS,HEATING SYSTEM 2 PREVALENCY ON BUILDING STOCK,\
         HEATING SYSTEM 3 FUEL USED,HEATING SYSTEM 3 DIMENSIONS,\
         HEATING SYSTEM 3 PREVALENCY ON BUILDING STOCK",
        "DE.SFH.01.Gen,Oil,Individual,0,,,,,,",
    ])
}

#[fixture]
fn raw_building_stock() -> (Vec<RawEnvelopeRecord>, Vec<RawHeatingSystemRecord>) {
    (
        read_building_stock_properties(envelope_table().as_bytes()).unwrap(),
        read_heating_systems(heating_table().as_bytes(), 1).unwrap(),
    )
}

fn extrapolation_config() -> ProjectConfig {
    ProjectConfig {
        extrapolation: Some(ExtrapolationConfig {
            tag: "Synthetic".to_string(),
            year: 2020,
            mappings: IndexMap::from([(
                "AT".to_string(),
                ExtrapolationTarget {
                    location_id: "NO".to_string(),
                    scaling_coefficient: 0.5,
                },
            )]),
        }),
        ..Default::default()
    }
}

fn process(
    raw_building_stock: &(Vec<RawEnvelopeRecord>, Vec<RawHeatingSystemRecord>),
    reference_data: &ReferenceData,
    config: &ProjectConfig,
    flags: ProjectFlags,
) -> RunResults {
    let (envelope, heating) = raw_building_stock;
    process_building_stock(envelope, heating, reference_data, config, &flags).unwrap()
}

fn building_stock_key(building_stock: &str, location_id: &str, heat_source: &str) -> BuildingStockKey {
    BuildingStockKey {
        building_stock: building_stock.to_string(),
        building_type: "SFH".to_string(),
        building_period: "1980-1990".to_string(),
        location_id: location_id.to_string(),
        heat_source: heat_source.to_string(),
    }
}

fn archetype(location_id: &str) -> ArchetypeKey {
    ArchetypeKey {
        building_type: "SFH".to_string(),
        building_period: "1980-1990".to_string(),
        location_id: location_id.to_string(),
    }
}

#[rstest]
fn should_weight_joined_records_by_floor_area(
    raw_building_stock: (Vec<RawEnvelopeRecord>, Vec<RawHeatingSystemRecord>),
    reference_data: ReferenceData,
) {
    let results = process(
        &raw_building_stock,
        &reference_data,
        &ProjectConfig::default(),
        ProjectFlags::empty(),
    );

    assert_eq!(
        results
            .records
            .iter()
            .map(|record| (record.building_code.as_str(), record.weight()))
            .collect::<Vec<_>>(),
        vec![
            ("AT.SFH.01.Gen", 0.25),
            ("AT.SFH.02.Gen", 0.75),
            ("DE.SFH.01.Gen", 1.0),
        ]
    );
    assert_eq!(results.inconsistencies.len(), 1);
    assert_eq!(results.inconsistencies[0].building_code, "DE.SFH.01.Gen");
}

#[rstest]
fn should_split_building_stock_by_heat_source(
    raw_building_stock: (Vec<RawEnvelopeRecord>, Vec<RawHeatingSystemRecord>),
    reference_data: ReferenceData,
) {
    let results = process(
        &raw_building_stock,
        &reference_data,
        &ProjectConfig::default(),
        ProjectFlags::empty(),
    );
    let statistics = &results.dataset.building_stock_statistics;
    let stock = "AmBIENCe_2016_AT_residential";

    // the DE building has no usable prevalencies and drops out entirely
    assert_eq!(
        statistics
            .keys()
            .map(|key| key.heat_source.as_str())
            .collect::<Vec<_>>(),
        vec!["District", "Electricity", "Natural gas"]
    );

    let gas = statistics[&building_stock_key(stock, "AT", "Natural gas")];
    assert_relative_eq!(gas.number_of_buildings, 3500.);
    assert_relative_eq!(gas.average_gross_floor_area_m2_per_building, 200.);

    let district = statistics[&building_stock_key(stock, "AT", "District")];
    assert_relative_eq!(district.number_of_buildings, 200., max_relative = 1e-12);
    assert_relative_eq!(district.average_gross_floor_area_m2_per_building, 100.);
}

#[rstest]
fn should_aggregate_weighted_envelope_and_window_data(
    raw_building_stock: (Vec<RawEnvelopeRecord>, Vec<RawHeatingSystemRecord>),
    reference_data: ReferenceData,
) {
    let results = process(
        &raw_building_stock,
        &reference_data,
        &ProjectConfig::default(),
        ProjectFlags::empty(),
    );

    let ventilation = results.dataset.ventilation_and_fenestration_statistics[&archetype("AT")];
    assert_relative_eq!(ventilation.hru_efficiency, 0.5);
    assert_relative_eq!(ventilation.window_u_value_w_m2k, 1.9, max_relative = 1e-12);
    assert_relative_eq!(
        ventilation.total_normal_solar_energy_transmittance,
        0.51,
        max_relative = 1e-12
    );

    // two locations times four structure types
    assert_eq!(results.dataset.structure_statistics.len(), 8);
    let exterior_wall = results
        .dataset
        .structure_statistics
        .iter()
        .find(|(key, _)| key.location_id == "AT" && key.structure_type == "exterior_wall")
        .map(|(_, statistic)| *statistic)
        .unwrap();
    assert_relative_eq!(exterior_wall.design_u_value_w_m2k, 0.5, max_relative = 1e-12);
    assert_eq!(exterior_wall.external_u_value_to_ground_w_m2k, 0.);
}

#[rstest]
fn should_extrapolate_and_reweight(
    raw_building_stock: (Vec<RawEnvelopeRecord>, Vec<RawHeatingSystemRecord>),
    reference_data: ReferenceData,
) {
    let results = process(
        &raw_building_stock,
        &reference_data,
        &extrapolation_config(),
        ProjectFlags::empty(),
    );

    assert_eq!(
        results
            .records
            .iter()
            .map(|record| (record.building_code.as_str(), record.weight()))
            .collect::<Vec<_>>(),
        vec![
            ("AT.SFH.01.Gen", 0.25),
            ("AT.SFH.02.Gen", 0.75),
            ("DE.SFH.01.Gen", 1.0),
            ("NO.SFH.01.Gen", 0.25),
            ("NO.SFH.02.Gen", 0.75),
        ]
    );

    let gas = results.dataset.building_stock_statistics
        [&building_stock_key("Synthetic_2020_NO_residential", "NO", "Natural gas")];
    assert_relative_eq!(gas.number_of_buildings, 1750.);

    assert_eq!(
        results.dataset.location_id.iter().collect::<Vec<_>>(),
        vec!["AT", "DE", "NO"]
    );
    let synthetic_stock = results
        .dataset
        .building_stock
        .iter()
        .find(|stock| stock.building_stock == "Synthetic_2020_NO_residential")
        .unwrap();
    assert_eq!(synthetic_stock.building_stock_year, 2020);
    assert_eq!(synthetic_stock.shapefile_path, "shapefiles/NO.shp");

    // physics carries over unchanged to the synthetic location
    assert_eq!(
        results.dataset.ventilation_and_fenestration_statistics[&archetype("NO")],
        results.dataset.ventilation_and_fenestration_statistics[&archetype("AT")]
    );
}

#[rstest]
fn should_skip_extrapolation_when_flagged(
    raw_building_stock: (Vec<RawEnvelopeRecord>, Vec<RawHeatingSystemRecord>),
    reference_data: ReferenceData,
) {
    let results = process(
        &raw_building_stock,
        &reference_data,
        &extrapolation_config(),
        ProjectFlags::SKIP_EXTRAPOLATION,
    );

    assert_eq!(results.records.len(), 3);
    assert!(!results.dataset.location_id.contains("NO"));
}

fn write_inputs(directory: &Path) -> ProjectConfig {
    let write = |name: &str, contents: &str| -> PathBuf {
        let path = directory.join(name);
        fs::write(&path, contents).unwrap();
        path
    };

    ProjectConfig {
        building_stock_properties_path: write("properties.csv", &envelope_table()),
        building_stock_heatsys_path: write("heatsys.csv", &heating_table()),
        structure_types_path: write(
            "structure_types.csv",
            "structure_type,mapping,is_internal,interior_resistance_m2K_W,exterior_resistance_m2K_W,linear_thermal_bridge_W_mK\n\
             base_floor,FLOOR,False,0.17,0.0,0.5\n\
             exterior_wall,WALL,False,0.13,0.04,0.2\n",
        ),
        building_type_mappings_path: write(
            "building_type_mappings.csv",
            "building_type,category,notes\nSFH,residential,\n",
        ),
        shapefile_mappings_path: write(
            "shapefile_mappings.csv",
            "country,shapefile_path,raster_weight_path,notes\n\
             AT,shapefiles/AT.shp,,\n\
             DE,shapefiles/DE.shp,,\n",
        ),
        fenestration_path: write(
            "fenestration.csv",
            "REFERENCE BUILDING WINDOW GLAZING TYPE,REFERENCE BUILDING WINDOW COATED,normal_solar_energy_transmittance,frame_area_fraction\n\
             Double,False,0.75,0.2\n\
             Double,True,0.6,0.2\n",
        ),
        ventilation_path: write(
            "ventilation.csv",
            "HRU_efficiency,infiltration_rate_1_h,ventilation_rate_1_h\n0.5,0.2,0.5\n",
        ),
        ..Default::default()
    }
}

#[rstest]
fn should_run_project_from_files() {
    let directory =
        std::env::temp_dir().join(format!("ambience2abm_pipeline_test_{}", std::process::id()));
    fs::create_dir_all(&directory).unwrap();
    let config = write_inputs(&directory);
    let output = MemoryOutput::default();

    let results = run_project(&config, &output, &ProjectFlags::empty()).unwrap();
    fs::remove_dir_all(&directory).unwrap();

    assert_eq!(results.dataset.structure_statistics.len(), 4);
    assert_eq!(output.file_names().len(), 8);
    assert_eq!(
        output.file("building_stock_statistics.csv").unwrap().lines().count(),
        4
    );
    assert!(output.file("datapackage.json").is_some());
}

#[rstest]
fn should_run_project_without_datapackage() {
    let directory = std::env::temp_dir().join(format!(
        "ambience2abm_pipeline_no_datapackage_test_{}",
        std::process::id()
    ));
    fs::create_dir_all(&directory).unwrap();
    let config = write_inputs(&directory);
    let output = MemoryOutput::default();

    run_project(&config, &output, &ProjectFlags::SKIP_DATAPACKAGE).unwrap();
    fs::remove_dir_all(&directory).unwrap();

    assert_eq!(output.file_names().len(), 7);
    assert!(output.file("datapackage.json").is_none());
}
