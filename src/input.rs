use crate::core::extrapolation::ExtrapolationMappings;
use crate::core::normalizer::{RawEnvelopeRecord, RawHeatingSystem, RawHeatingSystemRecord};
use crate::core::record::{
    EnvelopeLayer, EnvelopeLayers, EnvelopeProperties, MaterialLayer, WindowProperties,
    HEATING_SYSTEM_SLOTS,
};
use crate::core::reference::{
    BuildingTypeMapping, FenestrationProperties, ReferenceData, ShapefileMapping,
    VentilationProperties,
};
use crate::core::structure_type::{StructureType, StructureTypes};
use crate::core::units::{
    DEFAULT_BUILDING_STOCK_YEAR, DEFAULT_INTERIOR_NODE_DEPTH, DEFAULT_PERIOD_OF_VARIATIONS,
};
use crate::errors::{AbmError, SchemaError};
use csv::{ReaderBuilder, StringRecord, Trim};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const ENVELOPE_TABLE: &str = "building stock properties";
const HEATING_SYSTEM_TABLE: &str = "building stock heating systems";
const STRUCTURE_TYPE_TABLE: &str = "structure types";
const FENESTRATION_TABLE: &str = "fenestration";
const VENTILATION_TABLE: &str = "ventilation";
const BUILDING_TYPE_MAPPING_TABLE: &str = "building type mappings";
const SHAPEFILE_MAPPING_TABLE: &str = "shapefile mappings";

const WINDOW_GLAZING_TYPE: &str = "REFERENCE BUILDING WINDOW GLAZING TYPE";
const WINDOW_COATED: &str = "REFERENCE BUILDING WINDOW COATED";
const WINDOW_U_VALUE: &str = "REFERENCE BUILDING WINDOW U-VALUE (W/m2/K)";

/// Run configuration, read from JSON. Every field is optional.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub building_stock_properties_path: PathBuf,
    pub building_stock_heatsys_path: PathBuf,
    pub structure_types_path: PathBuf,
    pub building_type_mappings_path: PathBuf,
    pub shapefile_mappings_path: PathBuf,
    pub fenestration_path: PathBuf,
    pub ventilation_path: PathBuf,
    /// Rows preceding the header of the heating system table.
    pub heatsys_skip_rows: usize,
    pub building_stock_year: i32,
    pub interior_node_depth: f64,
    pub period_of_variations: f64,
    /// Prefix of the `building_stock` labels of the processed data.
    pub dataset_name: String,
    pub extrapolation: Option<ExtrapolationConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            building_stock_properties_path:
                "data_sources/ambience/AmBIENCe_Deliverable-4.1_Database-of-greybox-model-parameter-values.csv".into(),
            building_stock_heatsys_path:
                "data_sources/ambience/AmBIENCe-WP4-T4.2-Buildings_Energy_systems_Database_EU271.csv".into(),
            structure_types_path: "data_assumptions/structure_types.csv".into(),
            building_type_mappings_path: "data_assumptions/building_type_mappings.csv".into(),
            shapefile_mappings_path: "data_assumptions/shapefile_mappings.csv".into(),
            fenestration_path: "data_assumptions/fenestration.csv".into(),
            ventilation_path: "data_assumptions/ventilation.csv".into(),
            heatsys_skip_rows: 1,
            building_stock_year: DEFAULT_BUILDING_STOCK_YEAR,
            interior_node_depth: DEFAULT_INTERIOR_NODE_DEPTH,
            period_of_variations: DEFAULT_PERIOD_OF_VARIATIONS,
            dataset_name: "AmBIENCe".to_string(),
            extrapolation: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExtrapolationConfig {
    /// Prefix of the `building_stock` labels of the synthetic data.
    pub tag: String,
    #[serde(default = "default_building_stock_year")]
    pub year: i32,
    pub mappings: ExtrapolationMappings,
}

fn default_building_stock_year() -> i32 {
    DEFAULT_BUILDING_STOCK_YEAR
}

pub fn ingest_config(json: impl Read) -> Result<ProjectConfig, AbmError> {
    Ok(serde_json::from_reader(BufReader::new(json))?)
}

/// Reads a `True`/`False` style flag, as written by spreadsheets and dataframes.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "1.0" => Some(true),
        "false" | "no" | "0" | "0.0" => Some(false),
        _ => None,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_flag(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("'{value}' is not a boolean flag")))
}

fn deserialize_envelope_layer<'de, D>(deserializer: D) -> Result<EnvelopeLayer, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    EnvelopeLayer::from_str(value.trim()).map_err(|_| {
        serde::de::Error::custom(format!("'{value}' is not a known envelope mapping"))
    })
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader)
}

/// Header and data rows of a CSV table, after skipping `skip_rows` leading rows.
fn read_rows(
    reader: impl Read,
    table: &str,
    skip_rows: usize,
) -> Result<(StringRecord, Vec<StringRecord>), AbmError> {
    let mut rows = csv_reader(reader)
        .into_records()
        .skip(skip_rows)
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();
    let headers = rows
        .next()
        .ok_or_else(|| SchemaError::EmptyTable(table.to_string()))?;
    Ok((headers, rows.collect()))
}

fn require_columns<'a>(
    table: &str,
    headers: &StringRecord,
    columns: impl IntoIterator<Item = &'a str>,
) -> Result<(), SchemaError> {
    for column in columns {
        if !headers.iter().any(|header| header == column) {
            return Err(SchemaError::missing_column(table, column));
        }
    }
    Ok(())
}

fn schema_error_from_csv(table: &str, headers: &StringRecord, error: csv::Error) -> AbmError {
    match error.kind() {
        csv::ErrorKind::Deserialize { err, .. } => {
            let column = err
                .field()
                .and_then(|index| headers.get(index as usize))
                .unwrap_or("<unknown>");
            SchemaError::invalid_value(table, column, err.to_string()).into()
        }
        _ => error.into(),
    }
}

/// Read a CSV table into typed rows, checking the required columns first.
fn read_table<'a, T: DeserializeOwned>(
    reader: impl Read,
    table: &str,
    required_columns: impl IntoIterator<Item = &'a str>,
    skip_rows: usize,
) -> Result<Vec<T>, AbmError> {
    let (headers, rows) = read_rows(reader, table, skip_rows)?;
    require_columns(table, &headers, required_columns)?;
    let rows = rows
        .iter()
        .map(|row| {
            row.deserialize::<T>(Some(&headers))
                .map_err(|error| schema_error_from_csv(table, &headers, error))
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!("read {} rows from {table}", rows.len());
    Ok(rows)
}

/// Positions of the columns of a table, looked up by name once.
struct ColumnIndex<'a> {
    table: &'a str,
    headers: IndexMap<String, usize>,
}

#[derive(Clone, Debug)]
struct Column {
    name: String,
    index: usize,
}

impl<'a> ColumnIndex<'a> {
    fn new(table: &'a str, headers: &StringRecord) -> Self {
        let mut index = IndexMap::new();
        for (position, header) in headers.iter().enumerate() {
            // the first occurrence of a duplicated header wins
            index.entry(header.to_string()).or_insert(position);
        }
        Self {
            table,
            headers: index,
        }
    }

    fn locate(&self, name: &str) -> Result<Column, SchemaError> {
        self.headers
            .get(name)
            .map(|&index| Column {
                name: name.to_string(),
                index,
            })
            .ok_or_else(|| SchemaError::missing_column(self.table, name))
    }
}

fn text(row: &StringRecord, column: &Column) -> String {
    row.get(column.index).unwrap_or_default().to_string()
}

/// A numeric cell. Empty cells are NaN so that missing data propagates.
fn float(table: &str, row: &StringRecord, column: &Column) -> Result<f64, SchemaError> {
    let value = row.get(column.index).unwrap_or_default();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    value
        .parse()
        .map_err(|_| SchemaError::invalid_value(table, &column.name, format!("'{value}' is not a number")))
}

fn year(table: &str, row: &StringRecord, column: &Column) -> Result<i32, SchemaError> {
    let value = float(table, row, column)?;
    if value.is_finite() && value.fract() == 0. {
        Ok(value as i32)
    } else {
        Err(SchemaError::invalid_value(
            table,
            &column.name,
            format!("'{value}' is not a year"),
        ))
    }
}

struct MaterialColumns {
    thickness: Column,
    density: Column,
    specific_heat_capacity: Column,
    thermal_conductivity: Column,
}

impl MaterialColumns {
    fn locate(index: &ColumnIndex, prefix: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            thickness: index.locate(&format!("{prefix} THICKNESS (m)"))?,
            density: index.locate(&format!("{prefix} DENSITY (kg/m3)"))?,
            specific_heat_capacity: index
                .locate(&format!("{prefix} SPECIFIC HEAT CAPACITY (J/kg/K)"))?,
            thermal_conductivity: index.locate(&format!("{prefix} THERMAL CONDUCTIVITY (W/m/K)"))?,
        })
    }

    fn read(&self, row: &StringRecord) -> Result<MaterialLayer, SchemaError> {
        Ok(MaterialLayer {
            thickness_m: float(ENVELOPE_TABLE, row, &self.thickness)?,
            density_kg_m3: float(ENVELOPE_TABLE, row, &self.density)?,
            specific_heat_capacity_j_kgk: float(ENVELOPE_TABLE, row, &self.specific_heat_capacity)?,
            thermal_conductivity_w_mk: float(ENVELOPE_TABLE, row, &self.thermal_conductivity)?,
        })
    }
}

struct EnvelopeColumns {
    design_u_value: Column,
    material: MaterialColumns,
    insulation: MaterialColumns,
}

impl EnvelopeColumns {
    fn locate(index: &ColumnIndex, layer: EnvelopeLayer) -> Result<Self, SchemaError> {
        let prefix = format!("REFERENCE BUILDING {layer}");
        Ok(Self {
            design_u_value: index.locate(&format!("{prefix} U-VALUE (W/m2/K)"))?,
            material: MaterialColumns::locate(index, &format!("{prefix} MATERIAL"))?,
            insulation: MaterialColumns::locate(index, &format!("{prefix} INSULATION MATERIAL"))?,
        })
    }

    fn read(&self, row: &StringRecord) -> Result<EnvelopeProperties, SchemaError> {
        Ok(EnvelopeProperties {
            design_u_value_w_m2k: float(ENVELOPE_TABLE, row, &self.design_u_value)?,
            material: self.material.read(row)?,
            insulation: self.insulation.read(row)?,
        })
    }
}

struct BuildingStockPropertiesColumns {
    building_code: Column,
    building_type: Column,
    location_id: Column,
    construction_year_low: Column,
    construction_year_high: Column,
    number_of_buildings: Column,
    floor_area: Column,
    wall: EnvelopeColumns,
    roof: EnvelopeColumns,
    floor: EnvelopeColumns,
    glazing_type: Column,
    coated: Column,
    window_u_value: Column,
}

impl BuildingStockPropertiesColumns {
    fn locate(index: &ColumnIndex) -> Result<Self, SchemaError> {
        Ok(Self {
            building_code: index.locate("REFERENCE BUILDING CODE")?,
            building_type: index.locate("REFERENCE BUILDING USE CODE")?,
            location_id: index.locate("REFERENCE BUILDING COUNTRY CODE")?,
            construction_year_low: index.locate("REFERENCE BUILDING CONSTRUCTION YEAR LOW")?,
            construction_year_high: index.locate("REFERENCE BUILDING CONSTRUCTION YEAR HIGH")?,
            number_of_buildings: index
                .locate("NUMBER OF REFERENCE BUILDINGS IN THE BUILDING STOCK SEGMENT")?,
            floor_area: index.locate("REFERENCE BUILDING USEFUL FLOOR AREA (m2)")?,
            wall: EnvelopeColumns::locate(index, EnvelopeLayer::Wall)?,
            roof: EnvelopeColumns::locate(index, EnvelopeLayer::Roof)?,
            floor: EnvelopeColumns::locate(index, EnvelopeLayer::Floor)?,
            glazing_type: index.locate(WINDOW_GLAZING_TYPE)?,
            coated: index.locate(WINDOW_COATED)?,
            window_u_value: index.locate(WINDOW_U_VALUE)?,
        })
    }

    fn read(&self, row: &StringRecord) -> Result<RawEnvelopeRecord, SchemaError> {
        let coated = text(row, &self.coated);
        Ok(RawEnvelopeRecord {
            building_code: text(row, &self.building_code),
            building_type: text(row, &self.building_type),
            location_id: text(row, &self.location_id),
            construction_year_low: year(ENVELOPE_TABLE, row, &self.construction_year_low)?,
            construction_year_high: year(ENVELOPE_TABLE, row, &self.construction_year_high)?,
            number_of_buildings: float(ENVELOPE_TABLE, row, &self.number_of_buildings)?,
            average_gross_floor_area_m2_per_building: float(ENVELOPE_TABLE, row, &self.floor_area)?,
            envelope: EnvelopeLayers {
                wall: self.wall.read(row)?,
                roof: self.roof.read(row)?,
                floor: self.floor.read(row)?,
            },
            window: WindowProperties {
                glazing_type: text(row, &self.glazing_type),
                coated: parse_flag(&coated).ok_or_else(|| {
                    SchemaError::invalid_value(
                        ENVELOPE_TABLE,
                        WINDOW_COATED,
                        format!("'{coated}' is not a boolean flag"),
                    )
                })?,
                u_value_w_m2k: float(ENVELOPE_TABLE, row, &self.window_u_value)?,
            },
        })
    }
}

/// Read the building envelope database, exported to CSV.
pub fn read_building_stock_properties(
    reader: impl Read,
) -> Result<Vec<RawEnvelopeRecord>, AbmError> {
    let (headers, rows) = read_rows(reader, ENVELOPE_TABLE, 0)?;
    let columns = BuildingStockPropertiesColumns::locate(&ColumnIndex::new(ENVELOPE_TABLE, &headers))?;
    let records = rows
        .iter()
        .map(|row| columns.read(row))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("read {} rows from {ENVELOPE_TABLE}", records.len());
    Ok(records)
}

#[derive(Debug, Deserialize)]
struct HeatingSystemRow {
    #[serde(rename = "Building typology")]
    building_typology: String,
    #[serde(rename = "HEATING SYSTEM 1 FUEL USED")]
    fuel_used_1: Option<String>,
    #[serde(rename = "HEATING SYSTEM 1 DIMENSIONS")]
    dimensions_1: Option<String>,
    #[serde(
        rename = "HEATING SYSTEM 1 PREVALENCY ON BUILDING STOCK",
        deserialize_with = "csv::invalid_option"
    )]
    prevalency_1: Option<f64>,
    #[serde(rename = "HEATING SYSTEM 2 FUEL USED")]
    fuel_used_2: Option<String>,
    #[serde(rename = "HEATING SYSTEM 2 DIMENSIONS")]
    dimensions_2: Option<String>,
    #[serde(
        rename = "HEATING SYSTEM 2 PREVALENCY ON BUILDING STOCK",
        deserialize_with = "csv::invalid_option"
    )]
    prevalency_2: Option<f64>,
    #[serde(rename = "HEATING SYSTEM 3 FUEL USED")]
    fuel_used_3: Option<String>,
    #[serde(rename = "HEATING SYSTEM 3 DIMENSIONS")]
    dimensions_3: Option<String>,
    #[serde(
        rename = "HEATING SYSTEM 3 PREVALENCY ON BUILDING STOCK",
        deserialize_with = "csv::invalid_option"
    )]
    prevalency_3: Option<f64>,
}

impl From<HeatingSystemRow> for RawHeatingSystemRecord {
    fn from(row: HeatingSystemRow) -> Self {
        let system = |fuel_used: Option<String>, dimensions: Option<String>, prevalency| {
            RawHeatingSystem {
                fuel_used: fuel_used.filter(|value| !value.is_empty()),
                dimensions: dimensions.filter(|value| !value.is_empty()),
                prevalency,
            }
        };
        Self {
            building_typology: row.building_typology,
            heating_systems: [
                system(row.fuel_used_1, row.dimensions_1, row.prevalency_1),
                system(row.fuel_used_2, row.dimensions_2, row.prevalency_2),
                system(row.fuel_used_3, row.dimensions_3, row.prevalency_3),
            ],
        }
    }
}

fn heating_system_columns() -> Vec<String> {
    let mut columns = vec!["Building typology".to_string()];
    for slot in 1..=HEATING_SYSTEM_SLOTS {
        columns.push(format!("HEATING SYSTEM {slot} FUEL USED"));
        columns.push(format!("HEATING SYSTEM {slot} DIMENSIONS"));
        columns.push(format!("HEATING SYSTEM {slot} PREVALENCY ON BUILDING STOCK"));
    }
    columns
}

/// Read the heating system database, exported to CSV.
///
/// `skip_rows` drops rows before the header. Header rows repeated further down the export
/// read as rows without prevalencies and fall out at the join on building code.
pub fn read_heating_systems(
    reader: impl Read,
    skip_rows: usize,
) -> Result<Vec<RawHeatingSystemRecord>, AbmError> {
    let columns = heating_system_columns();
    let rows: Vec<HeatingSystemRow> = read_table(
        reader,
        HEATING_SYSTEM_TABLE,
        columns.iter().map(String::as_str),
        skip_rows,
    )?;
    Ok(rows.into_iter().map(RawHeatingSystemRecord::from).collect())
}

#[derive(Debug, Deserialize)]
struct StructureTypeRow {
    structure_type: String,
    #[serde(deserialize_with = "deserialize_envelope_layer")]
    mapping: EnvelopeLayer,
    #[serde(deserialize_with = "deserialize_flag")]
    is_internal: bool,
    #[serde(rename = "interior_resistance_m2K_W")]
    interior_resistance_m2k_w: f64,
    #[serde(rename = "exterior_resistance_m2K_W")]
    exterior_resistance_m2k_w: f64,
    #[serde(rename = "linear_thermal_bridge_W_mK")]
    linear_thermal_bridge_w_mk: f64,
}

pub fn read_structure_types(reader: impl Read) -> Result<StructureTypes, AbmError> {
    let rows: Vec<StructureTypeRow> = read_table(
        reader,
        STRUCTURE_TYPE_TABLE,
        [
            "structure_type",
            "mapping",
            "is_internal",
            "interior_resistance_m2K_W",
            "exterior_resistance_m2K_W",
            "linear_thermal_bridge_W_mK",
        ],
        0,
    )?;
    Ok(rows
        .into_iter()
        .map(|row| {
            StructureType::new(
                &row.structure_type,
                row.mapping,
                row.is_internal,
                row.interior_resistance_m2k_w,
                row.exterior_resistance_m2k_w,
                row.linear_thermal_bridge_w_mk,
            )
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct FenestrationRow {
    #[serde(rename = "REFERENCE BUILDING WINDOW GLAZING TYPE")]
    glazing_type: String,
    #[serde(rename = "REFERENCE BUILDING WINDOW COATED", deserialize_with = "deserialize_flag")]
    coated: bool,
    normal_solar_energy_transmittance: f64,
    frame_area_fraction: f64,
}

pub fn read_fenestration(
    reader: impl Read,
) -> Result<IndexMap<(String, bool), FenestrationProperties>, AbmError> {
    let rows: Vec<FenestrationRow> = read_table(
        reader,
        FENESTRATION_TABLE,
        [
            WINDOW_GLAZING_TYPE,
            WINDOW_COATED,
            "normal_solar_energy_transmittance",
            "frame_area_fraction",
        ],
        0,
    )?;
    Ok(rows
        .into_iter()
        .map(|row| {
            (
                (row.glazing_type, row.coated),
                FenestrationProperties {
                    normal_solar_energy_transmittance: row.normal_solar_energy_transmittance,
                    frame_area_fraction: row.frame_area_fraction,
                },
            )
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct VentilationRow {
    #[serde(rename = "HRU_efficiency")]
    hru_efficiency: f64,
    infiltration_rate_1_h: f64,
    ventilation_rate_1_h: f64,
}

/// Read the global ventilation assumptions: the first row of the table.
pub fn read_ventilation(reader: impl Read) -> Result<VentilationProperties, AbmError> {
    let rows: Vec<VentilationRow> = read_table(
        reader,
        VENTILATION_TABLE,
        ["HRU_efficiency", "infiltration_rate_1_h", "ventilation_rate_1_h"],
        0,
    )?;
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| SchemaError::EmptyTable(VENTILATION_TABLE.to_string()))?;
    Ok(VentilationProperties {
        hru_efficiency: row.hru_efficiency,
        infiltration_rate_1_h: row.infiltration_rate_1_h,
        ventilation_rate_1_h: row.ventilation_rate_1_h,
    })
}

#[derive(Debug, Deserialize)]
struct BuildingTypeMappingRow {
    building_type: String,
    category: String,
    notes: Option<String>,
}

pub fn read_building_type_mappings(
    reader: impl Read,
) -> Result<IndexMap<String, BuildingTypeMapping>, AbmError> {
    let rows: Vec<BuildingTypeMappingRow> = read_table(
        reader,
        BUILDING_TYPE_MAPPING_TABLE,
        ["building_type", "category"],
        0,
    )?;
    Ok(rows
        .into_iter()
        .map(|row| {
            (
                row.building_type,
                BuildingTypeMapping {
                    category: row.category,
                    notes: row.notes.filter(|notes| !notes.is_empty()),
                },
            )
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct ShapefileMappingRow {
    country: String,
    shapefile_path: String,
    raster_weight_path: Option<String>,
    notes: Option<String>,
}

pub fn read_shapefile_mappings(
    reader: impl Read,
) -> Result<IndexMap<String, ShapefileMapping>, AbmError> {
    let rows: Vec<ShapefileMappingRow> = read_table(
        reader,
        SHAPEFILE_MAPPING_TABLE,
        ["country", "shapefile_path"],
        0,
    )?;
    Ok(rows
        .into_iter()
        .map(|row| {
            (
                row.country,
                ShapefileMapping {
                    shapefile_path: row.shapefile_path,
                    raster_weight_path: row.raster_weight_path.filter(|path| !path.is_empty()),
                    notes: row.notes.filter(|notes| !notes.is_empty()),
                },
            )
        })
        .collect())
}

fn open(path: &Path) -> Result<BufReader<File>, AbmError> {
    Ok(BufReader::new(File::open(path)?))
}

/// Load all static reference tables named by the configuration.
pub fn read_reference_data(config: &ProjectConfig) -> Result<ReferenceData, AbmError> {
    Ok(ReferenceData {
        structure_types: read_structure_types(open(&config.structure_types_path)?)?,
        fenestration: read_fenestration(open(&config.fenestration_path)?)?,
        ventilation: read_ventilation(open(&config.ventilation_path)?)?,
        building_type_mappings: read_building_type_mappings(open(
            &config.building_type_mappings_path,
        )?)?,
        shapefile_mappings: read_shapefile_mappings(open(&config.shapefile_mappings_path)?)?,
    })
}

/// Load the envelope and heating system tables named by the configuration.
pub fn read_raw_building_stock(
    config: &ProjectConfig,
) -> Result<(Vec<RawEnvelopeRecord>, Vec<RawHeatingSystemRecord>), AbmError> {
    Ok((
        read_building_stock_properties(open(&config.building_stock_properties_path)?)?,
        read_heating_systems(
            open(&config.building_stock_heatsys_path)?,
            config.heatsys_skip_rows,
        )?,
    ))
}
