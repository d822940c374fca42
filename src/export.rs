use crate::core::dataset::AbmDataset;
use crate::output::Output;
use chrono::Local;
use csv::WriterBuilder;
use serde::{Serialize, Serializer};
use std::io::Write;
use tracing::{debug, info, instrument};

/// Column type of an exported table, as declared in the data package schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

/// An exported table: its file stem, columns and key columns.
#[derive(Clone, Copy, Debug)]
pub struct TableLayout {
    pub name: &'static str,
    pub fields: &'static [(&'static str, FieldType)],
    pub primary_key: &'static [&'static str],
}

pub const BUILDING_PERIOD: TableLayout = TableLayout {
    name: "building_period",
    fields: &[
        ("building_period", FieldType::String),
        ("period_start", FieldType::Integer),
        ("period_end", FieldType::Integer),
    ],
    primary_key: &["building_period"],
};

pub const BUILDING_STOCK: TableLayout = TableLayout {
    name: "building_stock",
    fields: &[
        ("building_stock", FieldType::String),
        ("building_stock_year", FieldType::Integer),
        ("shapefile_path", FieldType::String),
        ("raster_weight_path", FieldType::String),
        ("notes", FieldType::String),
    ],
    primary_key: &["building_stock"],
};

pub const STRUCTURE_TYPE: TableLayout = TableLayout {
    name: "structure_type",
    fields: &[
        ("structure_type", FieldType::String),
        ("is_internal", FieldType::Boolean),
        ("interior_resistance_m2K_W", FieldType::Number),
        ("exterior_resistance_m2K_W", FieldType::Number),
        ("linear_thermal_bridge_W_mK", FieldType::Number),
    ],
    primary_key: &["structure_type"],
};

pub const BUILDING_STOCK_STATISTICS: TableLayout = TableLayout {
    name: "building_stock_statistics",
    fields: &[
        ("building_stock", FieldType::String),
        ("building_type", FieldType::String),
        ("building_period", FieldType::String),
        ("location_id", FieldType::String),
        ("heat_source", FieldType::String),
        ("number_of_buildings", FieldType::Number),
        ("average_gross_floor_area_m2_per_building", FieldType::Number),
    ],
    primary_key: &[
        "building_stock",
        "building_type",
        "building_period",
        "location_id",
        "heat_source",
    ],
};

pub const STRUCTURE_STATISTICS: TableLayout = TableLayout {
    name: "structure_statistics",
    fields: &[
        ("building_type", FieldType::String),
        ("building_period", FieldType::String),
        ("location_id", FieldType::String),
        ("structure_type", FieldType::String),
        ("design_U_value_W_m2K", FieldType::Number),
        ("effective_thermal_mass_J_m2K", FieldType::Number),
        ("linear_thermal_bridges_W_mK", FieldType::Number),
        ("external_U_value_to_ambient_air_W_m2K", FieldType::Number),
        ("external_U_value_to_ground_W_m2K", FieldType::Number),
        ("internal_U_value_to_structure_W_m2K", FieldType::Number),
        ("total_U_value_W_m2K", FieldType::Number),
    ],
    primary_key: &[
        "building_type",
        "building_period",
        "location_id",
        "structure_type",
    ],
};

pub const VENTILATION_AND_FENESTRATION_STATISTICS: TableLayout = TableLayout {
    name: "ventilation_and_fenestration_statistics",
    fields: &[
        ("building_type", FieldType::String),
        ("building_period", FieldType::String),
        ("location_id", FieldType::String),
        ("HRU_efficiency", FieldType::Number),
        ("infiltration_rate_1_h", FieldType::Number),
        ("total_normal_solar_energy_transmittance", FieldType::Number),
        ("ventilation_rate_1_h", FieldType::Number),
        ("window_U_value_W_m2K", FieldType::Number),
    ],
    primary_key: &["building_type", "building_period", "location_id"],
};

pub const LOCATION_ID: TableLayout = TableLayout {
    name: "location_id",
    fields: &[("location_id", FieldType::String)],
    primary_key: &["location_id"],
};

pub const TABLES: [TableLayout; 7] = [
    BUILDING_PERIOD,
    BUILDING_STOCK,
    STRUCTURE_TYPE,
    BUILDING_STOCK_STATISTICS,
    STRUCTURE_STATISTICS,
    VENTILATION_AND_FENESTRATION_STATISTICS,
    LOCATION_ID,
];

fn serialize_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "True" } else { "False" })
}

#[derive(Serialize)]
struct BuildingPeriodRow<'a> {
    building_period: &'a str,
    period_start: i32,
    period_end: i32,
}

#[derive(Serialize)]
struct BuildingStockRow<'a> {
    building_stock: &'a str,
    building_stock_year: i32,
    shapefile_path: &'a str,
    raster_weight_path: Option<&'a str>,
    notes: Option<&'a str>,
}

#[derive(Serialize)]
struct StructureTypeRow<'a> {
    structure_type: &'a str,
    #[serde(serialize_with = "serialize_flag")]
    is_internal: bool,
    interior_resistance_m2k_w: f64,
    exterior_resistance_m2k_w: f64,
    linear_thermal_bridge_w_mk: f64,
}

#[derive(Serialize)]
struct BuildingStockStatisticsRow<'a> {
    building_stock: &'a str,
    building_type: &'a str,
    building_period: &'a str,
    location_id: &'a str,
    heat_source: &'a str,
    number_of_buildings: f64,
    average_gross_floor_area_m2_per_building: f64,
}

#[derive(Serialize)]
struct StructureStatisticsRow<'a> {
    building_type: &'a str,
    building_period: &'a str,
    location_id: &'a str,
    structure_type: &'a str,
    design_u_value_w_m2k: f64,
    effective_thermal_mass_j_m2k: f64,
    linear_thermal_bridges_w_mk: f64,
    external_u_value_to_ambient_air_w_m2k: f64,
    external_u_value_to_ground_w_m2k: f64,
    internal_u_value_to_structure_w_m2k: f64,
    total_u_value_w_m2k: f64,
}

#[derive(Serialize)]
struct VentilationFenestrationStatisticsRow<'a> {
    building_type: &'a str,
    building_period: &'a str,
    location_id: &'a str,
    hru_efficiency: f64,
    infiltration_rate_1_h: f64,
    total_normal_solar_energy_transmittance: f64,
    ventilation_rate_1_h: f64,
    window_u_value_w_m2k: f64,
}

#[derive(Serialize)]
struct LocationIdRow<'a> {
    location_id: &'a str,
}

/// Write the header of `table` and then one record per row.
///
/// Rows are serialized by position, so row structs list their fields in column order.
fn write_table<T: Serialize>(
    output: &impl Output,
    table: &TableLayout,
    rows: impl IntoIterator<Item = T>,
) -> anyhow::Result<()> {
    let writer = output.writer_for_file(table.name, "csv")?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    writer.write_record(table.fields.iter().map(|(name, _)| *name))?;
    let mut row_count = 0;
    for row in rows {
        writer.serialize(row)?;
        row_count += 1;
    }
    writer.flush()?;

    debug!("wrote {row_count} rows to {}.csv", table.name);
    Ok(())
}

/// Write every table of the dataset as CSV, rows sorted by key.
#[instrument(skip_all)]
pub fn export_csvs(dataset: &AbmDataset, output: &impl Output) -> anyhow::Result<()> {
    if output.is_noop() {
        return Ok(());
    }

    write_table(
        output,
        &BUILDING_PERIOD,
        dataset.building_period.iter().map(|period| BuildingPeriodRow {
            building_period: &period.building_period,
            period_start: period.period_start,
            period_end: period.period_end,
        }),
    )?;
    write_table(
        output,
        &BUILDING_STOCK,
        dataset.building_stock.iter().map(|stock| BuildingStockRow {
            building_stock: &stock.building_stock,
            building_stock_year: stock.building_stock_year,
            shapefile_path: &stock.shapefile_path,
            raster_weight_path: stock.raster_weight_path.as_deref(),
            notes: stock.notes.as_deref(),
        }),
    )?;
    write_table(
        output,
        &STRUCTURE_TYPE,
        dataset
            .structure_type
            .iter()
            .map(|structure_type| StructureTypeRow {
                structure_type: &structure_type.name,
                is_internal: structure_type.is_internal(),
                interior_resistance_m2k_w: structure_type.interior_resistance_m2k_w,
                exterior_resistance_m2k_w: structure_type.exterior_resistance_m2k_w,
                linear_thermal_bridge_w_mk: structure_type.linear_thermal_bridge_w_mk,
            }),
    )?;
    write_table(
        output,
        &BUILDING_STOCK_STATISTICS,
        dataset
            .building_stock_statistics
            .iter()
            .map(|(key, statistic)| BuildingStockStatisticsRow {
                building_stock: &key.building_stock,
                building_type: &key.building_type,
                building_period: &key.building_period,
                location_id: &key.location_id,
                heat_source: &key.heat_source,
                number_of_buildings: statistic.number_of_buildings,
                average_gross_floor_area_m2_per_building: statistic
                    .average_gross_floor_area_m2_per_building,
            }),
    )?;
    write_table(
        output,
        &STRUCTURE_STATISTICS,
        dataset
            .structure_statistics
            .iter()
            .map(|(key, statistic)| StructureStatisticsRow {
                building_type: &key.building_type,
                building_period: &key.building_period,
                location_id: &key.location_id,
                structure_type: &key.structure_type,
                design_u_value_w_m2k: statistic.design_u_value_w_m2k,
                effective_thermal_mass_j_m2k: statistic.effective_thermal_mass_j_m2k,
                linear_thermal_bridges_w_mk: statistic.linear_thermal_bridges_w_mk,
                external_u_value_to_ambient_air_w_m2k: statistic
                    .external_u_value_to_ambient_air_w_m2k,
                external_u_value_to_ground_w_m2k: statistic.external_u_value_to_ground_w_m2k,
                internal_u_value_to_structure_w_m2k: statistic.internal_u_value_to_structure_w_m2k,
                total_u_value_w_m2k: statistic.total_u_value_w_m2k,
            }),
    )?;
    write_table(
        output,
        &VENTILATION_AND_FENESTRATION_STATISTICS,
        dataset
            .ventilation_and_fenestration_statistics
            .iter()
            .map(|(key, statistic)| VentilationFenestrationStatisticsRow {
                building_type: &key.building_type,
                building_period: &key.building_period,
                location_id: &key.location_id,
                hru_efficiency: statistic.hru_efficiency,
                infiltration_rate_1_h: statistic.infiltration_rate_1_h,
                total_normal_solar_energy_transmittance: statistic
                    .total_normal_solar_energy_transmittance,
                ventilation_rate_1_h: statistic.ventilation_rate_1_h,
                window_u_value_w_m2k: statistic.window_u_value_w_m2k,
            }),
    )?;
    write_table(
        output,
        &LOCATION_ID,
        dataset
            .location_id
            .iter()
            .map(|location_id| LocationIdRow { location_id }),
    )?;

    info!("exported {} tables", TABLES.len());
    Ok(())
}

#[derive(Debug, Serialize)]
struct License {
    name: &'static str,
    path: &'static str,
    title: &'static str,
}

#[derive(Debug, Serialize)]
struct Source {
    name: &'static str,
    web: &'static str,
}

#[derive(Debug, Serialize)]
struct Contributor {
    title: &'static str,
    email: &'static str,
    path: &'static str,
    role: &'static str,
    organization: &'static str,
}

#[derive(Debug, Serialize)]
struct Field {
    name: &'static str,
    #[serde(rename = "type")]
    field_type: FieldType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Schema {
    fields: Vec<Field>,
    primary_key: &'static [&'static str],
}

#[derive(Debug, Serialize)]
struct Resource {
    name: &'static str,
    path: String,
    profile: &'static str,
    format: &'static str,
    mediatype: &'static str,
    encoding: &'static str,
    schema: Schema,
}

impl From<&TableLayout> for Resource {
    fn from(table: &TableLayout) -> Self {
        Self {
            name: table.name,
            path: format!("{}.csv", table.name),
            profile: "tabular-data-resource",
            format: "csv",
            mediatype: "text/csv",
            encoding: "utf-8",
            schema: Schema {
                fields: table
                    .fields
                    .iter()
                    .map(|&(name, field_type)| Field { name, field_type })
                    .collect(),
                primary_key: table.primary_key,
            },
        }
    }
}

/// Data package manifest describing the exported CSV files.
#[derive(Debug, Serialize)]
pub struct DataPackage {
    profile: &'static str,
    name: &'static str,
    title: &'static str,
    description: &'static str,
    homepage: &'static str,
    version: &'static str,
    licenses: Vec<License>,
    sources: Vec<Source>,
    contributors: Vec<Contributor>,
    keywords: Vec<&'static str>,
    created: String,
    resources: Vec<Resource>,
}

impl DataPackage {
    pub fn new(created: String) -> Self {
        Self {
            profile: "data-package",
            name: "ambience2abm_data",
            title: "AmBIENCe2ABM building stock data",
            description: "A building stock data package processed from AmBIENCe project EU27 data for use with ArchetypeBuildingModel.jl.",
            homepage: "https://github.com/spine-tools/AmBIENCe2ABM.jl",
            version: env!("CARGO_PKG_VERSION"),
            licenses: vec![License {
                name: "CC-BY-4.0",
                path: "https://creativecommons.org/licenses/by/4.0/",
                title: "Creative Commons Attribution 4.0",
            }],
            sources: vec![
                Source {
                    name: "D4.1 Database of grey-box model parameter values for EU building typologies",
                    web: "https://ambience-project.eu/wp-content/uploads/2022/02/AmBIENCe_D4.1_Database-of-grey-box-model-parameter-values-for-EU-building-typologies-update-version-2-submitted.pdf",
                },
                Source {
                    name: "Database of grey-box model parameters",
                    web: "https://ambience-project.eu/wp-content/uploads/2022/03/AmBIENCe_Deliverable-4.1_Database-of-greybox-model-parameter-values.xlsx",
                },
                Source {
                    name: "D4.2 - Buildings Energy Systems Database EU27",
                    web: "https://ambience-project.eu/wp-content/uploads/2022/06/AmBIENCe-WP4-T4.2-Buildings_Energy_systems_Database_EU271.xlsx",
                },
            ],
            contributors: vec![Contributor {
                title: "Topi Rasku",
                email: "topi.rasku@vtt.fi",
                path: "https://cris.vtt.fi/en/persons/topi-rasku",
                role: "author",
                organization: "VTT Technical Research Centre of Finland Ltd",
            }],
            keywords: vec![
                "European Union",
                "EU",
                "Building stock",
                "Building structures",
                "Fenestration",
                "Construction",
                "AmBIENCe",
                "Hotmaps",
                "Mopo",
                "ABM.jl",
                "ArchetypeBuildingModel.jl",
            ],
            created,
            resources: TABLES.iter().map(Resource::from).collect(),
        }
    }
}

/// Write `datapackage.json`, timestamped with the local time.
#[instrument(skip_all)]
pub fn create_datapackage(output: &impl Output) -> anyhow::Result<()> {
    if output.is_noop() {
        return Ok(());
    }

    let created = Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string();
    let mut writer = output.writer_for_file("datapackage", "json")?;
    serde_json::to_writer_pretty(&mut writer, &DataPackage::new(created))?;
    writer.flush()?;

    info!("wrote data package manifest");
    Ok(())
}
