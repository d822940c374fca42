use crate::core::record::{ArchetypeKey, Record, HEATING_SYSTEM_SLOTS};
use crate::core::reference::ReferenceData;
use crate::core::structure_type::{StructureType, StructureTypes};
use crate::core::summation::fsum;
use crate::core::thermal_physics::ThermalPhysics;
use crate::errors::LookupError;
use itertools::iproduct;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BuildingStockKey {
    pub building_stock: String,
    pub building_type: String,
    pub building_period: String,
    pub location_id: String,
    pub heat_source: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuildingStockStatistic {
    pub number_of_buildings: f64,
    pub average_gross_floor_area_m2_per_building: f64,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StructureKey {
    pub building_type: String,
    pub building_period: String,
    pub location_id: String,
    pub structure_type: String,
}

impl StructureKey {
    fn new(archetype: ArchetypeKey, structure_type: &str) -> Self {
        let ArchetypeKey {
            building_type,
            building_period,
            location_id,
        } = archetype;
        Self {
            building_type,
            building_period,
            location_id,
            structure_type: structure_type.to_string(),
        }
    }
}

/// Area-weighted structural parameters of an archetype.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StructureStatistic {
    pub design_u_value_w_m2k: f64,
    pub effective_thermal_mass_j_m2k: f64,
    pub linear_thermal_bridges_w_mk: f64,
    pub external_u_value_to_ambient_air_w_m2k: f64,
    pub external_u_value_to_ground_w_m2k: f64,
    pub internal_u_value_to_structure_w_m2k: f64,
    pub total_u_value_w_m2k: f64,
}

/// Rows that can be summed column by column.
pub trait GroupSum: Sized {
    fn sum_rows(rows: &[Self]) -> Self;
}

impl GroupSum for StructureStatistic {
    fn sum_rows(rows: &[Self]) -> Self {
        let column = |field: fn(&Self) -> f64| fsum(rows.iter().map(field));
        Self {
            design_u_value_w_m2k: column(|row| row.design_u_value_w_m2k),
            effective_thermal_mass_j_m2k: column(|row| row.effective_thermal_mass_j_m2k),
            linear_thermal_bridges_w_mk: column(|row| row.linear_thermal_bridges_w_mk),
            external_u_value_to_ambient_air_w_m2k: column(|row| {
                row.external_u_value_to_ambient_air_w_m2k
            }),
            external_u_value_to_ground_w_m2k: column(|row| row.external_u_value_to_ground_w_m2k),
            internal_u_value_to_structure_w_m2k: column(|row| {
                row.internal_u_value_to_structure_w_m2k
            }),
            total_u_value_w_m2k: column(|row| row.total_u_value_w_m2k),
        }
    }
}

/// Area-weighted ventilation and window parameters of an archetype.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VentilationFenestrationStatistic {
    pub hru_efficiency: f64,
    pub infiltration_rate_1_h: f64,
    pub total_normal_solar_energy_transmittance: f64,
    pub ventilation_rate_1_h: f64,
    pub window_u_value_w_m2k: f64,
}

impl GroupSum for VentilationFenestrationStatistic {
    fn sum_rows(rows: &[Self]) -> Self {
        let column = |field: fn(&Self) -> f64| fsum(rows.iter().map(field));
        Self {
            hru_efficiency: column(|row| row.hru_efficiency),
            infiltration_rate_1_h: column(|row| row.infiltration_rate_1_h),
            total_normal_solar_energy_transmittance: column(|row| {
                row.total_normal_solar_energy_transmittance
            }),
            ventilation_rate_1_h: column(|row| row.ventilation_rate_1_h),
            window_u_value_w_m2k: column(|row| row.window_u_value_w_m2k),
        }
    }
}

pub type BuildingStockStatistics = BTreeMap<BuildingStockKey, BuildingStockStatistic>;
pub type StructureStatistics = BTreeMap<StructureKey, StructureStatistic>;
pub type VentilationFenestrationStatistics =
    BTreeMap<ArchetypeKey, VentilationFenestrationStatistic>;

/// Sum rows sharing a key. Non-finite values propagate into the sums.
pub fn group_sum<K: Ord, V: GroupSum>(rows: impl IntoIterator<Item = (K, V)>) -> BTreeMap<K, V> {
    let mut groups: BTreeMap<K, Vec<V>> = BTreeMap::new();
    for (key, value) in rows {
        groups.entry(key).or_default().push(value);
    }
    groups
        .into_iter()
        .map(|(key, rows)| (key, V::sum_rows(&rows)))
        .collect()
}

/// Sum the number of buildings and average the floor area of rows sharing a key.
pub fn group_building_stock_rows(
    rows: impl IntoIterator<Item = (BuildingStockKey, BuildingStockStatistic)>,
) -> BuildingStockStatistics {
    let mut groups: BTreeMap<BuildingStockKey, Vec<BuildingStockStatistic>> = BTreeMap::new();
    for (key, row) in rows {
        groups.entry(key).or_default().push(row);
    }

    groups
        .into_iter()
        .map(|(key, rows)| {
            let floor_area = fsum(
                rows.iter()
                    .map(|row| row.average_gross_floor_area_m2_per_building),
            );
            (
                key,
                BuildingStockStatistic {
                    number_of_buildings: fsum(rows.iter().map(|row| row.number_of_buildings)),
                    average_gross_floor_area_m2_per_building: floor_area / rows.len() as f64,
                },
            )
        })
        .collect()
}

/// Number of buildings per building stock, archetype and heat source.
///
/// Every record is split over its ranked heating systems by prevalency. Slots without a
/// heat source, or with a NaN value, are dropped as invalid heating system data.
#[instrument(skip_all)]
pub fn building_stock_statistics(records: &[Record]) -> BuildingStockStatistics {
    let rows = iproduct!(records, 0..HEATING_SYSTEM_SLOTS).filter_map(|(record, slot)| {
        let heating_system = &record.heating_systems[slot];
        let heat_source = heating_system.heat_source.clone()?;
        let row = BuildingStockStatistic {
            number_of_buildings: record.number_of_buildings * heating_system.prevalency,
            average_gross_floor_area_m2_per_building: record
                .average_gross_floor_area_m2_per_building,
        };
        if row.number_of_buildings.is_nan() || row.average_gross_floor_area_m2_per_building.is_nan()
        {
            debug!(
                "dropping heating system {} of building {} with invalid data",
                slot + 1,
                record.building_code
            );
            return None;
        }
        Some((
            BuildingStockKey {
                building_stock: record.building_stock.clone(),
                building_type: record.building_type.clone(),
                building_period: record.building_period.clone(),
                location_id: record.location_id.clone(),
                heat_source,
            },
            row,
        ))
    });

    group_building_stock_rows(rows)
}

/// The weighted contribution of one record to one structure type of its archetype.
pub fn weighted_structure_statistic(
    record: &Record,
    structure_type: &StructureType,
    physics: &ThermalPhysics,
) -> StructureStatistic {
    let weight = record.weight();
    let properties = record.envelope.get(structure_type.mapping);
    let u_values = physics.u_values(structure_type, properties);

    StructureStatistic {
        design_u_value_w_m2k: weight * properties.design_u_value_w_m2k,
        effective_thermal_mass_j_m2k: weight
            * physics.effective_thermal_mass(structure_type, properties),
        linear_thermal_bridges_w_mk: weight * structure_type.linear_thermal_bridge_w_mk,
        external_u_value_to_ambient_air_w_m2k: weight * u_values.exterior_to_ambient_air,
        external_u_value_to_ground_w_m2k: weight * u_values.exterior_to_ground,
        internal_u_value_to_structure_w_m2k: weight * u_values.interior,
        total_u_value_w_m2k: weight * u_values.total,
    }
}

/// Structural parameters per archetype and structure type, summed over material combinations.
///
/// The physics is evaluated in parallel; rows are summed in record order.
#[instrument(skip_all)]
pub fn structure_statistics(
    records: &[Record],
    structure_types: &StructureTypes,
    physics: &ThermalPhysics,
) -> StructureStatistics {
    let rows = records
        .par_iter()
        .flat_map_iter(|record| {
            let archetype = record.archetype_key();
            structure_types.iter().map(move |structure_type| {
                (
                    StructureKey::new(archetype.clone(), &structure_type.name),
                    weighted_structure_statistic(record, structure_type, physics),
                )
            })
        })
        .collect::<Vec<_>>();
    debug!("evaluated {} structure rows", rows.len());

    group_sum(rows)
}

/// Ventilation and fenestration parameters per archetype.
#[instrument(skip_all)]
pub fn ventilation_and_fenestration_statistics(
    records: &[Record],
    reference_data: &ReferenceData,
) -> Result<VentilationFenestrationStatistics, LookupError> {
    let ventilation = &reference_data.ventilation;
    let rows = records
        .iter()
        .map(|record| {
            let weight = record.weight();
            let fenestration = reference_data.fenestration_for(&record.window)?;
            Ok((
                record.archetype_key(),
                VentilationFenestrationStatistic {
                    hru_efficiency: weight * ventilation.hru_efficiency,
                    infiltration_rate_1_h: weight * ventilation.infiltration_rate_1_h,
                    total_normal_solar_energy_transmittance: weight
                        * fenestration.normal_solar_energy_transmittance
                        * (1. - fenestration.frame_area_fraction),
                    ventilation_rate_1_h: weight * ventilation.ventilation_rate_1_h,
                    window_u_value_w_m2k: weight * record.window.u_value_w_m2k,
                },
            ))
        })
        .collect::<Result<Vec<_>, LookupError>>()?;

    Ok(group_sum(rows))
}
