use crate::core::record::{ArchetypeKey, Record};
use crate::core::summation::fsum;
use indexmap::IndexMap;
use tracing::{debug, instrument};

/// Total floor area of each archetype over all of its material combinations.
pub fn total_floor_area_by_archetype(records: &[Record]) -> IndexMap<ArchetypeKey, f64> {
    let mut areas: IndexMap<ArchetypeKey, Vec<f64>> = IndexMap::new();
    for record in records {
        let area = record.average_gross_floor_area_m2_per_building;
        let archetype_areas = areas.entry(record.archetype_key()).or_default();
        // missing areas do not count towards the archetype total
        if !area.is_nan() {
            archetype_areas.push(area);
        }
    }
    areas
        .into_iter()
        .map(|(archetype, areas)| (archetype, fsum(areas)))
        .collect()
}

/// Set `material_combination_weight` on every record: its share of the floor area of its archetype.
///
/// Weights are recomputed from scratch, so this must run again whenever archetype membership changes.
#[instrument(skip_all)]
pub fn assign_material_combination_weights(mut records: Vec<Record>) -> Vec<Record> {
    let totals = total_floor_area_by_archetype(&records);
    debug!(
        "weighting {} records across {} archetypes",
        records.len(),
        totals.len()
    );

    for record in records.iter_mut() {
        let total = totals[&record.archetype_key()];
        record.material_combination_weight =
            Some(record.average_gross_floor_area_m2_per_building / total);
    }

    records
}
