pub mod aggregation;
pub mod dataset;
pub mod dimensions;
pub mod extrapolation;
pub mod normalizer;
pub mod record;
pub mod reference;
pub mod structure_type;
pub mod summation;
pub mod thermal_physics;
pub mod units;
pub mod weighting;
