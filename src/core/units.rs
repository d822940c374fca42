pub const SECONDS_PER_MINUTE: u32 = 60;
pub const SECONDS_PER_HOUR: u32 = 3_600;
pub const HOURS_PER_DAY: u32 = 24;
pub const SECONDS_PER_DAY: u32 = SECONDS_PER_HOUR * HOURS_PER_DAY;

/// Period of variations for the effective thickness method of EN ISO 13786:2017
/// Annex C.2.4, in seconds (14 days).
pub const DEFAULT_PERIOD_OF_VARIATIONS: f64 = (14 * SECONDS_PER_DAY) as f64;

/// Depth of the aggregated thermal mass node within a structure, as a fraction of
/// the thermal resistance from the indoor surface to the middle of the insulation.
pub const DEFAULT_INTERIOR_NODE_DEPTH: f64 = 0.1;

/// Year the AmBIENCe building stock data represents.
pub const DEFAULT_BUILDING_STOCK_YEAR: i32 = 2016;
