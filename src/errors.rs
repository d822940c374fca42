use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbmError {
    #[error("Input data did not match the expected schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("Reference data lookup failed: {0}")]
    Lookup(#[from] LookupError),
    #[error("Error reading or writing CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("Error reading or writing JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A required column or value was absent from (or malformed in) an input table.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("column '{column}' missing from table '{table}'")]
    MissingColumn { table: String, column: String },
    #[error("column '{column}' of table '{table}' could not be parsed: {reason}")]
    InvalidValue {
        table: String,
        column: String,
        reason: String,
    },
    #[error("table '{0}' contains no rows")]
    EmptyTable(String),
}

impl SchemaError {
    pub(crate) fn missing_column(table: &str, column: &str) -> Self {
        Self::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub(crate) fn invalid_value(table: &str, column: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            table: table.to_string(),
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}

/// A record referred to a key that the static reference tables do not contain.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("structure type '{0}' not found")]
    StructureType(String),
    #[error("no fenestration properties for glazing type '{glazing_type}' (coated: {coated})")]
    Fenestration { glazing_type: String, coated: bool },
    #[error("no shapefile mapping for location '{0}'")]
    ShapefileMapping(String),
    #[error("no building type mapping for building type '{0}'")]
    BuildingTypeMapping(String),
}

/// The heating system prevalencies of a record could not be normalized.
///
/// This is reported rather than returned: the affected prevalencies become NaN
/// and the record is kept.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("heating system prevalencies of building '{building_code}' sum to {prevalency_sum}, normalized values are not finite")]
pub struct ConsistencyError {
    pub building_code: String,
    pub prevalency_sum: f64,
}
