pub mod climate_data;
pub mod date_range;
pub mod schema;

pub use climate_data::{
    ClimateAccess, ClimateData, Error, Precipitation, TemperatureObservation, TemperatureRequest,
    TemperatureSummary,
};
pub use date_range::{DateRange, InvalidDate, DATE_FORMAT};
pub use schema::{SchemaMismatch, TableSchema};
