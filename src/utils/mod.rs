pub mod coerce;
pub mod time;
pub mod validation;
