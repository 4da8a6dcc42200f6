pub mod airline;
pub mod prediction;
pub mod stats;
pub mod unit_system;
