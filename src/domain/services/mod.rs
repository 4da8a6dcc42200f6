pub mod date_format;
pub mod i18n_service;
pub mod unit_service;
pub mod weather_conditions;
