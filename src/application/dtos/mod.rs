pub mod i18n_dto;
pub mod prediction_dto;
pub mod stats_dto;
pub mod view_models;
