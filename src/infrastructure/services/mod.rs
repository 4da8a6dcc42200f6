pub mod file_system_i18n_service;
pub mod http_prediction_client;
pub mod stats_poller;
