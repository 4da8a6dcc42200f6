pub mod dtos;
pub mod ports;
pub mod services;

// Re-exportaciones para facilitar el acceso a los principales puertos
pub use ports::outbound::{ApiError, PredictionApiPort};
pub use ports::view_ports::{FormField, Notice, NoticeLevel, PredictionView, StatusIndicator};
