pub mod page_controller;
pub mod view;


pub use page_controller::PredictionPageController;
