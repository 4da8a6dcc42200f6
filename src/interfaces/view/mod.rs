pub mod console_view;
pub mod document;
pub mod page;
pub mod text_renderer;
