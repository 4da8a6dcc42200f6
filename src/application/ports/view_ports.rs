use crate::application::dtos::view_models::{ResultView, StatsView};
use crate::application::services::cascade_service::CascadeSnapshot;

/// Form controls that can be singled out by a notice or receive focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Airline,
    Origin,
    Destination,
    Departure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message for the user. Replaces the blocking alerts of a browser UI: the
/// same information (field and reason) reaches the view without blocking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub field: Option<FormField>,
    pub message: String,
}

impl Notice {
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self { level: NoticeLevel::Error, field: None, message: message.into() }
    }

    pub fn warning<S: Into<String>>(message: S) -> Self {
        Self { level: NoticeLevel::Warning, field: None, message: message.into() }
    }

    pub fn for_field(mut self, field: FormField) -> Self {
        self.field = Some(field);
        self
    }
}

/// Backend availability shown in the page header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIndicator {
    Operational,
    Limited,
}

impl StatusIndicator {
    pub fn translation_key(&self) -> &'static str {
        match self {
            StatusIndicator::Operational => "header.status.operational",
            StatusIndicator::Limited => "header.status.limited",
        }
    }
}

/// Everything the page controller needs from the surface it drives
///
/// Implemented by the terminal view in this crate; a browser or GUI front end
/// would implement it over its own widgets.
#[cfg_attr(any(test, feature = "test_utils"), mockall::automock)]
pub trait PredictionView: Send + Sync + 'static {
    /// Airline choices as (code, display name)
    fn set_airline_options(&self, options: &[(String, String)]);

    /// Origin/destination option lists, selections and enabled flags
    fn render_selectors(&self, snapshot: &CascadeSnapshot);

    fn set_loading(&self, loading: bool);

    fn set_submit_enabled(&self, enabled: bool);

    fn show_result(&self, view: &ResultView);

    fn hide_result(&self);

    fn show_stats(&self, view: &StatsView);

    fn set_status(&self, status: StatusIndicator, label: &str);

    fn notify(&self, notice: Notice);

    fn focus(&self, field: FormField);
}
