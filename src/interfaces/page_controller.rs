use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tracing::{debug, info, instrument, warn};

use crate::application::ports::view_ports::{FormField, Notice, PredictionView, StatusIndicator};
use crate::application::services::cascade_service::CascadeSnapshot;
use crate::application::services::prediction_service::{default_departure, SubmitError};
use crate::application::services::subscriptions::SubscriptionId;
use crate::common::di::AppState;
use crate::domain::entities::airline::AIRLINE_CATALOG;
use crate::domain::entities::prediction::{PredictionRequest, PredictionResult};
use crate::domain::entities::unit_system::UnitSystem;
use crate::domain::services::i18n_service::Locale;
use crate::infrastructure::services::stats_poller::{PollerHandle, StatsPoller};
use crate::interfaces::view::document::Document;
use crate::interfaces::view::page::PREDICTION_FORM_ID;

/// Drives the prediction page: form, results, header status and statistics
///
/// Only exists when the page is present (see [`PredictionPageController::attach`]);
/// every method can therefore assume the form controls are there. Language
/// and unit subscriptions are removed on drop, and so is the stats poller.
pub struct PredictionPageController {
    state: AppState,
    view: Arc<dyn PredictionView>,
    document: Mutex<Document>,
    result_visible: AtomicBool,
    status: Mutex<Option<StatusIndicator>>,
    poller: Mutex<Option<PollerHandle>>,
    subscriptions: Mutex<Vec<Subscription>>,
}

enum Subscription {
    Language(SubscriptionId),
    Units(SubscriptionId),
}

/// Restores the submit button and loading indicator on every exit path
struct LoadingGuard<'a>(&'a dyn PredictionView);

impl<'a> LoadingGuard<'a> {
    fn start(view: &'a dyn PredictionView) -> Self {
        view.set_loading(true);
        view.set_submit_enabled(false);
        Self(view)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.set_loading(false);
        self.0.set_submit_enabled(true);
    }
}

impl PredictionPageController {
    /// Capability check: `None` when the document has no prediction form
    pub fn attach(state: &AppState, document: Document, view: Arc<dyn PredictionView>) -> Option<Arc<Self>> {
        if !document.contains_id(PREDICTION_FORM_ID) {
            debug!("No prediction form in document, controller not attached");
            return None;
        }

        let controller = Arc::new(Self {
            state: state.clone(),
            view,
            document: Mutex::new(document),
            result_visible: AtomicBool::new(false),
            status: Mutex::new(None),
            poller: Mutex::new(None),
            subscriptions: Mutex::new(Vec::new()),
        });

        let weak: Weak<Self> = Arc::downgrade(&controller);
        let language_id = state.core.i18n.on_change(move |locale| {
            if let Some(controller) = weak.upgrade() {
                controller.on_language_changed(locale);
            }
        });

        let weak: Weak<Self> = Arc::downgrade(&controller);
        let units_id = state.core.units.on_change(move |unit| {
            if let Some(controller) = weak.upgrade() {
                controller.on_units_changed(unit);
            }
        });

        controller
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend([Subscription::Language(language_id), Subscription::Units(units_id)]);

        info!("Prediction page controller attached");
        Some(controller)
    }

    /// Translates the page and fills the airline list; selectors start disabled
    pub fn initialize(&self) {
        self.apply_translations(self.state.core.i18n.get_language());

        let options: Vec<(String, String)> = AIRLINE_CATALOG
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();
        self.view.set_airline_options(&options);

        let snapshot = self.state.applications.cascade.reset();
        self.view.render_selectors(&snapshot);

        if !self.state.applications.cascade.is_available() {
            self.view.notify(Notice::error(self.state.core.i18n.t("error.airports.data")));
        }
    }

    /// Snapshot of the page as currently translated
    pub fn document(&self) -> Document {
        self.document.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_result_visible(&self) -> bool {
        self.result_visible.load(Ordering::SeqCst)
    }

    fn apply_translations(&self, locale: Locale) {
        let i18n = &self.state.core.i18n;
        let updated = self
            .document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply_translations(&|key: &str| i18n.translate_for(key, locale));
        debug!("{} page elements translated to {}", updated, locale);
    }

    fn show_status(&self, status: StatusIndicator) {
        let label = self.state.core.i18n.t(status.translation_key());
        self.view.set_status(status, &label);
    }

    fn show_result(&self, result: &PredictionResult, locale: Locale, unit: UnitSystem) {
        let view = self.state.applications.renderer.render_for(result, locale, unit);
        self.view.show_result(&view);
        self.result_visible.store(true, Ordering::SeqCst);
    }

    fn rerender_result(&self, locale: Locale, unit: UnitSystem) {
        if !self.is_result_visible() {
            return;
        }
        if let Some(result) = self.state.applications.prediction.last_result() {
            self.show_result(&result, locale, unit);
        }
    }

    fn on_language_changed(&self, locale: Locale) {
        info!("Re-rendering page in {}", locale);
        self.apply_translations(locale);
        self.rerender_result(locale, self.state.core.units.get_unit());

        if let Some(stats) = self.state.applications.stats.render_cached() {
            self.view.show_stats(&stats);
        }

        let status = *self.status.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(status) = status {
            self.show_status(status);
        }
    }

    fn on_units_changed(&self, unit: UnitSystem) {
        debug!("Re-rendering result in {}", unit.as_str());
        self.rerender_result(self.state.core.i18n.get_language(), unit);
    }

    /// Probes the backend and updates the header indicator
    #[instrument(skip(self))]
    pub async fn check_health(&self) -> StatusIndicator {
        let status = self.state.applications.health.check().await;
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = Some(status);
        self.show_status(status);
        status
    }

    /// One statistics refresh, shown in the view
    pub async fn refresh_stats(&self) {
        match self.state.applications.stats.refresh().await {
            Ok(view) => self.view.show_stats(&view),
            Err(_) => self.view.show_stats(&self.state.applications.stats.error_view()),
        }
    }

    /// Starts (or restarts) periodic statistics refresh
    pub fn start_stats_polling(&self, interval: Duration) {
        let poller = StatsPoller::new(self.state.applications.stats.clone(), interval);
        let view = self.view.clone();
        let stats = self.state.applications.stats.clone();
        let handle = poller.start(Arc::new(move |result| match result {
            Ok(stats_view) => view.show_stats(&stats_view),
            Err(_) => view.show_stats(&stats.error_view()),
        }));

        let previous = self
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    pub fn stop_stats_polling(&self) {
        if let Some(handle) = self.poller.lock().unwrap_or_else(PoisonError::into_inner).take() {
            handle.cancel();
        }
    }

    pub fn on_airline_selected(&self, airline: Option<&str>) -> CascadeSnapshot {
        match self.state.applications.cascade.select_airline(airline) {
            Ok(snapshot) => {
                self.view.render_selectors(&snapshot);
                snapshot
            }
            Err(e) => {
                warn!("Airline selection failed: {}", e);
                let snapshot = self.state.applications.cascade.snapshot();
                self.view.render_selectors(&snapshot);
                self.view.notify(
                    Notice::error(e.localize(&self.state.core.i18n)).for_field(FormField::Airline),
                );
                snapshot
            }
        }
    }

    pub fn on_origin_selected(&self, origin: Option<&str>) -> CascadeSnapshot {
        let snapshot = self.state.applications.cascade.select_origin(origin);
        self.view.render_selectors(&snapshot);
        snapshot
    }

    pub fn on_destination_selected(&self, destination: Option<&str>) -> CascadeSnapshot {
        let snapshot = self.state.applications.cascade.select_destination(destination);
        self.view.render_selectors(&snapshot);
        snapshot
    }

    /// Submits the current selection
    ///
    /// Validation problems become a notice plus focus on the offending field.
    /// A failed request keeps whatever result was already on screen.
    #[instrument(skip(self))]
    pub async fn submit(&self, departure: Option<NaiveDateTime>) -> Result<PredictionResult, SubmitError> {
        let snapshot = self.state.applications.cascade.snapshot();
        let request = PredictionRequest::new(
            snapshot.airline.unwrap_or_default(),
            snapshot.origin.unwrap_or_default(),
            snapshot.destination.unwrap_or_default(),
            departure,
        );

        let outcome = match self.state.applications.cascade.validate(&request) {
            Err(e) => Err(SubmitError::from(e)),
            // The running request owns the loading state until it finishes
            Ok(()) if self.state.applications.prediction.is_busy() => Err(SubmitError::Busy),
            Ok(()) => {
                let _loading = LoadingGuard::start(self.view.as_ref());
                self.state.applications.prediction.submit(request).await
            }
        };

        match &outcome {
            Ok(result) => {
                self.show_result(
                    result,
                    self.state.core.i18n.get_language(),
                    self.state.core.units.get_unit(),
                );
            }
            Err(e) => {
                let message = e.user_message(&self.state.core.i18n, &self.state.api.base_url());
                match e {
                    SubmitError::Validation(validation) => {
                        let field = validation.field();
                        self.view.notify(Notice::error(message).for_field(field));
                        self.view.focus(field);
                    }
                    SubmitError::Busy => self.view.notify(Notice::warning(message)),
                    SubmitError::Api(_) => self.view.notify(Notice::error(message)),
                }
            }
        }
        outcome
    }

    /// Clears result, selections and cached prediction; returns the default departure
    pub fn clear_form(&self) -> NaiveDateTime {
        self.state.applications.prediction.clear();
        self.result_visible.store(false, Ordering::SeqCst);
        self.view.hide_result();

        let snapshot = self.state.applications.cascade.reset();
        self.view.render_selectors(&snapshot);

        default_departure(Local::now().naive_local())
    }
}

impl Drop for PredictionPageController {
    fn drop(&mut self) {
        let subscriptions = std::mem::take(
            self.subscriptions.get_mut().unwrap_or_else(PoisonError::into_inner),
        );
        for subscription in subscriptions {
            match subscription {
                Subscription::Language(id) => self.state.core.i18n.unsubscribe(id),
                Subscription::Units(id) => self.state.core.units.unsubscribe(id),
            };
        }
        self.stop_stats_polling();
        debug!("Prediction page controller detached");
    }
}
