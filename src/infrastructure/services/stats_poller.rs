use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::application::dtos::view_models::StatsView;
use crate::application::ports::outbound::ApiError;
use crate::application::services::stats_service::StatsService;

/// Receives the outcome of every refresh
pub type StatsCallback = Arc<dyn Fn(Result<StatsView, ApiError>) + Send + Sync>;

/// Periodic refresh of the dashboard statistics
pub struct StatsPoller {
    stats_service: Arc<StatsService>,
    interval: Duration,
}

/// Stops the polling task when cancelled or dropped
pub struct PollerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel and wait for the task to finish
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

impl StatsPoller {
    pub fn new(stats_service: Arc<StatsService>, interval: Duration) -> Self {
        Self {
            stats_service,
            // Mínimo 1 segundo
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    /// Starts polling: one refresh right away, then one per interval
    #[instrument(skip(self, on_update))]
    pub fn start(&self, on_update: StatsCallback) -> PollerHandle {
        let stats_service = self.stats_service.clone();
        let interval_duration = self.interval;
        let token = CancellationToken::new();
        let task_token = token.clone();

        info!("Starting statistics polling every {:?}", interval_duration);

        let task = tokio::spawn(async move {
            // El primer tick se completa de inmediato
            let mut interval = time::interval(interval_duration);
            interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!("Statistics polling cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        debug!("Refreshing dashboard statistics");
                        let result = tokio::select! {
                            _ = task_token.cancelled() => break,
                            result = stats_service.refresh() => result,
                        };
                        on_update(result);
                    }
                }
            }
        });

        PollerHandle {
            token,
            task: Some(task),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::application::ports::outbound::MockPredictionApiPort;
    use crate::application::services::i18n_application_service::I18nApplicationService;
    use crate::domain::entities::stats::DashboardStats;
    use crate::domain::services::i18n_service::Locale;
    use crate::infrastructure::repositories::preference_fs_repository::InMemoryPreferenceRepository;
    use crate::infrastructure::services::file_system_i18n_service::FileSystemI18nService;

    fn stats_service(calls: Arc<AtomicUsize>) -> Arc<StatsService> {
        let mut api = MockPredictionApiPort::new();
        api.expect_stats().returning(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(DashboardStats::default())
        });
        let i18n = Arc::new(I18nApplicationService::new(
            Arc::new(FileSystemI18nService::embedded().unwrap()),
            Arc::new(InMemoryPreferenceRepository::new()),
            Locale::Spanish,
        ));
        Arc::new(StatsService::new(Arc::new(api), i18n))
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_immediately_then_on_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let updates = Arc::new(AtomicUsize::new(0));
        let seen = updates.clone();

        let poller = StatsPoller::new(stats_service(calls.clone()), Duration::from_secs(300));
        let handle = poller.start(Arc::new(move |result| {
            assert!(result.is_ok());
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(300)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(updates.load(Ordering::SeqCst), 2);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_polling() {
        let calls = Arc::new(AtomicUsize::new(0));
        let poller = StatsPoller::new(stats_service(calls.clone()), Duration::from_secs(300));
        let handle = poller.start(Arc::new(|_| {}));

        time::sleep(Duration::from_millis(10)).await;
        let token = handle.token.clone();
        drop(handle);
        assert!(token.is_cancelled());

        time::sleep(Duration::from_secs(900)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
