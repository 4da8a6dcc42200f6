use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::application::ports::outbound::PredictionApiPort;
use crate::application::ports::view_ports::StatusIndicator;

/// Backend availability probe behind the header indicator
pub struct HealthService {
    api: Arc<dyn PredictionApiPort>,
}

impl HealthService {
    pub fn new(api: Arc<dyn PredictionApiPort>) -> Self {
        Self { api }
    }

    /// Operational on a 2xx answer, limited on anything else
    #[instrument(skip(self))]
    pub async fn check(&self) -> StatusIndicator {
        match self.api.health().await {
            Ok(()) => {
                info!("Backend connected");
                StatusIndicator::Operational
            }
            Err(e) => {
                warn!("Backend unavailable: {}", e);
                StatusIndicator::Limited
            }
        }
    }
}
