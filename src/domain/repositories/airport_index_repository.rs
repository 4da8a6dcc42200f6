use async_trait::async_trait;

use crate::common::errors::Result;
use crate::domain::entities::airline::AirportIndex;

/// Source of the airline→airport lookup table
#[cfg_attr(any(test, feature = "test_utils"), mockall::automock)]
#[async_trait]
pub trait AirportIndexRepository: Send + Sync + 'static {
    /// Load the whole index. Called once at startup.
    async fn load_index(&self) -> Result<AirportIndex>;
}
