use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::common::errors::{DomainError, Result};
use crate::domain::entities::airline::AirportIndex;
use crate::domain::repositories::airport_index_repository::AirportIndexRepository;

/// Reads the airline→airport document from a JSON file
pub struct AirportIndexFsRepository {
    path: PathBuf,
}

impl AirportIndexFsRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl AirportIndexRepository for AirportIndexFsRepository {
    async fn load_index(&self) -> Result<AirportIndex> {
        tracing::info!("Loading airport index from {:?}", self.path);

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::configuration("AirportIndex", "Airport data file could not be read")
                .with_id(self.path.display().to_string())
                .with_source(e)
        })?;

        AirportIndex::from_json(&content).map_err(|e| {
            DomainError::configuration("AirportIndex", "Airport data file is not valid JSON")
                .with_id(self.path.display().to_string())
                .with_source(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::ErrorKind;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("airports.json");
        std::fs::write(&path, r#"{"9E": {"ORIGIN": ["JFK"], "DEST": ["ABQ"]}}"#).unwrap();

        let index = AirportIndexFsRepository::new(path).load_index().await.unwrap();
        assert_eq!(index.airlines(), vec!["9E"]);
    }

    #[tokio::test]
    async fn test_missing_and_invalid_files_are_configuration_errors() {
        let dir = tempdir().unwrap();
        let missing = AirportIndexFsRepository::new(dir.path().join("nope.json"));
        assert_eq!(missing.load_index().await.unwrap_err().kind, ErrorKind::Configuration);

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{").unwrap();
        let invalid = AirportIndexFsRepository::new(path);
        assert_eq!(invalid.load_index().await.unwrap_err().kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_bundled_data_file_parses() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static/aerolinea_origin_dest.json");
        let index = AirportIndexFsRepository::new(path).load_index().await.unwrap();
        let airports = index.get("9E").unwrap();
        assert!(airports.origin_airports.contains("JFK"));
        assert!(!airports.origin_airports.contains("ABQ"));
        assert!(airports.destination_airports.contains("ABQ"));
    }
}
