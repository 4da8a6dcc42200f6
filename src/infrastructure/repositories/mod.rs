pub mod airport_index_fs_repository;
pub mod preference_fs_repository;

// Re-exportar para facilitar acceso
pub use airport_index_fs_repository::AirportIndexFsRepository;
pub use preference_fs_repository::{InMemoryPreferenceRepository, PreferenceFsRepository};
