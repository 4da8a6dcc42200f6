pub mod airport_index_repository;
pub mod preference_repository;
