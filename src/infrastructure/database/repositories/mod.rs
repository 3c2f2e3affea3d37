//! Database repository implementations
//!
//! The SeaORM engine behind `DatabaseRepo` and the deterministic fake used
//! by handler tests.

pub mod database_repo;
pub mod test_repo;

pub use database_repo::SeaOrmDatabaseRepo;
pub use test_repo::TestDatabaseRepo;
