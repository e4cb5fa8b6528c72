mod connection;
mod strip_repository;

pub use connection::SqliteStorage;
pub use strip_repository::SqliteStripRepository;
