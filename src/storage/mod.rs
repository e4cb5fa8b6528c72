pub mod sqlite;
pub mod traits;

pub use sqlite::{SqliteStorage, SqliteStripRepository};
pub use traits::StripRepository;
