//! Embedded SQL storage for the catalog service.
//!
//! [`SQLStore`] is the only storage interface the service layer sees.
//! [`SqliteStore`] backs it with a single bundled SQLite connection.

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::SQLError;
pub use sqlite::SqliteStore;
pub use traits::{Row, SQLStore, Value};
