//! Database access layer.
//!
//! - `session`: the single lazily-opened, read-only connection
//! - `executor`: the one path every statement takes to the server
//! - `types`: PostgreSQL value decoding

pub mod executor;
pub mod session;
pub mod types;

pub use executor::{QueryExecutor, QueryOutput};
pub use session::{PgSession, SessionGuard};
pub use types::CellValue;
