/*!
 * Local persistence.
 *
 * A SQLite key/value store holding the editor state, the voice-button flag
 * and the user id. Each key holds one value; structured values are JSON.
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

pub use connection::{DatabaseConnection, StoreStats};
pub use models::StorageKey;
pub use repository::Repository;
