//! SQLite-backed storage implementation.

mod achievements;
mod categories;
mod codec;
mod ledger;
mod rewards;
pub mod schema;
mod store;
mod tasks;
mod transaction;
mod users;

pub use categories::{DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON};
pub use store::SqliteStore;
