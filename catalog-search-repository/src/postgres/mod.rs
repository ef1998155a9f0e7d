//! Postgres implementation of the product store.

mod schema;
mod store;

pub use schema::ensure_schema;
pub use store::PgProductStore;
