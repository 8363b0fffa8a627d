//! Storage collaborators (SQLite-backed keyed stores).

pub mod product_store;
pub mod user_store;

pub use product_store::ProductStore;
pub use user_store::UserStore;
