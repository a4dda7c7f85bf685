pub mod memory;
pub mod models;
pub mod postgres;
pub mod registry;
pub mod store;

pub use memory::MemoryItemStore;
pub use models::item::{Item, ItemPatch, NewItem};
pub use postgres::PgItemStore;
pub use registry::{CategoryHandle, CategoryRegistry};
pub use store::{ItemStore, StoreError};
