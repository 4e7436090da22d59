pub mod ingest;
pub mod store;
pub mod types;

pub use ingest::{from_persisted_records, from_seed_records, records_from_value, RawComponent};
pub use store::ComponentStore;
pub use types::{placeholder_name, Component, ComponentId, FieldEdit};
