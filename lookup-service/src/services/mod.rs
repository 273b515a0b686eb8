pub mod database;
pub mod lookup;
pub mod metrics;
pub mod store;

pub use database::{region_read_preference, MongoDocumentStore, REGION_TAG};
pub use lookup::RegionalHandler;
pub use metrics::{get_metrics, init_metrics};
pub use store::{DocumentStore, MemoryDocumentStore};
