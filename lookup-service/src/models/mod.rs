pub mod lookup;
pub mod region;

pub use lookup::{is_truthy, not_found_body, LookupOutcome, PING_ACK, PING_KEY};
pub use region::{Region, RegionList};
