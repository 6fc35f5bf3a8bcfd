pub mod payload;
pub mod slot_cache;
pub mod staleness;
