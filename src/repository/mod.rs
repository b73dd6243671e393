pub mod blocklist;
pub mod cache;
