//! Record store implementation.
//!
//! Users, posts and comments are held in ordered in-memory collections
//! with point lookup, linear filtering, insert, in-place update and removal.

mod filter;
mod store;

pub use filter::contains_ignore_case;
pub use store::RecordStore;
