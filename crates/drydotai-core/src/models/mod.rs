//! Wrappers over the JSON objects the server returns.
//!
//! - `Item`: any schema-less record, with loosely-cased field lookup
//! - `ItemType`: what `create_item` should make
//! - `Space`: a workspace plus the client used to reach it

pub mod item;
pub mod space;

pub use item::{Item, ItemType};
pub use space::Space;
