//! The Listing Engine: filter, sort and paginate an in-memory job collection.
//!
//! `filter`, `sort` and `page` are pure functions over slices. `engine` ties
//! them to an explicit state and reducer, and `session` runs a listing as a
//! long-lived task for clients that stream input.

pub mod engine;
pub mod filter;
pub mod handlers;
pub mod page;
pub mod session;
pub mod sort;
