//! Domain entities, their stored records and their partial-update patches.
//!
//! A `*Record` is exactly what lands in the record store; ids and
//! timestamps are owned by the store and only appear on the domain types.

pub mod activity;
pub mod administrator;
pub mod client;
pub mod enrollment;
pub mod evaluation;
pub mod guardian;
