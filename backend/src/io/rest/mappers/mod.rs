//! Conversions between the `shared` wire types and domain models/commands.

pub mod activity_mapper;
pub mod admin_mapper;
pub mod client_mapper;
pub mod enrollment_mapper;
pub mod evaluation_mapper;
pub mod guardian_mapper;
