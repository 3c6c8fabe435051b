//! # IO Module
//!
//! Interface layer between HTTP clients and the domain services.
//!
//! Requests arrive as the wire types of the `shared` crate, are mapped into
//! domain commands, and the domain results are mapped back into wire types.
//! No business rule lives here.
//!
//! ## Current Implementation
//!
//! - **Web Framework**: Axum with `State<AppState>` extraction
//! - **Serialization**: Serde JSON bodies and query strings
//! - **Error Handling**: One `IntoResponse` implementation for `DomainError`

pub mod rest;
