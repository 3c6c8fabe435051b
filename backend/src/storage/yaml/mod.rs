//! File-backed record store: `<data dir>/<collection>/<id>.yaml`

pub mod connection;
pub mod document_store;

#[cfg(test)]
pub mod test_utils;

pub use connection::YamlConnection;
pub use document_store::YamlDocumentStore;
