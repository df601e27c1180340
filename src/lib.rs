//! lodgedb - a filesystem-backed hotel record store
//!
//! One pretty-printed JSON document per hotel record, a directory-scan key
//! index with a derived aggregate cache, shallow merge updates, and
//! append-only image attachment references.

pub mod api;
pub mod attachments;
pub mod config;
pub mod hotels;
