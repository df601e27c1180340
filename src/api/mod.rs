//! Collaborator surface
//!
//! Maps core operations and errors to `(status, body)` pairs. Transport,
//! upload parsing and static serving live outside this crate.

mod handler;
mod response;

pub use handler::HotelApi;
pub use response::ApiResponse;
