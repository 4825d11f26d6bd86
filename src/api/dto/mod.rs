//! Data Transfer Objects for HTTP requests and responses.
//!
//! DTOs use Serde for (de)serialization and validator for input validation.

pub mod create_link;
pub mod envelope;
