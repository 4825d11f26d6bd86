//! Helpers shared across layers.
//!
//! - [`base62`] - Token codec over the custom 62-symbol table
//! - [`db_error`] - Classification of database errors

pub mod base62;
pub mod db_error;
