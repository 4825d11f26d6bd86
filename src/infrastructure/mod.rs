//! Infrastructure layer for external integrations.
//!
//! - [`persistence`] - Link Store backends (PostgreSQL and in-memory)

pub mod persistence;
