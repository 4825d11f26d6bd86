//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide the operations HTTP handlers
//! and the admin CLI call.
//!
//! # Available Services
//!
//! - [`services::id_allocator::IdAllocator`] - Random unused id selection
//! - [`services::link_service::LinkService`] - Short link creation and resolution

pub mod services;
