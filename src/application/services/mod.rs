//! Business logic services for the application layer.

pub mod id_allocator;
pub mod link_service;

pub use id_allocator::{Allocation, IdAllocator};
pub use link_service::LinkService;
