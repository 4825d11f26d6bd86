//! Core domain entities.
//!
//! - [`Link`] - A stored mapping from id to target URL
//! - [`NewLink`] - The record written when a link is created
//! - [`LinkStatus`] - Whether a stored link redirects, and why not

pub mod link;

pub use link::{Link, LinkStatus, NewLink};
