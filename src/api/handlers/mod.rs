//! HTTP request handlers.

pub mod create;
pub mod redirect;
pub mod reload;

pub use create::create_handler;
pub use redirect::{index_handler, not_found_handler, redirect_handler};
pub use reload::reload_handler;
