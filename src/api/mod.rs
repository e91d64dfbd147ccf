//! HTTP surface: routes, handlers, and the listing page

pub mod audio;
pub mod error;
pub mod images;
pub mod index;
pub mod page;
pub mod router;

pub use error::ApiError;
pub use router::create_router;
