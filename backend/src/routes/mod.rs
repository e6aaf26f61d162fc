//! Serializable result types, grouped by the page that consumes them.
//!
//! Each module also carries the route path constants its handlers mount on.

pub mod distribution;
pub mod flights;
pub mod landing;
pub mod pilots;
pub mod rankings;
pub mod records;
pub mod takeoffs;
pub mod trends;
pub mod wings;
