//! Analytics engines.
//!
//! Everything in here is a pure function over a slice of [`FlightView`] rows
//! already scoped and filtered to the primary view by the repository. The
//! async orchestration that fetches those rows lives in [`crate::db::services`].
//!
//! [`FlightView`]: crate::models::FlightView

pub mod filter;
pub mod histogram;
pub mod home;
pub mod listing;
pub mod numeric;
pub mod pagination;
pub mod pilots;
pub mod rankings;
pub mod records;
pub mod rollup;
pub mod time_buckets;

pub use filter::{Constraint, FilterKey, FlightFilter, FlightPredicate, FlightQuery, QueryError};
pub use histogram::distance_histogram;
pub use listing::list_flights;
pub use pagination::{PageRequest, SortDirection, SortKey, DEFAULT_PAGE_SIZE};
