//! Filtered, sorted and paginated flight listing.

use super::filter::FlightQuery;
use super::pagination::{paginate, sort_flights};
use crate::api::{FlightSummary, Page};
use crate::models::FlightView;

/// Run a listing query over a scan of the primary view.
pub fn list_flights(flights: Vec<FlightView>, query: &FlightQuery) -> Page<FlightSummary> {
    let predicate = query.predicate();
    let mut matching: Vec<FlightView> = flights
        .into_iter()
        .filter(|f| predicate.matches(f))
        .collect();

    sort_flights(&mut matching, query.page.sort_key, query.page.direction);
    log::debug!(
        "Flight listing matched {} rows (page {}, size {})",
        matching.len(),
        query.page.page,
        query.page.page_size
    );

    paginate(matching, &query.page).map(|f| FlightSummary::from(&f))
}
