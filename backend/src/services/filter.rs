//! Flight filter compilation.
//!
//! A sparse [`FlightFilter`] is compiled into a [`FlightPredicate`]: a list of
//! typed [`Constraint`]s, one per present field, AND-combined. Nothing here
//! accepts a field name or operator from the caller; the only way in is through
//! the fixed set of [`FilterKey`]s parsed by [`FlightQuery::from_params`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::pagination::{PageRequest, SortDirection, SortKey};
use crate::models::{FlightView, FoldedText, GliderCategory};

/// Malformed caller input, rejected before any data is read.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("Invalid number for '{key}': {value}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("Invalid date for '{key}' (expected YYYY-MM-DD): {value}")]
    InvalidDate { key: &'static str, value: String },

    #[error("Unknown glider category: {0}")]
    InvalidCategory(String),

    #[error("Invalid page value for '{key}': {value}")]
    InvalidPage { key: &'static str, value: String },
}

/// The closed set of parameters a flight query understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Pilot,
    Takeoff,
    DateFrom,
    DateTo,
    DistMin,
    DistMax,
    Type,
    Category,
    SortBy,
    SortDir,
    Page,
    PageSize,
}

impl FilterKey {
    pub const ALL: [FilterKey; 12] = [
        FilterKey::Pilot,
        FilterKey::Takeoff,
        FilterKey::DateFrom,
        FilterKey::DateTo,
        FilterKey::DistMin,
        FilterKey::DistMax,
        FilterKey::Type,
        FilterKey::Category,
        FilterKey::SortBy,
        FilterKey::SortDir,
        FilterKey::Page,
        FilterKey::PageSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Pilot => "pilot",
            FilterKey::Takeoff => "takeoff",
            FilterKey::DateFrom => "dateFrom",
            FilterKey::DateTo => "dateTo",
            FilterKey::DistMin => "distMin",
            FilterKey::DistMax => "distMax",
            FilterKey::Type => "type",
            FilterKey::Category => "category",
            FilterKey::SortBy => "sortBy",
            FilterKey::SortDir => "sortDir",
            FilterKey::Page => "page",
            FilterKey::PageSize => "pageSize",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

/// Sparse set of flight filters. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightFilter {
    pub pilot: Option<String>,
    pub takeoff: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub dist_min: Option<f64>,
    pub dist_max: Option<f64>,
    pub flight_type: Option<String>,
    pub category: Option<GliderCategory>,
}

/// One typed condition over a flight view.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Pilot display name or username contains the needle.
    PilotText(FoldedText),
    /// Takeoff display name contains the needle. Flights without a takeoff never match.
    TakeoffText(FoldedText),
    StartsAtOrAfter(NaiveDateTime),
    /// Exclusive; set to midnight after the last admitted day.
    StartsBefore(NaiveDateTime),
    MinDistance(f64),
    MaxDistance(f64),
    /// Lowercased substring of the flight-type label.
    TypeContains(String),
    Category(GliderCategory),
}

impl Constraint {
    pub fn matches(&self, flight: &FlightView) -> bool {
        match self {
            Constraint::PilotText(needle) => {
                needle.is_contained_in(&flight.pilot.name)
                    || needle.is_contained_in(&flight.pilot.username)
            }
            Constraint::TakeoffText(needle) => flight
                .takeoff
                .as_ref()
                .is_some_and(|t| needle.is_contained_in(&t.name)),
            Constraint::StartsAtOrAfter(bound) => flight.start_time >= *bound,
            Constraint::StartsBefore(bound) => flight.start_time < *bound,
            Constraint::MinDistance(km) => flight.distance_km >= *km,
            Constraint::MaxDistance(km) => flight.distance_km <= *km,
            Constraint::TypeContains(needle) => {
                flight.flight_type.to_lowercase().contains(needle.as_str())
            }
            Constraint::Category(category) => flight.glider.category == *category,
        }
    }
}

/// Conjunction of constraints; empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightPredicate {
    constraints: Vec<Constraint>,
}

impl FlightPredicate {
    pub fn compile(filter: &FlightFilter) -> Self {
        let mut constraints = Vec::new();

        if let Some(pilot) = &filter.pilot {
            constraints.push(Constraint::PilotText(FoldedText::new(pilot)));
        }
        if let Some(takeoff) = &filter.takeoff {
            constraints.push(Constraint::TakeoffText(FoldedText::new(takeoff)));
        }
        if let Some(from) = filter.date_from {
            constraints.push(Constraint::StartsAtOrAfter(from.and_time(NaiveTime::MIN)));
        }
        if let Some(to) = filter.date_to {
            // The last representable date has no following midnight; leave it unbounded.
            if let Some(next) = to.succ_opt() {
                constraints.push(Constraint::StartsBefore(next.and_time(NaiveTime::MIN)));
            }
        }
        if let Some(km) = filter.dist_min {
            constraints.push(Constraint::MinDistance(km));
        }
        if let Some(km) = filter.dist_max {
            constraints.push(Constraint::MaxDistance(km));
        }
        if let Some(flight_type) = &filter.flight_type {
            constraints.push(Constraint::TypeContains(flight_type.to_lowercase()));
        }
        if let Some(category) = filter.category {
            constraints.push(Constraint::Category(category));
        }

        log::debug!("Compiled flight filter into {} constraints", constraints.len());
        Self { constraints }
    }

    pub fn matches(&self, flight: &FlightView) -> bool {
        self.constraints.iter().all(|c| c.matches(flight))
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

/// A parsed flight listing request: filter plus sort and page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlightQuery {
    pub filter: FlightFilter,
    pub page: PageRequest,
}

impl FlightQuery {
    /// Parse raw key/value parameters.
    ///
    /// Unknown keys are ignored and empty values count as absent. Malformed
    /// numbers, dates, categories and page values are rejected.
    pub fn from_params<'a, I>(params: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = FlightQuery::default();
        let mut page = None;
        let mut page_size = None;

        for (raw_key, raw_value) in params {
            let Some(key) = FilterKey::parse(raw_key) else {
                log::debug!("Ignoring unknown flight filter key '{}'", raw_key);
                continue;
            };
            let value = raw_value.trim();
            if value.is_empty() {
                continue;
            }

            let filter = &mut query.filter;
            match key {
                FilterKey::Pilot => filter.pilot = Some(value.to_string()),
                FilterKey::Takeoff => filter.takeoff = Some(value.to_string()),
                FilterKey::DateFrom => filter.date_from = Some(parse_date(key, value)?),
                FilterKey::DateTo => filter.date_to = Some(parse_date(key, value)?),
                FilterKey::DistMin => filter.dist_min = Some(parse_km(key, value)?),
                FilterKey::DistMax => filter.dist_max = Some(parse_km(key, value)?),
                FilterKey::Type => filter.flight_type = Some(value.to_string()),
                FilterKey::Category => {
                    filter.category = Some(
                        value
                            .parse::<GliderCategory>()
                            .map_err(|_| QueryError::InvalidCategory(value.to_string()))?,
                    )
                }
                FilterKey::SortBy => query.page.sort_key = SortKey::from_param(Some(value)),
                FilterKey::SortDir => {
                    query.page.direction = SortDirection::from_param(Some(value))
                }
                FilterKey::Page => page = Some(parse_page(key, value)?),
                FilterKey::PageSize => page_size = Some(parse_page(key, value)?),
            }
        }

        query.page = query.page.with_page(page, page_size);
        Ok(query)
    }

    pub fn predicate(&self) -> FlightPredicate {
        FlightPredicate::compile(&self.filter)
    }
}

fn parse_date(key: FilterKey, value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| QueryError::InvalidDate {
        key: key.as_str(),
        value: value.to_string(),
    })
}

fn parse_km(key: FilterKey, value: &str) -> Result<f64, QueryError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| QueryError::InvalidNumber {
            key: key.as_str(),
            value: value.to_string(),
        })
}

fn parse_page(key: FilterKey, value: &str) -> Result<usize, QueryError> {
    value.parse::<usize>().map_err(|_| QueryError::InvalidPage {
        key: key.as_str(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FlightId, GeographicLocation, GliderId, PilotId, TakeoffId};
    use crate::models::{Glider, Pilot, Takeoff};

    fn view(takeoff: Option<&str>) -> FlightView {
        FlightView {
            id: FlightId::new(1),
            start_time: NaiveDate::from_ymd_opt(2023, 7, 15)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
            distance_km: 80.5,
            score: 70.0,
            airtime: 240,
            flight_type: "FAI triangle".to_string(),
            url: String::new(),
            pilot: Pilot {
                id: PilotId::new(1),
                name: "Ștefan Ionescu".to_string(),
                username: "stefi".to_string(),
            },
            takeoff: takeoff.map(|name| Takeoff {
                id: TakeoffId::new(1),
                name: name.to_string(),
                location: GeographicLocation::new(45.6, 25.5).unwrap(),
            }),
            glider: Glider {
                id: GliderId::new(1),
                name: "Advance Sigma 11".to_string(),
                category: GliderCategory::B,
            },
        }
    }

    fn parse(params: &[(&str, &str)]) -> Result<FlightQuery, QueryError> {
        FlightQuery::from_params(params.iter().copied())
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let predicate = FlightPredicate::compile(&FlightFilter::default());
        assert!(predicate.is_empty());
        assert!(predicate.matches(&view(None)));
    }

    #[test]
    fn test_pilot_search_is_diacritic_insensitive_on_name_or_username() {
        let flight = view(None);
        for needle in ["stefan", "ȘTEFAN", "ionescu", "STEFI"] {
            let filter = FlightFilter {
                pilot: Some(needle.to_string()),
                ..Default::default()
            };
            assert!(FlightPredicate::compile(&filter).matches(&flight), "{}", needle);
        }
    }

    #[test]
    fn test_takeoff_search_never_matches_missing_takeoff() {
        let filter = FlightFilter {
            takeoff: Some("bun".to_string()),
            ..Default::default()
        };
        let predicate = FlightPredicate::compile(&filter);
        assert!(predicate.matches(&view(Some("Bunloc Launch"))));
        assert!(!predicate.matches(&view(None)));
    }

    #[test]
    fn test_date_to_includes_whole_final_day() {
        let day = NaiveDate::from_ymd_opt(2023, 7, 15).unwrap();
        let filter = FlightFilter {
            date_from: Some(day),
            date_to: Some(day),
            ..Default::default()
        };
        assert!(FlightPredicate::compile(&filter).matches(&view(None)));

        let before = FlightFilter {
            date_to: day.pred_opt(),
            ..Default::default()
        };
        assert!(!FlightPredicate::compile(&before).matches(&view(None)));
    }

    #[test]
    fn test_distance_bounds_are_inclusive() {
        let filter = FlightFilter {
            dist_min: Some(80.5),
            dist_max: Some(80.5),
            ..Default::default()
        };
        assert!(FlightPredicate::compile(&filter).matches(&view(None)));
    }

    #[test]
    fn test_type_is_case_insensitive_substring() {
        let filter = FlightFilter {
            flight_type: Some("fai".to_string()),
            ..Default::default()
        };
        assert!(FlightPredicate::compile(&filter).matches(&view(None)));
    }

    #[test]
    fn test_category_is_exact() {
        let filter = FlightFilter {
            category: Some(GliderCategory::C),
            ..Default::default()
        };
        assert!(!FlightPredicate::compile(&filter).matches(&view(None)));
    }

    #[test]
    fn test_from_params_ignores_unknown_and_empty_keys() {
        let query = parse(&[("orderBy", "distance; DROP TABLE"), ("pilot", ""), ("type", " ")])
            .unwrap();
        assert_eq!(query.filter, FlightFilter::default());
        assert!(query.predicate().is_empty());
    }

    #[test]
    fn test_from_params_parses_every_key() {
        let query = parse(&[
            ("pilot", "bob"),
            ("takeoff", "bunloc"),
            ("dateFrom", "2023-01-01"),
            ("dateTo", "2023-12-31"),
            ("distMin", "50"),
            ("distMax", "150.5"),
            ("type", "triangle"),
            ("category", "b"),
            ("sortBy", "distance"),
            ("sortDir", "asc"),
            ("page", "2"),
            ("pageSize", "10"),
        ])
        .unwrap();
        assert_eq!(query.filter.pilot.as_deref(), Some("bob"));
        assert_eq!(query.filter.dist_max, Some(150.5));
        assert_eq!(query.filter.category, Some(GliderCategory::B));
        assert_eq!(query.page.sort_key, SortKey::Distance);
        assert_eq!(query.page.direction, SortDirection::Asc);
        assert_eq!(query.page.page, 2);
        assert_eq!(query.page.page_size, 10);
        assert_eq!(query.predicate().constraints().len(), 8);
    }

    #[test]
    fn test_from_params_rejects_malformed_values() {
        assert!(matches!(
            parse(&[("distMin", "ten")]),
            Err(QueryError::InvalidNumber { key: "distMin", .. })
        ));
        assert!(matches!(
            parse(&[("distMax", "NaN")]),
            Err(QueryError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse(&[("dateFrom", "15/07/2023")]),
            Err(QueryError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse(&[("category", "BB")]),
            Err(QueryError::InvalidCategory(_))
        ));
        assert!(matches!(
            parse(&[("page", "-1")]),
            Err(QueryError::InvalidPage { key: "page", .. })
        ));
    }
}
