//! Deterministic sorting and page slicing for flight listings.

use std::cmp::Ordering;

use crate::api::Page;
use crate::models::text::fold;
use crate::models::FlightView;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Whitelisted sort columns.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Date,
    Distance,
    Score,
    Airtime,
    Pilot,
    Takeoff,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(SortKey::Date),
            "distance" => Some(SortKey::Distance),
            "score" => Some(SortKey::Score),
            "airtime" => Some(SortKey::Airtime),
            "pilot" => Some(SortKey::Pilot),
            "takeoff" => Some(SortKey::Takeoff),
            _ => None,
        }
    }

    /// Unknown or absent keys fall back to start time.
    pub fn from_param(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    /// Ascending comparison on this key alone.
    fn compare(&self, a: &FlightView, b: &FlightView) -> Ordering {
        match self {
            SortKey::Date => a.start_time.cmp(&b.start_time),
            SortKey::Distance => a.distance_km.total_cmp(&b.distance_km),
            SortKey::Score => a.score.total_cmp(&b.score),
            SortKey::Airtime => a.airtime.cmp(&b.airtime),
            SortKey::Pilot => compare_names(&a.pilot.name, &b.pilot.name),
            SortKey::Takeoff => {
                let a_name = a.takeoff.as_ref().map(|t| t.name.as_str());
                let b_name = b.takeoff.as_ref().map(|t| t.name.as_str());
                match (a_name, b_name) {
                    (Some(a), Some(b)) => compare_names(a, b),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                }
            }
        }
    }
}

/// Display names order case- and diacritic-insensitively; the raw name only
/// breaks ties between names that fold to the same text.
fn compare_names(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            _ => SortDirection::Desc,
        }
    }
}

/// Sort and page of a listing request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub sort_key: SortKey,
    pub direction: SortDirection,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            sort_key: SortKey::default(),
            direction: SortDirection::default(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Apply caller page values; absent or zero values take the defaults.
    pub fn with_page(self, page: Option<usize>, page_size: Option<usize>) -> Self {
        Self {
            page: page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            page_size: page_size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE),
            ..self
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// Total order used by listings: the key, then flight id, reversed as a whole
/// for descending sorts.
pub fn compare_flights(
    a: &FlightView,
    b: &FlightView,
    key: SortKey,
    direction: SortDirection,
) -> Ordering {
    let ascending = key.compare(a, b).then_with(|| a.id.cmp(&b.id));
    match direction {
        SortDirection::Asc => ascending,
        SortDirection::Desc => ascending.reverse(),
    }
}

pub fn sort_flights(flights: &mut [FlightView], key: SortKey, direction: SortDirection) {
    flights.sort_by(|a, b| compare_flights(a, b, key, direction));
}

/// Slice an already sorted set. `total` is the size of the whole set.
pub fn paginate<T>(items: Vec<T>, request: &PageRequest) -> Page<T> {
    let total = items.len();
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.page_size)
        .collect();
    Page {
        items,
        total,
        page: request.page,
        page_size: request.page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sort_key_falls_back_to_date() {
        assert_eq!(SortKey::from_param(Some("altitude")), SortKey::Date);
        assert_eq!(SortKey::from_param(None), SortKey::Date);
        assert_eq!(SortKey::from_param(Some("score")), SortKey::Score);
    }

    #[test]
    fn test_names_sort_ignoring_case_and_diacritics() {
        let mut names = vec!["Zoe", "ana", "Ștefan Ionescu", "Bob", "Ana"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["Ana", "ana", "Bob", "Ștefan Ionescu", "Zoe"]);
    }

    #[test]
    fn test_direction_defaults_to_desc() {
        assert_eq!(SortDirection::from_param(None), SortDirection::Desc);
        assert_eq!(SortDirection::from_param(Some("up")), SortDirection::Desc);
        assert_eq!(SortDirection::from_param(Some("ASC")), SortDirection::Asc);
    }

    #[test]
    fn test_zero_page_values_normalize_to_defaults() {
        let request = PageRequest::default().with_page(Some(0), Some(0));
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 50);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset() {
        let request = PageRequest::default().with_page(Some(3), Some(20));
        assert_eq!(request.offset(), 40);
    }

    #[test]
    fn test_paginate_past_end_keeps_total() {
        let request = PageRequest::default().with_page(Some(5), Some(2));
        let page = paginate(vec![1, 2, 3], &request);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 5);
    }

    #[test]
    fn test_paginate_middle_page() {
        let request = PageRequest::default().with_page(Some(2), Some(2));
        let page = paginate(vec![1, 2, 3, 4, 5], &request);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.page_size, 2);
    }
}
