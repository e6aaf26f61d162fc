//! Public API surface for the analytics backend.
//!
//! Identifier newtypes and shared value types live here; the result DTOs are
//! defined next to their routes and re-exported below.

pub use crate::routes::distribution::HistogramBucket;
pub use crate::routes::flights::FlightSummary;
pub use crate::routes::flights::Page;
pub use crate::routes::landing::HomeDashboard;
pub use crate::routes::landing::HomeStats;
pub use crate::routes::pilots::EquipmentUsage;
pub use crate::routes::pilots::FavouriteTakeoff;
pub use crate::routes::pilots::PilotDetail;
pub use crate::routes::pilots::PilotStats;
pub use crate::routes::pilots::PilotSummary;
pub use crate::routes::pilots::SiteVisit;
pub use crate::routes::rankings::CategoryCount;
pub use crate::routes::rankings::DayActivity;
pub use crate::routes::rankings::GliderCount;
pub use crate::routes::rankings::PilotTotal;
pub use crate::routes::rankings::TakeoffCount;
pub use crate::routes::records::AllTimeRecords;
pub use crate::routes::records::AnnualRecord;
pub use crate::routes::records::BusiestDay;
pub use crate::routes::records::CategoryRecord;
pub use crate::routes::records::EpicDay;
pub use crate::routes::records::FunStats;
pub use crate::routes::records::PilotSuperlative;
pub use crate::routes::records::RecordsOverview;
pub use crate::routes::records::SiteRecord;
pub use crate::routes::takeoffs::TakeoffDetail;
pub use crate::routes::takeoffs::TakeoffSummary;
pub use crate::routes::trends::HeatmapCell;
pub use crate::routes::trends::HourlyBucket;
pub use crate::routes::trends::MonthCount;
pub use crate::routes::trends::MonthlyStat;
pub use crate::routes::trends::WeekdayBucket;
pub use crate::routes::trends::YearlyStat;
pub use crate::routes::wings::AdoptionPoint;
pub use crate::routes::wings::WingDetail;
pub use crate::routes::wings::WingSummary;

use serde::{Deserialize, Serialize};

crate::define_id_type!(i64, FlightId);
crate::define_id_type!(i64, PilotId);
crate::define_id_type!(i64, TakeoffId);
crate::define_id_type!(i64, GliderId);

/// Geographic location of a launch site.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeographicLocation {
    /// Latitude in decimal degrees (-90 to 90)
    pub latitude: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub longitude: f64,
}

impl GeographicLocation {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        let location = Self {
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err("Latitude must be between -90 and 90 degrees".to_string());
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err("Longitude must be between -180 and 180 degrees".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = PilotId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: PilotId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_conversions() {
        let id: FlightId = 101.into();
        assert_eq!(id.value(), 101);
        assert_eq!(i64::from(id), 101);
        assert_eq!(format!("{}", id), "101");
    }

    #[test]
    fn test_ids_order_by_value() {
        assert!(TakeoffId::new(1) < TakeoffId::new(2));
    }

    #[test]
    fn test_geographic_location_valid() {
        let loc = GeographicLocation::new(45.6, 25.5).unwrap();
        assert_eq!(loc.latitude, 45.6);
        assert_eq!(loc.longitude, 25.5);
    }

    #[test]
    fn test_geographic_location_rejects_out_of_range() {
        assert!(GeographicLocation::new(91.0, 0.0).is_err());
        assert!(GeographicLocation::new(0.0, -181.0).is_err());
    }
}
