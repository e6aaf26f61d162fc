//! Flight-log domain entities.
//!
//! Flights reference pilots, gliders and (optionally) takeoffs by identifier.
//! Repositories hand out [`FlightView`] rows, which carry the joined entities so
//! the analytics engines never need a second lookup.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::api::{FlightId, GeographicLocation, GliderId, PilotId, TakeoffId};

/// Skill/performance class of a glider.
///
/// The paraglider classes feed every headline statistic; the hang-glider
/// classes are kept in the directory but excluded from the primary view.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GliderCategory {
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    /// Competition class (CCC certified).
    #[serde(rename = "CCC")]
    Ccc,
    #[serde(rename = "TANDEM")]
    Tandem,
    /// Flexible-wing hang glider.
    #[serde(rename = "HG")]
    Hg,
    /// Rigid-wing hang glider.
    #[serde(rename = "RHG")]
    Rhg,
}

impl GliderCategory {
    pub const ALL: [GliderCategory; 8] = [
        GliderCategory::A,
        GliderCategory::B,
        GliderCategory::C,
        GliderCategory::D,
        GliderCategory::Ccc,
        GliderCategory::Tandem,
        GliderCategory::Hg,
        GliderCategory::Rhg,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GliderCategory::A => "A",
            GliderCategory::B => "B",
            GliderCategory::C => "C",
            GliderCategory::D => "D",
            GliderCategory::Ccc => "CCC",
            GliderCategory::Tandem => "TANDEM",
            GliderCategory::Hg => "HG",
            GliderCategory::Rhg => "RHG",
        }
    }

    /// Whether flights on this class belong to the primary (paraglider) view.
    pub fn is_paraglider(&self) -> bool {
        !matches!(self, GliderCategory::Hg | GliderCategory::Rhg)
    }

    /// Low-performance classes used for the "beginner wing" share.
    pub fn is_beginner(&self) -> bool {
        matches!(self, GliderCategory::A | GliderCategory::B)
    }

    /// All classes that participate in the primary view.
    pub fn paraglider_classes() -> impl Iterator<Item = GliderCategory> {
        Self::ALL.into_iter().filter(|c| c.is_paraglider())
    }
}

impl fmt::Display for GliderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GliderCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown glider category: {}", s))
    }
}

/// Pilot directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilot {
    pub id: PilotId,
    pub name: String,
    /// Unique handle used for addressing and search.
    pub username: String,
}

/// Launch site ("takeoff").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Takeoff {
    pub id: TakeoffId,
    pub name: String,
    pub location: GeographicLocation,
}

/// Glider model ("wing").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glider {
    pub id: GliderId,
    pub name: String,
    pub category: GliderCategory,
}

/// A stored flight, referencing its entities by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: FlightId,
    pub pilot_id: PilotId,
    #[serde(default)]
    pub takeoff_id: Option<TakeoffId>,
    pub glider_id: GliderId,
    pub start_time: NaiveDateTime,
    pub distance_km: f64,
    pub score: f64,
    /// Airtime in minutes.
    pub airtime: u32,
    #[serde(rename = "type")]
    pub flight_type: String,
    pub url: String,
}

impl Flight {
    /// Check the numeric invariants of a flight.
    pub fn validate(&self) -> Result<(), String> {
        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            return Err(format!(
                "Flight {} has invalid distance {}",
                self.id, self.distance_km
            ));
        }
        if !self.score.is_finite() || self.score < 0.0 {
            return Err(format!("Flight {} has invalid score {}", self.id, self.score));
        }
        Ok(())
    }
}

/// Denormalized flight row: the flight joined with pilot, takeoff and glider.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightView {
    pub id: FlightId,
    pub start_time: NaiveDateTime,
    pub distance_km: f64,
    pub score: f64,
    pub airtime: u32,
    pub flight_type: String,
    pub url: String,
    pub pilot: Pilot,
    pub takeoff: Option<Takeoff>,
    pub glider: Glider,
}

impl FlightView {
    pub fn join(flight: &Flight, pilot: &Pilot, takeoff: Option<&Takeoff>, glider: &Glider) -> Self {
        Self {
            id: flight.id,
            start_time: flight.start_time,
            distance_km: flight.distance_km,
            score: flight.score,
            airtime: flight.airtime,
            flight_type: flight.flight_type.clone(),
            url: flight.url.clone(),
            pilot: pilot.clone(),
            takeoff: takeoff.cloned(),
            glider: glider.clone(),
        }
    }

    pub fn takeoff_id(&self) -> Option<TakeoffId> {
        self.takeoff.as_ref().map(|t| t.id)
    }

    pub fn day(&self) -> NaiveDate {
        self.start_time.date()
    }

    pub fn year(&self) -> i32 {
        self.start_time.year()
    }

    /// Calendar month, 1-12.
    pub fn month(&self) -> u32 {
        self.start_time.month()
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// Weekday number with 0 = Sunday.
    pub fn weekday(&self) -> u32 {
        self.start_time.weekday().num_days_from_sunday()
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), 0 | 6)
    }
}

/// Subset of the primary view an analytics query runs over.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FlightScope {
    All,
    Pilot(PilotId),
    Takeoff(TakeoffId),
    Glider(GliderId),
}

impl FlightScope {
    pub fn admits(&self, flight: &Flight) -> bool {
        match self {
            FlightScope::All => true,
            FlightScope::Pilot(id) => flight.pilot_id == *id,
            FlightScope::Takeoff(id) => flight.takeoff_id == Some(*id),
            FlightScope::Glider(id) => flight.glider_id == *id,
        }
    }
}

impl fmt::Display for FlightScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightScope::All => f.write_str("all"),
            FlightScope::Pilot(id) => write!(f, "pilot={}", id),
            FlightScope::Takeoff(id) => write!(f, "takeoff={}", id),
            FlightScope::Glider(id) => write!(f, "glider={}", id),
        }
    }
}
