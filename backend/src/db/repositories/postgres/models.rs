use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{flights, gliders, pilots, takeoffs};
use crate::api::{FlightId, GeographicLocation, GliderId, PilotId, TakeoffId};
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{Flight, FlightView, Glider, GliderCategory, Pilot, Takeoff};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = flights)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FlightRow {
    pub id: i64,
    pub pilot_id: i64,
    pub takeoff_id: Option<i64>,
    pub glider_id: i64,
    pub start_time: NaiveDateTime,
    pub distance_km: f64,
    pub score: f64,
    pub airtime: i32,
    pub flight_type: String,
    pub url: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pilots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PilotRow {
    pub id: i64,
    pub name: String,
    pub username: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = takeoffs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TakeoffRow {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = gliders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GliderRow {
    pub id: i64,
    pub name: String,
    pub category: String,
}

/// A flight joined with its pilot, glider and optional takeoff.
pub type JoinedFlightRow = (FlightRow, PilotRow, GliderRow, Option<TakeoffRow>);

fn invalid_row(entity: &str, id: i64, message: String) -> RepositoryError {
    RepositoryError::validation_with_context(
        message,
        ErrorContext::new("decode_row")
            .with_entity(entity)
            .with_entity_id(id),
    )
}

impl From<PilotRow> for Pilot {
    fn from(row: PilotRow) -> Self {
        Pilot {
            id: PilotId::new(row.id),
            name: row.name,
            username: row.username,
        }
    }
}

impl TryFrom<TakeoffRow> for Takeoff {
    type Error = RepositoryError;

    fn try_from(row: TakeoffRow) -> RepositoryResult<Self> {
        let location = GeographicLocation::new(row.latitude, row.longitude)
            .map_err(|e| invalid_row("takeoff", row.id, e))?;
        Ok(Takeoff {
            id: TakeoffId::new(row.id),
            name: row.name,
            location,
        })
    }
}

impl TryFrom<GliderRow> for Glider {
    type Error = RepositoryError;

    fn try_from(row: GliderRow) -> RepositoryResult<Self> {
        let category = row
            .category
            .parse::<GliderCategory>()
            .map_err(|e| invalid_row("glider", row.id, e))?;
        Ok(Glider {
            id: GliderId::new(row.id),
            name: row.name,
            category,
        })
    }
}

impl TryFrom<FlightRow> for Flight {
    type Error = RepositoryError;

    fn try_from(row: FlightRow) -> RepositoryResult<Self> {
        let airtime = u32::try_from(row.airtime)
            .map_err(|_| invalid_row("flight", row.id, format!("Negative airtime {}", row.airtime)))?;
        Ok(Flight {
            id: FlightId::new(row.id),
            pilot_id: PilotId::new(row.pilot_id),
            takeoff_id: row.takeoff_id.map(TakeoffId::new),
            glider_id: GliderId::new(row.glider_id),
            start_time: row.start_time,
            distance_km: row.distance_km,
            score: row.score,
            airtime,
            flight_type: row.flight_type,
            url: row.url,
        })
    }
}

pub fn into_flight_view(row: JoinedFlightRow) -> RepositoryResult<FlightView> {
    let (flight, pilot, glider, takeoff) = row;
    let flight = Flight::try_from(flight)?;
    let pilot = Pilot::from(pilot);
    let glider = Glider::try_from(glider)?;
    let takeoff = takeoff.map(Takeoff::try_from).transpose()?;
    Ok(FlightView::join(&flight, &pilot, takeoff.as_ref(), &glider))
}
