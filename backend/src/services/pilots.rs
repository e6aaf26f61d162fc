//! Pilot rollups: directory list, career stats, site map and equipment timeline.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::numeric::{mean, round1, round_to};
use crate::api::{
    EquipmentUsage, FavouriteTakeoff, GliderId, PilotStats, PilotSummary, SiteVisit, TakeoffId,
};
use crate::models::{FlightView, Pilot, Takeoff};

/// Takeoff with the most flights; lowest takeoff id wins ties.
pub fn favourite_takeoff(flights: &[&FlightView]) -> Option<FavouriteTakeoff> {
    let mut counts: BTreeMap<TakeoffId, (&Takeoff, usize)> = BTreeMap::new();
    for takeoff in flights.iter().filter_map(|f| f.takeoff.as_ref()) {
        counts.entry(takeoff.id).or_insert((takeoff, 0)).1 += 1;
    }

    // BTreeMap iterates ascending by id, so keep the first maximum.
    counts
        .into_values()
        .fold(None, |best: Option<(&Takeoff, usize)>, (takeoff, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((takeoff, count)),
        })
        .map(|(takeoff, flight_count)| FavouriteTakeoff {
            takeoff_id: takeoff.id,
            name: takeoff.name.clone(),
            flight_count,
        })
}

/// Career totals over one pilot's flights.
pub fn pilot_stats(flights: &[&FlightView]) -> PilotStats {
    if flights.is_empty() {
        return PilotStats::default();
    }
    let total_km: f64 = flights.iter().map(|f| f.distance_km).sum();
    let total_score: f64 = flights.iter().map(|f| f.score).sum();
    PilotStats {
        total_flights: flights.len(),
        total_km: round_to(total_km, 0),
        total_score: round_to(total_score, 0),
        max_distance: flights.iter().map(|f| f.distance_km).reduce(f64::max),
        avg_distance: mean(flights.iter().map(|f| f.distance_km)).map(round1),
        active_since: flights.iter().map(|f| f.year()).min(),
        last_flight: flights.iter().map(|f| f.start_time).max(),
    }
}

/// Pilots with at least one flight, by total distance (then id).
pub fn pilot_summaries(pilots: &[Pilot], flights: &[FlightView]) -> Vec<PilotSummary> {
    let mut groups: HashMap<_, Vec<&FlightView>> = HashMap::new();
    for flight in flights {
        groups.entry(flight.pilot.id).or_default().push(flight);
    }

    let mut ranked: Vec<(f64, PilotSummary)> = pilots
        .iter()
        .filter_map(|pilot| {
            let group = groups.get(&pilot.id)?;
            let total_km: f64 = group.iter().map(|f| f.distance_km).sum();
            let stats = pilot_stats(group);
            let years: HashSet<i32> = group.iter().map(|f| f.year()).collect();
            Some((
                total_km,
                PilotSummary {
                    id: pilot.id,
                    name: pilot.name.clone(),
                    username: pilot.username.clone(),
                    flight_count: stats.total_flights,
                    total_km: stats.total_km,
                    total_score: stats.total_score,
                    avg_distance: stats.avg_distance?,
                    max_distance: stats.max_distance?,
                    active_years: years.len(),
                    last_flight: stats.last_flight?,
                    favourite_takeoff: favourite_takeoff(group),
                },
            ))
        })
        .collect();

    ranked.sort_by(|(a_km, a), (b_km, b)| b_km.total_cmp(a_km).then_with(|| a.id.cmp(&b.id)));
    ranked.into_iter().map(|(_, summary)| summary).collect()
}

/// Takeoffs the pilot has flown from, most used first.
pub fn site_map(flights: &[&FlightView]) -> Vec<SiteVisit> {
    let mut visits: BTreeMap<TakeoffId, SiteVisit> = BTreeMap::new();
    for takeoff in flights.iter().filter_map(|f| f.takeoff.as_ref()) {
        visits
            .entry(takeoff.id)
            .or_insert_with(|| SiteVisit {
                takeoff_id: takeoff.id,
                name: takeoff.name.clone(),
                latitude: takeoff.location.latitude,
                longitude: takeoff.location.longitude,
                flight_count: 0,
            })
            .flight_count += 1;
    }

    let mut sites: Vec<SiteVisit> = visits.into_values().collect();
    sites.sort_by(|a, b| {
        b.flight_count
            .cmp(&a.flight_count)
            .then_with(|| a.takeoff_id.cmp(&b.takeoff_id))
    });
    sites
}

/// Gliders the pilot has used, in order of first use.
pub fn equipment_timeline(flights: &[&FlightView]) -> Vec<EquipmentUsage> {
    let mut usage: HashMap<GliderId, EquipmentUsage> = HashMap::new();
    for flight in flights {
        usage
            .entry(flight.glider.id)
            .and_modify(|u| {
                u.flight_count += 1;
                u.first_used = u.first_used.min(flight.start_time);
                u.last_used = u.last_used.max(flight.start_time);
            })
            .or_insert_with(|| EquipmentUsage {
                glider_id: flight.glider.id,
                name: flight.glider.name.clone(),
                category: flight.glider.category,
                flight_count: 1,
                first_used: flight.start_time,
                last_used: flight.start_time,
            });
    }

    let mut timeline: Vec<EquipmentUsage> = usage.into_values().collect();
    timeline.sort_by(|a, b| {
        a.first_used
            .cmp(&b.first_used)
            .then_with(|| a.glider_id.cmp(&b.glider_id))
    });
    timeline
}
