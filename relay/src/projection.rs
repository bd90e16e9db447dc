//! View projections over fetched season documents.
//!
//! All functions here are pure reshaping (no I/O) and share one edge-case
//! policy: an entry that cannot be projected — a dangling standings
//! reference, an unparseable race date — is skipped with a warning, never
//! aborting the whole batch. Partial results beat total failure on a device
//! that would otherwise show nothing.

use crate::errors::{RelayError, Result};
use crate::metrics_defs::ENTRIES_SKIPPED;
use crate::protocol::{OutboundBatch, ProjectedRecord, RequestKind};
use chrono::NaiveDate;
use datasource::documents::{OverviewDocument, Race, StandingsDocument};
use shared::counter;

/// Calendar view: upcoming races (date >= today) ascending by round, then
/// past races descending by round. This ordering drives the on-device list.
pub fn calendar(doc: &OverviewDocument, today: NaiveDate) -> OutboundBatch {
    let mut upcoming: Vec<&Race> = Vec::new();
    let mut past: Vec<&Race> = Vec::new();

    for race in doc.data.values() {
        let date = match NaiveDate::parse_from_str(&race.date, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!(
                    race = %race.name,
                    date = %race.date,
                    error = %e,
                    "Skipping race with unparseable date"
                );
                counter!(ENTRIES_SKIPPED).increment(1);
                continue;
            }
        };
        if date >= today {
            upcoming.push(race);
        } else {
            past.push(race);
        }
    }

    upcoming.sort_by_key(|race| race.round);
    past.sort_by_key(|race| std::cmp::Reverse(race.round));

    let section_split = upcoming.len();
    let records = upcoming
        .into_iter()
        .chain(past)
        .map(race_record)
        .collect();

    let mut batch = OutboundBatch::new(RequestKind::Overview, records);
    batch.section_split = Some(section_split);
    batch
}

fn race_record(race: &Race) -> ProjectedRecord {
    ProjectedRecord {
        title: race.name.clone(),
        subtitle: format!("{}, {}", race.circuit.city, race.circuit.country),
        round: Some(race.round),
        date: Some(race.date.clone()),
        ..Default::default()
    }
}

/// Race-detail view: one record per schedule session, in schedule order.
/// Fails if no race carries the requested round.
pub fn race_details(doc: &OverviewDocument, round: u32) -> Result<OutboundBatch> {
    let race = doc
        .data
        .values()
        .find(|race| race.round == round)
        .ok_or(RelayError::RoundNotFound(round))?;

    let records = race
        .schedule
        .iter()
        .map(|session| ProjectedRecord {
            title: session.label.clone(),
            subtitle: format!("{}T{}", session.date, session.time),
            ..Default::default()
        })
        .collect();

    Ok(OutboundBatch::new(RequestKind::RaceDetails, records))
}

/// Driver standings joined to the drivers lookup, ascending by position.
pub fn driver_standings(doc: &StandingsDocument) -> OutboundBatch {
    let mut standings: Vec<_> = doc.data.driver_standings.values().collect();
    standings.sort_by_key(|standing| standing.position);

    let mut records = Vec::with_capacity(standings.len());
    for standing in standings {
        let Some(driver) = doc.data.drivers.get(&standing.driver_id) else {
            tracing::warn!(driver_id = %standing.driver_id, "Driver not found, skipping entry");
            counter!(ENTRIES_SKIPPED).increment(1);
            continue;
        };

        let code = driver.code.clone().unwrap_or_else(|| {
            standing.driver_id.to_uppercase().chars().take(3).collect()
        });

        records.push(ProjectedRecord {
            title: format!("{} {}", driver.first_name, driver.last_name),
            subtitle: code,
            points: Some(standing.points),
            position: Some(standing.position),
            ..Default::default()
        });
    }

    OutboundBatch::new(RequestKind::DriverStandings, records)
}

/// Constructor standings joined to the constructors lookup, ascending by
/// position.
pub fn team_standings(doc: &StandingsDocument) -> OutboundBatch {
    let mut standings: Vec<_> = doc.data.constructor_standings.values().collect();
    standings.sort_by_key(|standing| standing.position);

    let mut records = Vec::with_capacity(standings.len());
    for standing in standings {
        let Some(constructor) = doc.data.constructors.get(&standing.constructor_id) else {
            tracing::warn!(
                constructor_id = %standing.constructor_id,
                "Constructor not found, skipping entry"
            );
            counter!(ENTRIES_SKIPPED).increment(1);
            continue;
        };

        records.push(ProjectedRecord {
            title: constructor.name.clone(),
            points: Some(standing.points),
            position: Some(standing.position),
            ..Default::default()
        });
    }

    OutboundBatch::new(RequestKind::TeamStandings, records)
}
