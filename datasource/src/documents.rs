//! Typed views of the season API documents.
//!
//! The upstream API serves two document kinds per season: an overview
//! (race-id to race mapping) and a standings document. Required fields are
//! enforced here via serde so malformed documents surface as parse errors at
//! the fetcher boundary instead of panics further down the pipeline.

use serde::Deserialize;
use std::collections::HashMap;

/// The two document kinds the season API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Overview,
    Standings,
}

impl DocumentKind {
    /// URL path segment and cache key segment for this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Overview => "overview",
            DocumentKind::Standings => "standings",
        }
    }
}

/// Season overview: race id to race.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OverviewDocument {
    pub data: HashMap<String, Race>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    /// 1-based race number, unique within a season.
    pub round: u32,
    pub name: String,
    pub circuit: Circuit,
    /// ISO date of the grand prix itself (`YYYY-MM-DD`).
    pub date: String,
    /// Session schedule in on-track order. Absent for provisional entries.
    #[serde(default)]
    pub schedule: Vec<Session>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    pub city: String,
    pub country: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub label: String,
    pub date: String,
    pub time: String,
}

/// Season standings for both championships, with sibling lookup maps.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StandingsDocument {
    pub data: StandingsData,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StandingsData {
    pub driver_standings: HashMap<String, DriverStanding>,
    pub drivers: HashMap<String, Driver>,
    pub constructor_standings: HashMap<String, ConstructorStanding>,
    pub constructors: HashMap<String, Constructor>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverStanding {
    /// 1-based rank, unique within the standings list.
    pub position: u32,
    pub points: f64,
    /// Foreign key into [`StandingsData::drivers`].
    pub driver_id: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub first_name: String,
    pub last_name: String,
    /// 3-letter display code. Derived from the driver id when absent.
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorStanding {
    pub position: u32,
    pub points: f64,
    /// Foreign key into [`StandingsData::constructors`].
    pub constructor_id: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    pub name: String,
}
