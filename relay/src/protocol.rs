//! Wire-level types shared between the router, the projection builders and
//! the transmitter.
//!
//! The device transport cannot carry a full JSON document in one message, so
//! a batch goes out as one count message followed by N item messages, each
//! tagged with a 0-based index. The receiver learns how many items to expect
//! from the count and can reassemble out-of-order arrivals by index.

use serde::{Serialize, Serializer};

/// Request kinds understood by the relay. The integer codes are part of the
/// device protocol and must match the consumer firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Overview,
    RaceDetails,
    DriverStandings,
    TeamStandings,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown request kind: {0}")]
pub struct UnknownRequestKind(pub u32);

impl RequestKind {
    pub const fn code(&self) -> u32 {
        match self {
            RequestKind::Overview => 1,
            RequestKind::RaceDetails => 2,
            RequestKind::DriverStandings => 3,
            RequestKind::TeamStandings => 4,
        }
    }
}

impl TryFrom<u32> for RequestKind {
    type Error = UnknownRequestKind;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(RequestKind::Overview),
            2 => Ok(RequestKind::RaceDetails),
            3 => Ok(RequestKind::DriverStandings),
            4 => Ok(RequestKind::TeamStandings),
            other => Err(UnknownRequestKind(other)),
        }
    }
}

impl Serialize for RequestKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.code())
    }
}

/// An inbound device request: a kind plus an optional parameter (the target
/// round for race details).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboundRequest {
    pub kind: RequestKind,
    pub param: Option<u32>,
}

/// The normalized unit handed to the transmitter. All records in one batch
/// populate the same field subset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectedRecord {
    pub title: String,
    pub subtitle: String,
    pub extra: Option<String>,
    pub round: Option<u32>,
    pub date: Option<String>,
    pub points: Option<f64>,
    pub position: Option<u32>,
}

/// One transmission's worth of records. Built fresh per inbound request,
/// consumed entirely by a single transmit, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundBatch {
    pub kind: RequestKind,
    pub records: Vec<ProjectedRecord>,
    /// Boundary between the upcoming and past blocks of a calendar batch.
    /// Only the blob transmit strategy looks at this.
    pub section_split: Option<usize>,
}

impl OutboundBatch {
    pub fn new(kind: RequestKind, records: Vec<ProjectedRecord>) -> Self {
        OutboundBatch {
            kind,
            records,
            section_split: None,
        }
    }

    /// Splits the records at the section boundary, if one is set.
    pub fn into_sections(self) -> Vec<Vec<ProjectedRecord>> {
        match self.section_split {
            Some(split) if split <= self.records.len() => {
                let mut upcoming = self.records;
                let past = upcoming.split_off(split);
                vec![upcoming, past]
            }
            _ => vec![self.records],
        }
    }
}

/// Outbound device message. Serializes to a flat JSON object; unset optional
/// fields are omitted entirely rather than sent as nulls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeviceMessage {
    Count {
        request_kind: RequestKind,
        item_count: u32,
    },
    Item {
        request_kind: RequestKind,
        index: u32,
        title: String,
        subtitle: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        extra: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        round: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        points: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<u32>,
    },
}

impl DeviceMessage {
    pub fn item(kind: RequestKind, index: u32, record: ProjectedRecord) -> Self {
        DeviceMessage::Item {
            request_kind: kind,
            index,
            title: record.title,
            subtitle: record.subtitle,
            extra: record.extra,
            round: record.round,
            date: record.date,
            points: record.points,
            position: record.position,
        }
    }
}
