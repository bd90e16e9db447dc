//! Shared fixtures and doubles for relay tests.

use crate::channel::{ChannelError, DeviceChannel};
use crate::protocol::DeviceMessage;
use datasource::documents::{
    Circuit, Constructor, ConstructorStanding, Driver, DriverStanding, OverviewDocument, Race,
    StandingsData, StandingsDocument,
};
use std::collections::HashMap;
use std::sync::Mutex;

pub fn race(round: u32, name: &str, date: &str) -> Race {
    Race {
        round,
        name: name.to_string(),
        circuit: Circuit {
            city: format!("City {round}"),
            country: format!("Country {round}"),
            name: format!("Circuit {round}"),
        },
        date: date.to_string(),
        schedule: Vec::new(),
    }
}

pub fn overview_doc(races: Vec<Race>) -> OverviewDocument {
    OverviewDocument {
        data: races
            .into_iter()
            .map(|race| (format!("race-{}", race.round), race))
            .collect(),
    }
}

/// Three drivers (one without an explicit code) and two constructors.
pub fn standings_doc() -> StandingsDocument {
    let driver = |first: &str, last: &str, code: Option<&str>| Driver {
        first_name: first.to_string(),
        last_name: last.to_string(),
        code: code.map(str::to_string),
    };

    StandingsDocument {
        data: StandingsData {
            driver_standings: HashMap::from([
                (
                    "3".to_string(),
                    DriverStanding {
                        position: 3,
                        points: 230.0,
                        driver_id: "leclerc".to_string(),
                    },
                ),
                (
                    "1".to_string(),
                    DriverStanding {
                        position: 1,
                        points: 349.0,
                        driver_id: "verstappen".to_string(),
                    },
                ),
                (
                    "2".to_string(),
                    DriverStanding {
                        position: 2,
                        points: 285.0,
                        driver_id: "norris".to_string(),
                    },
                ),
            ]),
            drivers: HashMap::from([
                (
                    "verstappen".to_string(),
                    driver("Max", "Verstappen", Some("VER")),
                ),
                ("norris".to_string(), driver("Lando", "Norris", None)),
                (
                    "leclerc".to_string(),
                    driver("Charles", "Leclerc", Some("LEC")),
                ),
            ]),
            constructor_standings: HashMap::from([
                (
                    "2".to_string(),
                    ConstructorStanding {
                        position: 2,
                        points: 520.0,
                        constructor_id: "mclaren".to_string(),
                    },
                ),
                (
                    "1".to_string(),
                    ConstructorStanding {
                        position: 1,
                        points: 601.0,
                        constructor_id: "red_bull".to_string(),
                    },
                ),
            ]),
            constructors: HashMap::from([
                (
                    "red_bull".to_string(),
                    Constructor {
                        name: "Red Bull Racing".to_string(),
                    },
                ),
                (
                    "mclaren".to_string(),
                    Constructor {
                        name: "McLaren".to_string(),
                    },
                ),
            ]),
        },
    }
}

/// Channel double that records every send attempt and can be told to reject
/// specific item indexes.
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<DeviceMessage>>,
    fail_indexes: Vec<u32>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        RecordingChannel::default()
    }

    pub fn failing(fail_indexes: Vec<u32>) -> Self {
        RecordingChannel {
            sent: Mutex::new(Vec::new()),
            fail_indexes,
        }
    }

    pub fn messages(&self) -> Vec<DeviceMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DeviceChannel for RecordingChannel {
    async fn send(&self, message: DeviceMessage) -> Result<(), ChannelError> {
        let rejected = matches!(
            &message,
            DeviceMessage::Item { index, .. } if self.fail_indexes.contains(index)
        );
        self.sent.lock().unwrap().push(message);
        if rejected {
            Err(ChannelError::Rejected("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}
