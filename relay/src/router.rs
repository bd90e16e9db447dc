//! Inbound request dispatch.
//!
//! One state: idle, awaiting a request. Each inbound request drives its own
//! fetch → project → transmit pipeline; nothing is retained between
//! requests, and a second request arriving mid-transmission simply runs an
//! independent pipeline whose paced sends interleave with the first's.

use crate::errors::{RelayError, Result};
use crate::metrics_defs::REQUESTS_HANDLED;
use crate::projection;
use crate::protocol::{InboundRequest, RequestKind};
use crate::transmitter::Transmitter;
use chrono::{Datelike, Utc};
use datasource::fetcher::Fetcher;
use shared::counter;
use tokio::task::JoinHandle;

pub struct RequestRouter {
    fetcher: Fetcher,
    transmitter: Transmitter,
    season_override: Option<i32>,
}

impl RequestRouter {
    pub fn new(fetcher: Fetcher, transmitter: Transmitter, season_override: Option<i32>) -> Self {
        RequestRouter {
            fetcher,
            transmitter,
            season_override,
        }
    }

    fn season(&self) -> i32 {
        self.season_override.unwrap_or_else(|| Utc::now().year())
    }

    /// Dispatches one inbound request. On success the batch's sends are
    /// already scheduled and the returned handle resolves at quiescence; on
    /// error the request terminates with zero messages sent.
    pub async fn handle(&self, request: InboundRequest) -> Result<JoinHandle<()>> {
        let season = self.season();
        tracing::debug!(kind = ?request.kind, param = ?request.param, season, "Handling request");
        counter!(REQUESTS_HANDLED).increment(1);

        let batch = match request.kind {
            RequestKind::Overview => {
                let doc = self.fetcher.fetch_overview(season).await?;
                projection::calendar(&doc, Utc::now().date_naive())
            }
            RequestKind::RaceDetails => {
                let round = request
                    .param
                    .ok_or(RelayError::MissingParam(RequestKind::RaceDetails))?;
                let doc = self.fetcher.fetch_overview(season).await?;
                projection::race_details(&doc, round)?
            }
            RequestKind::DriverStandings => {
                let doc = self.fetcher.fetch_standings(season).await?;
                projection::driver_standings(&doc)
            }
            RequestKind::TeamStandings => {
                let doc = self.fetcher.fetch_standings(season).await?;
                projection::team_standings(&doc)
            }
        };

        Ok(self.transmitter.transmit(batch))
    }
}
