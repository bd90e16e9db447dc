//! Chunked batch transmission.
//!
//! The transport's single-message payload ceiling sits far below a full
//! season document, so a batch goes out as a count message followed by one
//! paced item message per record. Pacing keeps the transport's internal send
//! queue from overflowing under burst load (the real device drops messages
//! that an emulator happily queues) and makes out-of-order arrival unlikely;
//! the explicit index field lets the receiver reassemble regardless.
//!
//! Delivery is best effort per message: each send resolves independently, a
//! failure is logged, and the remaining items proceed. There is no retry,
//! no rollback, and no way to withdraw a batch once its sends are scheduled.

use crate::channel::DeviceChannel;
use crate::config::TransmitStrategy;
use crate::metrics_defs::{BATCHES_TRANSMITTED, ITEMS_SENT, ITEM_SEND_FAILURES};
use crate::protocol::{DeviceMessage, OutboundBatch, ProjectedRecord, RequestKind};
use shared::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::sleep;

#[derive(Clone)]
pub struct Transmitter {
    channel: Arc<dyn DeviceChannel>,
    pacing: Duration,
    strategy: TransmitStrategy,
}

impl Transmitter {
    pub fn new(
        channel: Arc<dyn DeviceChannel>,
        pacing: Duration,
        strategy: TransmitStrategy,
    ) -> Self {
        Transmitter {
            channel,
            pacing,
            strategy,
        }
    }

    /// Schedules every send for the batch and returns immediately. The
    /// handle resolves once all sends have completed; callers that do not
    /// care about quiescence may drop it.
    pub fn transmit(&self, batch: OutboundBatch) -> JoinHandle<()> {
        let channel = self.channel.clone();
        let pacing = self.pacing;
        let strategy = self.strategy;

        counter!(BATCHES_TRANSMITTED).increment(1);
        tracing::info!(
            kind = ?batch.kind,
            items = batch.records.len(),
            strategy = ?strategy,
            "Transmitting batch"
        );

        tokio::spawn(async move {
            match strategy {
                TransmitStrategy::Discrete => transmit_discrete(channel, pacing, batch).await,
                TransmitStrategy::Blob => transmit_blob(channel, pacing, batch).await,
            }
        })
    }
}

/// One count message, then item i scheduled `i * pacing` from batch start.
/// The count send completes in the driver task before any item task is
/// spawned, so the receiver always learns the expected size first; a count
/// failure is logged and the items still go out.
async fn transmit_discrete(channel: Arc<dyn DeviceChannel>, pacing: Duration, batch: OutboundBatch) {
    let kind = batch.kind;
    let item_count = batch.records.len() as u32;

    let count = DeviceMessage::Count {
        request_kind: kind,
        item_count,
    };
    if let Err(e) = channel.send(count).await {
        tracing::error!(kind = ?kind, error = %e, "Count message send failed");
        counter!(ITEM_SEND_FAILURES).increment(1);
    }

    let mut sends = JoinSet::new();
    for (i, record) in batch.records.into_iter().enumerate() {
        let channel = channel.clone();
        let index = i as u32;
        let delay = pacing * index;
        sends.spawn(async move {
            sleep(delay).await;
            send_item(&*channel, kind, DeviceMessage::item(kind, index, record), index).await;
        });
    }

    while sends.join_next().await.is_some() {}
    tracing::debug!(kind = ?kind, items = item_count, "Batch transmission finished");
}

/// Alternate strategy: records joined into pipe-delimited text blobs, one
/// aggregate message per section, paced one interval apart. Fewer round
/// trips at the cost of risking the single-message size ceiling on large
/// seasons.
async fn transmit_blob(channel: Arc<dyn DeviceChannel>, pacing: Duration, batch: OutboundBatch) {
    let kind = batch.kind;
    let mut sends = JoinSet::new();

    for (i, section) in batch.into_sections().into_iter().enumerate() {
        let text = section
            .iter()
            .map(|record| blob_line(kind, record))
            .collect::<Vec<_>>()
            .join("\n");

        let channel = channel.clone();
        let index = i as u32;
        let delay = pacing * index;
        sends.spawn(async move {
            sleep(delay).await;
            let message = DeviceMessage::Item {
                request_kind: kind,
                index,
                title: text,
                subtitle: String::new(),
                extra: None,
                round: None,
                date: None,
                points: None,
                position: None,
            };
            send_item(&*channel, kind, message, index).await;
        });
    }

    while sends.join_next().await.is_some() {}
    tracing::debug!(kind = ?kind, "Blob transmission finished");
}

async fn send_item(channel: &dyn DeviceChannel, kind: RequestKind, message: DeviceMessage, index: u32) {
    match channel.send(message).await {
        Ok(()) => {
            tracing::debug!(kind = ?kind, index, "Item delivered");
            counter!(ITEMS_SENT).increment(1);
        }
        Err(e) => {
            // Best effort: the remaining items are already scheduled and
            // keep going.
            tracing::error!(kind = ?kind, index, error = %e, "Item send failed");
            counter!(ITEM_SEND_FAILURES).increment(1);
        }
    }
}

fn blob_line(kind: RequestKind, record: &ProjectedRecord) -> String {
    match kind {
        RequestKind::Overview => format!(
            "{}|{}|{}",
            record.round.unwrap_or(0),
            record.title,
            record.subtitle
        ),
        RequestKind::RaceDetails => format!("{}|{}", record.title, record.subtitle),
        RequestKind::DriverStandings => format!(
            "{}|{}|{}|{} pts",
            record.position.unwrap_or(0),
            record.title,
            record.subtitle,
            record.points.unwrap_or(0.0)
        ),
        RequestKind::TeamStandings => format!(
            "{}|{}|{} pts",
            record.position.unwrap_or(0),
            record.title,
            record.points.unwrap_or(0.0)
        ),
    }
}
