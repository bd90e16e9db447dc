//! The outbound device transport, abstracted so transmission logic can be
//! tested against a recording double and the binary can ship a plain
//! stdout implementation.

use crate::protocol::DeviceMessage;
use async_trait::async_trait;

#[derive(thiserror::Error, Debug)]
pub enum ChannelError {
    #[error("transport rejected message: {0}")]
    Rejected(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An opaque message transport to the companion device. `send` resolves when
/// the transport has accepted or rejected this one message; there is no
/// multi-message transaction concept.
#[async_trait]
pub trait DeviceChannel: Send + Sync {
    async fn send(&self, message: DeviceMessage) -> Result<(), ChannelError>;
}

/// Writes each outbound message as one JSON object per line on stdout.
pub struct JsonLinesChannel;

#[async_trait]
impl DeviceChannel for JsonLinesChannel {
    async fn send(&self, message: DeviceMessage) -> Result<(), ChannelError> {
        let line = serde_json::to_string(&message)?;
        println!("{line}");
        Ok(())
    }
}
