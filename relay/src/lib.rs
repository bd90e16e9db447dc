pub mod channel;
pub mod config;
pub mod errors;
pub mod metrics_defs;
pub mod projection;
pub mod protocol;
pub mod router;
pub mod transmitter;

#[cfg(test)]
pub mod testutils;
