//! Metrics definitions for the relay core.

use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUESTS_HANDLED: MetricDef = MetricDef {
    name: "relay.requests",
    metric_type: MetricType::Counter,
    description: "Number of inbound device requests dispatched",
};

pub const BATCHES_TRANSMITTED: MetricDef = MetricDef {
    name: "relay.batches",
    metric_type: MetricType::Counter,
    description: "Number of outbound batches handed to the transmitter",
};

pub const ITEMS_SENT: MetricDef = MetricDef {
    name: "relay.items.sent",
    metric_type: MetricType::Counter,
    description: "Number of outbound messages delivered to the channel",
};

pub const ITEM_SEND_FAILURES: MetricDef = MetricDef {
    name: "relay.items.failed",
    metric_type: MetricType::Counter,
    description: "Number of outbound messages the channel rejected",
};

pub const ENTRIES_SKIPPED: MetricDef = MetricDef {
    name: "relay.projection.skipped",
    metric_type: MetricType::Counter,
    description: "Number of source entries dropped during projection",
};

pub const ALL_METRICS: &[MetricDef] = &[
    REQUESTS_HANDLED,
    BATCHES_TRANSMITTED,
    ITEMS_SENT,
    ITEM_SEND_FAILURES,
    ENTRIES_SKIPPED,
];
