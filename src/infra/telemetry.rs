use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::cache::metrics::{
    METRIC_DISTRIBUTED_HIT, METRIC_DISTRIBUTED_MISS, METRIC_LISTING_HIT, METRIC_LISTING_MISS,
    METRIC_LOOKUP_MS, METRIC_MEMORY_HIT, METRIC_MEMORY_MISS, METRIC_ORIGIN_FETCH,
    METRIC_POPULATE_DROPPED,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_MEMORY_HIT,
            Unit::Count,
            "Total number of memory-tier hits."
        );
        describe_counter!(
            METRIC_MEMORY_MISS,
            Unit::Count,
            "Total number of memory-tier misses."
        );
        describe_counter!(
            METRIC_DISTRIBUTED_HIT,
            Unit::Count,
            "Total number of distributed-tier hits."
        );
        describe_counter!(
            METRIC_DISTRIBUTED_MISS,
            Unit::Count,
            "Total number of distributed-tier misses."
        );
        describe_counter!(
            METRIC_LISTING_HIT,
            Unit::Count,
            "Total number of listing resolutions served from the distributed tier."
        );
        describe_counter!(
            METRIC_LISTING_MISS,
            Unit::Count,
            "Total number of listing resolutions that enumerated the origin."
        );
        describe_counter!(
            METRIC_ORIGIN_FETCH,
            Unit::Count,
            "Total number of object fetches against the origin store."
        );
        describe_counter!(
            METRIC_POPULATE_DROPPED,
            Unit::Count,
            "Total number of best-effort cache population writes that failed or timed out."
        );
        describe_histogram!(
            METRIC_LOOKUP_MS,
            Unit::Milliseconds,
            "Lookup latency in milliseconds, across all serving tiers."
        );
    });
}
