use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub const LOGIN_SUCCESS_TOTAL: &str = "blockflare_login_success_total";
pub const LOGIN_FAILURE_TOTAL: &str = "blockflare_login_failure_total";
pub const POST_SAVED_TOTAL: &str = "blockflare_post_saved_total";
pub const POST_DELETED_TOTAL: &str = "blockflare_post_deleted_total";
pub const UPLOAD_STORED_TOTAL: &str = "blockflare_upload_stored_total";

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
            LOGIN_SUCCESS_TOTAL,
            Unit::Count,
            "Console logins that issued a session token."
        );
        describe_counter!(
            LOGIN_FAILURE_TOTAL,
            Unit::Count,
            "Console logins rejected for wrong credentials."
        );
        describe_counter!(
            POST_SAVED_TOTAL,
            Unit::Count,
            "Posts written through the console editor."
        );
        describe_counter!(
            POST_DELETED_TOTAL,
            Unit::Count,
            "Posts soft-deleted through the console."
        );
        describe_counter!(
            UPLOAD_STORED_TOTAL,
            Unit::Count,
            "Images stored through the editor upload endpoint."
        );
    });
}
