use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Installs the color-eyre panic and error hooks.
///
/// Belongs at the very top of main(), ahead of anything that can fail.
/// Repeat calls are no-ops. Reports show the failing file and line; the
/// environment-variable section is suppressed to keep them short.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Log filter applied when `RUST_LOG` is absent.
///
/// Production keeps the HTTP and ORM layers quiet; development shows
/// everything.
fn default_filter(environment: &Environment) -> EnvFilter {
    if environment.is_production() {
        EnvFilter::new("info,tower_http=warn,sea_orm=warn")
    } else {
        EnvFilter::new("trace")
    }
}

/// Sets up the global tracing subscriber for the given environment.
///
/// Production logs JSON with flattened event fields, ready for a log
/// aggregator. Development logs pretty-printed for a terminal. Both stacks
/// carry a [`tracing_error::ErrorLayer`] so eyre reports include span traces.
///
/// `RUST_LOG` overrides the default filter in either environment. If a
/// subscriber is already installed the call leaves it in place, which lets
/// tests call this freely.
pub fn init_tracing(environment: &Environment) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(environment));

    let result = match environment {
        Environment::Production => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
        Environment::Development => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
    };

    if result.is_ok() {
        info!(environment = ?environment, "Tracing initialized");
    } else {
        debug!("Global tracing subscriber already set, leaving it in place");
    }
}
