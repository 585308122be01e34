use crate::Environment;
use tracing_subscriber::{prelude::*, EnvFilter};

const PRODUCTION_DIRECTIVES: &str = "info,tower_http=info,sea_orm=warn,sqlx=warn";
const DEVELOPMENT_DIRECTIVES: &str = "debug,sea_orm=info,sqlx=warn,hyper=info";

/// Colored eyre reports with source locations and no env dump.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Default directives when `RUST_LOG` is not set.
pub fn default_directives(environment: &Environment) -> &'static str {
    if environment.is_production() {
        PRODUCTION_DIRECTIVES
    } else {
        DEVELOPMENT_DIRECTIVES
    }
}

/// Installs the global subscriber: flattened JSON lines in production,
/// pretty output otherwise, both with an `ErrorLayer` for span traces.
///
/// A second call is a no-op, so tests may call it freely.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(environment)));

    let installed = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match installed {
        Ok(()) => ::tracing::info!(?environment, "event hub logging ready"),
        Err(_) => ::tracing::debug!("subscriber already set"),
    }
}
