//! Facechat binary - composition root for the chat relay.
//!
//! 1. Parse CLI flags and load configuration from TOML
//! 2. Initialize tracing
//! 3. Build the relay state and serve `POST /chat`

mod cli;

use clap::Parser;

use facechat_relay::{start_server, AppState};

use cli::{CliArgs, ConfigSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let (mut config, source) = cli::load_config(&config_file);
    args.apply(&mut config);

    // Tracing. RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting facechat relay v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        ConfigSource::File => {
            tracing::info!(path = %config_file.display(), "Configuration loaded")
        }
        ConfigSource::Missing => {
            tracing::info!(path = %config_file.display(), "No configuration file, using defaults")
        }
        ConfigSource::Invalid(error) => tracing::warn!(
            path = %config_file.display(),
            error = %error,
            "Invalid configuration file, using defaults"
        ),
    }

    let state = AppState::new(config.relay.clone())?;
    tracing::info!(
        upstream = state.upstream.endpoint(),
        timeout_secs = config.relay.upstream_timeout_secs,
        "Inference backend configured"
    );

    if let Err(e) = start_server(state).await {
        tracing::error!(addr = %config.relay.bind_addr(), error = %e, "Relay stopped");
        return Err(e.into());
    }

    Ok(())
}
