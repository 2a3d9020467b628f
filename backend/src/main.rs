//! Accounts server entry point.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use accounts::inbound::http::health::HealthState;
use accounts::settings::AccountsSettings;
use accounts::startup::prepare_account_store;

use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AccountsSettings::load()
        .map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let bind_addr = settings.bind_addr().context("invalid bind address")?;
    let store = prepare_account_store(&settings)
        .await
        .context("failed to prepare account store")?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, store))
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "accounts server listening");

    server.await.context("server terminated with an error")
}
