//! Bastion entry-point: loads configuration, wires adapters and serves HTTP.

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bastion::config::{AppSettings, BuildMode, secrets_from_env};
use bastion::inbound::http::health::HealthState;
use bastion::server::{ServerConfig, ServiceSettings, build_services, create_server};

/// Application bootstrap.
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

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let mode = BuildMode::from_debug_assertions();
    let secrets = secrets_from_env(&DefaultEnv::new(), mode).wrap_err("failed to load secrets")?;
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;

    let services = build_services(
        ServiceSettings::from(&settings),
        &secrets.token_secret,
        Arc::new(DefaultClock),
    )
    .wrap_err("failed to build services")?;
    if let Some(password) = secrets.admin_password.as_deref() {
        let created = services
            .bootstrap_admin(settings.admin_username(), password)
            .await
            .wrap_err("failed to bootstrap administrator")?;
        if !created {
            info!(username = settings.admin_username(), "administrator already present");
        }
    }

    let config = ServerConfig::new(secrets.session, bind_addr)
        .with_cors_origins(settings.cors_allowed_origins());
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), services.http_state, config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, build_mode = ?mode, "listening");

    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested; draining");
            health_state.begin_draining();
            handle.stop(true).await;
        }
    });
    server.await.wrap_err("server terminated")
}
