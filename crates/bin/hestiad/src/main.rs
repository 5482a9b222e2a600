//! # hestiad: hestia daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise tracing
//! - Construct the bridge client, port probe and media keys (adapters)
//! - Run one discovery session, falling back to the virtual devices
//! - Register configured scenes on top of the built-in ones
//! - Start the MQTT command channel when enabled
//! - Build the axum router and serve until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no home logic belongs here.

mod config;
mod media;

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use hestia_adapter_http_axum::router;
use hestia_adapter_http_axum::state::AppState;
use hestia_adapter_mqtt::MqttChannel;
use hestia_adapter_network::{HttpBridge, TcpProbe, local_ipv4};
use hestia_app::bootstrap;
use hestia_app::discovery::DiscoveryService;
use hestia_app::home::Home;

use crate::config::Config;
use crate::media::MediaBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter '{}'", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let bridge = Arc::new(
        HttpBridge::new(
            config.discovery.bridge_port,
            config.discovery.probe_timeout(),
        )
        .context("failed to build bridge client")?,
    );
    let home = Arc::new(Home::new(
        Arc::clone(&bridge),
        MediaBackend::from(config.media.backend),
    ));

    if config.discovery.enabled {
        let detected = match config.discovery.local_address {
            Some(_) => None,
            None => local_ipv4().await,
        };
        let discovery = DiscoveryService::new(
            bridge,
            Arc::new(TcpProbe),
            config.discovery.session(detected),
        );
        let report = home.discover(&discovery).await;
        for warning in &report.warnings {
            tracing::warn!(%warning, "discovery warning");
        }
        tracing::info!(
            devices = home.registry().len(),
            bridge = report.bridge.is_some(),
            bootstrapped = report.bootstrapped,
            elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            "discovery finished"
        );
    } else {
        let seeded = bootstrap::seed(home.registry())?;
        tracing::info!(devices = seeded.len(), "discovery disabled, virtual devices seeded");
    }

    for scene in &config.scenes {
        home.scenes()
            .create(&scene.name, scene.actions.clone())
            .with_context(|| format!("invalid scene '{}'", scene.name))?;
    }
    tracing::info!(scenes = home.scenes().list().len(), "scenes ready");

    let shutdown = CancellationToken::new();
    let mqtt = config.mqtt.enabled.then(|| {
        let channel = MqttChannel::new(config.mqtt.clone());
        tokio::spawn(channel.run(Arc::clone(&home), shutdown.child_token()))
    });

    let app = router::build(AppState::from_arc(home));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "hestiad listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    if let Some(task) = mqtt {
        if let Err(err) = task.await {
            tracing::error!(error = %err, "MQTT channel task failed");
        }
    }

    tracing::info!("hestiad stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
