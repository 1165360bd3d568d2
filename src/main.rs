/*
 *  main.rs
 *
 *  inkwx - weather you can wait for
 *  (c) 2024-26 inkwx contributors
 *
 *  Daemon entry point: wire the config store, weather client, panel and
 *  busy lamp into the controller, then pump button and timer events
 *  until a termination signal.
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
use anyhow::{Context, bail};
use chrono::{Local, Timelike};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;

use inkwx::config::{Cli, ConfigStore, find_config_file};
use inkwx::controller::{Event, ModeController};
use inkwx::hw::LogPanel;
#[cfg(not(feature = "hardware"))]
use inkwx::hw::NullBusy;
use inkwx::orchestrator::Orchestrator;
use inkwx::render::RenderEngine;
use inkwx::weather::WeatherClient;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Queue depth: one refresh in flight plus a short backlog. Anything
/// beyond this arrives mid-refresh and is dropped.
const EVENT_QUEUE_DEPTH: usize = 8;

/// Minute of the hour at which the scheduled refresh fires.
const REFRESH_MINUTE: u32 = 1;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = cli.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    info!("{} - weather you can wait for", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let Some(config_path) = cli.config.clone().or_else(find_config_file) else {
        bail!("no config file found; pass --config or create ~/.config/inkwx/config.yaml");
    };
    info!("config: {}", config_path.display());
    let store = ConfigStore::new(&config_path);
    let cfg = store
        .load()
        .with_context(|| format!("loading {}", config_path.display()))?;

    if cli.dump_config {
        print!("{}", serde_yaml::to_string(&cfg)?);
        return Ok(());
    }

    let client = WeatherClient::new()?;
    let engine = RenderEngine::new();

    #[cfg(feature = "hardware")]
    {
        let busy = inkwx::gpio::BusyPin::new().context("busy pin setup")?;
        let orchestrator = Orchestrator::new(client, LogPanel, busy, engine);
        run(store, orchestrator, cli.once, true).await
    }
    #[cfg(not(feature = "hardware"))]
    {
        let orchestrator = Orchestrator::new(client, LogPanel, NullBusy, engine);
        run(store, orchestrator, cli.once, false).await
    }
}

async fn run<B>(
    store: ConfigStore,
    orchestrator: Orchestrator<WeatherClient, LogPanel, B>,
    once: bool,
    hardware: bool,
) -> anyhow::Result<()>
where
    B: inkwx::hw::BusyIndicator,
{
    let mut controller = ModeController::new(store, orchestrator);

    if once {
        controller.handle(Event::Tick).await;
        return Ok(());
    }

    let (tx, rx) = mpsc::channel::<Event>(EVENT_QUEUE_DEPTH);
    spawn_scheduler(tx.clone());

    #[cfg(feature = "hardware")]
    if hardware {
        inkwx::gpio::spawn_button_poller(tx.clone()).context("button pin setup")?;
        info!("button poller running");
    }
    #[cfg(not(feature = "hardware"))]
    let _ = hardware;

    // first frame on startup, not at the next minute boundary
    if tx.try_send(Event::Tick).is_err() {
        warn!("event queue full at startup");
    }

    tokio::select! {
        _ = controller.run(rx) => {
            info!("event queue closed, shutting down");
        }
        res = signal_handler() => {
            res?;
        }
    }
    Ok(())
}

/// Fire a refresh once per hour, at minute one so top-of-hour forecast
/// data has landed. A refresh still in flight absorbs the tick.
fn spawn_scheduler(tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        let mut last_fired_hour: Option<u32> = None;
        loop {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let now = Local::now();
            if now.minute() == REFRESH_MINUTE && last_fired_hour != Some(now.hour()) {
                last_fired_hour = Some(now.hour());
                if tx.try_send(Event::Tick).is_err() {
                    warn!("refresh in progress, dropping scheduled tick");
                }
            }
        }
    });
}

/// Wait for SIGINT, SIGTERM or SIGHUP.
async fn signal_handler() -> anyhow::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => info!("SIGINT received, shutting down"),
        _ = sigterm.recv() => info!("SIGTERM received, shutting down"),
        _ = sighup.recv() => info!("SIGHUP received, shutting down"),
    }
    Ok(())
}
