/*
 *  main.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Host runner for the hybrid watchface
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
use anyhow::Context;
use env_logger::Env;
use log::{error, info, warn};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use hybridface::assets::AssetStore;
use hybridface::config::{self, Config};
use hybridface::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use hybridface::display::MemoryDriver;
use hybridface::haptics::LogHaptics;
use hybridface::runner::{self, RunOptions, Simulation};
use hybridface::services::{EventBus, SimulatedBattery, SimulatedLink, SystemClock};
use hybridface::Watchface;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Waits for SIGINT or SIGTERM and logs which one arrived.
#[cfg(unix)]
async fn signal_handler() -> std::io::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn signal_handler() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received. Initiating graceful shutdown.");
    Ok(())
}

/// Resolves on the first shutdown signal; never resolves if the handlers
/// could not be installed.
async fn shutdown_signal() {
    if let Err(e) = signal_handler().await {
        warn!("Signal handlers unavailable ({e}); run with --run-secs to stop");
        std::future::pending::<()>().await;
    }
}

fn simulation(cfg: &Config) -> Simulation {
    Simulation {
        battery: SimulatedBattery::new(
            cfg.battery_start_percent(),
            cfg.battery_drain_every_secs(),
            cfg.battery_charging(),
        ),
        link: SimulatedLink::new(cfg.bluetooth_connected(), cfg.bluetooth_toggle_every_secs()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let loaded = config::load().context("loading configuration")?;
    let cfg = loaded.config;

    if loaded.dump {
        println!("{}", config::dump(&cfg)?);
        return Ok(());
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("This is {}, analog hands with a digital heart", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let assets = AssetStore::new();
    let mut face = Watchface::new(&assets, LogHaptics).context("loading watchface assets")?;

    let mut display = MemoryDriver::new_with_size(DISPLAY_WIDTH, DISPLAY_HEIGHT);
    if let Some(path) = cfg.snapshot.as_ref() {
        info!("Writing snapshots to {}", path.display());
        display = display.with_snapshot(path);
    }

    let mut sim = simulation(&cfg);
    let mut bus = EventBus::new();
    let opts = RunOptions { run_secs: cfg.run_secs, ..RunOptions::default() };

    let result = runner::run(
        &mut face,
        &mut display,
        &SystemClock,
        &mut sim,
        &mut bus,
        opts,
        shutdown_signal(),
    )
    .await;

    match result {
        Ok(ticks) => {
            let stats = face.stats();
            info!(
                "Stopped after {} ticks: {} frames, {} hand recomputes, {} date changes",
                ticks, stats.frames, stats.hand_recomputes, stats.date_reformats
            );
        }
        Err(e) => {
            error!("Watchface loop failed: {e}");
            return Err(e.into());
        }
    }

    drop(face);
    info!("Released all assets ({} live)", assets.live());
    Ok(())
}
