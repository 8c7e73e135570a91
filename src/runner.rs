/*
 *  runner.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Host event loop: tick source, simulations and dispatch
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
use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use thiserror::Error;

use crate::display::error::DisplayError;
use crate::display::traits::DisplayDriver;
use crate::haptics::HapticDriver;
use crate::services::{
    BatteryService, BusError, ClockService, ConnectivityService, EventBus, EventKind,
    SimulatedBattery, SimulatedLink, Subscriptions, WatchEvent,
};
use crate::watchface::Watchface;

/// Loop knobs
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Stop after this many ticks
    pub run_secs: Option<u64>,
    /// Tick period; one second on a real watch
    pub tick: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { run_secs: None, tick: Duration::from_secs(1) }
    }
}

/// Stand-ins for the battery and link services
#[derive(Debug, Clone)]
pub struct Simulation {
    pub battery: SimulatedBattery,
    pub link: SimulatedLink,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("display: {0}")]
    Display(#[from] DisplayError),
    #[error("event bus: {0}")]
    Bus(#[from] BusError),
}

/// Subscribe in the order battery, connectivity, tick.
pub fn subscribe_all(bus: &EventBus) -> Result<Subscriptions, BusError> {
    let mut subs = Subscriptions::new();
    for kind in [EventKind::Battery, EventKind::Connectivity, EventKind::Tick] {
        subs.push(bus.subscribe(kind)?);
    }
    Ok(subs)
}

/// Drive the face until `shutdown` resolves or `run_secs` ticks pass.
/// Returns the number of ticks handled.
///
/// The screen is populated from peeked state before any subscription, so
/// the first frame is complete. Subscriptions are released in reverse
/// order on every exit path.
pub async fn run<C, D, H, F>(
    face: &mut Watchface<H>,
    display: &mut D,
    clock: &C,
    sim: &mut Simulation,
    bus: &mut EventBus,
    opts: RunOptions,
    shutdown: F,
) -> Result<u64, RunError>
where
    C: ClockService,
    D: DisplayDriver,
    H: HapticDriver,
    F: Future<Output = ()>,
{
    display.init()?;
    face.startup(&clock.now(), &sim.battery.peek(), sim.link.peek());
    face.render_if_dirty(display)?;

    let subs = subscribe_all(bus)?;
    let publisher = bus.publisher();

    let mut interval = tokio::time::interval(opts.tick);
    // the first tick fires immediately; startup already drew that second
    interval.tick().await;

    tokio::pin!(shutdown);
    let mut ticks = 0u64;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown requested after {} ticks", ticks);
                break;
            }
            _ = interval.tick() => {
                if let Some(state) = sim.battery.advance() {
                    publisher.publish(WatchEvent::Battery(state));
                }
                if let Some(connected) = sim.link.advance() {
                    publisher.publish(WatchEvent::Connection(connected));
                }
                publisher.publish(WatchEvent::Tick(clock.now()));

                while let Some(event) = bus.try_recv() {
                    event.dispatch(face);
                }
                if face.render_if_dirty(display)? {
                    debug!("Frame {} pushed", face.stats().frames);
                }

                ticks += 1;
                if opts.run_secs.is_some_and(|limit| ticks >= limit) {
                    info!("Ran for {} ticks", ticks);
                    break;
                }
            }
        }
    }

    drop(subs);
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_all_order() {
        let bus = EventBus::new();
        let subs = subscribe_all(&bus).unwrap();
        assert_eq!(subs.len(), 3);
        assert!(bus.is_subscribed(EventKind::Tick));

        drop(subs);
        assert_eq!(
            bus.released(),
            vec![EventKind::Tick, EventKind::Connectivity, EventKind::Battery]
        );
    }

    #[test]
    fn test_subscribe_all_fails_when_taken() {
        let bus = EventBus::new();
        let _tick = bus.subscribe(EventKind::Tick).unwrap();
        assert!(matches!(
            subscribe_all(&bus),
            Err(BusError::AlreadySubscribed(EventKind::Tick))
        ));
        // battery and connectivity were released again on the way out
        assert_eq!(bus.released(), vec![EventKind::Connectivity, EventKind::Battery]);
    }
}
