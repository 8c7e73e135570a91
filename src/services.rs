/*
 *  services.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  System services, host simulations and the event bus
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
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chrono::Local;
use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::clock_sample::ClockSample;

/// Battery state as reported by the power service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryChargeState {
    /// 0..=100
    pub charge_percent: u8,
    pub is_charging: bool,
    pub is_plugged: bool,
}

/// Wall-clock source
pub trait ClockService {
    fn now(&self) -> ClockSample;
}

pub trait BatteryService {
    fn peek(&self) -> BatteryChargeState;
}

/// Phone link state
pub trait ConnectivityService {
    fn peek(&self) -> bool;
}

/// Local time from the host
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockService for SystemClock {
    fn now(&self) -> ClockSample {
        ClockSample::from_datetime(&Local::now())
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    sample: Rc<RefCell<ClockSample>>,
}

impl ManualClock {
    pub fn new(sample: ClockSample) -> Self {
        Self { sample: Rc::new(RefCell::new(sample)) }
    }

    pub fn set(&self, sample: ClockSample) {
        *self.sample.borrow_mut() = sample;
    }
}

impl ClockService for ManualClock {
    fn now(&self) -> ClockSample {
        *self.sample.borrow()
    }
}

/// Battery that loses one percent every `drain_every_secs` ticks unless
/// it is charging.
#[derive(Debug, Clone)]
pub struct SimulatedBattery {
    state: BatteryChargeState,
    drain_every_secs: u64,
    elapsed: u64,
}

impl SimulatedBattery {
    pub fn new(start_percent: u8, drain_every_secs: u64, charging: bool) -> Self {
        Self {
            state: BatteryChargeState {
                charge_percent: start_percent.min(100),
                is_charging: charging,
                is_plugged: charging,
            },
            drain_every_secs: drain_every_secs.max(1),
            elapsed: 0,
        }
    }

    /// One second passes; returns the new state if it changed
    pub fn advance(&mut self) -> Option<BatteryChargeState> {
        self.elapsed += 1;
        if self.state.is_charging || self.elapsed % self.drain_every_secs != 0 {
            return None;
        }
        if self.state.charge_percent == 0 {
            warn!("Simulated battery is flat");
            return None;
        }
        self.state.charge_percent -= 1;
        Some(self.state)
    }
}

impl BatteryService for SimulatedBattery {
    fn peek(&self) -> BatteryChargeState {
        self.state
    }
}

/// Phone link that flips every `toggle_every_secs` ticks; never flips
/// when the interval is unset.
#[derive(Debug, Clone)]
pub struct SimulatedLink {
    connected: bool,
    toggle_every_secs: Option<u64>,
    elapsed: u64,
}

impl SimulatedLink {
    pub fn new(connected: bool, toggle_every_secs: Option<u64>) -> Self {
        Self { connected, toggle_every_secs, elapsed: 0 }
    }

    /// One second passes; returns the new link state on a flip
    pub fn advance(&mut self) -> Option<bool> {
        self.elapsed += 1;
        let every = self.toggle_every_secs.filter(|&n| n > 0)?;
        if self.elapsed % every != 0 {
            return None;
        }
        self.connected = !self.connected;
        Some(self.connected)
    }
}

impl ConnectivityService for SimulatedLink {
    fn peek(&self) -> bool {
        self.connected
    }
}

/// The three event streams a watchface can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Battery,
    Connectivity,
    Tick,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Battery => "battery",
            EventKind::Connectivity => "connectivity",
            EventKind::Tick => "tick",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    Tick(ClockSample),
    Battery(BatteryChargeState),
    Connection(bool),
}

impl WatchEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            WatchEvent::Tick(_) => EventKind::Tick,
            WatchEvent::Battery(_) => EventKind::Battery,
            WatchEvent::Connection(_) => EventKind::Connectivity,
        }
    }

    /// Hand the event to the matching handler
    pub fn dispatch<W: WatchEvents + ?Sized>(self, handler: &mut W) {
        match self {
            WatchEvent::Tick(sample) => handler.on_tick(&sample),
            WatchEvent::Battery(state) => handler.on_battery(&state),
            WatchEvent::Connection(connected) => handler.on_connection(connected),
        }
    }
}

/// Event handlers; each call runs to completion before the next event.
pub trait WatchEvents {
    fn on_tick(&mut self, sample: &ClockSample);
    fn on_battery(&mut self, state: &BatteryChargeState);
    fn on_connection(&mut self, connected: bool);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BusError {
    #[error("already subscribed to {0} events")]
    AlreadySubscribed(EventKind),
}

#[derive(Debug, Default)]
struct Registry {
    active: Vec<EventKind>,
    released: Vec<EventKind>,
}

/// Single-consumer event queue. Events of a kind nobody subscribes to are
/// dropped at publish time; the rest are delivered in arrival order.
#[derive(Debug)]
pub struct EventBus {
    tx: UnboundedSender<WatchEvent>,
    rx: UnboundedReceiver<WatchEvent>,
    registry: Rc<RefCell<Registry>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, registry: Rc::new(RefCell::new(Registry::default())) }
    }

    pub fn subscribe(&self, kind: EventKind) -> Result<Subscription, BusError> {
        let mut registry = self.registry.borrow_mut();
        if registry.active.contains(&kind) {
            return Err(BusError::AlreadySubscribed(kind));
        }
        registry.active.push(kind);
        info!("Subscribed to {} events", kind);
        Ok(Subscription { kind, registry: Rc::clone(&self.registry) })
    }

    /// A sending handle for event producers
    pub fn publisher(&self) -> Publisher {
        Publisher { tx: self.tx.clone(), registry: Rc::clone(&self.registry) }
    }

    pub fn publish(&self, event: WatchEvent) -> bool {
        send_if_subscribed(&self.tx, &self.registry, event)
    }

    /// Next queued event, waiting if none
    pub async fn recv(&mut self) -> Option<WatchEvent> {
        self.rx.recv().await
    }

    /// Next queued event, if any
    pub fn try_recv(&mut self) -> Option<WatchEvent> {
        self.rx.try_recv().ok()
    }

    pub fn is_subscribed(&self, kind: EventKind) -> bool {
        self.registry.borrow().active.contains(&kind)
    }

    /// Kinds unsubscribed so far, in release order
    pub fn released(&self) -> Vec<EventKind> {
        self.registry.borrow().released.clone()
    }
}

fn send_if_subscribed(
    tx: &UnboundedSender<WatchEvent>,
    registry: &Rc<RefCell<Registry>>,
    event: WatchEvent,
) -> bool {
    let kind = event.kind();
    if !registry.borrow().active.contains(&kind) {
        debug!("Dropping {} event, no subscriber", kind);
        return false;
    }
    tx.send(event).is_ok()
}

/// Cloneable sender bound to a bus
#[derive(Debug, Clone)]
pub struct Publisher {
    tx: UnboundedSender<WatchEvent>,
    registry: Rc<RefCell<Registry>>,
}

impl Publisher {
    pub fn publish(&self, event: WatchEvent) -> bool {
        send_if_subscribed(&self.tx, &self.registry, event)
    }
}

/// Live subscription; unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    kind: EventKind,
    registry: Rc<RefCell<Registry>>,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut registry = self.registry.borrow_mut();
        registry.active.retain(|&k| k != self.kind);
        registry.released.push(self.kind);
        info!("Unsubscribed from {} events", self.kind);
    }
}

/// Subscriptions released in reverse order of acquisition.
#[derive(Debug, Default)]
pub struct Subscriptions {
    guards: Vec<Subscription>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, guard: Subscription) {
        self.guards.push(guard);
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ClockSample {
        ClockSample {
            hour: 12,
            minute: 5,
            second: 0,
            day_of_month: 1,
            month: 0,
            weekday: 4,
            day_of_year: 0,
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: Vec<EventKind>,
    }

    impl WatchEvents for Recorder {
        fn on_tick(&mut self, _: &ClockSample) { self.seen.push(EventKind::Tick); }
        fn on_battery(&mut self, _: &BatteryChargeState) { self.seen.push(EventKind::Battery); }
        fn on_connection(&mut self, _: bool) { self.seen.push(EventKind::Connectivity); }
    }

    #[test]
    fn test_battery_drains_on_interval() {
        let mut battery = SimulatedBattery::new(3, 2, false);
        assert_eq!(battery.advance(), None);
        assert_eq!(battery.advance().map(|s| s.charge_percent), Some(2));
        assert_eq!(battery.peek().charge_percent, 2);
    }

    #[test]
    fn test_battery_holds_while_charging_or_flat() {
        let mut charging = SimulatedBattery::new(50, 1, true);
        assert_eq!(charging.advance(), None);
        assert!(charging.peek().is_plugged);

        let mut flat = SimulatedBattery::new(0, 1, false);
        assert_eq!(flat.advance(), None);
    }

    #[test]
    fn test_link_toggles() {
        let mut link = SimulatedLink::new(true, Some(2));
        assert_eq!(link.advance(), None);
        assert_eq!(link.advance(), Some(false));
        assert_eq!(link.advance(), None);
        assert_eq!(link.advance(), Some(true));

        let mut steady = SimulatedLink::new(false, None);
        assert_eq!(steady.advance(), None);
        assert!(!steady.peek());
    }

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(sample());
        let mut later = sample();
        later.minute = 6;
        clock.clone().set(later);
        assert_eq!(clock.now().minute, 6);
    }

    #[test]
    fn test_unsubscribed_events_are_dropped() {
        let mut bus = EventBus::new();
        assert!(!bus.publish(WatchEvent::Connection(true)));

        let _tick = bus.subscribe(EventKind::Tick).unwrap();
        assert!(bus.publish(WatchEvent::Tick(sample())));
        assert_eq!(bus.try_recv(), Some(WatchEvent::Tick(sample())));
        assert_eq!(bus.try_recv(), None);
    }

    #[test]
    fn test_double_subscribe_rejected() {
        let bus = EventBus::new();
        let _a = bus.subscribe(EventKind::Battery).unwrap();
        assert_eq!(
            bus.subscribe(EventKind::Battery).unwrap_err(),
            BusError::AlreadySubscribed(EventKind::Battery)
        );
    }

    #[test]
    fn test_events_arrive_in_order() {
        let mut bus = EventBus::new();
        let mut subs = Subscriptions::new();
        subs.push(bus.subscribe(EventKind::Battery).unwrap());
        subs.push(bus.subscribe(EventKind::Connectivity).unwrap());
        subs.push(bus.subscribe(EventKind::Tick).unwrap());

        let publisher = bus.publisher();
        publisher.publish(WatchEvent::Connection(false));
        publisher.publish(WatchEvent::Tick(sample()));
        bus.publish(WatchEvent::Battery(BatteryChargeState {
            charge_percent: 7,
            is_charging: false,
            is_plugged: false,
        }));

        let mut recorder = Recorder::default();
        while let Some(event) = bus.try_recv() {
            event.dispatch(&mut recorder);
        }
        assert_eq!(
            recorder.seen,
            vec![EventKind::Connectivity, EventKind::Tick, EventKind::Battery]
        );
    }

    #[test]
    fn test_teardown_in_reverse_order() {
        let bus = EventBus::new();
        let mut subs = Subscriptions::new();
        subs.push(bus.subscribe(EventKind::Battery).unwrap());
        subs.push(bus.subscribe(EventKind::Connectivity).unwrap());
        subs.push(bus.subscribe(EventKind::Tick).unwrap());
        assert_eq!(subs.len(), 3);

        drop(subs);
        assert_eq!(
            bus.released(),
            vec![EventKind::Tick, EventKind::Connectivity, EventKind::Battery]
        );
        assert!(!bus.is_subscribed(EventKind::Battery));
    }

    #[tokio::test]
    async fn test_recv_waits_for_publish() {
        let mut bus = EventBus::new();
        let _sub = bus.subscribe(EventKind::Connectivity).unwrap();
        let publisher = bus.publisher();
        publisher.publish(WatchEvent::Connection(true));
        assert_eq!(bus.recv().await, Some(WatchEvent::Connection(true)));
    }
}
