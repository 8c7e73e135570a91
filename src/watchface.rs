/*
 *  watchface.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Watchface state, redraw gate and screen composition
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
use embedded_graphics::prelude::*;
use log::{debug, info};

use crate::angle::{second_angle, HandAngles};
use crate::assets::{AssetError, AssetId, AssetStore, Bitmap};
use crate::clock_sample::ClockSample;
use crate::display::components::{ClockDisplay, Hands, StatusBar};
use crate::display::error::DisplayError;
use crate::display::traits::DisplayDriver;
use crate::haptics::{HapticDriver, VibePattern};
use crate::services::{BatteryChargeState, WatchEvents};

/// Last rendered values of the minute and day gates; `None` until the
/// first tick so that tick always renders.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DisplayCache {
    pub last_minute_of_day: Option<u16>,
    pub last_day_of_year: Option<u16>,
}

/// Work done by the gate, for logs and tests
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GateStats {
    pub ticks: u64,
    pub hand_recomputes: u64,
    pub time_reformats: u64,
    pub date_reformats: u64,
    pub redraw_requests: u64,
    pub frames: u64,
    pub vibrations: u64,
}

/// Everything the face owns between events.
#[derive(Debug)]
pub struct Watchface<H: HapticDriver> {
    background: Bitmap,
    hands: Hands,
    clock: ClockDisplay,
    status: StatusBar,
    haptics: H,
    angles: HandAngles,
    cache: DisplayCache,
    stats: GateStats,
}

impl<H: HapticDriver> Watchface<H> {
    /// Load all assets and build the layer stack. Nothing is shown until
    /// [`Watchface::startup`] or the first event.
    pub fn new(assets: &AssetStore, haptics: H) -> Result<Self, AssetError> {
        let background = assets.load(AssetId::Face)?;
        let status = StatusBar::new(assets)?;
        info!("Watchface assets loaded ({} bitmaps)", assets.live());

        Ok(Self {
            background,
            hands: Hands::new(),
            clock: ClockDisplay::new(assets),
            status,
            haptics,
            angles: HandAngles::default(),
            cache: DisplayCache::default(),
            stats: GateStats::default(),
        })
    }

    /// Populate every layer from peeked service state. The link peek only
    /// sets the icon; it never vibrates.
    pub fn startup(&mut self, now: &ClockSample, battery: &BatteryChargeState, connected: bool) {
        self.on_battery(battery);
        self.status.set_connected(connected);
        self.on_tick(now);
        info!(
            "Startup: {}, battery {}, link {}",
            self.clock.time().text(),
            self.status.battery_text(),
            if connected { "up" } else { "down" }
        );
    }

    pub fn angles(&self) -> HandAngles {
        self.angles
    }

    pub fn cache(&self) -> DisplayCache {
        self.cache
    }

    pub fn stats(&self) -> GateStats {
        self.stats
    }

    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    pub fn clock(&self) -> &ClockDisplay {
        &self.clock
    }

    pub fn status(&self) -> &StatusBar {
        &self.status
    }

    pub fn haptics(&self) -> &H {
        &self.haptics
    }

    pub fn time_text(&self) -> &str {
        self.clock.time().text()
    }

    pub fn date_text(&self) -> &str {
        self.clock.date().text()
    }

    pub fn battery_text(&self) -> &str {
        self.status.battery_text()
    }

    pub fn is_dirty(&self) -> bool {
        self.hands.layer().is_dirty() || self.clock.is_dirty() || self.status.is_dirty()
    }

    /// Compose the whole stack in z-order and flush, if anything changed.
    /// Returns whether a frame was pushed.
    pub fn render_if_dirty<D: DisplayDriver>(&mut self, display: &mut D) -> Result<bool, DisplayError> {
        if !self.is_dirty() {
            return Ok(false);
        }

        self.background.draw_at(display, Point::zero())?;
        self.hands.render(display)?;
        self.clock.render(display)?;
        self.status.render(display)?;
        display.flush()?;

        self.hands.layer_mut().clean();
        self.clock.clean();
        self.status.clean();
        self.stats.frames += 1;
        Ok(true)
    }
}

impl<H: HapticDriver> WatchEvents for Watchface<H> {
    fn on_tick(&mut self, sample: &ClockSample) {
        self.stats.ticks += 1;

        let minutes = sample.minutes_of_day();
        if self.cache.last_minute_of_day != Some(minutes) {
            self.angles = HandAngles::at(minutes, sample.second);
            self.hands.set_hour_minute(&self.angles);
            self.clock.set_time(sample);
            self.cache.last_minute_of_day = Some(minutes);
            self.stats.hand_recomputes += 1;
            self.stats.time_reformats += 1;
            debug!("Minute gate open at {}: {}", minutes, self.clock.time().text());
        }

        self.angles.second = second_angle(sample.second);
        self.hands.set_second(self.angles.second);
        self.hands.layer_mut().mark_dirty();
        self.stats.redraw_requests += 1;

        if self.cache.last_day_of_year != Some(sample.day_of_year) {
            self.clock.set_date(sample);
            self.cache.last_day_of_year = Some(sample.day_of_year);
            self.stats.date_reformats += 1;
            debug!("Day gate open at {}: {}", sample.day_of_year, self.clock.date().text());
        }
    }

    fn on_battery(&mut self, state: &BatteryChargeState) {
        self.status.set_battery(state);
        debug!("Battery {}", self.status.battery_text());
    }

    fn on_connection(&mut self, connected: bool) {
        let previous = self.status.set_connected(connected);
        if !connected && previous != Some(false) {
            self.haptics.enqueue(&VibePattern::lost_connection());
            self.stats.vibrations += 1;
        }
        info!("Phone link {}", if connected { "connected" } else { "lost" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::ANGLE_K;
    use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
    use crate::display::drivers::memory::MemoryDriver;
    use crate::haptics::RecordingHaptics;

    fn at(hour: u8, minute: u8, second: u8, day_of_year: u16) -> ClockSample {
        ClockSample {
            hour,
            minute,
            second,
            day_of_month: 16,
            month: 9,
            weekday: 5,
            day_of_year,
        }
    }

    fn battery(percent: u8) -> BatteryChargeState {
        BatteryChargeState { charge_percent: percent, is_charging: false, is_plugged: false }
    }

    fn face() -> (Watchface<RecordingHaptics>, RecordingHaptics) {
        let assets = AssetStore::new();
        let haptics = RecordingHaptics::new();
        (Watchface::new(&assets, haptics.clone()).unwrap(), haptics)
    }

    #[test]
    fn test_first_tick_renders_everything() {
        let (mut face, _) = face();
        assert_eq!(face.cache(), DisplayCache::default());
        face.on_tick(&at(1, 30, 45, 288));

        assert_eq!(face.angles(), HandAngles { hour: ANGLE_K * 45, minute: ANGLE_K * 180, second: ANGLE_K * 270 });
        assert_eq!(face.time_text(), "01:30");
        assert_eq!(face.date_text(), "16 Oct, Fri");
        assert_eq!(face.cache().last_minute_of_day, Some(90));
        assert_eq!(face.cache().last_day_of_year, Some(288));
        assert_eq!(face.hands().hour().angle(), ANGLE_K * 45);
    }

    #[test]
    fn test_same_minute_ticks_only_move_seconds() {
        let (mut face, _) = face();
        face.on_tick(&at(12, 5, 0, 10));
        let after_first = face.stats();

        for s in 1..60 {
            face.on_tick(&at(12, 5, s, 10));
            assert_eq!(face.angles().second, ANGLE_K * s as i32 * 6);
        }

        let stats = face.stats();
        assert_eq!(stats.hand_recomputes, after_first.hand_recomputes);
        assert_eq!(stats.time_reformats, after_first.time_reformats);
        assert_eq!(stats.date_reformats, 1);
        assert_eq!(stats.redraw_requests, 60);
        assert_eq!(face.clock().time().updates(), 1);
    }

    #[test]
    fn test_minute_rollover_recomputes_once() {
        let (mut face, _) = face();
        face.on_tick(&at(12, 5, 58, 0));
        face.on_tick(&at(12, 5, 59, 0));
        let before = face.stats().hand_recomputes;

        face.on_tick(&at(12, 6, 0, 0));
        face.on_tick(&at(12, 6, 1, 0));
        assert_eq!(face.stats().hand_recomputes, before + 1);
        assert_eq!(face.time_text(), "12:06");
        assert_eq!(face.cache().last_minute_of_day, Some(726));
    }

    #[test]
    fn test_one_redraw_request_per_tick() {
        let (mut face, _) = face();
        for s in 0..5 {
            let before = face.hands().layer().dirty_marks();
            face.on_tick(&at(8, 0, s, 0));
            assert_eq!(face.hands().layer().dirty_marks(), before + 1);
        }
    }

    #[test]
    fn test_date_gate_independent_of_minute_gate() {
        let (mut face, _) = face();
        face.on_tick(&at(23, 59, 59, 100));
        face.on_tick(&at(0, 0, 0, 101));
        face.on_tick(&at(0, 0, 1, 101));
        assert_eq!(face.stats().date_reformats, 2);

        // a day change alone still reformats the date
        face.on_tick(&at(0, 0, 2, 102));
        assert_eq!(face.stats().date_reformats, 3);
        assert_eq!(face.stats().time_reformats, 2);
    }

    #[test]
    fn test_battery_text() {
        let (mut face, _) = face();
        face.on_battery(&battery(7));
        assert_eq!(face.battery_text(), "7%");
    }

    #[test]
    fn test_link_loss_vibrates() {
        let (mut face, haptics) = face();
        face.startup(&at(9, 0, 0, 0), &battery(80), true);
        assert_eq!(haptics.count(), 0);

        face.on_connection(false);
        assert_eq!(face.status().bt_icon(), Some(AssetId::BluetoothOff));
        assert_eq!(haptics.count(), 1);
        assert_eq!(haptics.patterns()[0], VibePattern::lost_connection());

        face.on_connection(true);
        assert_eq!(face.status().bt_icon(), Some(AssetId::BluetoothOn));
        assert_eq!(haptics.count(), 1);
    }

    #[test]
    fn test_startup_peek_never_vibrates() {
        let (mut face, haptics) = face();
        face.startup(&at(9, 0, 0, 0), &battery(80), false);
        assert_eq!(face.status().bt_icon(), Some(AssetId::BluetoothOff));
        assert_eq!(haptics.count(), 0);
        assert_eq!(face.battery_text(), "80%");
        assert_eq!(face.time_text(), "09:00");
    }

    #[test]
    fn test_render_only_when_dirty() {
        let (mut face, _) = face();
        let mut display = MemoryDriver::new_with_size(DISPLAY_WIDTH, DISPLAY_HEIGHT);
        face.startup(&at(10, 10, 0, 0), &battery(50), true);

        assert!(face.render_if_dirty(&mut display).unwrap());
        assert!(!face.render_if_dirty(&mut display).unwrap());
        assert_eq!(display.state().borrow().flush_count, 1);

        face.on_tick(&at(10, 10, 1, 0));
        assert!(face.render_if_dirty(&mut display).unwrap());
        assert_eq!(face.stats().frames, 2);
        assert!(display.count_on_pixels() > 0);
    }

    #[test]
    fn test_flush_failure_surfaces() {
        let (mut face, _) = face();
        let mut display = MemoryDriver::new_with_size(DISPLAY_WIDTH, DISPLAY_HEIGHT);
        display.state().borrow_mut().simulate_flush_failure = true;
        face.on_tick(&at(10, 10, 0, 0));
        assert!(face.render_if_dirty(&mut display).is_err());
        assert!(face.is_dirty());
    }
}
