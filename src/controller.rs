/*
 *  controller.rs
 *
 *  inkwx - weather you can wait for
 *  (c) 2024-26 inkwx contributors
 *
 *  Event loop: buttons and the hourly tick arrive on one queue and are
 *  handled strictly one at a time, so a refresh in flight can never be
 *  interleaved with another.
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
use log::{error, info, warn};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::{ConfigStore, RenderMode, Unit};
use crate::hw::{BusyIndicator, ForecastProvider, Panel};
use crate::orchestrator::Orchestrator;

/// BCM pins of the four panel buttons, top to bottom.
pub const BUTTON_PINS: [u8; 4] = [5, 6, 16, 24];

/// Presses inside this window are switch bounce, not input.
pub const DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Falling edge on a button pin (BCM number), stamped when the edge
    /// was seen. Events can sit in the queue behind a slow panel
    /// refresh, so debounce must judge the press time, not the dequeue
    /// time.
    Button(u8, Instant),
    /// Scheduled hourly refresh.
    Tick,
}

impl Event {
    /// Button press stamped now; the usual way edges enter the queue.
    pub fn press(pin: u8) -> Self {
        Event::Button(pin, Instant::now())
    }
}

pub struct ModeController<P, D, B>
where
    P: ForecastProvider,
    D: Panel,
    B: BusyIndicator,
{
    store: ConfigStore,
    orchestrator: Orchestrator<P, D, B>,
    last_press: HashMap<u8, Instant>,
}

impl<P, D, B> ModeController<P, D, B>
where
    P: ForecastProvider,
    D: Panel,
    B: BusyIndicator,
{
    pub fn new(store: ConfigStore, orchestrator: Orchestrator<P, D, B>) -> Self {
        Self { store, orchestrator, last_press: HashMap::new() }
    }

    /// Consume events until the queue closes. Each event runs to
    /// completion before the next is taken.
    pub async fn run(&mut self, mut rx: mpsc::Receiver<Event>) {
        while let Some(ev) = rx.recv().await {
            self.handle(ev).await;
        }
    }

    /// All failures are logged and swallowed; the daemon outlives a bad
    /// config read or a failed refresh.
    pub async fn handle(&mut self, ev: Event) {
        match ev {
            Event::Tick => {
                info!("scheduled refresh");
                self.cycle().await;
            }
            Event::Button(pin, pressed_at) => {
                if self.bounced(pin, pressed_at) {
                    return;
                }
                if self.apply_button(pin) {
                    self.cycle().await;
                }
            }
        }
    }

    fn bounced(&mut self, pin: u8, pressed_at: Instant) -> bool {
        if let Some(prev) = self.last_press.get(&pin) {
            if pressed_at.duration_since(*prev) < DEBOUNCE {
                return true;
            }
        }
        self.last_press.insert(pin, pressed_at);
        false
    }

    /// Mutate the stored config per the button table. Returns false for
    /// pins that map to nothing or when the store is unreadable.
    fn apply_button(&mut self, pin: u8) -> bool {
        let mut cfg = match self.store.load() {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("config load failed on button {pin}: {e}");
                return false;
            }
        };
        match pin {
            5 => {
                cfg.mode = RenderMode::Forecast;
                cfg.one_time_message = "MODE:Forecast".to_string();
            }
            6 => {
                cfg.mode = RenderMode::Graph;
                cfg.one_time_message = "MODE:Graph".to_string();
            }
            16 => {
                cfg.mode = RenderMode::Alert;
                cfg.one_time_message = "MODE:Alert".to_string();
            }
            24 => {
                cfg.unit = cfg.unit.toggled();
                cfg.one_time_message = match cfg.unit {
                    Unit::Metric => "Unit:Metric".to_string(),
                    Unit::Imperial => "Unit:Imperial".to_string(),
                };
            }
            other => {
                warn!("ignoring unmapped button pin {other}");
                return false;
            }
        }
        info!("button {pin}: {}", cfg.one_time_message);
        if let Err(e) = self.store.save(&cfg) {
            error!("config save failed on button {pin}: {e}");
            return false;
        }
        true
    }

    async fn cycle(&mut self) {
        if let Err(e) = self.orchestrator.run_cycle(&self.store).await {
            error!("render cycle failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::hw::mock::{FlagBusy, MockPanel, StaticProvider};
    use crate::render::RenderEngine;
    use crate::weather::Forecast;
    use tempfile::NamedTempFile;

    fn controller(
        cfg: &Config,
    ) -> (NamedTempFile, MockPanel, ModeController<StaticProvider, MockPanel, FlagBusy>) {
        let f = NamedTempFile::new().unwrap();
        let store = ConfigStore::new(f.path());
        store.save(cfg).unwrap();
        let panel = MockPanel::default();
        let frames = panel.clone();
        let orch = Orchestrator::new(
            StaticProvider(Forecast::default()),
            panel,
            FlagBusy::default(),
            RenderEngine::new(),
        );
        (f, frames, ModeController::new(store, orch))
    }

    #[tokio::test]
    async fn forecast_button_switches_from_any_mode() {
        let mut cfg = Config::default();
        cfg.mode = RenderMode::DayCurve;
        let (_f, frames, mut ctl) = controller(&cfg);

        ctl.handle(Event::press(5)).await;
        let stored = ctl.store.load().unwrap();
        assert_eq!(stored.mode, RenderMode::Forecast);
        // the message rendered once and was cleared
        assert!(stored.one_time_message.is_empty());
        assert_eq!(frames.frame_count(), 1);
    }

    #[tokio::test]
    async fn unit_button_toggles_both_ways() {
        let (_f, _frames, mut ctl) = controller(&Config::default());

        let first = Instant::now();
        ctl.handle(Event::Button(24, first)).await;
        assert_eq!(ctl.store.load().unwrap().unit, Unit::Imperial);

        // second press well outside the debounce window
        ctl.handle(Event::Button(24, first + 2 * DEBOUNCE)).await;
        assert_eq!(ctl.store.load().unwrap().unit, Unit::Metric);
    }

    #[tokio::test]
    async fn rapid_double_press_renders_once() {
        let (_f, frames, mut ctl) = controller(&Config::default());
        ctl.handle(Event::press(6)).await;
        ctl.handle(Event::press(6)).await;
        assert_eq!(frames.frame_count(), 1);
    }

    #[tokio::test]
    async fn bounce_duplicates_are_dropped_even_behind_a_slow_refresh() {
        let (_f, frames, mut ctl) = controller(&Config::default());
        let pressed = Instant::now();
        ctl.handle(Event::Button(6, pressed)).await;

        // a panel refresh outlasts the debounce window, so the queued
        // duplicate is dequeued late; its press stamp still disqualifies it
        tokio::time::sleep(2 * DEBOUNCE).await;
        ctl.handle(Event::Button(6, pressed + Duration::from_millis(20))).await;
        assert_eq!(frames.frame_count(), 1);
    }

    #[tokio::test]
    async fn unmapped_pin_changes_nothing() {
        let (_f, frames, mut ctl) = controller(&Config::default());
        ctl.handle(Event::press(99)).await;
        assert_eq!(ctl.store.load().unwrap(), Config::default());
        assert_eq!(frames.frame_count(), 0);
    }

    #[tokio::test]
    async fn tick_renders_without_touching_config() {
        let mut cfg = Config::default();
        cfg.mode = RenderMode::Graph;
        let (_f, frames, mut ctl) = controller(&cfg);
        ctl.handle(Event::Tick).await;
        assert_eq!(ctl.store.load().unwrap().mode, RenderMode::Graph);
        assert_eq!(frames.frame_count(), 1);
    }
}
