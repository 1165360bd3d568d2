/*
 *  gpio.rs
 *
 *  inkwx - weather you can wait for
 *  (c) 2024-26 inkwx contributors
 *
 *  Raspberry Pi wiring: the busy LED and the four panel buttons. Only
 *  compiled with the `hardware` feature.
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
use log::warn;
use rppal::gpio::{Gpio, InputPin, Level, OutputPin};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::controller::{BUTTON_PINS, Event};
use crate::hw::BusyIndicator;

/// BCM pin of the busy LED.
const BUSY_PIN: u8 = 4;

/// Edge-detect poll period. Coarser than the controller's debounce
/// window, fine enough to never miss a press.
const POLL_PERIOD: Duration = Duration::from_millis(10);

/// Busy LED on the given output pin, high while a refresh runs.
pub struct BusyPin {
    pin: OutputPin,
}

impl BusyPin {
    pub fn new() -> Result<Self, rppal::gpio::Error> {
        let pin = Gpio::new()?.get(BUSY_PIN)?.into_output_low();
        Ok(Self { pin })
    }
}

impl BusyIndicator for BusyPin {
    fn set_busy(&mut self, busy: bool) {
        if busy {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}

/// Poll the button pins and emit a `Button` event on each falling edge.
/// Presses that arrive while the queue is full land during a refresh
/// and are dropped.
pub fn spawn_button_poller(
    tx: mpsc::Sender<Event>,
) -> Result<JoinHandle<()>, rppal::gpio::Error> {
    let gpio = Gpio::new()?;
    let mut pins: Vec<(u8, InputPin)> = Vec::with_capacity(BUTTON_PINS.len());
    for &bcm in &BUTTON_PINS {
        pins.push((bcm, gpio.get(bcm)?.into_input_pullup()));
    }

    Ok(tokio::spawn(async move {
        let mut prev = vec![Level::High; pins.len()];
        loop {
            tokio::time::sleep(POLL_PERIOD).await;
            for (i, (bcm, pin)) in pins.iter().enumerate() {
                let level = pin.read();
                if prev[i] == Level::High && level == Level::Low {
                    // stamped here so debounce holds even when the event
                    // waits behind a refresh in the queue
                    if let Err(e) = tx.try_send(Event::press(*bcm)) {
                        warn!("refresh in progress, dropping button {bcm}: {e}");
                    }
                }
                prev[i] = level;
            }
        }
    }))
}
