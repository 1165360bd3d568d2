/*
 *  hw.rs
 *
 *  inkwx - weather you can wait for
 *  (c) 2024-26 inkwx contributors
 *
 *  Hardware seams: the panel, the busy indicator, and the forecast
 *  source are traits so the daemon runs identically against real
 *  hardware, a log sink, or the test doubles.
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
use embedded_graphics::pixelcolor::Rgb888;
use log::info;
use thiserror::Error;

use crate::config::Config;
use crate::render::canvas::Canvas;
use crate::render::palette::PanelColor;
use crate::weather::{Forecast, WeatherClient, WeatherError};

/// Color saturation applied when quantizing for the panel.
pub const SATURATION: f32 = 0.5;

/// Saturation-adjusted palette plane, one index per pixel, in the form
/// the panel driver consumes. Each pixel is pulled toward its luma by
/// `1 - saturation` before snapping back to the nearest ink color.
pub fn quantize_frame(canvas: &Canvas, saturation: f32) -> Vec<u8> {
    let s = saturation.clamp(0.0, 1.0);
    canvas
        .rgb_bytes()
        .chunks(3)
        .map(|px| {
            let (r, g, b) = (px[0] as f32, px[1] as f32, px[2] as f32);
            let luma = 0.299 * r + 0.587 * g + 0.114 * b;
            let mix = |c: f32| (luma + (c - luma) * s).round().clamp(0.0, 255.0) as u8;
            PanelColor::from(Rgb888::new(mix(r), mix(g), mix(b))).index()
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("panel refresh failed: {0}")]
    Refresh(String),
}

/// Physical (or simulated) e-ink panel. `push` blocks for the full
/// refresh, tens of seconds on real hardware.
pub trait Panel: Send {
    fn push(&mut self, canvas: &Canvas, saturation: f32) -> Result<(), PanelError>;
}

/// Busy lamp shown while a refresh is in flight.
pub trait BusyIndicator: Send {
    fn set_busy(&mut self, busy: bool);
}

/// Raises the indicator on creation and guarantees it drops again on
/// every exit path, including errors.
pub struct BusyGuard<'a, B: BusyIndicator + ?Sized> {
    indicator: &'a mut B,
}

impl<'a, B: BusyIndicator + ?Sized> BusyGuard<'a, B> {
    pub fn raise(indicator: &'a mut B) -> Self {
        indicator.set_busy(true);
        Self { indicator }
    }
}

impl<B: BusyIndicator + ?Sized> Drop for BusyGuard<'_, B> {
    fn drop(&mut self) {
        self.indicator.set_busy(false);
    }
}

/// Forecast source seam, implemented by the HTTP client and the test
/// doubles.
#[allow(async_fn_in_trait)]
pub trait ForecastProvider: Send {
    async fn fetch(&self, cfg: &Config) -> Result<Forecast, WeatherError>;
}

impl ForecastProvider for crate::weather::WeatherClient {
    async fn fetch(&self, cfg: &Config) -> Result<Forecast, WeatherError> {
        WeatherClient::fetch(self, cfg).await
    }
}

/// No-op indicator for hosts without the busy lamp wired up.
#[derive(Debug, Default)]
pub struct NullBusy;

impl BusyIndicator for NullBusy {
    fn set_busy(&mut self, _busy: bool) {}
}

/// Panel stand-in that logs refreshes; the default without the
/// `hardware` feature.
#[derive(Debug, Default)]
pub struct LogPanel;

impl Panel for LogPanel {
    fn push(&mut self, canvas: &Canvas, saturation: f32) -> Result<(), PanelError> {
        let plane = quantize_frame(canvas, saturation);
        info!(
            "panel refresh: {}x{} canvas, {} palette bytes at saturation {saturation}",
            canvas.width(),
            canvas.height(),
            plane.len()
        );
        Ok(())
    }
}

/// Test doubles, compiled unconditionally so integration tests can use
/// them.
pub mod mock {
    use super::*;
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    };

    /// Records pushed frames behind a shared handle so tests keep a
    /// clone after the panel moves into the orchestrator.
    #[derive(Debug, Default, Clone)]
    pub struct MockPanel {
        frames: Arc<Mutex<Vec<Canvas>>>,
    }

    impl MockPanel {
        pub fn frame_count(&self) -> usize {
            self.frames.lock().map(|f| f.len()).unwrap_or(0)
        }

        pub fn last_frame(&self) -> Option<Canvas> {
            self.frames.lock().ok().and_then(|f| f.last().cloned())
        }
    }

    impl Panel for MockPanel {
        fn push(&mut self, canvas: &Canvas, _saturation: f32) -> Result<(), PanelError> {
            self.frames
                .lock()
                .map_err(|_| PanelError::Refresh("frame log poisoned".into()))?
                .push(canvas.clone());
            Ok(())
        }
    }

    /// Always fails, for error-path tests.
    #[derive(Debug, Default)]
    pub struct FailingPanel;

    impl Panel for FailingPanel {
        fn push(&mut self, _canvas: &Canvas, _saturation: f32) -> Result<(), PanelError> {
            Err(PanelError::Refresh("simulated refresh failure".into()))
        }
    }

    /// Serves one fixed forecast.
    #[derive(Debug, Clone)]
    pub struct StaticProvider(pub Forecast);

    impl ForecastProvider for StaticProvider {
        async fn fetch(&self, _cfg: &Config) -> Result<Forecast, WeatherError> {
            Ok(self.0.clone())
        }
    }

    /// Always fails the fetch.
    #[derive(Debug, Default)]
    pub struct FailingProvider;

    impl ForecastProvider for FailingProvider {
        async fn fetch(&self, _cfg: &Config) -> Result<Forecast, WeatherError> {
            Err(WeatherError::Status(reqwest::StatusCode::UNAUTHORIZED))
        }
    }

    /// Busy indicator backed by a shared flag plus a transition history,
    /// so tests can check the lamp dropped after a failed cycle.
    #[derive(Debug, Clone, Default)]
    pub struct FlagBusy {
        pub flag: Arc<AtomicBool>,
        pub history: Arc<Mutex<Vec<bool>>>,
    }

    impl BusyIndicator for FlagBusy {
        fn set_busy(&mut self, busy: bool) {
            self.flag.store(busy, Ordering::SeqCst);
            if let Ok(mut h) = self.history.lock() {
                h.push(busy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::FlagBusy;
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn guard_lowers_on_drop() {
        let mut busy = FlagBusy::default();
        {
            let _guard = BusyGuard::raise(&mut busy);
        }
        assert!(!busy.flag.load(Ordering::SeqCst));
        assert_eq!(*busy.history.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn quantize_is_identity_at_full_saturation() {
        let mut cv = Canvas::new(2, 1, PanelColor::White);
        use embedded_graphics::prelude::*;
        cv.draw_iter([Pixel(Point::new(0, 0), PanelColor::Orange)]).unwrap();
        let plane = quantize_frame(&cv, 1.0);
        assert_eq!(plane, vec![PanelColor::Orange.index(), PanelColor::White.index()]);
    }

    #[test]
    fn panel_saturation_keeps_every_ink_color_legible() {
        // desaturating must not collapse distinct inks into one another
        for color in [
            PanelColor::Black,
            PanelColor::White,
            PanelColor::Green,
            PanelColor::Blue,
            PanelColor::Red,
            PanelColor::Yellow,
            PanelColor::Orange,
        ] {
            let cv = Canvas::new(1, 1, color);
            assert_eq!(quantize_frame(&cv, SATURATION), vec![color.index()], "{color:?}");
        }
    }

    #[test]
    fn guard_lowers_on_early_return() {
        fn failing(busy: &mut FlagBusy) -> Result<(), PanelError> {
            let _guard = BusyGuard::raise(busy);
            Err(PanelError::Refresh("nope".into()))
        }
        let mut busy = FlagBusy::default();
        assert!(failing(&mut busy).is_err());
        assert!(!busy.flag.load(Ordering::SeqCst));
    }
}
