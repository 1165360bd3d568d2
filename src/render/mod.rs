/*
 *  render/mod.rs
 *
 *  inkwx - weather you can wait for
 *  (c) 2024-26 inkwx contributors
 *
 *  Render engine: one forecast snapshot plus one config snapshot in, one
 *  full-panel canvas out. Pure and deterministic; no I/O happens here.
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
pub mod canvas;
pub mod chart;
pub mod fmt;
pub mod glyphs;
pub mod layout;
pub mod palette;
pub mod text;

mod alert;
mod daycurve;
mod forecast;
mod graph;
mod suntimes;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_text::alignment::HorizontalAlignment;

use canvas::Canvas;
use chart::{ChartRenderer, PolylineChart};
use glyphs::{condition_style, draw_glyph, unit_sign};
use layout::Layout;
use palette::PanelColor;
use text::{
    FONT_DISPLAY, FONT_HEADING, FONT_LABEL, FONT_SMALL, draw_text, draw_text_region,
    draw_text_right, text_width,
};

use crate::config::{Config, RenderMode};
use crate::translate::Translation;
use crate::weather::Forecast;

/// Composes the shared header and dispatches to the mode strategy. The
/// chart collaborator is swappable so tests can stub the plotting.
pub struct RenderEngine {
    chart: Box<dyn ChartRenderer + Send>,
}

impl Default for RenderEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderEngine {
    pub fn new() -> Self {
        Self { chart: Box::new(PolylineChart) }
    }

    pub fn with_chart(chart: Box<dyn ChartRenderer + Send>) -> Self {
        Self { chart }
    }

    /// Render one frame. `None` means the fetch failed; every mode then
    /// yields the same fallback notice.
    pub fn render(&self, forecast: Option<&Forecast>, cfg: &Config) -> Canvas {
        let layout = Layout::for_panel(cfg.panel);
        let mut cv = Canvas::new(layout.width, layout.height, PanelColor::White);
        let tr = Translation::new(&cfg.lang);

        let Some(fc) = forecast else {
            self.no_data_notice(&mut cv, layout, cfg);
            return cv;
        };

        self.header(&mut cv, layout, fc, cfg, &tr);

        // alert mode with nothing in effect reads as plain forecast
        let mode = match cfg.mode {
            RenderMode::Alert if fc.alerts.is_empty() => RenderMode::Forecast,
            m => m,
        };

        match mode {
            RenderMode::Forecast => {
                forecast::draw(&mut cv, layout, fc, cfg.forecast_interval, &tr)
            }
            RenderMode::Alert => alert::draw(&mut cv, layout, &fc.alerts[0]),
            RenderMode::Graph => graph::draw(
                &mut cv,
                layout,
                fc,
                self.chart.as_ref(),
                cfg.rain_overlay,
                cfg.pressure_overlay,
                &tr,
            ),
            RenderMode::SunriseSunset => suntimes::draw(&mut cv, layout, fc, &tr),
            RenderMode::DayCurve => daycurve::draw(&mut cv, layout, fc, self.chart.as_ref()),
        }
        cv
    }

    fn no_data_notice(&self, cv: &mut Canvas, layout: &Layout, cfg: &Config) {
        // full orange wash so a dead feed is obvious across the room
        cv.clear_color(PanelColor::Orange);
        let mid = layout.height as i32 / 2;
        let _ = text::draw_text_centered(
            cv,
            "Weather data unavailable",
            layout.width as i32 / 2,
            mid - 40,
            &FONT_HEADING,
            PanelColor::Black,
        );
        if !cfg.one_time_message.is_empty() {
            let region = Rectangle::new(
                Point::new(20, mid),
                Size::new(layout.width - 40, 80),
            );
            let _ = draw_text_region(
                cv,
                &cfg.one_time_message,
                region,
                HorizontalAlignment::Center,
                &FONT_LABEL,
                PanelColor::Black,
            );
        }
    }

    fn header(
        &self,
        cv: &mut Canvas,
        layout: &Layout,
        fc: &Forecast,
        cfg: &Config,
        tr: &Translation,
    ) {
        if !cfg.one_time_message.is_empty() {
            let _ = draw_text_right(
                cv,
                &cfg.one_time_message,
                layout.message_anchor,
                &FONT_SMALL,
                PanelColor::Black,
            );
        }

        // date line: localized month + day left, weekday right
        let date = format!(
            "{} {}",
            tr.word(&fmt::month_name(fc.current.dt)),
            fmt::day_of_month(fc.current.dt)
        );
        let _ = draw_text(cv, &date, layout.date, &FONT_DISPLAY, PanelColor::Black);
        let _ = draw_text_right(
            cv,
            tr.word(&fmt::weekday_abbrev(fc.current.dt)),
            Point::new(layout.weekday_right_x, layout.date.y),
            &FONT_DISPLAY,
            PanelColor::Black,
        );

        let _ = draw_text(
            cv,
            tr.word("Temperature"),
            layout.temp_label,
            &FONT_LABEL,
            PanelColor::Black,
        );
        let temp_str = fmt::temperature(fc.current.temp);
        let temp_color = fmt::temperature_color(fc.current.temp, cfg.cold_temp, cfg.hot_temp);
        // nudge short readings right so "5" does not hug the margin
        let dx = if temp_str.chars().count() < 3 { 45 } else { 20 };
        let temp_pos = layout.temp_value + Point::new(dx, 0);
        let _ = draw_text(cv, &temp_str, temp_pos, &FONT_DISPLAY, temp_color);
        let sign = unit_sign(cfg.unit);
        let _ = draw_text(
            cv,
            sign,
            temp_pos + Point::new(text_width(&temp_str, &FONT_DISPLAY) as i32 + 10, 0),
            &FONT_DISPLAY,
            temp_color,
        );

        let style = condition_style(&fc.current.code);
        let _ = draw_glyph(cv, layout.icon, style.glyph(), style.color, layout.icon_scale);

        let _ = draw_text_right(
            cv,
            tr.word(&fc.current.description),
            Point::new(layout.desc_right_x, layout.desc_y),
            &FONT_LABEL,
            PanelColor::Black,
        );

        let _ = draw_text(
            cv,
            tr.word("Feels like"),
            layout.feels_label,
            &FONT_LABEL,
            PanelColor::Black,
        );
        let feels_str = fmt::temperature(fc.current.feels_like);
        let feels_color =
            fmt::temperature_color(fc.current.feels_like, cfg.cold_temp, cfg.hot_temp);
        let _ = draw_text(cv, &feels_str, layout.feels_value, &FONT_HEADING, feels_color);
        let feels_w = text_width(&feels_str, &FONT_HEADING) as i32;
        let _ = draw_text(
            cv,
            sign,
            layout.feels_value + Point::new(feels_w + 10, 0),
            &FONT_HEADING,
            feels_color,
        );

        let pressure_x = layout.feels_value.x + feels_w + layout.pressure_gap;
        let _ = draw_text(
            cv,
            tr.word("Pressure"),
            Point::new(pressure_x, layout.feels_label.y),
            &FONT_LABEL,
            PanelColor::Black,
        );
        let pressure_str = format!("{:.0}", fc.current.pressure);
        let _ = draw_text(
            cv,
            &pressure_str,
            Point::new(pressure_x + 5, layout.feels_value.y),
            &FONT_HEADING,
            PanelColor::Black,
        );
        let _ = draw_text(
            cv,
            "hPa",
            Point::new(
                pressure_x + 5 + text_width(&pressure_str, &FONT_HEADING) as i32 + 5,
                layout.feels_value.y + 6,
            ),
            &FONT_SMALL,
            PanelColor::Black,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelSize;
    use crate::weather::{Alert, Current, Hourly};

    fn sample_forecast() -> Forecast {
        let hourly = (0..48)
            .map(|i| Hourly {
                dt: 1_700_000_000 + i as i64 * 3600,
                temp: 10.0 + (i % 5) as f64,
                feels_like: 8.0 + (i % 5) as f64,
                humidity: 70.0,
                pressure: 1005.0 + (i % 9) as f64,
                code: "03d".to_string(),
                description: "scattered clouds".to_string(),
            })
            .collect();
        Forecast {
            current: Current {
                temp: 12.3,
                feels_like: 10.1,
                pressure: 1011.0,
                dt: 1_700_000_000,
                sunrise: 1_700_020_000,
                sunset: 1_700_055_000,
                code: "03d".to_string(),
                description: "scattered clouds".to_string(),
            },
            hourly,
            alerts: Vec::new(),
            rain_buckets: vec![0.0; 17],
        }
    }

    #[test]
    fn every_mode_renders_something() {
        let engine = RenderEngine::new();
        let fc = sample_forecast();
        let mut cfg = Config::default();
        for n in 0..=4 {
            cfg.mode = RenderMode::from_index(n).unwrap();
            let cv = engine.render(Some(&fc), &cfg);
            assert_eq!(cv.width(), 600);
            assert!(
                cv.pixels().iter().any(|c| *c != PanelColor::White),
                "mode {n} rendered a blank canvas"
            );
        }
    }

    #[test]
    fn large_panel_uses_large_geometry() {
        let engine = RenderEngine::new();
        let fc = sample_forecast();
        let mut cfg = Config::default();
        cfg.panel = PanelSize::Large;
        let cv = engine.render(Some(&fc), &cfg);
        assert_eq!((cv.width(), cv.height()), (800, 480));
    }

    #[test]
    fn alert_mode_without_alerts_matches_forecast_mode() {
        let engine = RenderEngine::new();
        let fc = sample_forecast();
        let mut cfg = Config::default();
        cfg.mode = RenderMode::Forecast;
        let forecast_cv = engine.render(Some(&fc), &cfg);
        cfg.mode = RenderMode::Alert;
        let alert_cv = engine.render(Some(&fc), &cfg);
        assert_eq!(forecast_cv, alert_cv);
    }

    #[test]
    fn alert_mode_with_alert_differs_from_forecast_mode() {
        let engine = RenderEngine::new();
        let mut fc = sample_forecast();
        fc.alerts.push(Alert {
            start: 1_700_001_000,
            event: "yellow wind warning".to_string(),
            sender_name: "Met Office".to_string(),
            description: "Gusts to 60mph expected.".to_string(),
        });
        let mut cfg = Config::default();
        cfg.mode = RenderMode::Forecast;
        let forecast_cv = engine.render(Some(&fc), &cfg);
        cfg.mode = RenderMode::Alert;
        let alert_cv = engine.render(Some(&fc), &cfg);
        assert_ne!(forecast_cv, alert_cv);
    }

    #[test]
    fn no_data_fallback_is_mode_independent() {
        let engine = RenderEngine::new();
        let mut cfg = Config::default();
        let mut frames = Vec::new();
        for n in 0..=4 {
            cfg.mode = RenderMode::from_index(n).unwrap();
            frames.push(engine.render(None, &cfg));
        }
        for f in &frames[1..] {
            assert_eq!(frames[0], *f);
        }
    }

    #[test]
    fn no_data_fallback_washes_the_whole_canvas_orange() {
        let engine = RenderEngine::new();
        let mut cfg = Config::default();
        cfg.one_time_message = "MODE:Graph".to_string();
        let cv = engine.render(None, &cfg);
        // corners untouched by text stay orange
        assert_eq!(cv.get(0, 0), Some(PanelColor::Orange));
        assert_eq!(cv.get(cv.width() - 1, cv.height() - 1), Some(PanelColor::Orange));
        assert!(cv.pixels().iter().all(|c| *c != PanelColor::White));
        // the notice and message read in black on the wash
        assert!(cv.pixels().iter().any(|c| *c == PanelColor::Black));
    }
}
