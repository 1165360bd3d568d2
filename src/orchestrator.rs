/*
 *  orchestrator.rs
 *
 *  inkwx - weather you can wait for
 *  (c) 2024-26 inkwx contributors
 *
 *  One render cycle end to end: busy lamp up, config snapshot, fetch,
 *  render, panel push, one-shot message cleanup, busy lamp down.
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
use log::{error, info};
use thiserror::Error;

use crate::config::{ConfigError, ConfigStore};
use crate::hw::{BusyGuard, BusyIndicator, ForecastProvider, Panel, PanelError, SATURATION};
use crate::render::RenderEngine;

#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Panel(#[from] PanelError),
}

pub struct Orchestrator<P, D, B>
where
    P: ForecastProvider,
    D: Panel,
    B: BusyIndicator,
{
    provider: P,
    panel: D,
    busy: B,
    engine: RenderEngine,
}

impl<P, D, B> Orchestrator<P, D, B>
where
    P: ForecastProvider,
    D: Panel,
    B: BusyIndicator,
{
    pub fn new(provider: P, panel: D, busy: B, engine: RenderEngine) -> Self {
        Self { provider, panel, busy, engine }
    }

    /// Run one full cycle against the current store contents. A failed
    /// fetch still refreshes the panel with the fallback notice; config
    /// and panel errors abort the cycle. The busy lamp drops on every
    /// path.
    pub async fn run_cycle(&mut self, store: &ConfigStore) -> Result<(), CycleError> {
        let _busy = BusyGuard::raise(&mut self.busy);

        let cfg = store.load()?;
        let forecast = match self.provider.fetch(&cfg).await {
            Ok(fc) => Some(fc),
            Err(e) => {
                error!("forecast fetch failed: {e}");
                None
            }
        };

        let canvas = self.engine.render(forecast.as_ref(), &cfg);
        self.panel.push(&canvas, SATURATION)?;
        info!("panel refreshed in mode {}", cfg.mode.index());

        if !cfg.one_time_message.is_empty() {
            store.clear_one_time_message()?;
        }
        Ok(())
    }
}
