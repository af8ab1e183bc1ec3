/*
 * Epidemic Simulation Using Census Data (ESUCD)
 * Copyright (c)  2022. Sam Ralph
 *
 * This file is part of ESUCD.
 *
 * ESUCD is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, version 3 of the License.
 *
 * ESUCD is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with ESUCD.  If not, see <https://www.gnu.org/licenses/>.
 *
 */

use anyhow::Context;
use log::info;

use sim::simulator::Simulator;
use sim::simulator_builder::SimulatorBuilder;

use crate::arguments::Arguments;
use crate::execute_modes::RuntimeError::MissingArguments;

/// Loads the configuration file given on the command line, applying any overrides
pub fn load_config(arguments: &Arguments) -> anyhow::Result<SimulatorBuilder> {
    let config_file = arguments
        .config_file
        .as_ref()
        .ok_or_else(|| MissingArguments("A configuration file must be given with --config".to_string()))?;
    let mut builder = SimulatorBuilder::from_file(config_file)
        .context(format!("Failed to load configuration file '{}'", config_file))?;
    if let Some(seed) = arguments.seed {
        info!("Overriding the configured seed with {}", seed);
        builder = builder.with_seed(seed);
    }
    Ok(builder)
}

pub fn load_config_and_init_sim(arguments: &Arguments) -> anyhow::Result<Simulator> {
    let builder = load_config(arguments)?;
    info!(
        "Building a population of {} agents with {} diseases",
        builder.config().population.total,
        builder.config().diseases.len()
    );
    builder.build().context("Failed to initialise sim")
}
