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

extern crate dotenv;
extern crate pretty_env_logger;

use log::info;

use crate::arguments::{Arguments, SimMode};

mod arguments;
mod execute_modes;
mod load_data;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    pretty_env_logger::init_timed();
    let arguments = Arguments::load_from_arguments()?;
    info!("Using arguments: {:?}", arguments);
    match arguments.mode {
        SimMode::Simulate => execute_modes::simulate(arguments).map(|_| ()),
        SimMode::Render => execute_modes::render(arguments),
        SimMode::ExampleConfig => execute_modes::example_config(),
    }
}
