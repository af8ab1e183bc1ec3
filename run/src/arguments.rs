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
use clap::{App, Arg};
use log::warn;
use serde::{Deserialize, Serialize};

use sim::config::DEFAULT_OUTPUT_DIRECTORY;

const VERSION_NUMBER: &str = "V1.0";

fn get_cmd_arguments() -> clap::ArgMatches<'static> {
    App::new("Agent Based Epidemic Simulator")
        .version("1.0")
        .author("Sam Ralph <sr1474@york.ac.uk")
        .about("Simulates the spread of infectious diseases through a population of agents")
        .usage("run <mode> --config=<config_file>
            \n    The configuration file describing the population and diseases must be specified for simulations (config)\
            \n    There are several modes available to choose from:\
            \n        simulate          ->      Runs every disease, and saves the daily counts as json and csv\
            \n        render            ->      Runs a simulation, and draws the daily counts of every disease\
            \n        example_config    ->      Prints an example configuration file")
        .arg(
            Arg::with_name("mode")
                .help("Specifies the mode of the simulator")
                .takes_value(true)
                .required(true))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .help("The json file describing the population, diseases and interventions")
                .require_equals(true)
                .takes_value(true))
        .arg(
            Arg::with_name("output_directory")
                .long("output_directory")
                .help("Specifies the name of the output directory to store statistics")
                .takes_value(true)
                .require_equals(true))
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .require_equals(true)
                .takes_value(true)
                .help("Overrides the random seed of the configuration file"))
        .get_matches()
}

#[derive(Clone, Debug)]
pub struct Arguments {
    pub mode: SimMode,
    pub config_file: Option<String>,
    pub output_directory: String,
    pub seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimMode {
    Simulate,
    Render,
    #[serde(alias = "example_config")]
    ExampleConfig,
}

impl Arguments {
    pub fn load_from_arguments() -> anyhow::Result<Arguments> {
        let mut arguments = Arguments::default();
        let matches = get_cmd_arguments();
        let mode = matches
            .value_of("mode")
            .context("Mode for the simulator must be provided!")?;
        arguments.mode = parse_mode(mode)?;

        if let Some(config_file) = matches.value_of("config") {
            arguments.config_file = Some(config_file.to_string());
        }

        if let Some(directory) = matches.value_of("output_directory") {
            arguments.output_directory = directory.to_string();
        }

        if let Some(seed) = matches.value_of("seed") {
            match seed.parse() {
                Ok(seed) => arguments.seed = Some(seed),
                Err(e) => {
                    warn!("Failed to parse seed with value: '{}' and error {}. Using the seed of the configuration file", seed, e)
                }
            }
        }
        Ok(arguments)
    }
}

pub fn parse_mode(mode: &str) -> anyhow::Result<SimMode> {
    serde_plain::from_str(mode).context(format!(
        "Unknown mode '{}' received! Use --help for a list of valid modes",
        mode
    ))
}

impl Default for Arguments {
    fn default() -> Self {
        Arguments {
            mode: SimMode::Simulate,
            config_file: None,
            output_directory: DEFAULT_OUTPUT_DIRECTORY.to_string() + VERSION_NUMBER,
            seed: None,
        }
    }
}
