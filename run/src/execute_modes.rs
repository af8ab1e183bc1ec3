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

use std::fmt::{Debug, Display, Formatter};
use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use log::{error, info};
use sanitize_filename::sanitize;

use sim::config::{RESULTS_CSV_FILENAME, RESULTS_JSON_FILENAME};
use sim::simulator::Simulator;
use sim::simulator_builder::SimulatorConfig;
use visualisation::image_export::draw_disease_curves;

use crate::load_data::load_config_and_init_sim;
use crate::arguments::Arguments;

pub enum RuntimeError {
    MissingArguments(String),
}

impl Debug for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeError::MissingArguments(err) => {
                write!(f, "Missing Arguments: {}", err)
            }
        }
    }
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for RuntimeError {}

/// Runs every disease, and writes the results to the output directory
pub fn simulate(arguments: Arguments) -> anyhow::Result<Simulator> {
    info!("Using mode simulate");
    let total_time = Instant::now();
    let mut sim = load_config_and_init_sim(&arguments)?;
    info!("Initialised simulator in {:?}, starting sim...", total_time.elapsed());
    if let Err(e) = sim.run() {
        error!("{}", e);
        return Err(e).context("Simulation failed");
    }
    summarise(&sim);

    let output_directory = Path::new(&arguments.output_directory);
    fs::create_dir_all(output_directory).context(format!(
        "Failed to create output directory {:?}",
        output_directory
    ))?;
    let recorder = sim.statistics_recorder();
    recorder
        .dump_to_json(output_directory.join(RESULTS_JSON_FILENAME))
        .context("Dumping results as json")?;
    recorder
        .dump_to_csv(output_directory.join(RESULTS_CSV_FILENAME))
        .context("Dumping results as csv")?;
    info!("Finished in {:?}", total_time.elapsed());
    Ok(sim)
}

/// Runs a simulation, then draws a chart per disease
pub fn render(arguments: Arguments) -> anyhow::Result<()> {
    let output_directory = arguments.output_directory.clone();
    let sim = simulate(arguments)?;
    let population_size = sim.population_size() as u32;
    for disease in sim.diseases() {
        let entries = sim
            .results()
            .get(disease.name())
            .context(format!("No results recorded for {}", disease.name()))?;
        let filename = Path::new(&output_directory).join(format!("{}.svg", sanitize(disease.name())));
        draw_disease_curves(&filename, disease.name(), entries, population_size)
            .context(format!("Drawing the results of {}", disease.name()))?;
    }
    Ok(())
}

pub fn example_config() -> anyhow::Result<()> {
    let config = serde_json::to_string_pretty(&SimulatorConfig::example())
        .context("Serialising the example configuration")?;
    println!("{}", config);
    Ok(())
}

/// Logs the peak and length of every disease
fn summarise(sim: &Simulator) {
    for disease in sim.diseases() {
        if let Some(entries) = sim.results().get(disease.name()) {
            let peak = entries
                .iter()
                .max_by_key(|entry| entry.infectious())
                .map(|entry| (entry.time_step(), entry.infectious()))
                .unwrap_or_default();
            info!(
                "{} lasted {} days, peaking at {} infectious agents on day {}",
                disease.name(),
                entries.len(),
                peak.1,
                peak.0
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use sim::simulator_builder::SimulatorConfig;

    use crate::arguments::{Arguments, SimMode};
    use crate::execute_modes::{render, simulate};

    fn small_config() -> SimulatorConfig {
        let mut config = SimulatorConfig::example();
        config.population.total = 40;
        config.population.contact_probabilities = vec![vec![0.1, 0.05], vec![0.05, 0.1]];
        config.seed = Some(3);
        config
    }

    fn arguments(directory: &std::path::Path, config: &SimulatorConfig) -> Arguments {
        let config_file = directory.join("config.json");
        fs::write(&config_file, serde_json::to_string(config).unwrap()).unwrap();
        Arguments {
            mode: SimMode::Simulate,
            config_file: Some(config_file.to_string_lossy().to_string()),
            output_directory: directory.join("output").to_string_lossy().to_string(),
            seed: None,
        }
    }

    #[test]
    fn simulate_writes_results() {
        let directory = tempfile::tempdir().unwrap();
        let sim = simulate(arguments(directory.path(), &small_config())).unwrap();
        assert!(sim.results().contains_key("influenza"));
        let output = directory.path().join("output");
        assert!(output.join("results.json").exists());
        let csv = fs::read_to_string(output.join("results.csv")).unwrap();
        assert!(csv.lines().skip(1).all(|line| line.starts_with("influenza,")));
    }

    #[test]
    fn render_draws_every_disease() {
        let directory = tempfile::tempdir().unwrap();
        let mut arguments = arguments(directory.path(), &small_config());
        arguments.mode = SimMode::Render;
        render(arguments).unwrap();
        assert!(directory.path().join("output").join("influenza.svg").exists());
    }

    #[test]
    fn missing_config_is_an_error() {
        let arguments = Arguments {
            config_file: None,
            ..Arguments::default()
        };
        assert!(simulate(arguments).is_err());
    }
}
