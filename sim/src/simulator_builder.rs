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

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MAX_DAYS;
use crate::disease::Disease;
use crate::error::{SimError, SimResult};
use crate::models::contact_matrix::ContactMatrix;
use crate::simulator::Simulator;

fn default_max_days() -> u32 {
    DEFAULT_MAX_DAYS
}

fn default_seed_count() -> usize {
    1
}

/// Everything needed to build a Simulator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// The maximum amount of days each disease is simulated for
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    /// Seed for the random number generator, a random seed is used if missing
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub population: PopulationParameters,
    #[serde(default = "default_diseases")]
    pub diseases: Vec<DiseaseParameters>,
}

fn default_diseases() -> Vec<DiseaseParameters> {
    vec![DiseaseParameters::default()]
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            max_days: DEFAULT_MAX_DAYS,
            seed: None,
            population: PopulationParameters::default(),
            diseases: default_diseases(),
        }
    }
}

impl SimulatorConfig {
    /// A small two group population, with an influenza outbreak countered by a
    /// vaccination campaign and a quarantine order
    pub fn example() -> SimulatorConfig {
        SimulatorConfig {
            max_days: DEFAULT_MAX_DAYS,
            seed: None,
            population: PopulationParameters {
                group_count: 2,
                total: 500,
                contact_probabilities: vec![vec![0.001, 0.001], vec![0.001, 0.001]],
                susceptibilities: vec![0.99, 0.99],
                quarantine_compliances: vec![0.05, 0.07],
            },
            diseases: vec![DiseaseParameters {
                name: String::from("influenza"),
                transmissibility: 0.95,
                exposure_days: 2,
                infectious_days: 7,
                immunity_probability: 0.8,
                quarantine_days: 0,
                seed_count: 3,
                vaccination_campaign: Some(VaccinationParameters {
                    day: 25,
                    coverage: 0.9,
                    efficacy: 0.85,
                }),
                quarantine_order: Some(QuarantineParameters { day: 40, length: 10 }),
            }],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationParameters {
    pub group_count: usize,
    pub total: usize,
    /// Square matrix, one row and column per group
    pub contact_probabilities: Vec<Vec<f64>>,
    /// One entry per group
    pub susceptibilities: Vec<f64>,
    /// One entry per group
    pub quarantine_compliances: Vec<f64>,
}

impl Default for PopulationParameters {
    fn default() -> Self {
        PopulationParameters {
            group_count: 2,
            total: 10000,
            contact_probabilities: vec![vec![0.5, 0.2], vec![0.2, 0.5]],
            susceptibilities: vec![0.02, 0.01],
            quarantine_compliances: vec![0.05, 0.07],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiseaseParameters {
    pub name: String,
    pub transmissibility: f64,
    pub exposure_days: u32,
    pub infectious_days: u32,
    pub immunity_probability: f64,
    #[serde(default)]
    pub quarantine_days: u32,
    /// The amount of Agents exposed at the start
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,
    #[serde(default)]
    pub vaccination_campaign: Option<VaccinationParameters>,
    #[serde(default)]
    pub quarantine_order: Option<QuarantineParameters>,
}

impl Default for DiseaseParameters {
    fn default() -> Self {
        let influenza = Disease::influenza();
        DiseaseParameters {
            name: influenza.name().to_string(),
            transmissibility: influenza.transmissibility(),
            exposure_days: influenza.exposure_days(),
            infectious_days: influenza.infectious_days(),
            immunity_probability: influenza.immunity_probability(),
            quarantine_days: influenza.quarantine_days(),
            seed_count: default_seed_count(),
            vaccination_campaign: None,
            quarantine_order: None,
        }
    }
}

impl DiseaseParameters {
    pub fn to_disease(&self) -> SimResult<Disease> {
        Disease::new(
            self.name.clone(),
            self.transmissibility,
            self.exposure_days,
            self.infectious_days,
            self.immunity_probability,
            self.quarantine_days,
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VaccinationParameters {
    pub day: u32,
    pub coverage: f64,
    pub efficacy: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuarantineParameters {
    pub day: u32,
    pub length: u32,
}

/// Validates a SimulatorConfig and turns it into a ready to run Simulator
pub struct SimulatorBuilder {
    config: SimulatorConfig,
}

impl SimulatorBuilder {
    pub fn new(config: SimulatorConfig) -> SimulatorBuilder {
        SimulatorBuilder { config }
    }

    pub fn from_json_str(json: &str) -> SimResult<SimulatorBuilder> {
        let config = serde_json::from_str(json).map_err(|e| {
            SimError::new_configuration_error(format!("Failed to parse configuration: {}", e))
        })?;
        Ok(SimulatorBuilder::new(config))
    }

    pub fn from_file<P: AsRef<Path>>(filename: P) -> SimResult<SimulatorBuilder> {
        let filename = filename.as_ref();
        let file = File::open(filename).map_err(|e| {
            SimError::from_io(e, format!("Failed to open configuration {:?}", filename))
        })?;
        let config = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            SimError::new_configuration_error(format!(
                "Failed to parse configuration {:?}: {}",
                filename, e
            ))
        })?;
        info!("Loaded configuration from {:?}", filename);
        Ok(SimulatorBuilder::new(config))
    }

    /// Overrides the random seed of the configuration
    pub fn with_seed(mut self, seed: u64) -> SimulatorBuilder {
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn build(self) -> SimResult<Simulator> {
        let config = self.config;
        let population = &config.population;
        let contact_matrix = ContactMatrix::new(population.contact_probabilities.clone())?;
        if contact_matrix.group_count() != population.group_count {
            return Err(SimError::new_configuration_error(format!(
                "Expected a contact matrix for {} groups, got {} rows",
                population.group_count,
                contact_matrix.group_count()
            )));
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!("Using {}", contact_matrix);
        let mut sim = Simulator::new(config.max_days, contact_matrix, rng);
        sim.populate(
            population.total,
            &population.susceptibilities,
            &population.quarantine_compliances,
        )?;
        for parameters in &config.diseases {
            sim.seed(parameters.to_disease()?, parameters.seed_count)?;
            if let Some(campaign) = parameters.vaccination_campaign {
                sim.schedule_vaccination_campaign(
                    campaign.day,
                    &parameters.name,
                    campaign.coverage,
                    campaign.efficacy,
                )?;
            }
            if let Some(order) = parameters.quarantine_order {
                sim.schedule_quarantine_order(order.day, &parameters.name, order.length)?;
            }
        }
        Ok(sim)
    }
}
