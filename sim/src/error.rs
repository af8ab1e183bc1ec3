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

pub type SimResult<T> = std::result::Result<T, SimError>;

pub enum SimError {
    /// A parameter is outside of its documented domain
    Configuration {
        message: String,
    },
    /// Seeding requested more distinct agents than exist
    ExhaustedPopulation {
        requested: usize,
        available: usize,
    },
    Simulation {
        message: String,
    },
    Io {
        context: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl SimError {
    pub fn new_configuration_error<T: Display>(message: T) -> SimError {
        SimError::Configuration {
            message: message.to_string(),
        }
    }

    pub fn new_simulation_error(message: String) -> SimError {
        SimError::Simulation { message }
    }

    pub fn from_io<E: 'static + std::error::Error + Send + Sync>(
        source: E,
        context: String,
    ) -> SimError {
        SimError::Io {
            context,
            source: Box::new(source),
        }
    }
}

impl Debug for SimError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::Configuration { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
            SimError::ExhaustedPopulation {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Cannot select {} distinct agents from a population of {}",
                    requested, available
                )
            }
            SimError::Simulation { message } => {
                write!(f, "Simulation Error Occurred: {}", message)
            }
            SimError::Io { context, source } => {
                write!(f, "Error: {}\n{}", context, source)
            }
        }
    }
}

impl Display for SimError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error: {:?}", self)
    }
}

impl std::error::Error for SimError {}

/// Fails with a configuration error if the given value is not a probability
pub(crate) fn check_probability(value: f64, name: &str) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::new_configuration_error(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )))
    }
}
