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

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use rand::distributions::Distribution;
use rand::distributions::Uniform;
use rand::RngCore;

use crate::disease::{Disease, DiseaseStatus};
use crate::error::{check_probability, SimResult};

lazy_static! {
    /// This is a random uniform distribution, for fast random generation
    static ref RANDOM_DISTRIBUTION: Uniform<f64> = Uniform::new(0.0, 1.0);
}

/// Rolls a weighted die, returning true with the given probability
#[inline]
pub fn roll(probability: f64, rng: &mut dyn RngCore) -> bool {
    RANDOM_DISTRIBUTION.sample(rng) < probability
}

/// This is used to represent a single individual in the simulation
#[derive(Clone, Debug)]
pub struct Agent {
    /// The group this Agent belongs to, an index into the contact matrix
    group: usize,
    susceptibility: f64,
    /// The probability of obeying a quarantine order
    quarantine_compliance: f64,
    /// Disease name to status, Susceptible Agents have no entry
    statuses: HashMap<String, DiseaseStatus>,
    /// Disease name to the multiplier applied to infection chance
    vaccine_efficacy: HashMap<String, f64>,
}

impl Agent {
    pub fn new(group: usize, susceptibility: f64, quarantine_compliance: f64) -> SimResult<Agent> {
        check_probability(susceptibility, "Susceptibility")?;
        check_probability(quarantine_compliance, "Quarantine compliance")?;
        Ok(Agent {
            group,
            susceptibility,
            quarantine_compliance,
            statuses: HashMap::new(),
            vaccine_efficacy: HashMap::new(),
        })
    }
    pub fn group(&self) -> usize {
        self.group
    }
    pub fn susceptibility(&self) -> f64 {
        self.susceptibility
    }
    pub fn quarantine_compliance(&self) -> f64 {
        self.quarantine_compliance
    }

    pub fn status(&self, disease_name: &str) -> DiseaseStatus {
        self.statuses
            .get(disease_name)
            .copied()
            .unwrap_or(DiseaseStatus::Susceptible)
    }

    /// Returns true if the Agent has a record (including immunity) for any disease
    pub fn has_any_record(&self) -> bool {
        !self.statuses.is_empty()
    }

    /// An Agent is restricted while any of its diseases has an active quarantine order
    pub fn is_restricted(&self) -> bool {
        self.statuses.values().any(DiseaseStatus::is_quarantined)
    }

    /// The multiplier applied to this Agent's infection chance, 1.0 if unvaccinated
    pub fn vaccine_efficacy(&self, disease_name: &str) -> f64 {
        self.vaccine_efficacy
            .get(disease_name)
            .copied()
            .unwrap_or(1.0)
    }

    /// Sets the Agent as freshly exposed, regardless of the current status
    pub fn expose(&mut self, disease: &Disease) {
        self.statuses.insert(
            disease.name().to_string(),
            DiseaseStatus::from_countdown(disease.initial_countdown(), disease, None),
        );
    }

    /// Vaccinates the Agent with the given probability, returns true if the vaccine was taken
    pub fn vaccinate(
        &mut self,
        efficacy: f64,
        disease_name: &str,
        coverage: f64,
        rng: &mut dyn RngCore,
    ) -> bool {
        if roll(coverage, rng) {
            self.vaccine_efficacy
                .insert(disease_name.to_string(), efficacy);
            return true;
        }
        false
    }

    /// Attempts to infect this Agent from the contagious `other` Agent
    ///
    /// Only Susceptible Agents can be infected, and neither Agent may be restricted
    pub fn infect_attempt(
        &mut self,
        other: &Agent,
        disease: &Disease,
        rng: &mut dyn RngCore,
    ) -> bool {
        let name = disease.name();
        let infection_chance =
            self.susceptibility * self.vaccine_efficacy(name) * disease.transmissibility();
        if other.status(name).is_contagious()
            && !self.statuses.contains_key(name)
            && roll(infection_chance, rng)
            && !self.is_restricted()
            && !other.is_restricted()
        {
            self.expose(disease);
            return true;
        }
        false
    }

    /// Advances the Agent's status for the given disease by one day
    ///
    /// Returns true if the Agent is contagious today
    pub fn update(&mut self, disease: &Disease, rng: &mut dyn RngCore) -> bool {
        let status = match self.statuses.get_mut(disease.name()) {
            Some(status) => status,
            None => return false,
        };
        let (countdown, mut quarantine) = match *status {
            DiseaseStatus::Exposed { countdown } => (countdown, None),
            DiseaseStatus::Infectious {
                countdown,
                quarantine,
            } => (countdown, quarantine),
            DiseaseStatus::Susceptible | DiseaseStatus::RecoveredImmune => return false,
        };

        // First infectious day
        if countdown == disease.infectious_days()
            && roll(self.quarantine_compliance, rng)
            && 0 < disease.quarantine_days()
        {
            quarantine = Some(disease.quarantine_days());
        }
        if countdown == disease.quarantine_release_countdown() {
            quarantine = None;
        }
        quarantine = match quarantine {
            Some(days) if 1 < days => Some(days - 1),
            _ => None,
        };

        if countdown == 1 {
            if roll(disease.immunity_probability(), rng) {
                *status = DiseaseStatus::RecoveredImmune;
            } else {
                self.statuses.remove(disease.name());
            }
            return false;
        }
        *status = DiseaseStatus::from_countdown(countdown - 1, disease, quarantine);
        true
    }
}

impl Display for Agent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Agent in group {} with susceptibility {} and compliance {}, statuses: {:?}",
            self.group, self.susceptibility, self.quarantine_compliance, self.statuses
        )
    }
}
