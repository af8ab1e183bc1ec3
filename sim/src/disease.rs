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

use std::fmt::{Display, Formatter};

use log::{info, warn};

use crate::error::{check_probability, SimError, SimResult};

/// The status of a single Agent for a single Disease
///
/// The countdown is the number of days left before recovery, starting at
/// `exposure_days + infectious_days + 1` upon exposure. Values above
/// `infectious_days` are Exposed, the rest are Infectious.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiseaseStatus {
    Susceptible,
    Exposed {
        countdown: u32,
    },
    Infectious {
        countdown: u32,
        /// Days left on an active quarantine order
        quarantine: Option<u32>,
    },
    RecoveredImmune,
}

impl DiseaseStatus {
    /// Builds the status matching the given countdown
    ///
    /// The quarantine overlay is only kept for the Infectious stage
    pub fn from_countdown(countdown: u32, disease: &Disease, quarantine: Option<u32>) -> Self {
        if disease.infectious_days() < countdown {
            DiseaseStatus::Exposed { countdown }
        } else {
            DiseaseStatus::Infectious {
                countdown,
                quarantine,
            }
        }
    }
    pub fn countdown(&self) -> Option<u32> {
        match self {
            DiseaseStatus::Exposed { countdown } | DiseaseStatus::Infectious { countdown, .. } => {
                Some(*countdown)
            }
            DiseaseStatus::Susceptible | DiseaseStatus::RecoveredImmune => None,
        }
    }
    /// Returns true if the Agent is Exposed or Infectious
    pub fn is_contagious(&self) -> bool {
        self.countdown().map_or(false, |countdown| 0 < countdown)
    }
    pub fn is_quarantined(&self) -> bool {
        self.quarantine_days_left().is_some()
    }
    pub fn quarantine_days_left(&self) -> Option<u32> {
        match self {
            DiseaseStatus::Infectious { quarantine, .. } => *quarantine,
            _ => None,
        }
    }
}

impl Default for DiseaseStatus {
    fn default() -> Self {
        DiseaseStatus::Susceptible
    }
}

impl Display for DiseaseStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DiseaseStatus::Susceptible => write!(f, "Susceptible"),
            DiseaseStatus::Exposed { countdown } => {
                write!(f, "Exposed ({} days left)", countdown)
            }
            DiseaseStatus::Infectious {
                countdown,
                quarantine: Some(quarantine),
            } => write!(
                f,
                "Infectious ({} days left, quarantined for {} days)",
                countdown, quarantine
            ),
            DiseaseStatus::Infectious { countdown, .. } => {
                write!(f, "Infectious ({} days left)", countdown)
            }
            DiseaseStatus::RecoveredImmune => write!(f, "Recovered (Immune)"),
        }
    }
}

/// The parameters of a single outbreak
#[derive(Clone, Debug, PartialEq)]
pub struct Disease {
    name: String,
    /// How easily the disease is passed on
    transmissibility: f64,
    /// Length of the exposed stage in days
    exposure_days: u32,
    /// Length of the infectious stage in days
    infectious_days: u32,
    /// Probability of lifelong immunity upon recovery
    immunity_probability: f64,
    /// The active quarantine length, never larger than `infectious_days`
    quarantine_days: u32,
}

impl Disease {
    pub fn new<S: Into<String>>(
        name: S,
        transmissibility: f64,
        exposure_days: u32,
        infectious_days: u32,
        immunity_probability: f64,
        quarantine_days: u32,
    ) -> SimResult<Disease> {
        let name = name.into();
        if name.is_empty() {
            return Err(SimError::new_configuration_error(
                "A disease must have a name",
            ));
        }
        check_probability(transmissibility, "Transmissibility")?;
        check_probability(immunity_probability, "Immunity probability")?;
        if infectious_days < quarantine_days {
            return Err(SimError::new_configuration_error(format!(
                "Quarantine length ({}) of {} exceeds its infectious length ({})",
                quarantine_days, name, infectious_days
            )));
        }
        if exposure_days
            .checked_add(infectious_days)
            .and_then(|total| total.checked_add(1))
            .is_none()
        {
            return Err(SimError::new_configuration_error(format!(
                "Disease {} lasts too many days",
                name
            )));
        }
        Ok(Disease {
            name,
            transmissibility,
            exposure_days,
            infectious_days,
            immunity_probability,
            quarantine_days,
        })
    }

    /// Creates a new disease representative of seasonal influenza
    ///
    /// Transmissibility - 0.95
    /// Exposure Time - 2 days
    /// Infectious Time - 7 days
    /// No lifelong immunity and no quarantine
    pub fn influenza() -> Disease {
        Disease {
            name: String::from("influenza"),
            transmissibility: 0.95,
            exposure_days: 2,
            infectious_days: 7,
            immunity_probability: 0.0,
            quarantine_days: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn transmissibility(&self) -> f64 {
        self.transmissibility
    }
    pub fn exposure_days(&self) -> u32 {
        self.exposure_days
    }
    pub fn infectious_days(&self) -> u32 {
        self.infectious_days
    }
    pub fn immunity_probability(&self) -> f64 {
        self.immunity_probability
    }
    pub fn quarantine_days(&self) -> u32 {
        self.quarantine_days
    }
    /// The countdown an Agent starts at when exposed
    pub fn initial_countdown(&self) -> u32 {
        self.exposure_days + self.infectious_days + 1
    }
    /// The countdown at which a quarantine order ends
    pub fn quarantine_release_countdown(&self) -> u32 {
        self.infectious_days - self.quarantine_days
    }

    /// Changes the quarantine length applied to every Agent that becomes infectious from now on
    ///
    /// Requests longer than the infectious stage are clamped to it. Returns the applied length.
    pub fn set_quarantine(&mut self, requested_days: u32) -> u32 {
        let applied = requested_days.min(self.infectious_days);
        if applied != requested_days {
            warn!(
                "Quarantine of {} days for {} exceeds its infectious stage, using {} days",
                requested_days, self.name, applied
            );
        }
        info!(
            "Quarantine policy for {} changed from {} to {} days",
            self.name, self.quarantine_days, applied
        );
        self.quarantine_days = applied;
        applied
    }
}

impl Display for Disease {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: transmissibility {}, exposed for {} days, infectious for {} days, immunity probability {}, quarantine {} days",
            self.name,
            self.transmissibility,
            self.exposure_days,
            self.infectious_days,
            self.immunity_probability,
            self.quarantine_days
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::disease::{Disease, DiseaseStatus};

    fn measles() -> Disease {
        Disease::new("measles", 0.9, 3, 5, 1.0, 2).unwrap()
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(Disease::new("", 0.5, 1, 1, 0.5, 0).is_err());
        assert!(Disease::new("a", 1.2, 1, 1, 0.5, 0).is_err());
        assert!(Disease::new("a", 0.5, 1, 1, -0.5, 0).is_err());
        assert!(Disease::new("a", 0.5, 1, 3, 0.5, 4).is_err());
        assert!(Disease::new("a", 0.5, u32::MAX, 1, 0.5, 0).is_err());
        assert!(Disease::new("a", 0.5, 0, 0, 0.0, 0).is_ok());
    }

    #[test]
    fn quarantine_is_clamped_to_infectious_days() {
        let mut disease = measles();
        assert_eq!(disease.set_quarantine(4), 4);
        assert_eq!(disease.quarantine_days(), 4);
        assert_eq!(disease.set_quarantine(40), 5);
        assert_eq!(disease.quarantine_days(), 5);
        assert_eq!(disease.quarantine_release_countdown(), 0);
        assert_eq!(disease.set_quarantine(0), 0);
    }

    #[test]
    fn countdown_buckets() {
        let disease = measles();
        assert_eq!(disease.initial_countdown(), 9);
        assert_eq!(
            DiseaseStatus::from_countdown(9, &disease, None),
            DiseaseStatus::Exposed { countdown: 9 }
        );
        assert_eq!(
            DiseaseStatus::from_countdown(6, &disease, Some(2)),
            DiseaseStatus::Exposed { countdown: 6 }
        );
        let infectious = DiseaseStatus::from_countdown(5, &disease, Some(2));
        assert_eq!(
            infectious,
            DiseaseStatus::Infectious {
                countdown: 5,
                quarantine: Some(2)
            }
        );
        assert!(infectious.is_contagious());
        assert!(infectious.is_quarantined());
        assert!(!DiseaseStatus::RecoveredImmune.is_contagious());
        assert!(!DiseaseStatus::Susceptible.is_contagious());
        assert_eq!(DiseaseStatus::RecoveredImmune.countdown(), None);
    }
}
