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

/// An intervention scheduled for a given day of a given disease's run
#[derive(Clone, Debug, PartialEq)]
pub enum Intervention {
    /// Offers a vaccine to every Agent without any disease record
    VaccinationCampaign {
        day: u32,
        disease_name: String,
        /// The probability an Agent takes the vaccine
        coverage: f64,
        /// The multiplier applied to a vaccinated Agent's infection chance
        efficacy: f64,
    },
    /// Changes the quarantine length of a disease
    QuarantineOrder {
        day: u32,
        disease_name: String,
        length: u32,
    },
}

impl Intervention {
    pub fn day(&self) -> u32 {
        match self {
            Intervention::VaccinationCampaign { day, .. }
            | Intervention::QuarantineOrder { day, .. } => *day,
        }
    }
    pub fn disease_name(&self) -> &str {
        match self {
            Intervention::VaccinationCampaign { disease_name, .. }
            | Intervention::QuarantineOrder { disease_name, .. } => disease_name,
        }
    }
    /// Returns true if this intervention applies on the given day of the given disease
    pub fn is_due(&self, day: u32, disease_name: &str) -> bool {
        self.day() == day && self.disease_name() == disease_name
    }
    /// Returns true if both interventions are the same kind for the same disease
    pub fn replaces(&self, other: &Intervention) -> bool {
        self.order() == other.order() && self.disease_name() == other.disease_name()
    }
    /// Quarantine orders take effect before vaccination campaigns on the same day
    pub(crate) fn order(&self) -> u8 {
        match self {
            Intervention::QuarantineOrder { .. } => 0,
            Intervention::VaccinationCampaign { .. } => 1,
        }
    }
}

impl Display for Intervention {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Intervention::VaccinationCampaign {
                day,
                disease_name,
                coverage,
                efficacy,
            } => {
                write!(
                    f,
                    "Vaccination campaign against {} on day {} (coverage {}, efficacy {})",
                    disease_name, day, coverage, efficacy
                )
            }
            Intervention::QuarantineOrder {
                day,
                disease_name,
                length,
            } => {
                write!(
                    f,
                    "Quarantine order of {} days for {} on day {}",
                    length, disease_name, day
                )
            }
        }
    }
}
