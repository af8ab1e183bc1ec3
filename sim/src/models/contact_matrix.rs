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

use crate::error::{check_probability, SimError, SimResult};

/// The daily probability that a contagious Agent of one group meets an Agent of another group
///
/// Rows are the group of the contagious Agent, columns the group of the other Agent
#[derive(Clone, Debug, PartialEq)]
pub struct ContactMatrix {
    probabilities: Vec<Vec<f64>>,
}

impl ContactMatrix {
    /// Fails if the matrix is empty, not square, or contains a value outside of [0, 1]
    pub fn new(probabilities: Vec<Vec<f64>>) -> SimResult<ContactMatrix> {
        let group_count = probabilities.len();
        if group_count == 0 {
            return Err(SimError::new_configuration_error(
                "The contact matrix must contain at least one group",
            ));
        }
        for (row_index, row) in probabilities.iter().enumerate() {
            if row.len() != group_count {
                return Err(SimError::new_configuration_error(format!(
                    "The contact matrix must be square, row {} has {} columns but there are {} groups",
                    row_index,
                    row.len(),
                    group_count
                )));
            }
            for (column_index, probability) in row.iter().enumerate() {
                check_probability(
                    *probability,
                    &format!("Contact probability ({}, {})", row_index, column_index),
                )?;
            }
        }
        Ok(ContactMatrix { probabilities })
    }

    /// A single group where every Agent meets every other Agent with the given probability
    pub fn uniform(probability: f64) -> SimResult<ContactMatrix> {
        ContactMatrix::new(vec![vec![probability]])
    }

    pub fn group_count(&self) -> usize {
        self.probabilities.len()
    }

    /// The probability a contagious Agent of `from_group` contacts a given Agent of `to_group`
    ///
    /// Both groups must be smaller than `group_count()`
    #[inline]
    pub fn probability(&self, from_group: usize, to_group: usize) -> f64 {
        self.probabilities[from_group][to_group]
    }
}

impl Display for ContactMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Contact matrix with {} groups: {:?}", self.group_count(), self.probabilities)
    }
}

#[cfg(test)]
mod tests {
    use crate::models::contact_matrix::ContactMatrix;

    #[test]
    fn rejects_malformed_matrices() {
        assert!(ContactMatrix::new(vec![]).is_err());
        assert!(ContactMatrix::new(vec![vec![0.1, 0.2]]).is_err());
        assert!(ContactMatrix::new(vec![vec![0.1, 0.2], vec![0.3]]).is_err());
        assert!(ContactMatrix::new(vec![vec![0.1, 0.2], vec![0.3, 1.1]]).is_err());
    }

    #[test]
    fn looks_up_by_group() {
        let matrix = ContactMatrix::new(vec![vec![0.1, 0.2], vec![0.3, 0.4]]).unwrap();
        assert_eq!(matrix.group_count(), 2);
        assert_eq!(matrix.probability(0, 1), 0.2);
        assert_eq!(matrix.probability(1, 0), 0.3);
    }
}
