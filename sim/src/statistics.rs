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
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;
use num_format::ToFormattedString;
use serde::Serialize;
use serde_json::to_writer;

use crate::config::NUMBER_FORMATTING;
use crate::disease::DiseaseStatus;
use crate::error::{SimError, SimResult};

/// Records the daily snapshots of the disease currently being simulated, and the finished runs
#[derive(Debug, Default)]
pub struct StatisticsRecorder {
    /// The days recorded for the disease currently being simulated
    history: Vec<StatisticEntry>,
    /// Disease name to its finished history
    results: HashMap<String, Vec<StatisticEntry>>,
}

impl StatisticsRecorder {
    pub fn record(&mut self, entry: StatisticEntry) {
        self.history.push(entry);
    }
    /// The days recorded so far for the disease currently being simulated
    pub fn history(&self) -> &[StatisticEntry] {
        &self.history
    }
    /// Stores the current history under the given disease, and starts a new one
    pub fn finish(&mut self, disease_name: &str) {
        let history = std::mem::take(&mut self.history);
        info!(
            "Recorded {} days for {}",
            history.len(),
            disease_name
        );
        self.results.insert(disease_name.to_string(), history);
    }
    pub fn results(&self) -> &HashMap<String, Vec<StatisticEntry>> {
        &self.results
    }
    pub fn get(&self, disease_name: &str) -> Option<&Vec<StatisticEntry>> {
        self.results.get(disease_name)
    }
    /// The `(exposed, infectious, susceptible)` counts per day for the given disease
    pub fn triples(&self, disease_name: &str) -> Option<Vec<(u32, u32, u32)>> {
        self.get(disease_name)
            .map(|entries| entries.iter().map(StatisticEntry::as_tuple).collect())
    }

    pub fn dump_to_json<P: AsRef<Path>>(&self, filename: P) -> SimResult<()> {
        let filename = filename.as_ref();
        let file = File::create(filename).map_err(|e| {
            SimError::from_io(e, format!("Failed to create results file {:?}", filename))
        })?;
        let file_writer = BufWriter::new(file);
        to_writer(file_writer, &self.results).map_err(|e| {
            SimError::from_io(e, format!("Failed to write results to {:?}", filename))
        })?;
        info!("Dumped data to file: {:?}", filename);
        Ok(())
    }

    /// Writes one row per disease per day, diseases in alphabetical order
    pub fn dump_to_csv<P: AsRef<Path>>(&self, filename: P) -> SimResult<()> {
        let filename = filename.as_ref();
        let mut writer = csv::Writer::from_path(filename).map_err(|e| {
            SimError::from_io(e, format!("Failed to create results file {:?}", filename))
        })?;
        let mut names: Vec<&String> = self.results.keys().collect();
        names.sort();
        for name in names {
            for entry in &self.results[name] {
                writer
                    .serialize(CsvRecord {
                        disease: name,
                        day: entry.time_step,
                        exposed: entry.exposed,
                        infectious: entry.infectious,
                        susceptible: entry.susceptible,
                    })
                    .map_err(|e| {
                        SimError::from_io(e, format!("Failed to write results to {:?}", filename))
                    })?;
            }
        }
        writer.flush().map_err(|e| {
            SimError::from_io(e, format!("Failed to flush results to {:?}", filename))
        })?;
        info!("Dumped data to file: {:?}", filename);
        Ok(())
    }
}

#[derive(Serialize)]
struct CsvRecord<'a> {
    disease: &'a str,
    day: u32,
    exposed: u32,
    infectious: u32,
    susceptible: u32,
}

/// A snapshot of one disease per day
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatisticEntry {
    time_step: u32,
    exposed: u32,
    infectious: u32,
    susceptible: u32,
}

impl StatisticEntry {
    pub fn with_time_step(day: u32) -> StatisticEntry {
        StatisticEntry {
            time_step: day,
            ..Default::default()
        }
    }
    pub fn time_step(&self) -> u32 {
        self.time_step
    }
    pub fn exposed(&self) -> u32 {
        self.exposed
    }
    pub fn infectious(&self) -> u32 {
        self.infectious
    }
    pub fn susceptible(&self) -> u32 {
        self.susceptible
    }
    pub fn as_tuple(&self) -> (u32, u32, u32) {
        (self.exposed, self.infectious, self.susceptible)
    }
    /// Adds an Agent to the count of its status, immune Agents are not counted
    pub fn add_agent(&mut self, disease_status: &DiseaseStatus) {
        match disease_status {
            DiseaseStatus::Susceptible => self.susceptible += 1,
            DiseaseStatus::Exposed { .. } => self.exposed += 1,
            DiseaseStatus::Infectious { .. } => self.infectious += 1,
            DiseaseStatus::RecoveredImmune => {}
        }
    }
    /// Returns true if at least one Agent is Exposed or Infectious
    pub fn disease_exists(&self) -> bool {
        self.exposed != 0 || self.infectious != 0
    }
}

impl Display for StatisticEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Day: {: >4}, Exposed: {: >10}, Infectious: {: >10}, Susceptible: {: >10}",
            self.time_step,
            self.exposed.to_formatted_string(&NUMBER_FORMATTING),
            self.infectious.to_formatted_string(&NUMBER_FORMATTING),
            self.susceptible.to_formatted_string(&NUMBER_FORMATTING)
        )
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::disease::DiseaseStatus;
    use crate::statistics::{StatisticEntry, StatisticsRecorder};

    fn entry(day: u32, exposed: u32, infectious: u32, susceptible: u32) -> StatisticEntry {
        let mut entry = StatisticEntry::with_time_step(day);
        for _ in 0..exposed {
            entry.add_agent(&DiseaseStatus::Exposed { countdown: 5 });
        }
        for _ in 0..infectious {
            entry.add_agent(&DiseaseStatus::Infectious {
                countdown: 1,
                quarantine: None,
            });
        }
        for _ in 0..susceptible {
            entry.add_agent(&DiseaseStatus::Susceptible);
        }
        entry.add_agent(&DiseaseStatus::RecoveredImmune);
        entry
    }

    #[test]
    fn immune_agents_are_not_counted() {
        let entry = entry(0, 1, 2, 3);
        assert_eq!(entry.as_tuple(), (1, 2, 3));
        assert!(entry.disease_exists());
        assert!(!StatisticEntry::with_time_step(4).disease_exists());
    }

    #[test]
    fn display_formats_numbers() {
        let entry = entry(7, 0, 0, 1200);
        assert!(entry.to_string().contains("1,200"));
    }

    #[test]
    fn finishing_moves_history_to_results() {
        let mut recorder = StatisticsRecorder::default();
        recorder.record(entry(0, 0, 1, 4));
        recorder.record(entry(1, 0, 0, 4));
        recorder.finish("flu");
        assert!(recorder.history().is_empty());
        assert_eq!(
            recorder.triples("flu"),
            Some(vec![(0, 1, 4), (0, 0, 4)])
        );
        recorder.record(entry(0, 2, 0, 3));
        recorder.finish("mumps");
        assert_eq!(recorder.get("mumps").map(Vec::len), Some(1));
        assert_eq!(recorder.get("flu").map(Vec::len), Some(2));
    }

    #[test]
    fn dumps_results() {
        let directory = tempfile::tempdir().unwrap();
        let mut recorder = StatisticsRecorder::default();
        recorder.record(entry(0, 0, 1, 4));
        recorder.finish("flu");

        let json = directory.path().join("results.json");
        recorder.dump_to_json(&json).unwrap();
        let contents = fs::read_to_string(&json).unwrap();
        assert!(contents.contains("\"flu\""));

        let csv = directory.path().join("results.csv");
        recorder.dump_to_csv(&csv).unwrap();
        let contents = fs::read_to_string(&csv).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "disease,day,exposed,infectious,susceptible");
        assert_eq!(lines[1], "flu,0,0,1,4");
    }
}
