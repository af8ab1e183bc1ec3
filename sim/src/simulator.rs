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
use std::time::Instant;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::Rng;

use crate::config::DEBUG_ITERATION_PRINT;
use crate::disease::Disease;
use crate::error::{check_probability, SimError, SimResult};
use crate::interventions::Intervention;
use crate::models::agent::{roll, Agent};
use crate::models::contact_matrix::ContactMatrix;
use crate::statistics::{StatisticEntry, StatisticsRecorder};

pub struct Simulator {
    /// Every Agent in the simulation, membership is fixed for the run
    agents: Vec<Agent>,
    /// The diseases to simulate, one after another
    diseases: Vec<Disease>,
    contact_matrix: ContactMatrix,
    /// At most one intervention of each kind per disease, quarantine orders first
    interventions: Vec<Intervention>,
    statistics_recorder: StatisticsRecorder,
    /// The maximum amount of days to simulate each disease for
    max_days: u32,
    rng: StdRng,
    finished: bool,
}

/// Returns a shared reference to the `source` Agent, and a mutable reference to the `target` Agent
fn split_pair(agents: &mut [Agent], source: usize, target: usize) -> (&Agent, &mut Agent) {
    debug_assert_ne!(source, target);
    if source < target {
        let (left, right) = agents.split_at_mut(target);
        (&left[source], &mut right[0])
    } else {
        let (left, right) = agents.split_at_mut(source);
        (&right[0], &mut left[target])
    }
}

/// Initialisation Methods
impl Simulator {
    pub fn new(max_days: u32, contact_matrix: ContactMatrix, rng: StdRng) -> Simulator {
        Simulator {
            agents: Vec::new(),
            diseases: Vec::new(),
            contact_matrix,
            interventions: Vec::new(),
            statistics_recorder: StatisticsRecorder::default(),
            max_days,
            rng,
            finished: false,
        }
    }

    /// Adds a single Agent, whose group must exist in the contact matrix
    pub fn join(&mut self, agent: Agent) -> SimResult<()> {
        if self.contact_matrix.group_count() <= agent.group() {
            return Err(SimError::new_configuration_error(format!(
                "Agent group {} does not exist in a contact matrix of {} groups",
                agent.group(),
                self.contact_matrix.group_count()
            )));
        }
        self.agents.push(agent);
        Ok(())
    }

    /// Generates `total` Agents, each assigned to a uniformly random group
    ///
    /// Susceptibility and quarantine compliance are taken from the group, so both lists
    /// need an entry per group of the contact matrix
    pub fn populate(
        &mut self,
        total: usize,
        susceptibilities: &[f64],
        quarantine_compliances: &[f64],
    ) -> SimResult<()> {
        let group_count = self.contact_matrix.group_count();
        if susceptibilities.len() != group_count || quarantine_compliances.len() != group_count {
            return Err(SimError::new_configuration_error(format!(
                "Expected {} susceptibilities and quarantine compliances, got {} and {}",
                group_count,
                susceptibilities.len(),
                quarantine_compliances.len()
            )));
        }
        self.agents.reserve(total);
        for _ in 0..total {
            let group = self.rng.gen_range(0..group_count);
            let agent = Agent::new(group, susceptibilities[group], quarantine_compliances[group])?;
            self.agents.push(agent);
        }
        info!(
            "Generated {} agents across {} groups",
            total, group_count
        );
        Ok(())
    }

    /// Registers a disease without exposing anyone
    pub fn introduce(&mut self, disease: Disease) -> SimResult<()> {
        self.check_unique(&disease)?;
        debug!("Introduced {}", disease);
        self.diseases.push(disease);
        Ok(())
    }

    fn check_unique(&self, disease: &Disease) -> SimResult<()> {
        if self.diseases.iter().any(|known| known.name() == disease.name()) {
            return Err(SimError::new_configuration_error(format!(
                "Disease {} has already been introduced",
                disease.name()
            )));
        }
        Ok(())
    }

    /// Registers the disease, and exposes `count` distinct Agents chosen uniformly at random
    pub fn seed(&mut self, disease: Disease, count: usize) -> SimResult<()> {
        self.check_unique(&disease)?;
        if self.agents.len() < count {
            return Err(SimError::ExhaustedPopulation {
                requested: count,
                available: self.agents.len(),
            });
        }
        let chosen = sample(&mut self.rng, self.agents.len(), count);
        for index in chosen.iter() {
            self.agents[index].expose(&disease);
            trace!("Seeded {} in agent {}", disease.name(), index);
        }
        info!("Seeded {} agents with {}", count, disease.name());
        self.introduce(disease)
    }

    pub fn schedule_vaccination_campaign(
        &mut self,
        day: u32,
        disease_name: &str,
        coverage: f64,
        efficacy: f64,
    ) -> SimResult<()> {
        check_probability(coverage, "Vaccination coverage")?;
        check_probability(efficacy, "Vaccine efficacy")?;
        self.schedule(Intervention::VaccinationCampaign {
            day,
            disease_name: disease_name.to_string(),
            coverage,
            efficacy,
        });
        Ok(())
    }

    /// The length is clamped to the disease's infectious stage when the order is applied
    pub fn schedule_quarantine_order(
        &mut self,
        day: u32,
        disease_name: &str,
        length: u32,
    ) -> SimResult<()> {
        self.schedule(Intervention::QuarantineOrder {
            day,
            disease_name: disease_name.to_string(),
            length,
        });
        Ok(())
    }

    fn schedule(&mut self, intervention: Intervention) {
        if let Some(position) = self
            .interventions
            .iter()
            .position(|existing| existing.replaces(&intervention))
        {
            warn!(
                "Replacing \"{}\" with \"{}\"",
                self.interventions[position], intervention
            );
            self.interventions.remove(position);
        }
        if self.max_days <= intervention.day() {
            warn!(
                "\"{}\" is scheduled after the last simulated day ({})",
                intervention, self.max_days
            );
        }
        self.interventions.push(intervention);
        self.interventions.sort_by_key(Intervention::order);
    }
}

/// Runtime Simulation Methods
impl Simulator {
    /// Simulates every disease in turn, until it burns out or the maximum amount of days is reached
    pub fn run(&mut self) -> SimResult<()> {
        if self.finished {
            return Err(SimError::new_simulation_error(String::from(
                "The simulation has already been run",
            )));
        }
        self.check_interventions()?;
        self.finished = true;
        let start_time = Instant::now();
        info!(
            "Starting simulation of {} diseases over {} agents...",
            self.diseases.len(),
            self.agents.len()
        );
        for disease_index in 0..self.diseases.len() {
            self.simulate_disease(disease_index);
        }
        info!("Finished simulation in {:?}", start_time.elapsed());
        Ok(())
    }

    fn check_interventions(&self) -> SimResult<()> {
        for intervention in &self.interventions {
            if !self
                .diseases
                .iter()
                .any(|disease| disease.name() == intervention.disease_name())
            {
                return Err(SimError::new_configuration_error(format!(
                    "\"{}\" refers to a disease that was never seeded",
                    intervention
                )));
            }
        }
        Ok(())
    }

    fn simulate_disease(&mut self, disease_index: usize) {
        let start_time = Instant::now();
        let name = self.diseases[disease_index].name().to_string();
        info!("Simulating {}", self.diseases[disease_index]);
        for day in 0..self.max_days {
            self.apply_interventions(day, disease_index);
            let (entry, contagious) = self.execute_day(day, disease_index);
            self.statistics_recorder.record(entry);
            if day % DEBUG_ITERATION_PRINT == 0 {
                info!("{:?}  {} - {}", start_time.elapsed(), name, entry);
            } else {
                debug!("{} - {}", name, entry);
            }
            if !entry.disease_exists() {
                info!("{} finished at day {} as no one has the disease", name, day);
                self.statistics_recorder.finish(&name);
                return;
            }
            let exposures = self.transmit(disease_index, &contagious);
            debug!("There were {} new exposures to {} on day {}", exposures, name, day);
        }
        info!(
            "{} is still active after the maximum of {} days",
            name, self.max_days
        );
        self.statistics_recorder.finish(&name);
    }

    fn apply_interventions(&mut self, day: u32, disease_index: usize) {
        let disease = &mut self.diseases[disease_index];
        for intervention in &self.interventions {
            if !intervention.is_due(day, disease.name()) {
                continue;
            }
            info!("Applying {}", intervention);
            match intervention {
                Intervention::QuarantineOrder { length, .. } => {
                    disease.set_quarantine(*length);
                }
                Intervention::VaccinationCampaign {
                    coverage, efficacy, ..
                } => {
                    let mut vaccinated = 0;
                    for agent in self.agents.iter_mut().filter(|agent| !agent.has_any_record()) {
                        if agent.vaccinate(*efficacy, disease.name(), *coverage, &mut self.rng) {
                            vaccinated += 1;
                        }
                    }
                    info!("Vaccinated {} agents against {}", vaccinated, disease.name());
                }
            }
        }
    }

    /// Advances every Agent by one day, returning the day's counts and the contagious Agents
    fn execute_day(&mut self, day: u32, disease_index: usize) -> (StatisticEntry, Vec<usize>) {
        let disease = &self.diseases[disease_index];
        let mut contagious = Vec::new();
        for (index, agent) in self.agents.iter_mut().enumerate() {
            if agent.update(disease, &mut self.rng) {
                contagious.push(index);
            }
        }
        let mut entry = StatisticEntry::with_time_step(day);
        for agent in &self.agents {
            entry.add_agent(&agent.status(disease.name()));
        }
        (entry, contagious)
    }

    /// Every contagious Agent meets every other Agent with the probability of their groups
    ///
    /// Returns the amount of new exposures
    fn transmit(&mut self, disease_index: usize, contagious: &[usize]) -> u32 {
        let disease = &self.diseases[disease_index];
        let mut exposures = 0;
        for &source in contagious {
            let source_group = self.agents[source].group();
            for target in 0..self.agents.len() {
                if source == target {
                    continue;
                }
                let contact_chance = self
                    .contact_matrix
                    .probability(source_group, self.agents[target].group());
                if roll(contact_chance, &mut self.rng) {
                    let (source_agent, target_agent) = split_pair(&mut self.agents, source, target);
                    if target_agent.infect_attempt(source_agent, disease, &mut self.rng) {
                        trace!("Agent {} exposed agent {} to {}", source, target, disease.name());
                        exposures += 1;
                    }
                }
            }
        }
        exposures
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }
    pub fn diseases(&self) -> &[Disease] {
        &self.diseases
    }
    pub fn interventions(&self) -> &[Intervention] {
        &self.interventions
    }
    pub fn contact_matrix(&self) -> &ContactMatrix {
        &self.contact_matrix
    }
    pub fn population_size(&self) -> usize {
        self.agents.len()
    }
    pub fn max_days(&self) -> u32 {
        self.max_days
    }
    pub fn statistics_recorder(&self) -> &StatisticsRecorder {
        &self.statistics_recorder
    }
    /// Disease name to its daily records
    pub fn results(&self) -> &HashMap<String, Vec<StatisticEntry>> {
        self.statistics_recorder.results()
    }
    /// The `(exposed, infectious, susceptible)` counts per day for the given disease
    pub fn history(&self, disease_name: &str) -> Option<Vec<(u32, u32, u32)>> {
        self.statistics_recorder.triples(disease_name)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::disease::{Disease, DiseaseStatus};
    use crate::error::SimError;
    use crate::models::agent::Agent;
    use crate::models::contact_matrix::ContactMatrix;
    use crate::simulator::Simulator;

    /// A single group where everyone meets everyone every day
    fn fully_mixed(population: usize, max_days: u32) -> Simulator {
        let mut sim = Simulator::new(
            max_days,
            ContactMatrix::uniform(1.0).unwrap(),
            StdRng::seed_from_u64(7),
        );
        for _ in 0..population {
            sim.join(Agent::new(0, 1.0, 0.0).unwrap()).unwrap();
        }
        sim
    }

    #[test]
    fn single_day_infectious_outbreak() {
        let mut sim = fully_mixed(5, 10);
        sim.seed(Disease::new("flu", 1.0, 0, 1, 1.0, 0).unwrap(), 1)
            .unwrap();
        sim.run().unwrap();
        assert_eq!(
            sim.history("flu").unwrap(),
            vec![(0, 1, 4), (0, 4, 0), (0, 0, 0)]
        );
        assert!(sim
            .agents()
            .iter()
            .all(|agent| agent.status("flu") == DiseaseStatus::RecoveredImmune));
    }

    #[test]
    fn outbreak_with_exposed_stage() {
        let mut sim = fully_mixed(5, 10);
        sim.seed(Disease::new("flu", 1.0, 1, 1, 1.0, 0).unwrap(), 1)
            .unwrap();
        sim.run().unwrap();
        assert_eq!(
            sim.history("flu").unwrap(),
            vec![(1, 0, 4), (4, 1, 0), (0, 4, 0), (0, 0, 0)]
        );
    }

    #[test]
    fn no_seeds_burns_out_immediately() {
        let mut sim = fully_mixed(5, 10);
        sim.seed(Disease::influenza(), 0).unwrap();
        sim.run().unwrap();
        assert_eq!(sim.history("influenza").unwrap(), vec![(0, 0, 5)]);
    }

    #[test]
    fn without_immunity_runs_to_the_horizon() {
        let mut sim = fully_mixed(2, 10);
        sim.seed(Disease::new("cold", 1.0, 0, 1, 0.0, 0).unwrap(), 1)
            .unwrap();
        sim.run().unwrap();
        let history = sim.history("cold").unwrap();
        assert_eq!(history.len(), 10);
        assert!(history.iter().all(|day| *day == (0, 1, 1)));
    }

    #[test]
    fn deterministic_saturation_across_groups() {
        let mut sim = Simulator::new(
            50,
            ContactMatrix::new(vec![vec![1.0, 1.0], vec![1.0, 1.0]]).unwrap(),
            StdRng::seed_from_u64(3),
        );
        sim.populate(20, &[1.0, 1.0], &[0.0, 0.0]).unwrap();
        sim.seed(Disease::new("a", 1.0, 2, 3, 1.0, 0).unwrap(), 1)
            .unwrap();
        sim.run().unwrap();
        let history = sim.history("a").unwrap();
        assert_eq!(history[0], (1, 0, 19));
        assert_eq!(history[1], (20, 0, 0));
        assert_eq!(*history.last().unwrap(), (0, 0, 0));
        // Burnout is the only all-zero day, and the last one recorded
        assert_eq!(
            history.iter().filter(|day| day.0 == 0 && day.1 == 0).count(),
            1
        );
    }

    #[test]
    fn seeding_exposes_exactly_k_agents() {
        let mut sim = fully_mixed(30, 10);
        let disease = Disease::new("a", 0.5, 2, 3, 0.5, 0).unwrap();
        let initial = disease.initial_countdown();
        sim.seed(disease, 12).unwrap();
        let seeded = sim
            .agents()
            .iter()
            .filter(|agent| agent.status("a") == DiseaseStatus::Exposed { countdown: initial })
            .count();
        assert_eq!(seeded, 12);
        assert_eq!(sim.diseases().len(), 1);
    }

    #[test]
    fn seeding_fails_fast() {
        let mut sim = fully_mixed(3, 10);
        match sim.seed(Disease::influenza(), 4) {
            Err(SimError::ExhaustedPopulation {
                requested,
                available,
            }) => {
                assert_eq!(requested, 4);
                assert_eq!(available, 3);
            }
            _ => panic!("Expected the population to be exhausted"),
        }
        assert!(sim.diseases().is_empty());
        sim.seed(Disease::influenza(), 1).unwrap();
        assert!(matches!(
            sim.seed(Disease::influenza(), 1),
            Err(SimError::Configuration { .. })
        ));
    }

    #[test]
    fn invalid_population_is_rejected() {
        let mut sim = fully_mixed(0, 10);
        assert!(sim.join(Agent::new(1, 0.5, 0.5).unwrap()).is_err());
        assert!(sim.populate(10, &[0.5, 0.5], &[0.5]).is_err());
        assert!(sim.populate(10, &[1.5], &[0.5]).is_err());
        sim.populate(10, &[0.5], &[0.5]).unwrap();
        assert_eq!(sim.population_size(), 10);
    }

    #[test]
    fn interventions_must_refer_to_seeded_diseases() {
        let mut sim = fully_mixed(5, 10);
        sim.seed(Disease::influenza(), 1).unwrap();
        sim.schedule_quarantine_order(3, "mumps", 2).unwrap();
        assert!(matches!(sim.run(), Err(SimError::Configuration { .. })));
        assert!(sim
            .schedule_vaccination_campaign(3, "influenza", 1.5, 0.5)
            .is_err());
    }

    #[test]
    fn a_second_intervention_of_a_kind_replaces_the_first() {
        let mut sim = fully_mixed(5, 10);
        sim.schedule_vaccination_campaign(1, "a", 0.5, 0.5).unwrap();
        sim.schedule_quarantine_order(2, "a", 2).unwrap();
        sim.schedule_vaccination_campaign(4, "a", 0.9, 0.1).unwrap();
        sim.schedule_vaccination_campaign(4, "b", 0.9, 0.1).unwrap();
        assert_eq!(sim.interventions().len(), 3);
        assert_eq!(sim.interventions()[0].day(), 2);
        assert_eq!(sim.interventions()[1].day(), 4);
    }

    #[test]
    fn vaccination_campaign_protects_the_healthy() {
        let mut sim = fully_mixed(5, 10);
        sim.seed(Disease::new("flu", 1.0, 0, 1, 1.0, 0).unwrap(), 1)
            .unwrap();
        sim.schedule_vaccination_campaign(0, "flu", 1.0, 0.0).unwrap();
        sim.run().unwrap();
        assert_eq!(sim.history("flu").unwrap(), vec![(0, 1, 4), (0, 0, 4)]);
        let vaccinated = sim
            .agents()
            .iter()
            .filter(|agent| agent.vaccine_efficacy("flu") == 0.0)
            .count();
        assert_eq!(vaccinated, 4);
    }

    #[test]
    fn quarantine_order_changes_the_disease() {
        let mut sim = fully_mixed(5, 10);
        sim.seed(Disease::new("mumps", 1.0, 1, 4, 1.0, 0).unwrap(), 1)
            .unwrap();
        sim.schedule_quarantine_order(0, "mumps", 10).unwrap();
        sim.run().unwrap();
        assert_eq!(sim.diseases()[0].quarantine_days(), 4);
    }

    /// Two compliant Agents passing a disease without immunity back and forth
    fn reinfecting_pair(max_days: u32) -> Simulator {
        let mut sim = Simulator::new(
            max_days,
            ContactMatrix::uniform(1.0).unwrap(),
            StdRng::seed_from_u64(7),
        );
        for _ in 0..2 {
            sim.join(Agent::new(0, 1.0, 1.0).unwrap()).unwrap();
        }
        sim.seed(Disease::new("measles", 1.0, 0, 2, 0.0, 0).unwrap(), 1)
            .unwrap();
        sim
    }

    fn restricted_agents(sim: &Simulator) -> usize {
        sim.agents()
            .iter()
            .filter(|agent| agent.is_restricted())
            .count()
    }

    #[test]
    fn without_quarantine_the_pair_reinfects_each_other() {
        let mut sim = reinfecting_pair(6);
        sim.run().unwrap();
        assert_eq!(
            sim.history("measles").unwrap(),
            vec![(0, 1, 1), (0, 2, 0), (0, 1, 1), (0, 1, 1), (0, 2, 0), (0, 1, 1)]
        );
        assert_eq!(restricted_agents(&sim), 0);
    }

    #[test]
    fn quarantine_order_applies_to_later_onsets() {
        // The first Agent became infectious before the order, the second one after it
        for (max_days, restricted) in [(2, 0), (3, 1)] {
            let mut sim = reinfecting_pair(max_days);
            sim.schedule_quarantine_order(2, "measles", 2).unwrap();
            sim.run().unwrap();
            assert_eq!(restricted_agents(&sim), restricted);
        }

        // The quarantined Agent can no longer pass the disease back
        let mut sim = reinfecting_pair(10);
        sim.schedule_quarantine_order(2, "measles", 2).unwrap();
        sim.run().unwrap();
        assert_eq!(
            sim.history("measles").unwrap(),
            vec![(0, 1, 1), (0, 2, 0), (0, 1, 1), (0, 0, 2)]
        );
        assert_eq!(restricted_agents(&sim), 0);
    }

    #[test]
    fn diseases_run_one_after_another() {
        let mut sim = fully_mixed(5, 10);
        sim.seed(Disease::new("a", 1.0, 0, 1, 1.0, 0).unwrap(), 1)
            .unwrap();
        sim.seed(Disease::new("b", 1.0, 0, 1, 1.0, 0).unwrap(), 1)
            .unwrap();
        // Everyone holds a record for "a" by the time "b" starts, so no one is eligible
        sim.schedule_vaccination_campaign(0, "b", 1.0, 0.0).unwrap();
        sim.run().unwrap();
        assert_eq!(sim.results().len(), 2);
        assert_eq!(
            sim.history("a").unwrap(),
            vec![(0, 1, 4), (0, 4, 0), (0, 0, 0)]
        );
        assert_eq!(
            sim.history("b").unwrap(),
            vec![(0, 1, 4), (0, 4, 0), (0, 0, 0)]
        );
    }

    #[test]
    fn cannot_run_twice() {
        let mut sim = fully_mixed(5, 10);
        sim.seed(Disease::influenza(), 1).unwrap();
        sim.run().unwrap();
        assert!(matches!(sim.run(), Err(SimError::Simulation { .. })));
    }
}
