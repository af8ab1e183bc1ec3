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

use std::path::Path;

use log::info;
use plotters::prelude::{
    ChartBuilder, Color, IntoDrawingArea, IntoFont, LineSeries, PathElement, SVGBackend, BLACK,
    BLUE, GREEN, RED, WHITE,
};
use plotters::style::RGBColor;

use sim::statistics::StatisticEntry;

use crate::error::{DrawingError, DrawingResult};

const IMAGE_SIZE: (u32, u32) = (1024, 768);

/// The curves drawn for each disease, with their colour
static CURVES: [(&str, RGBColor, fn(&StatisticEntry) -> u32); 3] = [
    ("Exposed", RED, StatisticEntry::exposed),
    ("Infectious", BLUE, StatisticEntry::infectious),
    ("Susceptible", GREEN, StatisticEntry::susceptible),
];

/// Draws the exposed, infectious and susceptible counts of a disease against the day
///
/// The y axis is bounded by the population size
pub fn draw_disease_curves<P: AsRef<Path>>(
    filename: P,
    disease_name: &str,
    entries: &[StatisticEntry],
    population_size: u32,
) -> DrawingResult<()> {
    if entries.is_empty() {
        return Err(DrawingError::Default {
            message: format!("No days were recorded for {}", disease_name),
        });
    }
    let filename = filename.as_ref();
    let days = entries.len() as u32;
    let root = SVGBackend::new(filename, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(disease_name, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..days, 0..population_size.max(1))?;
    chart
        .configure_mesh()
        .x_desc("Days")
        .y_desc("N")
        .draw()?;

    for (label, colour, count) in CURVES.iter() {
        chart
            .draw_series(LineSeries::new(
                entries.iter().map(|entry| (entry.time_step(), count(entry))),
                colour,
            ))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));
    }
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    info!("Drew {} to {:?}", disease_name, filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use sim::disease::Disease;
    use sim::models::agent::Agent;
    use sim::models::contact_matrix::ContactMatrix;
    use sim::simulator::Simulator;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::image_export::draw_disease_curves;

    #[test]
    fn empty_results_are_rejected() {
        let directory = tempfile::tempdir().unwrap();
        assert!(draw_disease_curves(directory.path().join("flu.svg"), "flu", &[], 10).is_err());
    }

    #[test]
    fn draws_a_finished_run() {
        let mut sim = Simulator::new(
            20,
            ContactMatrix::uniform(1.0).unwrap(),
            StdRng::seed_from_u64(1),
        );
        for _ in 0..5 {
            sim.join(Agent::new(0, 1.0, 0.0).unwrap()).unwrap();
        }
        sim.seed(Disease::new("flu", 1.0, 1, 2, 1.0, 0).unwrap(), 1)
            .unwrap();
        sim.run().unwrap();

        let directory = tempfile::tempdir().unwrap();
        let filename = directory.path().join("flu.svg");
        let entries = &sim.results()["flu"];
        draw_disease_curves(&filename, "flu", entries, sim.population_size() as u32).unwrap();
        let contents = std::fs::read_to_string(&filename).unwrap();
        assert!(contents.contains("<svg"));
    }
}
