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

use num_format::Locale;

/// The horizon used when a configuration does not specify one
pub const DEFAULT_MAX_DAYS: u32 = 500;

/// How often (in days) progress of the day loop is logged at info level
pub const DEBUG_ITERATION_PRINT: u32 = 25;

pub const DEFAULT_OUTPUT_DIRECTORY: &str = "simulator_output/";

pub const RESULTS_JSON_FILENAME: &str = "results.json";

pub const RESULTS_CSV_FILENAME: &str = "results.csv";

pub const NUMBER_FORMATTING: Locale = Locale::en;
