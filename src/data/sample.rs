//! Synthetic sales table for offline use.
//!
//! Shape follows the published dataset: one row per month, a single vehicle
//! type per row, and recession flags on the historical US recession years.
//! Output is fully determined by the seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Dataset, MONTHS, Record, YEAR_MAX, YEAR_MIN};
use crate::error::AppError;

pub const VEHICLE_TYPES: [&str; 5] = [
    "Supperminicar",
    "Smallfamiliycar",
    "Mediumfamilycar",
    "Executivecar",
    "Sports",
];

const RECESSION_YEARS: [i32; 10] = [1980, 1981, 1982, 1991, 2000, 2001, 2007, 2008, 2009, 2020];

/// Relative sales level per vehicle type (same order as `VEHICLE_TYPES`).
const TYPE_FACTOR: [f64; 5] = [0.9, 1.0, 1.1, 0.7, 0.5];

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub seed: u64,
    pub year_min: i32,
    pub year_max: i32,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            year_min: YEAR_MIN,
            year_max: YEAR_MAX,
        }
    }
}

pub fn is_recession_year(year: i32) -> bool {
    RECESSION_YEARS.contains(&year)
}

pub fn generate_dataset(config: &SampleConfig) -> Result<Dataset, AppError> {
    if config.year_min < YEAR_MIN || config.year_max > YEAR_MAX || config.year_min > config.year_max {
        return Err(AppError::new(
            2,
            format!(
                "Invalid sample year range {}..={} (must lie within {YEAR_MIN}..={YEAR_MAX}).",
                config.year_min, config.year_max
            ),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut records = Vec::with_capacity(((config.year_max - config.year_min + 1) * 12) as usize);
    for year in config.year_min..=config.year_max {
        let recession = is_recession_year(year);
        // Slow upward trend across the whole range.
        let trend = 1.0 + 0.01 * f64::from(year - YEAR_MIN);

        for (m, month) in MONTHS.iter().enumerate() {
            let type_idx = rng.gen_range(0..VEHICLE_TYPES.len());
            let seasonal = 1.0 + 0.15 * ((m as f64) / 12.0 * std::f64::consts::TAU).sin();

            let base_unemployment: f64 = if recession { 7.5 } else { 4.8 };
            let unemployment = (base_unemployment + 0.8 * noise.sample(&mut rng)).clamp(1.0, 15.0);

            let demand = if recession { 0.55 } else { 1.0 };
            let sales = 3000.0 * trend * demand * seasonal * TYPE_FACTOR[type_idx] * (1.0 + 0.08 * noise.sample(&mut rng));

            let ad_level = if recession { 1800.0 } else { 3000.0 };
            let advertising = ad_level * (1.0 + 0.2 * noise.sample(&mut rng));

            records.push(Record {
                year,
                month: *month,
                vehicle_type: VEHICLE_TYPES[type_idx].to_string(),
                automobile_sales: round_to(sales.max(0.0), 2),
                advertising_expenditure: round_to(advertising.max(0.0), 2),
                unemployment_rate: round_to(unemployment, 1),
                recession,
            });
        }
    }

    let source = format!("synthetic sample (seed {})", config.seed);
    Dataset::from_records(records, source)
        .ok_or_else(|| AppError::new(3, "Synthetic sample produced no rows."))
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}
