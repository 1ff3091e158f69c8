//! Daily aggregation of logged sets for progress charts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::strength::{estimate_one_rep_max, Formula};

/// A set row joined with its workout date, as fetched for one exercise.
#[derive(Debug, Clone)]
pub struct SetSample {
    pub date: NaiveDate,
    pub reps: i32,
    pub weight: f64,
}

/// One chart point: all sets of an exercise on a single day, reduced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub max_weight: f64,
    pub total_volume: f64,
    pub max_reps: i32,
    pub best_one_rep_max: f64,
}

/// Group set samples by date (ascending) and reduce each day to its
/// max weight, total volume, max reps and best estimated one-rep max.
pub fn aggregate_daily(samples: &[SetSample]) -> Vec<DailyProgress> {
    let mut days: BTreeMap<NaiveDate, Vec<&SetSample>> = BTreeMap::new();
    for sample in samples {
        days.entry(sample.date).or_default().push(sample);
    }

    days.into_iter()
        .map(|(date, sets)| {
            let max_weight = sets.iter().map(|s| s.weight).fold(0.0, f64::max);
            let total_volume = sets.iter().map(|s| s.weight * f64::from(s.reps)).sum();
            let max_reps = sets.iter().map(|s| s.reps).max().unwrap_or(0);
            let best_one_rep_max = sets
                .iter()
                .filter_map(|s| estimate_one_rep_max(s.weight, s.reps, Formula::Epley).ok())
                .fold(0.0, f64::max);

            DailyProgress {
                date,
                max_weight,
                total_volume,
                max_reps,
                best_one_rep_max,
            }
        })
        .collect()
}
