//! One-rep-max estimation and load calculations.
//!
//! Estimates are derived from submaximal sets using the usual closed-form
//! formulas and rounded to the nearest plate increment (2.5).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default rounding increment for barbell loads.
pub const PLATE_INCREMENT: f64 = 2.5;

/// Brzycki's divisor goes to zero at 37 reps; clamp instead of erroring.
const BRZYCKI_MAX_REPS: i32 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formula {
    #[default]
    Epley,
    Brzycki,
    Lombardi,
}

impl Formula {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formula::Epley => "epley",
            Formula::Brzycki => "brzycki",
            Formula::Lombardi => "lombardi",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "epley" => Some(Formula::Epley),
            "brzycki" => Some(Formula::Brzycki),
            "lombardi" => Some(Formula::Lombardi),
            _ => None,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum StrengthError {
    #[error("Reps must be at least 1")]
    InvalidReps,

    #[error("Weight must be non-negative")]
    InvalidWeight,

    #[error("Percentage must be in the range 1 to 100")]
    InvalidPercentage,

    #[error("Rounding increment must be positive")]
    InvalidRounding,
}

/// Round to the nearest multiple of `step`.
pub fn round_to_nearest(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Estimate a one-rep max from a submaximal set.
///
/// A single rep is already a max attempt and is returned unrounded.
pub fn estimate_one_rep_max(
    weight: f64,
    reps: i32,
    formula: Formula,
) -> Result<f64, StrengthError> {
    if reps < 1 {
        return Err(StrengthError::InvalidReps);
    }
    if weight < 0.0 {
        return Err(StrengthError::InvalidWeight);
    }
    if reps == 1 {
        return Ok(weight);
    }

    let estimate = match formula {
        Formula::Epley => weight * (1.0 + reps as f64 / 30.0),
        Formula::Brzycki => {
            let reps = reps.min(BRZYCKI_MAX_REPS);
            weight * 36.0 / (37.0 - reps as f64)
        }
        Formula::Lombardi => weight * (reps as f64).powf(0.10),
    };

    Ok(round_to_nearest(estimate, PLATE_INCREMENT))
}

/// Working weight for a percentage of a known one-rep max.
pub fn weight_from_percentage(
    percentage: f64,
    one_rep_max: f64,
    round_to: f64,
) -> Result<f64, StrengthError> {
    if !(1.0..=100.0).contains(&percentage) {
        return Err(StrengthError::InvalidPercentage);
    }
    if one_rep_max < 0.0 {
        return Err(StrengthError::InvalidWeight);
    }
    if round_to <= 0.0 {
        return Err(StrengthError::InvalidRounding);
    }

    Ok(round_to_nearest(one_rep_max * percentage / 100.0, round_to))
}

/// Percentage table from 95% down to 50% in steps of 5.
pub fn percentage_table(one_rep_max: f64) -> Vec<(u32, f64)> {
    (0u32..10)
        .map(|i| {
            let pct = 95 - i * 5;
            let weight = round_to_nearest(
                one_rep_max * f64::from(pct) / 100.0,
                PLATE_INCREMENT,
            );
            (pct, weight)
        })
        .collect()
}
