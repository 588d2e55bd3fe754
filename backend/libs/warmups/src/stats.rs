use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("at least one value is required")]
    Empty,
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn max(values: &[f64]) -> Result<f64, StatsError> {
    values
        .iter()
        .copied()
        .reduce(f64::max)
        .ok_or(StatsError::Empty)
}

pub fn min(values: &[f64]) -> Result<f64, StatsError> {
    values
        .iter()
        .copied()
        .reduce(f64::min)
        .ok_or(StatsError::Empty)
}

pub fn average(values: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::Empty);
    }
    Ok(sum(values) / values.len() as f64)
}

/// Ascending copy of `values`. NaN sorts last.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// All statistics for one input.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub sum: f64,
    pub max: f64,
    pub min: f64,
    pub average: f64,
    pub sorted: Vec<f64>,
}

impl Summary {
    pub fn of(values: &[f64]) -> Result<Self, StatsError> {
        Ok(Self {
            sum: sum(values),
            max: max(values)?,
            min: min(values)?,
            average: average(values)?,
            sorted: sorted(values),
        })
    }
}
