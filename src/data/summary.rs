use std::fmt;

use super::model::{PenguinDataset, PenguinRecord};

/// Shown in place of a number when a mean has no contributing values.
pub const EMPTY_PLACEHOLDER: &str = "—";

/// Mean of one measurement over a filtered view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeanSummary {
    /// At least one record contributed a value.
    Value { mean: f64, n: usize },
    /// No record in the view carried the measurement.
    Empty,
}

impl MeanSummary {
    pub fn value(&self) -> Option<f64> {
        match self {
            MeanSummary::Value { mean, .. } => Some(*mean),
            MeanSummary::Empty => None,
        }
    }

    /// Render with one decimal place and a unit suffix, e.g. `43.9 mm`.
    pub fn display_with_unit(&self, unit: &str) -> String {
        format!("{self} {unit}")
    }
}

impl fmt::Display for MeanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeanSummary::Value { mean, .. } => write!(f, "{mean:.1}"),
            MeanSummary::Empty => f.write_str(EMPTY_PLACEHOLDER),
        }
    }
}

/// Arithmetic mean of `measure` over the view, skipping missing values.
pub fn mean_of<F>(dataset: &PenguinDataset, view: &[usize], measure: F) -> MeanSummary
where
    F: Fn(&PenguinRecord) -> Option<f64>,
{
    let (sum, n) = view
        .iter()
        .filter_map(|&i| dataset.records.get(i).and_then(&measure))
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    if n == 0 {
        MeanSummary::Empty
    } else {
        MeanSummary::Value {
            mean: sum / n as f64,
            n,
        }
    }
}

pub fn mean_bill_length(dataset: &PenguinDataset, view: &[usize]) -> MeanSummary {
    mean_of(dataset, view, |r| r.bill_length_mm)
}

pub fn mean_bill_depth(dataset: &PenguinDataset, view: &[usize]) -> MeanSummary {
    mean_of(dataset, view, |r| r.bill_depth_mm)
}
