use ndarray::prelude::*;
use std::cmp::Ordering;
use std::fmt;

/// A point in n-dimensional space together with the value of the
/// objective function at that point. Immutable once constructed;
/// solutions are ordered by value (lower is better).
#[derive(Debug, Clone)]
pub struct EvaluatedSolution {
    point: Array1<f64>,
    value: f64,
}

impl EvaluatedSolution {
    pub fn new(point: Array1<f64>, value: f64) -> Self {
        EvaluatedSolution { point, value }
    }

    pub fn point(&self) -> &Array1<f64> {
        &self.point
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl PartialEq for EvaluatedSolution {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialOrd for EvaluatedSolution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl fmt::Display for EvaluatedSolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.point, self.value)
    }
}
