//! Fixed-window moving average

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Bounded sample window with an incrementally maintained sum.
///
/// `add` and `mean` are O(1): the sum gains the new sample and loses the
/// evicted one, and is never re-summed from the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingAverage {
    samples: VecDeque<f64>,
    sum: f64,
    capacity: usize,
}

impl RollingAverage {
    /// Create a window holding at most `capacity` samples (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            sum: 0.0,
            capacity,
        }
    }

    /// Push a sample and return the current mean.
    ///
    /// Non-finite samples are ignored so the sum can never become NaN.
    pub fn add(&mut self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.mean();
        }
        self.samples.push_back(value);
        self.sum += value;
        while self.samples.len() > self.capacity {
            if let Some(oldest) = self.samples.pop_front() {
                self.sum -= oldest;
            }
        }
        self.mean()
    }

    /// Mean of the held samples, 0 when empty
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.sum / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn min(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::min)
    }

    pub fn max(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.sum = 0.0;
    }
}
