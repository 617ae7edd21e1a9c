//! Frame time tracking
//!
//! Keeps a rolling window of recent frame durations for the metrics readout.

use std::collections::VecDeque;

/// Rolling window of frame durations in milliseconds, oldest first
#[derive(Debug, Clone)]
pub struct FrameTimes {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl FrameTimes {
    /// Create an empty window holding at most `capacity` samples
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record one frame, evicting the oldest sample when full
    pub fn push(&mut self, millis: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(millis);
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

    pub fn last(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Mean over the window
    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    /// Frames per second implied by the average frame time
    pub fn fps(&self) -> Option<f64> {
        self.average().filter(|&avg| avg > 0.0).map(|avg| 1000.0 / avg)
    }

    /// Samples oldest to newest (e.g. for a frame time graph)
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

impl Default for FrameTimes {
    fn default() -> Self {
        Self::new(crate::RenderSettings::default().side_panel_width)
    }
}
