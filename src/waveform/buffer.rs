use std::collections::VecDeque;
use super::view::SamplePoint;
/// Time-ordered points of one channel with spacing-based admission.
pub struct SampleBuffer {
    data: VecDeque<SamplePoint>,
    min_spacing_secs: f64,
    last_accepted: Option<f64>,
}
impl SampleBuffer {
    pub fn new(min_spacing_secs: f64, capacity: usize) -> Self {
        Self {
            data: VecDeque::with_capacity(capacity),
            min_spacing_secs,
            last_accepted: None,
        }
    }
    pub fn set_min_spacing(&mut self, min_spacing_secs: f64) {
        self.min_spacing_secs = min_spacing_secs.max(0.0);
    }
    /// Append `sample` unless it is within the spacing floor of the last
    /// accepted point. Returns whether it was stored.
    pub fn push(&mut self, sample: SamplePoint) -> bool {
        if let Some(last) = self.last_accepted {
            if sample.time - last <= self.min_spacing_secs {
                return false;
            }
        }
        self.last_accepted = Some(sample.time);
        self.data.push_back(sample);
        true
    }
    /// Points with `time >= from`, oldest first.
    pub fn since(&self, from: f64) -> std::collections::vec_deque::Iter<'_, SamplePoint> {
        let start = self.data.partition_point(|p| p.time < from);
        self.data.range(start..)
    }
    /// Points that will never be yielded.
    pub fn none(&self) -> std::collections::vec_deque::Iter<'_, SamplePoint> {
        self.data.range(self.data.len()..)
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    pub fn clear(&mut self) {
        self.data.clear();
        self.last_accepted = None;
    }
    /// Once the oldest point is more than `slack` older than `cutoff`, drop
    /// everything before `cutoff` in one go.
    pub fn prune(&mut self, cutoff: f64, slack: f64) -> usize {
        match self.data.front() {
            Some(front) if front.time < cutoff - slack => {
                let stale = self.data.partition_point(|p| p.time < cutoff);
                self.data.drain(..stale);
                stale
            }
            _ => 0,
        }
    }
}
