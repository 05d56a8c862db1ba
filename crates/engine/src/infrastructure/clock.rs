//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Replays a fixed list of rolls, wrapping around at the end.
#[cfg(test)]
pub struct SequenceRandom {
    values: Vec<i32>,
    next: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(values: impl Into<Vec<i32>>) -> Self {
        Self {
            values: values.into(),
            next: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

#[cfg(test)]
impl RandomPort for SequenceRandom {
    fn gen_range(&self, min: i32, _max: i32) -> i32 {
        if self.values.is_empty() {
            return min;
        }
        let index = self.next.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.values[index % self.values.len()]
    }
}
