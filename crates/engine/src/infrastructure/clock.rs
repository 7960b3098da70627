//! Clock and random implementations.

use crate::infrastructure::ports::{ClockPort, RandomPort};
use chrono::{DateTime, Utc};
use uuid::Uuid;

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

    fn gen_unit(&self) -> f64 {
        use rand::Rng;
        rand::thread_rng().gen::<f64>()
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
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

/// Scripted random for testing.
///
/// Integer rolls and unit draws are replayed in order; the last value repeats
/// once a sequence runs out. UUIDs are fresh v4 values.
#[cfg(test)]
pub struct SequenceRandom {
    rolls: std::sync::Mutex<std::collections::VecDeque<i32>>,
    draws: std::sync::Mutex<std::collections::VecDeque<f64>>,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(rolls: impl IntoIterator<Item = i32>, draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: std::sync::Mutex::new(rolls.into_iter().collect()),
            draws: std::sync::Mutex::new(draws.into_iter().collect()),
        }
    }

    fn next<T: Copy>(queue: &std::sync::Mutex<std::collections::VecDeque<T>>, fallback: T) -> T {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap_or(fallback)
        } else {
            queue.front().copied().unwrap_or(fallback)
        }
    }
}

#[cfg(test)]
impl RandomPort for SequenceRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        Self::next(&self.rolls, min).clamp(min, max)
    }

    fn gen_unit(&self) -> f64 {
        Self::next(&self.draws, 0.0)
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}
