use std::time::Instant;

/// Monotonic time source for the tick loop, in milliseconds since it started.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        MonotonicClock { origin: Instant::now() }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to.
#[cfg(test)]
pub struct ManualClock {
    now_ms: std::cell::Cell<f64>,
}

#[cfg(test)]
impl ManualClock {
    pub fn at(now_ms: f64) -> Self {
        ManualClock { now_ms: std::cell::Cell::new(now_ms) }
    }

    pub fn advance(&self, ms: f64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}
