use std::time::Duration;

/// Fixed-period interval driven by elapsed frame time.
///
/// Replaces a wall-clock repeating timer: the owner feeds it elapsed time and
/// gets back how many periods completed. A disarmed interval never fires.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    elapsed: Duration,
    armed: bool,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
            armed: false,
        }
    }

    /// Arm from zero. The first firing happens one full period later.
    pub fn arm(&mut self) {
        self.elapsed = Duration::ZERO;
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.elapsed = Duration::ZERO;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.armed || self.period.is_zero() {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }
}
