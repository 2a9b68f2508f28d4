use web_time::Instant;

/// Wall clock for the frame loop, in milliseconds.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the timer was created.
    pub fn millis(&self) -> f32 {
        (self.start.elapsed().as_secs_f64() * 1000.0) as f32
    }
}

/// Simulation time increment between two updates.
#[derive(Debug, Clone, Copy)]
pub struct TimeStep {
    last_time: f32,
    elapsed_ms: f32,
}

impl TimeStep {
    pub fn new(start_ms: f32) -> Self {
        Self {
            last_time: start_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Advances to `now_ms`, fixing the elapsed delta for this tick.
    pub fn update(&mut self, now_ms: f32) {
        self.elapsed_ms = now_ms - self.last_time;
        self.last_time = now_ms;
    }

    pub fn millis(&self) -> f32 {
        self.elapsed_ms
    }

    pub fn seconds(&self) -> f32 {
        self.elapsed_ms / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_tracks_the_delta() {
        let mut ts = TimeStep::new(100.0);
        ts.update(116.0);
        assert_eq!(ts.millis(), 16.0);
        assert!((ts.seconds() - 0.016).abs() < 1e-6);

        ts.update(120.0);
        assert_eq!(ts.millis(), 4.0);
    }

    #[test]
    fn timer_is_monotonic() {
        let timer = Timer::new();
        let a = timer.millis();
        let b = timer.millis();
        assert!(b >= a);
    }
}
