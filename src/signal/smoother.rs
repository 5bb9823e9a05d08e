// Smoother - exponential moving average keyed to elapsed wall-clock time
//
// The mixing weight is derived from the measured delta between samples rather
// than a sample count, so the output settles the same way whether the poll loop
// runs every 8 ms or stutters to 40 ms.

/// Lower bound on the time delta between samples, in seconds
const MIN_DT_S: f64 = 1e-6;

/// Time-constant EMA for one pedal channel
#[derive(Debug, Clone)]
pub struct Smoother {
    time_constant_ms: f64,
    initialized: bool,
    last_value: f64,
    last_time: f64,
}

impl Smoother {
    /// Create a smoother with the given time constant in milliseconds
    ///
    /// A time constant of 0 (or below) disables filtering.
    pub fn new(time_constant_ms: f64) -> Self {
        Self {
            time_constant_ms,
            initialized: false,
            last_value: 0.0,
            last_time: 0.0,
        }
    }

    pub fn time_constant_ms(&self) -> f64 {
        self.time_constant_ms
    }

    /// Change the time constant without dropping the current state
    pub fn set_time_constant_ms(&mut self, time_constant_ms: f64) {
        self.time_constant_ms = time_constant_ms;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Force the next `step` to seed from its input (e.g. after a device change)
    pub fn reset(&mut self) {
        self.initialized = false;
        self.last_value = 0.0;
        self.last_time = 0.0;
    }

    /// Feed one sample taken at `now` (seconds on a monotonic clock)
    ///
    /// The first call after construction or `reset` returns `value` unchanged.
    /// A clock that steps backwards is tolerated by clamping the delta.
    pub fn step(&mut self, value: f64, now: f64) -> f64 {
        if !self.initialized {
            self.initialized = true;
            self.last_value = value;
            self.last_time = now;
            return value;
        }

        let dt = (now - self.last_time).max(MIN_DT_S);
        self.last_time = now;

        if self.time_constant_ms <= 0.0 {
            self.last_value = value;
            return value;
        }

        let alpha = (dt / (self.time_constant_ms / 1000.0)).min(1.0);
        self.last_value = alpha * value + (1.0 - alpha) * self.last_value;
        self.last_value
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(20.0)
    }
}
