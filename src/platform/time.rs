//! Clocks and frame statistics
//!
//! All readings are in seconds. The scheduler only ever sees differences
//! between readings, so the origin is arbitrary.

/// Monotonic timestamp source
pub trait Clock {
    fn now(&self) -> f64;
}

/// Clock advanced by hand; drives headless runs and tests
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self { now: start }
    }

    /// Move time forward by `dt` seconds; negative values are ignored
    pub fn advance(&mut self, dt: f64) -> f64 {
        self.now += dt.max(0.0);
        self.now
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now
    }
}

/// Wall clock backed by `std::time::Instant`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// `performance.now()`, converted from milliseconds
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

#[cfg(target_arch = "wasm32")]
impl PerformanceClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|w| w.performance()),
        }
    }

    /// Convert a requestAnimationFrame timestamp (ms) to clock seconds
    pub fn from_millis(ms: f64) -> f64 {
        ms / 1000.0
    }
}

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now(&self) -> f64 {
        match &self.performance {
            Some(p) => p.now() / 1000.0,
            None => js_sys::Date::now() / 1000.0,
        }
    }
}

/// Frames per second over a sliding window of frame timestamps
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; 60],
    frame_index: usize,
    frames_seen: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; 60],
            frame_index: 0,
            frames_seen: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame at `now` seconds and return the current estimate
    pub fn record(&mut self, now: f64) -> u32 {
        let window = self.frame_times.len();
        self.frame_times[self.frame_index] = now;
        self.frame_index = (self.frame_index + 1) % window;
        self.frames_seen = (self.frames_seen + 1).min(window);

        if self.frames_seen < 2 {
            return self.fps;
        }

        // Oldest sample still in the window
        let oldest = if self.frames_seen < window {
            self.frame_times[0]
        } else {
            self.frame_times[self.frame_index]
        };
        let elapsed = now - oldest;
        if elapsed > 0.0 {
            self.fps = ((self.frames_seen - 1) as f64 / elapsed).round() as u32;
        }
        self.fps
    }

    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }
}
