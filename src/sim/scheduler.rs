//! Fixed timestep scheduler
//!
//! Turns variable display frames into whole fixed steps. Leftover time carries
//! over in the accumulator; the render call gets `accumulator / step` to
//! interpolate between the last two simulated states.
//!
//! If a frame would need `max_steps` or more steps (the simulation can't keep
//! up), the excess is dropped and the accumulator is set to exactly one step.

/// Receives fixed steps and per-frame render calls
pub trait Simulation {
    fn step(&mut self, h: f64);
    fn render(&mut self, alpha: f64);
}

/// A `(step, render)` pair of closures
impl<S, R> Simulation for (S, R)
where
    S: FnMut(f64),
    R: FnMut(f64),
{
    fn step(&mut self, h: f64) {
        (self.0)(h)
    }

    fn render(&mut self, alpha: f64) {
        (self.1)(alpha)
    }
}

/// What one driver tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub steps: u32,
    /// Step cap hit; excess time discarded
    pub panicked: bool,
    /// Interpolation factor passed to render
    pub alpha: f64,
}

impl FrameReport {
    fn suspended() -> Self {
        Self {
            steps: 0,
            panicked: false,
            alpha: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixedStepScheduler {
    step: f64,
    max_steps: u32,
    accumulator: f64,
    /// Last observed clock reading (seconds)
    last_time: Option<f64>,
    running: bool,
    paused: bool,
}

impl FixedStepScheduler {
    /// A step that isn't a positive finite number falls back to
    /// [`FIXED_TIMESTEP`](crate::consts::FIXED_TIMESTEP)
    pub fn new(step: f64, max_steps: u32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            log::warn!("Rejected step size {}, using the default", step);
            crate::consts::FIXED_TIMESTEP
        };
        Self {
            step,
            max_steps: max_steps.max(1),
            accumulator: 0.0,
            last_time: None,
            running: false,
            paused: false,
        }
    }

    pub fn from_tuning(tuning: &crate::tuning::Tuning) -> Self {
        Self::new(tuning.fixed_timestep, tuning.max_steps_per_frame)
    }

    /// Begin ticking from clock reading `now`
    pub fn start(&mut self, now: f64) {
        if self.running {
            return;
        }
        self.running = true;
        self.paused = false;
        self.last_time = Some(now);
        self.accumulator = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_time = None;
    }

    /// Freeze simulation; frames still render with alpha 0
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Unfreeze without charging the paused time to the accumulator
    pub fn resume(&mut self, now: f64) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.last_time = Some(now);
        self.accumulator = 0.0;
    }

    /// Driver tick with a clock reading in seconds. Does nothing while stopped.
    pub fn frame<S: Simulation + ?Sized>(&mut self, now: f64, sim: &mut S) -> Option<FrameReport> {
        if !self.running {
            return None;
        }
        let dt = self.last_time.map_or(0.0, |last| now - last);
        self.last_time = Some(now);
        Some(self.advance(dt, sim))
    }

    /// Driver tick with an explicit elapsed time in seconds
    pub fn advance<S: Simulation + ?Sized>(&mut self, dt: f64, sim: &mut S) -> FrameReport {
        if self.paused {
            sim.render(0.0);
            return FrameReport::suspended();
        }

        // Clocks that jump backwards (or report garbage) add nothing
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.accumulator += dt;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            sim.step(self.step);
            self.accumulator -= self.step;
            steps += 1;
        }

        let panicked = steps >= self.max_steps;
        if panicked {
            log::warn!(
                "Frame-drop panic: {} steps in one frame, discarding backlog",
                steps
            );
            self.accumulator = self.step;
        }

        let alpha = self.accumulator / self.step;
        sim.render(alpha);
        FrameReport {
            steps,
            panicked,
            alpha,
        }
    }

    #[inline]
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    #[inline]
    pub fn step_size(&self) -> f64 {
        self.step
    }

    #[inline]
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
