//! Fixed timestep driver
//!
//! Converts variable frame times into whole simulation steps so a round
//! advances identically regardless of frame rate.

use super::events::RoundEvent;
use super::input::PointerEvent;
use super::physics::PhysicsAdapter;
use super::round::Round;

/// Longest frame accepted; anything slower (tab switch, debugger) is clamped
pub const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    max_substeps: u32,
    accumulator: f32,
    /// Input gathered since the last step
    queued: Vec<PointerEvent>,
}

impl FixedTimestep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            queued: Vec::new(),
        }
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Leftover time not yet simulated
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Hold an input event until the next step
    pub fn queue(&mut self, event: PointerEvent) {
        self.queued.push(event);
    }

    pub fn queued(&self) -> &[PointerEvent] {
        &self.queued
    }

    /// Forget accumulated time (e.g. after a restart)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.queued.clear();
    }

    /// Run as many fixed steps as `frame_dt` covers, up to the substep cap
    ///
    /// Queued input is applied on the first step only. If the frame is too
    /// short for any step, the input stays queued for the next frame.
    pub fn advance<P: PhysicsAdapter>(&mut self, round: &mut Round<P>, frame_dt: f32) -> Vec<RoundEvent> {
        // A NaN frame would poison the accumulator for good
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            log::warn!("Ignoring frame time {}", frame_dt);
            0.0
        };
        self.accumulator += frame_dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            let input = std::mem::take(&mut self.queued);
            events.extend(round.step(self.dt, &input));
            self.accumulator -= self.dt;
            substeps += 1;
        }

        events
    }
}
