//! Presentation port
//!
//! The round records what changed during a step as [`RoundEvent`]s and hands
//! them to every registered [`RoundObserver`] once the step is done.
//! Observers never feed anything back into the simulation.

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use super::state::{BlockId, Outcome};

/// State changes a presentation layer may want to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    ScoreChanged(u64),
    LivesChanged(u32),
    BlockDestroyed(BlockId),
    RoundEnded { outcome: Outcome, final_score: u64 },
    /// Ball left the paddle
    BallLaunched,
    /// Ball re-attached to the paddle after a lost life
    BallReset,
}

/// Outbound notifications. Every method defaults to a no-op.
pub trait RoundObserver {
    fn on_score_changed(&mut self, _score: u64) {}

    fn on_lives_changed(&mut self, _lives: u32) {}

    fn on_block_destroyed(&mut self, _block: BlockId) {}

    fn on_round_ended(&mut self, _outcome: Outcome, _final_score: u64) {}

    fn on_ball_launched(&mut self) {}

    fn on_ball_reset(&mut self) {}

    /// Route an event to the matching callback
    fn notify(&mut self, event: &RoundEvent) {
        match *event {
            RoundEvent::ScoreChanged(score) => self.on_score_changed(score),
            RoundEvent::LivesChanged(lives) => self.on_lives_changed(lives),
            RoundEvent::BlockDestroyed(block) => self.on_block_destroyed(block),
            RoundEvent::RoundEnded {
                outcome,
                final_score,
            } => self.on_round_ended(outcome, final_score),
            RoundEvent::BallLaunched => self.on_ball_launched(),
            RoundEvent::BallReset => self.on_ball_reset(),
        }
    }
}

/// Forwards every event to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RoundObserver for LogObserver {
    fn on_score_changed(&mut self, score: u64) {
        log::info!("Score: {}", score);
    }

    fn on_lives_changed(&mut self, lives: u32) {
        log::info!("Lives: {}", lives);
    }

    fn on_block_destroyed(&mut self, block: BlockId) {
        log::debug!("Block {} destroyed", block);
    }

    fn on_round_ended(&mut self, outcome: Outcome, final_score: u64) {
        log::info!("{} (score {})", outcome.title(), final_score);
    }

    fn on_ball_launched(&mut self) {
        log::debug!("Ball launched");
    }

    fn on_ball_reset(&mut self) {
        log::debug!("Ball back on paddle");
    }
}

/// Channel sink, for hosts that render on another thread
impl RoundObserver for Sender<RoundEvent> {
    fn notify(&mut self, event: &RoundEvent) {
        // A dropped receiver just means nobody is watching any more
        let _ = self.send(*event);
    }
}
