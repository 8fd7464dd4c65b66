//! Pointer input bridge
//!
//! Converts raw pointer events into round transitions. Horizontal pointer
//! position drives the paddle; a press serves the ball.

use serde::{Deserialize, Serialize};

use super::physics::PhysicsAdapter;
use super::round::Round;
use crate::clamp_paddle_x;
use crate::error::RoundError;

/// Input commands, in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Press (click/tap): launch the ball
    Down,
    /// Pointer moved to this x position
    Move { x: f32 },
}

/// Launch the ball. Only meaningful while the round is idle.
pub fn on_pointer_down<P: PhysicsAdapter>(round: &mut Round<P>) -> Result<(), RoundError> {
    round.launch()
}

/// Follow the pointer horizontally, keeping the paddle inside the playfield
pub fn on_pointer_move<P: PhysicsAdapter>(round: &mut Round<P>, x: f32) -> Result<(), RoundError> {
    let phase = round.phase();
    if phase.is_ended() {
        return Err(RoundError::InvalidTransition {
            action: "move paddle",
            phase,
        });
    }

    let settings = round.settings();
    let x = clamp_paddle_x(x, settings.paddle_width, settings.playfield_width);
    round.place_paddle(x)
}

/// Apply one event, dropping whatever the round rejects
pub fn apply_event<P: PhysicsAdapter>(round: &mut Round<P>, event: &PointerEvent) {
    let result = match *event {
        PointerEvent::Down => on_pointer_down(round),
        PointerEvent::Move { x } if x.is_finite() => on_pointer_move(round, x),
        PointerEvent::Move { x } => {
            log::debug!("Ignoring pointer move to {}", x);
            return;
        }
    };

    if let Err(err) = result {
        // Repeated clicks mid-flight and input after the round ends land here
        log::debug!("Ignored {:?}: {}", event, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelLayout;
    use crate::sim::state::RoundPhase;
    use crate::settings::RoundSettings;
    use glam::Vec2;

    fn round() -> Round {
        Round::new(RoundSettings::default(), LevelLayout::grid(2, 1, Vec2::new(300.0, 100.0))).unwrap()
    }

    #[test]
    fn test_move_clamps_paddle_to_playfield() {
        let mut round = round();
        let half = round.settings().paddle_width / 2.0;

        on_pointer_move(&mut round, -500.0).unwrap();
        assert_eq!(round.paddle().x, half);

        on_pointer_move(&mut round, 5000.0).unwrap();
        assert_eq!(round.paddle().x, round.settings().playfield_width - half);

        on_pointer_move(&mut round, 321.0).unwrap();
        assert_eq!(round.paddle().x, 321.0);
    }

    #[test]
    fn test_attached_ball_moves_with_paddle() {
        let mut round = round();
        let y = round.ball().pos.y;
        on_pointer_move(&mut round, 200.0).unwrap();
        assert_eq!(round.ball().pos, Vec2::new(200.0, y));
        assert_eq!(round.physics().position(round.ball().body), Some(Vec2::new(200.0, y)));
    }

    #[test]
    fn test_free_ball_stays_put_when_paddle_moves() {
        let mut round = round();
        on_pointer_down(&mut round).unwrap();
        let before = round.ball().pos;
        on_pointer_move(&mut round, 100.0).unwrap();
        assert_eq!(round.ball().pos, before);
    }

    #[test]
    fn test_second_press_is_rejected() {
        let mut round = round();
        on_pointer_down(&mut round).unwrap();
        assert_eq!(round.phase(), RoundPhase::Launched);
        assert!(on_pointer_down(&mut round).is_err());

        // apply_event swallows the rejection
        apply_event(&mut round, &PointerEvent::Down);
        assert_eq!(round.phase(), RoundPhase::Launched);
    }

    #[test]
    fn test_non_finite_move_is_ignored() {
        let mut round = round();
        let x = round.paddle().x;
        apply_event(&mut round, &PointerEvent::Move { x: f32::NAN });
        assert_eq!(round.paddle().x, x);
    }
}
