//! Round invariants under random play

mod common;

use std::collections::HashMap;

use proptest::prelude::*;

use breakout_core::consts::SIM_DT;
use breakout_core::sim::{BlockId, ContactPair, Outcome, PhysicsAdapter, PointerEvent, RoundEvent, RoundPhase};

use common::{ball_hits, drop_ball, scripted_round};

#[derive(Debug, Clone)]
enum Op {
    Launch,
    /// Ball touches block `n % blocks` (may already be gone)
    HitBlock(u32),
    /// Two blocks reported in the same step
    HitTwo(u32, u32),
    FallOut,
    MovePaddle(f32),
    Step,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Launch),
        4 => any::<u32>().prop_map(Op::HitBlock),
        1 => (any::<u32>(), any::<u32>()).prop_map(|(a, b)| Op::HitTwo(a, b)),
        1 => Just(Op::FallOut),
        2 => (-200.0f32..1000.0).prop_map(Op::MovePaddle),
        2 => Just(Op::Step),
    ]
}

fn block_id(n: u32, blocks: u32) -> BlockId {
    BlockId(n % blocks + 1)
}

proptest! {
    #[test]
    fn test_round_invariants_hold(blocks in 1u32..8, ops in prop::collection::vec(op(), 1..60)) {
        let mut round = scripted_round(blocks);
        // Bodies never change without a restart, so contacts for destroyed
        // blocks keep pointing at their old (removed) bodies
        let contacts: HashMap<BlockId, ContactPair> = (1..=blocks)
            .map(|id| (BlockId(id), ball_hits(&round, BlockId(id))))
            .collect();

        let mut destroyed = 0u64;
        let mut last_score = 0u64;
        let mut last_lives = round.lives();

        for op in ops {
            let events = match op {
                Op::Launch => round.step(SIM_DT, &[PointerEvent::Down]),
                Op::HitBlock(n) => {
                    round.physics_mut().script(vec![contacts[&block_id(n, blocks)]]);
                    round.step(SIM_DT, &[])
                }
                Op::HitTwo(a, b) => {
                    let pairs = vec![contacts[&block_id(a, blocks)], contacts[&block_id(b, blocks)]];
                    round.physics_mut().script(pairs);
                    round.step(SIM_DT, &[])
                }
                Op::FallOut => {
                    if round.phase() == RoundPhase::Launched {
                        drop_ball(&mut round);
                    }
                    round.step(SIM_DT, &[])
                }
                Op::MovePaddle(x) => round.step(SIM_DT, &[PointerEvent::Move { x }]),
                Op::Step => round.step(SIM_DT, &[]),
            };

            destroyed += events
                .iter()
                .filter(|e| matches!(e, RoundEvent::BlockDestroyed(_)))
                .count() as u64;

            // Score is exactly the number of blocks destroyed, and only grows
            prop_assert_eq!(round.score(), destroyed);
            prop_assert!(round.score() >= last_score);
            prop_assert!(round.lives() <= last_lives);
            last_score = round.score();
            last_lives = round.lives();

            prop_assert_eq!(round.remaining_blocks() as u64, blocks as u64 - destroyed);
            if round.remaining_blocks() == 0 {
                prop_assert_eq!(round.phase().outcome(), Some(Outcome::Won));
            }
            if round.lives() == 0 {
                prop_assert_eq!(round.phase().outcome(), Some(Outcome::Lost));
            }

            // Registry and engine agree: 3 walls, paddle, ball plus live blocks
            prop_assert_eq!(round.physics().body_count(), round.remaining_blocks() + 5);

            // Paddle never leaves the playfield
            let half = round.paddle().width / 2.0;
            prop_assert!(round.paddle().x >= half);
            prop_assert!(round.paddle().x <= round.settings().playfield_width - half);

            match round.phase() {
                RoundPhase::Idle => {
                    prop_assert!(round.ball().is_attached());
                    prop_assert_eq!(round.paddle().attached_ball, Some(round.ball().body));
                }
                RoundPhase::Launched => {
                    prop_assert!(!round.ball().is_attached());
                    prop_assert_eq!(round.paddle().attached_ball, None);
                }
                RoundPhase::Ended { final_score, .. } => {
                    prop_assert_eq!(final_score, round.score());
                }
            }
        }
    }
}
