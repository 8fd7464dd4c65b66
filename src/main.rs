//! Breakout Core headless demo
//!
//! Plays one round with an autopilot paddle and logs every state change.
//!
//! Usage: `breakout-core [settings.json] [level.json]`
//! Set `RUST_LOG=debug` to see individual block hits.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::fs;

    use glam::Vec2;

    use breakout_core::consts::{MAX_SUBSTEPS, SIM_DT};
    use breakout_core::sim::{FixedTimestep, LogObserver, PointerEvent, Round, RoundEvent, RoundPhase};
    use breakout_core::{ConfigError, LevelLayout, RoundSettings};

    /// Simulated display refresh rate
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    /// Demo instance: the round plus its frame driver
    pub struct Demo {
        round: Round,
        driver: FixedTimestep,
        frame: u64,
        blocks_destroyed: u32,
    }

    impl Demo {
        pub fn new(settings: RoundSettings, layout: LevelLayout) -> Result<Self, ConfigError> {
            let mut round = Round::new(settings, layout)?;
            round.add_observer(Box::new(LogObserver));
            Ok(Self {
                round,
                driver: FixedTimestep::new(SIM_DT, MAX_SUBSTEPS),
                frame: 0,
                blocks_destroyed: 0,
            })
        }

        /// Autopilot: track the ball with a slowly drifting offset so
        /// bounces off the paddle vary, and serve whenever the ball is parked
        fn autopilot(&mut self) {
            if self.round.phase() == RoundPhase::Idle {
                self.driver.queue(PointerEvent::Down);
                return;
            }

            let drift = (self.frame as f32 * 0.05).sin() * self.round.paddle().width * 0.35;
            self.driver.queue(PointerEvent::Move {
                x: self.round.ball().pos.x + drift,
            });
        }

        /// Run one display frame
        fn update(&mut self) {
            self.autopilot();
            for event in self.driver.advance(&mut self.round, FRAME_DT) {
                if let RoundEvent::BlockDestroyed(_) = event {
                    self.blocks_destroyed += 1;
                }
            }
            self.frame += 1;
        }

        pub fn run(&mut self) {
            while !self.round.phase().is_ended() && self.frame < MAX_FRAMES {
                self.update();
            }

            let seconds = self.frame as f32 * FRAME_DT;
            match self.round.phase() {
                RoundPhase::Ended {
                    outcome,
                    final_score,
                } => log::info!(
                    "{}: score {}, {} blocks destroyed in {:.1}s",
                    outcome.title(),
                    final_score,
                    self.blocks_destroyed,
                    seconds
                ),
                _ => log::warn!(
                    "Stopped after {:.1}s with {} blocks left",
                    seconds,
                    self.round.remaining_blocks()
                ),
            }
        }
    }

    fn load_settings(path: Option<&String>) -> Result<RoundSettings, ConfigError> {
        match path {
            Some(path) => match fs::read_to_string(path) {
                Ok(json) => RoundSettings::from_json(&json),
                Err(e) => Err(ConfigError::InvalidValue {
                    field: "settings",
                    message: format!("could not read {}: {}", path, e),
                }),
            },
            None => Ok(RoundSettings::default()),
        }
    }

    fn load_layout(path: Option<&String>) -> Result<LevelLayout, ConfigError> {
        match path {
            Some(path) => match fs::read_to_string(path) {
                Ok(json) => LevelLayout::from_json(&json),
                Err(e) => Err(ConfigError::InvalidValue {
                    field: "level",
                    message: format!("could not read {}: {}", path, e),
                }),
            },
            // 10x4 grid centred horizontally in the default playfield
            None => Ok(LevelLayout::grid(10, 4, Vec2::new(80.0, 64.0))),
        }
    }

    pub fn main() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        log::info!("Breakout Core demo starting...");

        let args: Vec<String> = std::env::args().skip(1).collect();
        let demo = load_settings(args.first())
            .and_then(|settings| load_layout(args.get(1)).map(|layout| (settings, layout)))
            .and_then(|(settings, layout)| Demo::new(settings, layout));

        match demo {
            Ok(mut demo) => demo.run(),
            Err(e) => {
                log::error!("Failed to build round: {}", e);
                std::process::exit(1);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::main();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is embedded by the caller
}
