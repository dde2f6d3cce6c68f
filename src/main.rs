//! Brickfall entry point
//!
//! On the web the library's `wasm_start` sets up logging and the page drives
//! `WebGame`. Natively there is no window; the binary plays a headless
//! demo run with a paddle that follows the ball and logs the outcome.
//!
//! Usage: `brickfall [seed] [max_ticks]`. Set `BRICKFALL_PROGRESS` to a file
//! path to persist unlocked levels between runs.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use brickfall::audio::NullAudio;
    use brickfall::persistence::{JsonFileStore, MemoryStore, ProgressStore};
    use brickfall::sim::{GameEvent, GameSession, TickInput};
    use brickfall::Game;

    const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 10;

    /// Pointer target: the lowest ball still falling, else the first ball
    fn autoplay_target(session: &GameSession) -> Option<f32> {
        session
            .balls
            .iter()
            .filter(|b| b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .or_else(|| session.balls.first())
            .map(|b| b.pos.x)
    }

    fn parse_arg<T: std::str::FromStr>(arg: Option<String>, name: &str) -> Option<T> {
        let raw = arg?;
        match raw.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                log::warn!("Ignoring invalid {} argument: {:?}", name, raw);
                None
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = parse_arg(args.next(), "seed").unwrap_or_else(rand::random::<u64>);
        let max_ticks = parse_arg(args.next(), "max_ticks").unwrap_or(DEFAULT_MAX_TICKS);

        let store: Box<dyn ProgressStore> = match std::env::var("BRICKFALL_PROGRESS") {
            Ok(path) => {
                log::info!("Progress file: {}", path);
                Box::new(JsonFileStore::new(path))
            }
            Err(_) => Box::new(MemoryStore::new()),
        };

        let mut game = Game::new(800.0, 600.0, seed, store, Box::new(NullAudio));
        log::info!("Game initialized with seed: {}", seed);

        game.subscribe(|event: &GameEvent| match event {
            GameEvent::LevelComplete { cleared, next } => {
                log::info!("Level {} cleared, entering level {}", cleared, next)
            }
            GameEvent::LifeChanged(lives) => log::info!("Lives: {}", lives),
            GameEvent::Win => log::info!("All levels cleared!"),
            GameEvent::GameOver => log::info!("Game over"),
            _ => {}
        });

        game.start();
        let mut ticks = 0;
        while game.is_running() && ticks < max_ticks {
            let input = TickInput {
                pointer_x: autoplay_target(game.session()),
                ..TickInput::default()
            };
            game.step(&input);
            ticks += 1;
        }

        let hud = game.hud();
        log::info!(
            "Finished after {} ticks in phase {:?}: level {}, score {}, lives {}, {} blocks left",
            ticks,
            game.phase(),
            hud.level,
            hud.score,
            hud.lives,
            game.session().remaining_blocks()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Brickfall (native) starting...");
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is brickfall::platform::web::wasm_start
}
