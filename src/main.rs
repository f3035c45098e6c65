//! Duel Pong headless runner
//!
//! `duel-pong [settings.json]` plays one game with a scripted human against
//! the configured policy. `duel-pong dataset <out.json> [count] [seed]`
//! writes labelled training samples.

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

use duel_pong::dataset;
use duel_pong::policy::tracking::{DEAD_BAND, label_move};
use duel_pong::sim::{Score, SessionSnapshot};
use duel_pong::{GameLoop, HumanInput, Observation, Renderer, Settings};

/// Hard stop for a headless game (10 minutes of play)
const MAX_TICKS: u64 = 60 * 60 * 10;

/// Logs the score line whenever it changes
struct ScoreLog {
    last: Score,
}

impl Renderer for ScoreLog {
    fn present(&mut self, snapshot: &SessionSnapshot) {
        if snapshot.score != self.last {
            self.last = snapshot.score;
            log::info!(
                "[tick {}] {} - {}",
                snapshot.time_ticks,
                snapshot.score.left,
                snapshot.score.right
            );
        }
    }
}

fn run_game(settings: &Settings) -> ExitCode {
    // A failed policy load is already reported once by the port
    let mut game = GameLoop::from_settings(settings);

    let mut renderer = ScoreLog {
        last: Score::default(),
    };

    while !game.session().is_over() && game.session().time_ticks < MAX_TICKS {
        // Scripted human: same tracking rule, mirrored onto the left paddle
        let session = game.session();
        let obs = Observation {
            paddle_y: session.human.center_y,
            ..Observation::from_session(session)
        };
        let mv = label_move(&obs, DEAD_BAND);
        let mut input = move || HumanInput {
            move_up: mv < 0.0,
            move_down: mv > 0.0,
        };
        game.step(&mut input, &mut renderer);
    }

    let session = game.session();
    log::info!(
        "Finished after {} ticks: {:?}, {} - {} ({} policy failures)",
        session.time_ticks,
        session.status,
        session.score.left,
        session.score.right,
        game.port().inference_failures()
    );
    ExitCode::SUCCESS
}

fn run_dataset(args: &[String]) -> ExitCode {
    let Some(out) = args.first() else {
        eprintln!("usage: duel-pong dataset <out.json> [count] [seed]");
        return ExitCode::FAILURE;
    };
    let count = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(dataset::DEFAULT_SAMPLES);
    let seed = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);

    let samples = dataset::generate(count, seed);
    let result = File::create(out)
        .map_err(|e| e.to_string())
        .and_then(|f| dataset::write_json(&samples, BufWriter::new(f)).map_err(|e| e.to_string()));

    match result {
        Ok(()) => {
            log::info!("Wrote {} samples to {}", samples.len(), out);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Failed to write {}: {}", out, err);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("dataset") => run_dataset(&args[1..]),
        Some(path) => run_game(&Settings::load(path)),
        None => run_game(&Settings::default()),
    }
}
