//! Fixed-rate game loop
//!
//! Converts wall-clock frame time into whole simulation ticks. Input is
//! sampled once at the top of each tick and every tick's snapshot goes to
//! the renderer. Window, input devices and drawing stay outside the crate.

use crate::consts::{MAX_SUBSTEPS, TICK_DT};
use crate::policy::PolicyPort;
use crate::settings::Settings;
use crate::sim::{GameSession, HumanInput, SessionSnapshot, TickReport, advance_tick};

/// Supplies the human's input for the coming tick
pub trait InputSource {
    fn sample(&mut self) -> HumanInput;
}

/// Consumes a read-only snapshot after every tick
pub trait Renderer {
    fn present(&mut self, snapshot: &SessionSnapshot);
}

impl<F: FnMut() -> HumanInput> InputSource for F {
    fn sample(&mut self) -> HumanInput {
        self()
    }
}

/// Owns the session and the policy port for the lifetime of a game
#[derive(Debug)]
pub struct GameLoop {
    session: GameSession,
    port: PolicyPort,
    accumulator: f32,
}

impl GameLoop {
    pub fn new(session: GameSession, port: PolicyPort) -> Self {
        Self {
            session,
            port,
            accumulator: 0.0,
        }
    }

    /// Build the session and load the configured policy
    pub fn from_settings(settings: &Settings) -> Self {
        let session = GameSession::new(settings.session_params(), settings.seed);
        let port = PolicyPort::from_source(&settings.policy);
        Self::new(session, port)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn port(&self) -> &PolicyPort {
        &self.port
    }

    /// Run exactly one tick
    pub fn step<I: InputSource, R: Renderer>(
        &mut self,
        input: &mut I,
        renderer: &mut R,
    ) -> TickReport {
        let sampled = input.sample();
        let report = advance_tick(&mut self.session, &sampled, &mut self.port);
        renderer.present(&self.session.snapshot());
        report
    }

    /// Advance by `dt` seconds of wall time; returns the number of ticks run
    pub fn frame<I: InputSource, R: Renderer>(
        &mut self,
        dt: f32,
        input: &mut I,
        renderer: &mut R,
    ) -> u32 {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, 0.25)
        } else {
            log::debug!("Ignoring non-finite frame time {}", dt);
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= TICK_DT && substeps < MAX_SUBSTEPS {
            self.step(input, renderer);
            self.accumulator -= TICK_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= TICK_DT {
            log::debug!("Dropping {:.3}s of backlog", self.accumulator);
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Start a new game with the same policy
    pub fn reset(&mut self) {
        self.session.reset();
        self.accumulator = 0.0;
    }

    /// End the game and release the policy
    pub fn into_session(self) -> GameSession {
        self.session
    }
}
