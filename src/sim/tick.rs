//! Fixed timestep simulation tick
//!
//! One call to `advance_tick` is one discrete step of the game.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionReport, resolve_collisions};
use super::scoring::{ScoreEvent, check_scoring};
use super::state::{GameSession, PaddleDirection};
use crate::policy::{Action, Observation, PolicyPort};

/// Human input sampled at the top of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanInput {
    pub move_up: bool,
    pub move_down: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// False when the session was already over and nothing ran
    pub advanced: bool,
    pub collisions: CollisionReport,
    pub score: Option<ScoreEvent>,
    /// Action applied to the policy paddle, if the port produced one
    pub action: Option<Action>,
}

/// Advance the session by one tick.
///
/// Order: human input, ball integration, collisions, scoring, then the
/// policy paddle. Nothing happens once the session is over.
pub fn advance_tick(
    session: &mut GameSession,
    input: &HumanInput,
    port: &mut PolicyPort,
) -> TickReport {
    if session.is_over() {
        return TickReport::default();
    }

    // Both keys: up then down, each clamped, so they cancel away from the edges
    let speed = session.params.human_speed;
    if input.move_up {
        session.apply_human_input(PaddleDirection::Up, speed);
    }
    if input.move_down {
        session.apply_human_input(PaddleDirection::Down, speed);
    }

    session.integrate_ball();
    let collisions = resolve_collisions(session);
    let score = check_scoring(session);
    session.time_ticks += 1;

    let mut action = None;
    if !session.is_over() {
        action = port.query(&Observation::from_session(session));
        if let Some(a) = action {
            session
                .policy
                .shift(a.velocity_signal * session.params.action_scale);
        }
    }

    TickReport {
        advanced: true,
        collisions,
        score,
        action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Policy, PolicyError, TrackingPolicy};
    use crate::sim::state::{GameStatus, Score, Side};
    use glam::Vec2;

    struct Constant(f32);

    impl Policy for Constant {
        fn name(&self) -> &str {
            "constant"
        }

        fn infer(&self, _obs: &Observation) -> Result<f32, PolicyError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_tick_moves_ball() {
        let mut session = GameSession::with_seed(12345);
        let mut port = PolicyPort::inert();
        let report = advance_tick(&mut session, &HumanInput::default(), &mut port);
        assert!(report.advanced);
        assert!((session.ball.pos - Vec2::new(0.51, 0.507)).length() < 1e-6);
        assert_eq!(session.time_ticks, 1);
    }

    #[test]
    fn test_human_input_applies() {
        let mut session = GameSession::with_seed(12345);
        let mut port = PolicyPort::inert();
        let up = HumanInput {
            move_up: true,
            ..Default::default()
        };
        advance_tick(&mut session, &up, &mut port);
        assert!((session.human.center_y - 0.48).abs() < 1e-6);
    }

    #[test]
    fn test_both_keys_cancel() {
        let mut session = GameSession::with_seed(12345);
        let mut port = PolicyPort::inert();
        let both = HumanInput {
            move_up: true,
            move_down: true,
        };
        advance_tick(&mut session, &both, &mut port);
        assert!((session.human.center_y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_policy_action_scaled_and_clamped() {
        let mut session = GameSession::with_seed(12345);
        let mut port = PolicyPort::new(Box::new(Constant(1.0)));
        let report = advance_tick(&mut session, &HumanInput::default(), &mut port);
        assert_eq!(report.action.map(|a| a.velocity_signal), Some(1.0));
        assert!((session.policy.center_y - 0.54).abs() < 1e-6);

        // Unbounded signal still cannot push the paddle out of its band
        let mut port = PolicyPort::new(Box::new(Constant(-100.0)));
        advance_tick(&mut session, &HumanInput::default(), &mut port);
        assert_eq!(session.policy.center_y, crate::consts::PADDLE_MIN_Y);
    }

    #[test]
    fn test_no_action_leaves_policy_paddle() {
        let mut session = GameSession::with_seed(12345);
        session.policy.center_y = 0.3;
        let mut port = PolicyPort::inert();
        let report = advance_tick(&mut session, &HumanInput::default(), &mut port);
        assert!(report.action.is_none());
        assert_eq!(session.policy.center_y, 0.3);
    }

    #[test]
    fn test_policy_not_queried_after_winning_point() {
        let mut session = GameSession::with_seed(12345);
        session.score = Score { left: 9, right: 0 };
        let edge = 1.0 - session.params.playfield.ball_width_norm();
        session.ball.pos = Vec2::new(edge - 0.005, 0.9);
        let mut port = PolicyPort::new(Box::new(Constant(1.0)));

        let report = advance_tick(&mut session, &HumanInput::default(), &mut port);
        assert_eq!(report.score.and_then(|s| s.winner), Some(Side::Left));
        assert!(report.action.is_none());
        assert_eq!(session.policy.center_y, 0.5);
    }

    #[test]
    fn test_game_over_freezes_session() {
        let mut session = GameSession::with_seed(12345);
        session.status = GameStatus::GameOver { winner: Side::Right };
        let before = session.snapshot();
        let mut port = PolicyPort::new(Box::new(TrackingPolicy::default()));
        let input = HumanInput {
            move_up: true,
            move_down: false,
        };

        for _ in 0..10 {
            let report = advance_tick(&mut session, &input, &mut port);
            assert!(!report.advanced);
        }
        assert_eq!(session.snapshot(), before);

        session.reset();
        assert!(advance_tick(&mut session, &input, &mut port).advanced);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameSession::with_seed(99999);
        let mut b = GameSession::with_seed(99999);
        let mut port_a = PolicyPort::new(Box::new(TrackingPolicy::default()));
        let mut port_b = PolicyPort::new(Box::new(TrackingPolicy::default()));

        for i in 0..2000 {
            let input = HumanInput {
                move_up: i % 7 == 0,
                move_down: i % 5 == 0,
            };
            advance_tick(&mut a, &input, &mut port_a);
            advance_tick(&mut b, &input, &mut port_b);
        }

        assert_eq!(a.snapshot(), b.snapshot());
    }
}
