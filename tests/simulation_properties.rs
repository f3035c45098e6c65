//! Property tests over arbitrary input and policy sequences

use std::cell::Cell;

use duel_pong::consts::{PADDLE_MAX_Y, PADDLE_MIN_Y};
use duel_pong::policy::TrackingPolicy;
use duel_pong::sim::{Side, check_scoring, collision};
use duel_pong::{
    GameSession, GameStatus, HumanInput, Observation, Policy, PolicyError, PolicyPort,
    advance_tick,
};
use glam::Vec2;
use proptest::prelude::*;

/// Replays a fixed list of velocity signals, one per call
struct Scripted {
    signals: Vec<f32>,
    next: Cell<usize>,
}

impl Policy for Scripted {
    fn name(&self) -> &str {
        "scripted"
    }

    fn infer(&self, _obs: &Observation) -> Result<f32, PolicyError> {
        let i = self.next.get();
        self.next.set(i + 1);
        self.signals
            .get(i % self.signals.len().max(1))
            .copied()
            .ok_or_else(|| PolicyError::Inference("script empty".into()))
    }
}

fn inputs() -> impl Strategy<Value = Vec<HumanInput>> {
    prop::collection::vec(
        (any::<bool>(), any::<bool>()).prop_map(|(move_up, move_down)| HumanInput {
            move_up,
            move_down,
        }),
        1..400,
    )
}

proptest! {
    #[test]
    fn paddles_stay_in_band(
        seed in any::<u64>(),
        inputs in inputs(),
        signals in prop::collection::vec(-50.0f32..50.0, 1..64),
    ) {
        let mut session = GameSession::with_seed(seed);
        let mut port = PolicyPort::new(Box::new(Scripted { signals, next: Cell::new(0) }));

        for input in &inputs {
            advance_tick(&mut session, input, &mut port);
            prop_assert!((PADDLE_MIN_Y..=PADDLE_MAX_Y).contains(&session.human.center_y));
            prop_assert!((PADDLE_MIN_Y..=PADDLE_MAX_Y).contains(&session.policy.center_y));
        }
    }

    #[test]
    fn ball_stays_between_walls(
        seed in any::<u64>(),
        y in 0.0f32..0.98,
        vy in -0.05f32..0.05,
        ticks in 1usize..600,
    ) {
        let mut session = GameSession::with_seed(seed);
        session.ball.pos.y = y;
        session.ball.vel.y = vy;
        let floor = 1.0 - session.params.playfield.ball_height_norm();
        let mut port = PolicyPort::new(Box::new(TrackingPolicy::default()));

        for _ in 0..ticks {
            let before = session.ball;
            let report = advance_tick(&mut session, &HumanInput::default(), &mut port);
            prop_assert!(session.ball.pos.y >= 0.0 && session.ball.pos.y <= floor);

            // A wall hit clamps and flips vy in the same tick
            if report.collisions.wall && report.score.is_none() {
                prop_assert_eq!(session.ball.vel.y, -before.vel.y);
            }
        }
    }

    #[test]
    fn near_paddle_forces_positive_vx(
        center in PADDLE_MIN_Y..=PADDLE_MAX_Y,
        dx in -9.0f32..19.0,
        dy in -59.0f32..49.0,
        vx in -1.0f32..1.0,
    ) {
        let mut session = GameSession::with_seed(0);
        let pf = session.params.playfield;
        session.human.center_y = center;
        // Ball box overlaps the left paddle box (x 30..50, y center±50 px)
        let px = Vec2::new(30.0 + dx, center * pf.height + dy);
        session.ball.pos = Vec2::new(px.x / pf.width, px.y / pf.height);
        session.ball.vel.x = vx;

        let hit = collision::resolve_paddle(&mut session.ball, Side::Left, center, &pf);
        prop_assert!(hit);
        prop_assert_eq!(session.ball.vel.x, vx.abs());
    }

    #[test]
    fn scoring_resets_ball_and_credits_one_side(
        seed in any::<u64>(),
        past_left in any::<bool>(),
        overshoot in 0.0f32..0.05,
        y in 0.0f32..0.98,
    ) {
        let mut session = GameSession::with_seed(seed);
        let edge = 1.0 - session.params.playfield.ball_width_norm();
        session.ball.pos = if past_left {
            Vec2::new(-overshoot, y)
        } else {
            Vec2::new(edge + overshoot, y)
        };

        let event = check_scoring(&mut session).expect("ball is out");
        prop_assert_eq!(session.ball.pos, Vec2::splat(0.5));
        if past_left {
            prop_assert_eq!(event.scorer, Side::Right);
            prop_assert_eq!((session.score.left, session.score.right), (0, 1));
        } else {
            prop_assert_eq!(event.scorer, Side::Left);
            prop_assert_eq!((session.score.left, session.score.right), (1, 0));
        }
    }

    #[test]
    fn game_over_is_terminal(
        seed in any::<u64>(),
        y in 0.0f32..0.98,
        inputs in inputs(),
    ) {
        let mut session = GameSession::with_seed(seed);
        session.score.left = 9;
        session.score.right = 9;
        session.ball.pos = Vec2::new(0.001, y);
        session.ball.vel.x = -0.01;
        let mut port = PolicyPort::new(Box::new(TrackingPolicy::default()));

        let report = advance_tick(&mut session, &HumanInput::default(), &mut port);
        prop_assert_eq!(report.score.and_then(|s| s.winner), Some(Side::Right));
        prop_assert_eq!(session.status, GameStatus::GameOver { winner: Side::Right });

        let frozen = session.snapshot();
        for input in &inputs {
            let report = advance_tick(&mut session, input, &mut port);
            prop_assert!(!report.advanced);
            prop_assert_eq!(session.snapshot(), frozen);
        }
    }

    #[test]
    fn tracking_policy_is_idempotent(
        obs in prop::array::uniform5(-1.0f32..1.0),
    ) {
        let mut port = PolicyPort::new(Box::new(TrackingPolicy::default()));
        let obs = Observation::from_array(obs);
        let first = port.query(&obs);
        prop_assert!(first.is_some());
        for _ in 0..5 {
            prop_assert_eq!(port.query(&obs), first);
        }
    }
}
