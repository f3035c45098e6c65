//! Point scoring and win detection

use super::state::{GameSession, GameStatus, Side};

/// Outcome of a scoring check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEvent {
    /// Side that gained the point
    pub scorer: Side,
    /// Set when this point ended the session
    pub winner: Option<Side>,
}

/// Side credited with a point for the current ball position, if any.
///
/// Past the left edge the right side scores; past the right edge (less the
/// ball's width) the left side scores.
pub fn point_scorer(session: &GameSession) -> Option<Side> {
    let x = session.ball.pos.x;
    if x <= 0.0 {
        Some(Side::Right)
    } else if x >= 1.0 - session.params.playfield.ball_width_norm() {
        Some(Side::Left)
    } else {
        None
    }
}

/// Award a point if the ball left the field, re-serve, then check for a win.
pub fn check_scoring(session: &mut GameSession) -> Option<ScoreEvent> {
    let scorer = point_scorer(session)?;

    session.score.increment(scorer);
    session.serve_ball();

    let winner = session.score.winner(session.params.winning_score);
    if let Some(side) = winner {
        session.status = GameStatus::GameOver { winner: side };
        log::info!(
            "Game over: {:?} wins {}-{}",
            side,
            session.score.left,
            session.score.right
        );
    } else {
        log::info!(
            "{:?} scores ({}-{})",
            scorer,
            session.score.left,
            session.score.right
        );
    }

    Some(ScoreEvent { scorer, winner })
}
