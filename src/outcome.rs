//! Structured results returned by the engine's commands.

use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::Card;
use crate::state::FinishEntry;

/// Summary of a finished round.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundSummary {
    pub winner: Option<PlayerId>,
    pub finishing_order: Vec<FinishEntry>,
    /// Points added to the winner's cumulative score.
    pub points_awarded: u32,
}

/// Result of a successful `play_card` call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayOutcome {
    /// Card resolved and the turn moved on.
    Continued {
        card: Card,
        /// Penalty cards drawn for reaching one card without calling.
        penalty_drawn: usize,
    },
    /// Last card was an action or wild card. The play was rolled back and a
    /// two-card penalty drawn; the turn stays with the player.
    InvalidWin { card: Card, penalty_drawn: usize },
    /// Player emptied their hand; the round goes on without them.
    PlayerFinished {
        player_id: PlayerId,
        position: usize,
        remaining_players: usize,
    },
    /// Only one player was left holding cards.
    GameEnded(RoundSummary),
}

impl PlayOutcome {
    pub fn invalid_win(&self) -> bool {
        matches!(self, PlayOutcome::InvalidWin { .. })
    }

    pub fn game_ended(&self) -> bool {
        matches!(self, PlayOutcome::GameEnded(_))
    }
}

/// Result of a `draw_card` call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawOutcome {
    /// The pending stack was drawn in one go.
    Forced {
        requested: usize,
        drawn: usize,
        has_playable: bool,
    },
    /// A single voluntary card. `card` is `None` when the deck is exhausted.
    Voluntary { card: Option<Card>, playable: bool },
}

impl DrawOutcome {
    /// True when the deck could not supply every requested card.
    pub fn exhausted(&self) -> bool {
        match self {
            DrawOutcome::Forced { requested, drawn, .. } => drawn < requested,
            DrawOutcome::Voluntary { card, .. } => card.is_none(),
        }
    }
}

/// Result of a card-match challenge.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeOutcome {
    pub valid: bool,
    pub penalty: usize,
}

/// Result of a player leaving the room.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub remaining_players: usize,
    /// Set when the departure ended the round.
    pub round_over: Option<RoundSummary>,
}

/// Unified result for [`crate::GameEngine::apply_action`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionOutcome {
    Played(PlayOutcome),
    Drew(DrawOutcome),
    Passed,
    CardMatch { accepted: bool },
    Challenged(ChallengeOutcome),
}
