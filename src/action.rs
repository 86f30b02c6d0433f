use serde::{Deserialize, Serialize};

use crate::card::Color;

/// Opaque player identity assigned by the session layer.
pub type PlayerId = String;

/// Action a player can submit during a round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Play the card at `hand_index`; wilds need a declared color.
    Play {
        hand_index: usize,
        declared_color: Option<Color>,
    },
    /// Take the pending penalty, or one voluntary card.
    Draw,
    /// End the turn after drawing.
    Pass,
    /// Call card-match while holding two cards.
    SayCardMatch,
    /// Accuse another player of sitting on one card without calling.
    Challenge { target: PlayerId },
}

impl Action {
    pub fn play(hand_index: usize) -> Self {
        Action::Play {
            hand_index,
            declared_color: None,
        }
    }

    pub fn play_wild(hand_index: usize, color: Color) -> Self {
        Action::Play {
            hand_index,
            declared_color: Some(color),
        }
    }

    /// Returns the hand slot if the action is a play.
    pub fn hand_index(&self) -> Option<usize> {
        match self {
            Action::Play { hand_index, .. } => Some(*hand_index),
            _ => None,
        }
    }
}
