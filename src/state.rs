use serde::{Deserialize, Serialize};

use crate::action::PlayerId;
use crate::card::{Card, Color};

/// Lifecycle of a room's game.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Starting,
    Playing,
    Finished,
}

/// Turn direction around the table.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// `+1` or `-1`.
    pub fn step(self) -> i8 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }
}

/// One slot in the finishing order. Position 1 is the round winner.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FinishEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub position: usize,
    pub is_loser: bool,
}

/// Public portion of a player's state that every seat may observe.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerPublicState {
    pub id: PlayerId,
    pub name: String,
    pub hand_size: usize,
    pub score: u32,
    pub finished: bool,
    pub is_current: bool,
}

/// Read-only snapshot of a room, suitable for broadcasting to every seat.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateProjection {
    pub room_id: String,
    pub status: GameStatus,
    pub players: Vec<PlayerPublicState>,
    pub turn_order: Vec<PlayerId>,
    pub current_player: Option<PlayerId>,
    pub current_player_index: usize,
    pub current_player_has_drawn: bool,
    pub direction: Direction,
    pub pending_draw: usize,
    pub wild_draw_four_pending: bool,
    pub top_card: Option<Card>,
    pub declared_color: Option<Color>,
    pub finishing_order: Vec<FinishEntry>,
    pub winner: Option<PlayerId>,
    pub draw_pile_count: usize,
    pub discard_pile_count: usize,
}

impl StateProjection {
    pub fn player(&self, id: &str) -> Option<&PlayerPublicState> {
        self.players.iter().find(|player| player.id == id)
    }

    /// Players still holding cards this round.
    pub fn active_players(&self) -> &[PlayerId] {
        &self.turn_order
    }
}

/// What a single recipient is allowed to see: the shared projection plus
/// their own hand.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub state: StateProjection,
    pub hand: Vec<Card>,
    pub is_your_turn: bool,
    pub has_playable_card: bool,
}
