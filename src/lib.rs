//! Server-authoritative rules engine for a multi-player matching card game:
//! colored and numbered cards, skips, reverses, draw stacking, wild cards,
//! card-match calls, elimination by finishing order and round scoring.

pub mod action;
pub mod bot;
pub mod bots;
pub mod card;
pub mod deck;
pub mod error;
pub mod game;
pub mod lobby;
pub mod outcome;
pub mod player;
pub mod score;
pub mod state;
pub mod visualize;

pub use crate::action::{Action, PlayerId};
pub use crate::bot::Bot;
pub use crate::bots::registry::{create_bot_from_spec, label_for_spec};
pub use crate::bots::{HeuristicBot, RandomBot};
pub use crate::card::{Card, Category, Color, Face};
pub use crate::deck::Deck;
pub use crate::error::{GameError, InvalidPlay};
pub use crate::game::{GameBuilder, GameConfig, GameEngine};
pub use crate::lobby::{LobbyError, RoomDirectory};
pub use crate::outcome::{
    ActionOutcome, ChallengeOutcome, DrawOutcome, LeaveOutcome, PlayOutcome, RoundSummary,
};
pub use crate::player::Player;
pub use crate::score::{hand_points, winner_points};
pub use crate::state::{
    Direction, FinishEntry, GameStatus, PlayerPublicState, PlayerView, StateProjection,
};
pub use crate::visualize::{describe_action, render_state, render_view};
